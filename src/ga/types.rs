//! Core trait definitions for the GA.
//!
//! [`Individual`] and [`GaProblem`] are the contract between the
//! evolutionary loop in [`GaRunner`](super::GaRunner) and a concrete
//! encoding such as [`TimetableProblem`](super::TimetableProblem).

use rand::Rng;

/// Marker trait for fitness values.
///
/// Lower fitness is better (minimization). The timetable encoding uses
/// [`Penalty`](crate::constraints::Penalty), ordered hard-first.
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// The worst possible fitness, used for unevaluated individuals.
    fn worst() -> Self;

    /// Converts the fitness to `f64` for logging.
    fn to_f64(self) -> f64;
}

/// A candidate solution carrying its own fitness.
///
/// The runner calls [`GaProblem::evaluate`] and stores the result via
/// [`set_fitness`](Individual::set_fitness).
pub trait Individual: Clone + Send + Sync {
    type Fitness: Fitness;

    fn fitness(&self) -> Self::Fitness;

    fn set_fitness(&mut self, fitness: Self::Fitness);
}

/// Defines a GA optimization problem.
///
/// # Thread Safety
///
/// `GaProblem` must be `Send + Sync` because the runner may evaluate
/// individuals in parallel. Evaluation must be pure; all randomness goes
/// through the `rng` arguments so a seeded run is reproducible.
pub trait GaProblem: Send + Sync {
    type Individual: Individual;

    /// Creates a random individual.
    ///
    /// No feasibility guarantee is required.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Evaluates an individual. Lower is better.
    fn evaluate(&self, individual: &Self::Individual) -> <Self::Individual as Individual>::Fitness;

    /// Produces one or two offspring by recombining two parents.
    ///
    /// The default implementation clones parent1 (no crossover).
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        _parent2: &Self::Individual,
        _rng: &mut R,
    ) -> Vec<Self::Individual> {
        vec![parent1.clone()]
    }

    /// Mutates an individual in place. The default is a no-op.
    fn mutate<R: Rng>(&self, _individual: &mut Self::Individual, _rng: &mut R) {}
}
