//! Timetabling as a GA problem.
//!
//! [`TimetableProblem`] plugs the timetable encoding into [`GaRunner`];
//! [`GeneticOptimizer`] wraps the run with instance checks and returns the
//! best timetable with its evaluation.

use std::sync::atomic::AtomicBool;

use rand::Rng;
use tracing::debug;

use super::config::GaConfig;
use super::operators::{mutate_assignment, random_assignment, single_point_crossover};
use super::runner::GaRunner;
use super::types::{Fitness, GaProblem, Individual};
use crate::constraints::{ConstraintEngine, Evaluation, Penalty};
use crate::error::{InstanceIssue, SolveError};
use crate::model::{Assignment, Timetable};

/// A candidate timetable: gene `i` places session `i`.
#[derive(Debug, Clone)]
pub struct TimetableChromosome {
    genes: Vec<Assignment>,
    fitness: Penalty,
}

impl TimetableChromosome {
    /// Wraps genes with an unevaluated fitness.
    pub fn new(genes: Vec<Assignment>) -> Self {
        Self {
            genes,
            fitness: Penalty::worst(),
        }
    }

    pub fn genes(&self) -> &[Assignment] {
        &self.genes
    }

    pub fn into_timetable(self) -> Timetable {
        Timetable::new(self.genes)
    }
}

impl Individual for TimetableChromosome {
    type Fitness = Penalty;

    fn fitness(&self) -> Penalty {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: Penalty) {
        self.fitness = fitness;
    }
}

/// Timetable encoding for [`GaRunner`].
///
/// Every individual it creates holds exactly one gene per session.
#[derive(Debug, Clone, Copy)]
pub struct TimetableProblem<'a> {
    engine: ConstraintEngine<'a>,
}

impl<'a> TimetableProblem<'a> {
    /// # Errors
    /// [`InstanceIssue`] when sessions exist but there are no rooms or no
    /// slots to draw from.
    pub fn new(engine: ConstraintEngine<'a>) -> Result<Self, InstanceIssue> {
        engine.instance().check_encodable()?;
        Ok(Self { engine })
    }
}

impl GaProblem for TimetableProblem<'_> {
    type Individual = TimetableChromosome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> TimetableChromosome {
        let instance = self.engine.instance();
        // rooms and slots exist whenever there are sessions; see `new`
        let genes = instance
            .sessions()
            .iter()
            .map(|&course| random_assignment(instance, course, rng))
            .collect::<Option<Vec<_>>>()
            .unwrap_or_default();
        TimetableChromosome::new(genes)
    }

    fn evaluate(&self, individual: &TimetableChromosome) -> Penalty {
        self.engine.evaluate(&individual.genes).penalty
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &TimetableChromosome,
        parent2: &TimetableChromosome,
        rng: &mut R,
    ) -> Vec<TimetableChromosome> {
        let (a, b) = single_point_crossover(&parent1.genes, &parent2.genes, rng);
        vec![TimetableChromosome::new(a), TimetableChromosome::new(b)]
    }

    fn mutate<R: Rng>(&self, individual: &mut TimetableChromosome, rng: &mut R) {
        mutate_assignment(&mut individual.genes, self.engine.instance(), rng);
    }
}

/// Best timetable of a genetic run.
#[derive(Debug, Clone)]
pub struct GaOutcome {
    pub timetable: Timetable,
    pub evaluation: Evaluation,
    pub generations: usize,
    /// The run found a zero-penalty timetable and stopped early.
    pub perfect: bool,
    /// Best penalty after initialization and after each generation.
    pub history: Vec<Penalty>,
}

/// Evolves timetables until a perfect one appears or the budget runs out.
#[derive(Debug, Clone)]
pub struct GeneticOptimizer<'a> {
    engine: ConstraintEngine<'a>,
    config: GaConfig,
}

impl<'a> GeneticOptimizer<'a> {
    pub fn new(engine: ConstraintEngine<'a>, config: GaConfig) -> Self {
        Self { engine, config }
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Runs the search, drawing all randomness from `rng`.
    ///
    /// The result always holds one assignment per session. It may still
    /// violate hard constraints; judging it is up to the caller. A set
    /// `cancel` flag ends the run with the best timetable so far.
    ///
    /// # Errors
    /// [`SolveError::InvalidInstance`] when the instance has sessions but no
    /// rooms or slots, [`SolveError::InvalidConfig`] for a bad `GaConfig`.
    pub fn run<R: Rng>(
        &self,
        rng: &mut R,
        cancel: Option<&AtomicBool>,
    ) -> Result<GaOutcome, SolveError> {
        let problem = TimetableProblem::new(self.engine)?;
        let result = GaRunner::run_with_rng(&problem, &self.config, Some(Penalty::ZERO), cancel, rng)?;

        let evaluation = self.engine.evaluate(result.best.genes());
        debug!(
            generations = result.generations,
            score = evaluation.score(),
            hard_violations = evaluation.hard_violations(),
            "genetic optimizer done"
        );

        Ok(GaOutcome {
            timetable: result.best.into_timetable(),
            evaluation,
            generations: result.generations,
            perfect: result.reached_target,
            history: result.fitness_history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ScoreWeights;
    use crate::model::{Calendar, CalendarConfig, Course, Day, ProblemInstance, Room};
    use crate::random::create_rng;

    fn small_instance() -> ProblemInstance {
        let courses = vec![
            Course::new("c1", "Algebra", "100", 30, 2)
                .with_lecturer("l1")
                .with_department("math"),
            Course::new("c2", "Physics", "100", 25, 2)
                .with_lecturer("l2")
                .with_department("phys"),
            Course::new("c3", "Logic", "200", 20, 1)
                .with_lecturer("l1")
                .with_department("math"),
        ];
        let rooms = vec![Room::new("r1", "Hall", 40), Room::new("r2", "Lab", 30)];
        ProblemInstance::new(courses, rooms, vec![], vec![], Calendar::default())
    }

    fn config() -> GaConfig {
        GaConfig::default()
            .with_population_size(40)
            .with_max_generations(300)
            .with_mutation_rate(0.5)
    }

    #[test]
    fn test_finds_clash_free_timetable() {
        let instance = small_instance();
        let engine = ConstraintEngine::new(&instance, ScoreWeights::default(), 20);
        let optimizer = GeneticOptimizer::new(engine, config());

        let outcome = optimizer.run(&mut create_rng(42), None).unwrap();
        assert_eq!(outcome.timetable.len(), instance.session_count());
        assert!(outcome.evaluation.is_feasible(), "{:?}", outcome.evaluation);
        assert_eq!(outcome.evaluation.penalty, *outcome.history.last().unwrap());
        for window in outcome.history.windows(2) {
            assert!(window[1] <= window[0]);
        }
    }

    #[test]
    fn test_stops_early_on_perfect_timetable() {
        let courses = vec![Course::new("c1", "Solo", "100", 10, 1)];
        let rooms = vec![Room::new("r1", "Hall", 40)];
        let instance = ProblemInstance::new(courses, rooms, vec![], vec![], Calendar::default());
        let engine = ConstraintEngine::new(&instance, ScoreWeights::default(), 20);

        let outcome = GeneticOptimizer::new(engine, config())
            .run(&mut create_rng(1), None)
            .unwrap();
        assert!(outcome.perfect);
        assert_eq!(outcome.generations, 0);
        assert_eq!(outcome.evaluation.score(), 0);
    }

    #[test]
    fn test_genes_keep_session_courses() {
        let instance = small_instance();
        let engine = ConstraintEngine::new(&instance, ScoreWeights::default(), 20);
        let outcome = GeneticOptimizer::new(engine, config().with_max_generations(20))
            .run(&mut create_rng(9), None)
            .unwrap();

        let courses: Vec<_> = outcome.timetable.iter().map(|a| a.course).collect();
        assert_eq!(courses, instance.sessions());
    }

    #[test]
    fn test_seeded_runs_agree() {
        let instance = small_instance();
        let engine = ConstraintEngine::new(&instance, ScoreWeights::default(), 20);
        let optimizer = GeneticOptimizer::new(engine, config().with_max_generations(30));

        let a = optimizer.run(&mut create_rng(77), None).unwrap();
        let b = optimizer.run(&mut create_rng(77), None).unwrap();
        assert_eq!(a.timetable, b.timetable);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_no_rooms_is_invalid_instance() {
        let courses = vec![Course::new("c1", "Solo", "100", 10, 1)];
        let instance = ProblemInstance::new(courses, vec![], vec![], vec![], Calendar::default());
        let engine = ConstraintEngine::new(&instance, ScoreWeights::default(), 20);

        let err = GeneticOptimizer::new(engine, config())
            .run(&mut create_rng(1), None)
            .unwrap_err();
        assert!(matches!(err, SolveError::InvalidInstance(_)));
    }

    #[test]
    fn test_cancelled_run_keeps_initial_best() {
        let instance = small_instance();
        let engine = ConstraintEngine::new(&instance, ScoreWeights::default(), 20);
        let cancel = AtomicBool::new(true);

        let outcome = GeneticOptimizer::new(engine, config())
            .run(&mut create_rng(4), Some(&cancel))
            .unwrap();
        assert_eq!(outcome.generations, 0);
        assert_eq!(outcome.history.len(), 1);
        assert_eq!(outcome.timetable.len(), instance.session_count());
    }

    #[test]
    fn test_problem_requires_rooms_and_slots() {
        let courses = vec![Course::new("c1", "Solo", "100", 10, 3)];
        let no_rooms = ProblemInstance::new(courses.clone(), vec![], vec![], vec![], Calendar::default());
        let engine = ConstraintEngine::new(&no_rooms, ScoreWeights::default(), 20);
        assert_eq!(
            TimetableProblem::new(engine).unwrap_err(),
            InstanceIssue::NoRooms { sessions: 3 }
        );

        let no_days = Calendar::new(&CalendarConfig::default().with_days(Vec::<Day>::new())).unwrap();
        let rooms = vec![Room::new("r1", "Hall", 40)];
        let no_slots = ProblemInstance::new(courses.clone(), rooms.clone(), vec![], vec![], no_days);
        let engine = ConstraintEngine::new(&no_slots, ScoreWeights::default(), 20);
        assert_eq!(
            TimetableProblem::new(engine).unwrap_err(),
            InstanceIssue::NoSlots { sessions: 3 }
        );

        let instance = ProblemInstance::new(courses, rooms, vec![], vec![], Calendar::default());
        let engine = ConstraintEngine::new(&instance, ScoreWeights::default(), 20);
        let problem = TimetableProblem::new(engine).unwrap();
        let mut rng = create_rng(5);
        for _ in 0..20 {
            assert_eq!(problem.create_individual(&mut rng).genes().len(), 3);
        }
    }

    #[test]
    fn test_single_slot_forces_clashes() {
        // one slot, one room, two sessions: a clash is unavoidable
        let calendar = Calendar::new(
            &CalendarConfig::default()
                .with_days([Day::Monday])
                .with_session_minutes(540),
        )
        .unwrap();
        let courses = vec![
            Course::new("c1", "A", "100", 10, 1),
            Course::new("c2", "B", "200", 10, 1),
        ];
        let rooms = vec![Room::new("r1", "Hall", 40)];
        let instance = ProblemInstance::new(courses, rooms, vec![], vec![], calendar);
        let engine = ConstraintEngine::new(&instance, ScoreWeights::default(), 20);

        let outcome = GeneticOptimizer::new(engine, config().with_max_generations(10))
            .run(&mut create_rng(3), None)
            .unwrap();
        assert!(!outcome.perfect);
        assert_eq!(outcome.evaluation.counts.room_clashes, 1);
        assert_eq!(outcome.evaluation.score(), -100);
    }
}
