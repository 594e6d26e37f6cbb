//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → selection → crossover → mutation → repeat.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};

use super::config::GaConfig;
use super::types::{Fitness, GaProblem, Individual};
use crate::error::ConfigError;

/// Result of a GA optimization run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The best individual found during the entire run.
    pub best: I,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: I::Fitness,

    /// Number of completed generations.
    pub generations: usize,

    /// The target fitness was reached before the generation limit.
    pub reached_target: bool,

    /// Terminated because the best fitness stopped improving.
    pub stagnated: bool,

    /// Terminated because the time limit elapsed.
    pub timed_out: bool,

    /// Cancelled externally.
    pub cancelled: bool,

    /// Best fitness after initialization and after each generation.
    ///
    /// Never increases: the best individual is always carried over.
    pub fitness_history: Vec<I::Fitness>,
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```ignore
/// let problem = MyProblem::new();
/// let mut rng = create_rng(42);
/// let result = GaRunner::run_with_rng(&problem, &GaConfig::default(), None, None, &mut rng)?;
/// println!("Best fitness: {:?}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA drawing all randomness from `rng`.
    ///
    /// When `target` is given the run stops as soon as the best fitness is at
    /// or below it. A set `cancel` flag stops the run at the start of the
    /// next generation with the best individual found so far.
    pub fn run_with_rng<P: GaProblem, R: Rng>(
        problem: &P,
        config: &GaConfig,
        target: Option<<P::Individual as Individual>::Fitness>,
        cancel: Option<&AtomicBool>,
        rng: &mut R,
    ) -> Result<GaResult<P::Individual>, ConfigError> {
        config.validate().map_err(ConfigError::Invalid)?;

        let started = Instant::now();
        let deadline = config.time_limit_ms.map(Duration::from_millis);
        let reached = |f: <P::Individual as Individual>::Fitness| target.is_some_and(|t| f <= t);

        let size = config.population_size;
        let elite_count = config.elite_count();

        let mut population: Vec<P::Individual> =
            (0..size).map(|_| problem.create_individual(rng)).collect();
        evaluate_all(problem, &mut population, config.parallel);
        sort_population(&mut population);

        let mut best = population[0].clone();
        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        fitness_history.push(best.fitness());

        let mut generations = 0usize;
        let mut stagnation_counter = 0usize;
        let mut reached_target = reached(best.fitness());
        let mut stagnated = false;
        let mut timed_out = false;
        let mut cancelled = false;

        while !reached_target && generations < config.max_generations {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                cancelled = true;
                break;
            }
            if deadline.is_some_and(|limit| started.elapsed() >= limit) {
                timed_out = true;
                break;
            }

            let mut next_gen: Vec<P::Individual> = population[..elite_count].to_vec();

            while next_gen.len() < size {
                let (p1, p2) = config.selection.select_pair(&population, rng);

                let mut children = if rng.random_bool(config.crossover_rate) {
                    problem.crossover(&population[p1], &population[p2], rng)
                } else {
                    Vec::new()
                };
                if children.is_empty() {
                    children.push(population[p1].clone());
                }

                for mut child in children {
                    if next_gen.len() >= size {
                        break;
                    }
                    if rng.random_bool(config.mutation_rate) {
                        problem.mutate(&mut child, rng);
                    }
                    next_gen.push(child);
                }
            }

            // elites keep their fitness
            evaluate_all(problem, &mut next_gen[elite_count..], config.parallel);
            sort_population(&mut next_gen);
            population = next_gen;
            generations += 1;

            if population[0].fitness() < best.fitness() {
                best = population[0].clone();
                stagnation_counter = 0;
            } else {
                stagnation_counter += 1;
            }
            fitness_history.push(best.fitness());
            trace!(
                generation = generations,
                best = best.fitness().to_f64(),
                "generation finished"
            );

            if reached(best.fitness()) {
                reached_target = true;
            } else if config.stagnation_limit > 0 && stagnation_counter >= config.stagnation_limit
            {
                stagnated = true;
                break;
            }
        }

        debug!(
            generations,
            reached_target,
            stagnated,
            timed_out,
            cancelled,
            best = ?best.fitness(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "genetic search finished"
        );

        Ok(GaResult {
            best_fitness: best.fitness(),
            best,
            generations,
            reached_target,
            stagnated,
            timed_out,
            cancelled,
            fitness_history,
        })
    }
}

/// Evaluate every individual in `population`.
fn evaluate_all<P: GaProblem>(problem: &P, population: &mut [P::Individual], parallel: bool) {
    #[cfg(feature = "parallel")]
    if parallel {
        population.par_iter_mut().for_each(|ind| {
            let f = problem.evaluate(ind);
            ind.set_fitness(f);
        });
        return;
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    for ind in population.iter_mut() {
        let f = problem.evaluate(ind);
        ind.set_fitness(f);
    }
}

/// Stable sort, best first.
fn sort_population<I: Individual>(population: &mut [I]) {
    population.sort_by(|a, b| {
        a.fitness()
            .partial_cmp(&b.fitness())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
