//! Genetic algorithm.
//!
//! A generic GA loop built on trait-based abstractions, plus the timetable
//! encoding that drives it. A problem implements [`GaProblem`], which
//! specifies how to create, evaluate, crossover, and mutate individuals.
//!
//! # Core Traits
//!
//! - [`Individual`]: A candidate solution with associated fitness type
//! - [`GaProblem`]: Problem definition: initialization, evaluation and operators
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, rates, selection)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GeneticOptimizer`]: Runs the loop over a timetabling instance
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
pub mod operators;
mod problem;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use problem::{GaOutcome, GeneticOptimizer, TimetableChromosome, TimetableProblem};
pub use runner::{GaResult, GaRunner};
pub use selection::Selection;
pub use types::{Fitness, GaProblem, Individual};
