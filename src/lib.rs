//! Weekly lecture timetabling engine.
//!
//! Assigns every required lecture session to a (day, slot, room) triple so
//! that no room, lecturer or student cohort is double-booked and every room
//! seats its class, while keeping lecturers' days loose and cohorts' days
//! compact.
//!
//! - **Model**: courses, rooms, lecturers, departments, the weekly slot grid,
//!   and the timetable produced by a solve.
//! - **Constraints**: the single definition of hard violations and the
//!   weighted score, shared by every solver.
//! - **Backtracking**: exact randomized depth-first search; returns a
//!   violation-free timetable or reports infeasibility.
//! - **Genetic Algorithm (GA)**: population-based search for instances too
//!   large to search exhaustively.
//! - **Solver**: strategy selection and the acceptability rule.
//!
//! # Example
//!
//! ```
//! use u_timetable::model::{Calendar, Course, ProblemInstance, Room};
//! use u_timetable::{solve, SolverConfig, Strategy};
//!
//! let courses = vec![
//!     Course::new("cs101", "Programming", "100", 40, 3)
//!         .with_lecturer("ada")
//!         .with_department("cs"),
//!     Course::new("ma101", "Calculus", "100", 40, 2)
//!         .with_lecturer("emmy")
//!         .with_department("cs"),
//! ];
//! let rooms = vec![Room::new("r1", "Main hall", 60)];
//! let instance = ProblemInstance::new(courses, rooms, vec![], vec![], Calendar::default());
//!
//! let config = SolverConfig::default().with_seed(42);
//! let solution = solve(&instance, Strategy::Auto, &config).unwrap();
//! assert_eq!(solution.timetable.len(), 5);
//! assert!(solution.evaluation.is_feasible());
//! ```

pub mod backtrack;
pub mod config;
pub mod constraints;
pub mod error;
pub mod ga;
pub mod model;
pub mod random;
pub mod solver;

pub use config::SolverConfig;
pub use error::{ConfigError, SolveError};
pub use solver::{solve, Solution, SolveResult, Solver, Strategy};
