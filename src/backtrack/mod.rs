//! Backtracking solver.
//!
//! Exact depth-first search over sessions. Each session tries every
//! (day, slot, room) triple in a shuffled order against a dense occupancy
//! index; a triple that breaks no hard constraint is committed and the
//! search moves on, and every commit is released again on the way back up.
//!
//! Infeasibility is relative to the explored ordering. The search is
//! complete for a given shuffle, but symmetric orderings are not pruned.
//!
//! # References
//!
//! - Golomb & Baumert (1965), "Backtrack Programming"
//! - Haralick & Elliott (1980), "Increasing Tree Search Efficiency for
//!   Constraint Satisfaction Problems"

mod config;
mod runner;

pub use config::{BacktrackConfig, SessionOrder};
pub use runner::{BacktrackOutcome, BacktrackResult, BacktrackSolver};
