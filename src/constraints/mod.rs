//! Constraint engine.
//!
//! The single source of truth for what makes a timetable valid or good.
//!
//! # Key Types
//!
//! - [`ConstraintEngine`]: hard-constraint predicates, scoring, auditing
//! - [`Occupancy`]: query seam implemented by [`OccupancyIndex`] (O(1)) and
//!   [`PlacedSlice`] (linear scan)
//! - [`ViolationKind`], [`ViolationSet`]: what a single placement breaks
//! - [`Penalty`], [`Evaluation`]: weighted result of scoring a timetable
//! - [`ScoreWeights`]: tunable weights, hard strictly above soft

mod engine;
mod occupancy;
mod score;
mod violation;
mod weights;

pub use engine::ConstraintEngine;
pub use occupancy::{Occupancy, OccupancyIndex, PlacedSlice};
pub use score::{Evaluation, Penalty, ViolationCounts};
pub use violation::{Conflict, ViolationKind, ViolationSet};
pub use weights::ScoreWeights;
