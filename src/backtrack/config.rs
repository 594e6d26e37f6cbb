//! Backtracking configuration.

use serde::{Deserialize, Serialize};

/// Order in which sessions are placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOrder {
    /// Instance session order: courses as listed, sessions of a course
    /// back to back.
    #[default]
    Given,
    /// Largest classes first, ties broken by number of lecturers.
    ///
    /// Sessions with the fewest fitting rooms and the most clash partners
    /// fail earliest, which prunes the tree near the root.
    MostConstrainedFirst,
}

/// Configuration for the backtracking solver.
///
/// The search itself has no cutoff; `max_steps` and `time_limit_ms` are the
/// caller's budget. Running out of budget is reported separately from a
/// proven failure.
///
/// # Examples
///
/// ```
/// use u_timetable::backtrack::{BacktrackConfig, SessionOrder};
///
/// let config = BacktrackConfig::default()
///     .with_seed(42)
///     .with_max_steps(1_000_000)
///     .with_order(SessionOrder::MostConstrainedFirst);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BacktrackConfig {
    /// Seed for the candidate shuffles. `None` draws a fresh seed.
    pub seed: Option<u64>,

    /// Maximum number of candidate (day, slot, room) triples tested.
    pub max_steps: Option<u64>,

    /// Wall-clock limit in milliseconds.
    pub time_limit_ms: Option<u64>,

    pub order: SessionOrder,
}

impl BacktrackConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn with_order(mut self, order: SessionOrder) -> Self {
        self.order = order;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_steps == Some(0) {
            return Err("max_steps must be positive or None".into());
        }
        if self.time_limit_ms == Some(0) {
            return Err("time_limit_ms must be positive or None".into());
        }
        Ok(())
    }
}
