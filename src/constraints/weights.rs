//! Penalty weights.

use serde::{Deserialize, Serialize};

/// Tunable weights of the scoring function.
///
/// Hard weights apply per violation, `lecturer_overload` per lecturer whose
/// weekly sessions exceed the cap, `lecturer_consecutive` per back-to-back
/// pair of a lecturer's sessions within a day, and `cohort_gap` per idle
/// period between two sessions of the same cohort within a day.
///
/// Every hard weight must be strictly greater than every soft weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub room_clash: u64,
    pub lecturer_clash: u64,
    pub cohort_clash: u64,
    pub capacity: u64,
    pub lecturer_overload: u64,
    pub lecturer_consecutive: u64,
    pub cohort_gap: u64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            room_clash: 100,
            lecturer_clash: 100,
            cohort_clash: 100,
            capacity: 100,
            lecturer_overload: 1000,
            lecturer_consecutive: 5,
            cohort_gap: 2,
        }
    }
}

impl ScoreWeights {
    fn min_hard(&self) -> u64 {
        [
            self.room_clash,
            self.lecturer_clash,
            self.cohort_clash,
            self.capacity,
            self.lecturer_overload,
        ]
        .into_iter()
        .min()
        .unwrap_or(0)
    }

    fn max_soft(&self) -> u64 {
        self.lecturer_consecutive.max(self.cohort_gap)
    }

    /// Validates the weight ordering.
    ///
    /// Returns `Err` with a description if any hard weight is not strictly
    /// greater than every soft weight.
    pub fn validate(&self) -> Result<(), String> {
        let (hard, soft) = (self.min_hard(), self.max_soft());
        if hard <= soft {
            return Err(format!(
                "hard weights must exceed soft weights (smallest hard {hard}, largest soft {soft})"
            ));
        }
        Ok(())
    }
}
