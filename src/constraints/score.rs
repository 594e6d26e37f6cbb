//! Penalty and score types.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::weights::ScoreWeights;
use crate::ga::Fitness;

/// Weighted penalty of a timetable. Lower is better; zero is perfect.
///
/// `hard` carries clash and capacity penalties plus the lecturer overload
/// penalty; `soft` carries the preference terms. Ordered lexicographically:
/// any hard penalty outranks every soft penalty, however large.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Penalty {
    pub hard: u64,
    pub soft: u64,
}

impl Penalty {
    pub const ZERO: Penalty = Penalty { hard: 0, soft: 0 };

    pub fn new(hard: u64, soft: u64) -> Self {
        Self { hard, soft }
    }

    /// Sum of hard and soft penalties.
    pub fn total(&self) -> u64 {
        self.hard.saturating_add(self.soft)
    }

    /// Scalar score. Higher is better, `0` is perfect.
    ///
    /// `soft_ceiling` is the largest soft penalty the instance can produce.
    /// Hard penalties are scaled past it, so the score agrees with the
    /// lexicographic order as long as `soft <= soft_ceiling`.
    pub fn score(&self, soft_ceiling: u64) -> i64 {
        let raw = self
            .hard
            .saturating_mul(soft_ceiling.saturating_add(1))
            .saturating_add(self.soft);
        -(i64::try_from(raw).unwrap_or(i64::MAX))
    }

    pub fn is_zero(&self) -> bool {
        self.hard == 0 && self.soft == 0
    }
}

impl Ord for Penalty {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hard
            .cmp(&other.hard)
            .then_with(|| self.soft.cmp(&other.soft))
    }
}

impl PartialOrd for Penalty {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Penalty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hard {} / soft {}", self.hard, self.soft)
    }
}

impl Fitness for Penalty {
    fn worst() -> Self {
        Penalty {
            hard: u64::MAX,
            soft: u64::MAX,
        }
    }

    fn to_f64(self) -> f64 {
        self.total() as f64
    }
}

/// Raw violation and preference counts behind a [`Penalty`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationCounts {
    pub room_clashes: u32,
    pub lecturer_clashes: u32,
    pub cohort_clashes: u32,
    pub capacity_breaches: u32,
    /// Lecturers whose weekly sessions exceed the cap. Penalized, but not
    /// a hard violation.
    pub overloaded_lecturers: u32,
    /// Back-to-back session pairs of the same lecturer within a day.
    pub consecutive_pairs: u32,
    /// Idle periods between sessions of the same cohort within a day.
    pub gap_periods: u32,
}

impl ViolationCounts {
    /// Clashes and capacity breaches.
    pub fn hard_violations(&self) -> u32 {
        self.room_clashes + self.lecturer_clashes + self.cohort_clashes + self.capacity_breaches
    }

    /// Applies the weights.
    pub fn penalty(&self, w: &ScoreWeights) -> Penalty {
        let hard = u64::from(self.room_clashes) * w.room_clash
            + u64::from(self.lecturer_clashes) * w.lecturer_clash
            + u64::from(self.cohort_clashes) * w.cohort_clash
            + u64::from(self.capacity_breaches) * w.capacity
            + u64::from(self.overloaded_lecturers) * w.lecturer_overload;
        let soft = u64::from(self.consecutive_pairs) * w.lecturer_consecutive
            + u64::from(self.gap_periods) * w.cohort_gap;
        Penalty { hard, soft }
    }
}

/// Full evaluation of a timetable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub penalty: Penalty,
    pub counts: ViolationCounts,
    /// Upper bound on `penalty.soft` for the evaluated instance.
    pub soft_ceiling: u64,
}

impl Evaluation {
    /// Scalar score; any hard violation scores below every timetable
    /// without one.
    pub fn score(&self) -> i64 {
        self.penalty.score(self.soft_ceiling)
    }

    pub fn hard_violations(&self) -> u32 {
        self.counts.hard_violations()
    }

    /// No hard constraint is violated.
    pub fn is_feasible(&self) -> bool {
        self.hard_violations() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_outranks_any_soft() {
        let one_hard = Penalty::new(1, 0);
        let huge_soft = Penalty::new(0, u64::MAX - 1);
        assert!(huge_soft < one_hard);
    }

    #[test]
    fn test_score_scales_hard_past_soft_ceiling() {
        assert_eq!(Penalty::new(200, 7).score(99), -(200 * 100 + 7));
        assert_eq!(Penalty::new(0, 7).score(99), -7);
        assert_eq!(Penalty::ZERO.score(99), 0);
        assert!(Penalty::worst().score(99) < 0);
    }

    #[test]
    fn test_score_agrees_with_order() {
        let ceiling = 150;
        let one_hard = Penalty::new(1, 0);
        let max_soft = Penalty::new(0, ceiling);
        assert!(max_soft < one_hard);
        assert!(max_soft.score(ceiling) > one_hard.score(ceiling));

        let a = Penalty::new(100, ceiling);
        let b = Penalty::new(101, 0);
        assert!(a.score(ceiling) > b.score(ceiling));
    }

    #[test]
    fn test_counts_to_penalty() {
        let counts = ViolationCounts {
            room_clashes: 1,
            capacity_breaches: 2,
            overloaded_lecturers: 1,
            consecutive_pairs: 3,
            gap_periods: 4,
            ..ViolationCounts::default()
        };
        let p = counts.penalty(&ScoreWeights::default());
        assert_eq!(p.hard, 100 + 200 + 1000);
        assert_eq!(p.soft, 15 + 8);
        assert_eq!(counts.hard_violations(), 3);
    }
}
