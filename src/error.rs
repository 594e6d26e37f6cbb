//! Error and warning types.
//!
//! Failure layers:
//!
//! * [`SolveError`]: returned from [`Solver::solve`](crate::solver::Solver::solve).
//!   Every variant is a reportable outcome, not a crash.
//! * [`ConfigError`]: configuration could not be loaded or is out of range.
//! * [`CalendarError`]: the slot grid cannot be generated.
//! * [`InstanceIssue`]: the instance cannot be encoded, or not on the configured grid.
//!
//! [`InstanceWarning`] is not an error: a course without
//! lecturers is still schedulable, it just never registers a lecturer clash.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::{TimeOfDay, Timetable};

// ── Calendar ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("session length must be positive")]
    ZeroSessionLength,

    #[error("teaching day is empty: end {end} is not after start {start}")]
    EmptyDay { start: TimeOfDay, end: TimeOfDay },

    #[error("invalid time of day '{0}' (expected HH:MM)")]
    InvalidTime(String),
}

// ── Instance ──────────────────────────────────────────────────────────────────

/// Structural problems that stop an instance from being solved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceIssue {
    #[error("{sessions} session(s) to place but no rooms are available")]
    NoRooms { sessions: usize },

    #[error("{sessions} session(s) to place but the calendar has no slots")]
    NoSlots { sessions: usize },

    #[error("instance calendar ({found} slots) differs from the configured calendar ({configured} slots)")]
    CalendarMismatch { configured: usize, found: usize },
}

/// Data-quality findings that do not stop a solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceWarning {
    /// The course can never register a lecturer clash.
    NoLecturers { course_id: String },

    /// The course can never register a cohort clash.
    NoDepartments { course_id: String },

    /// `lectures_per_week == 0`; the course contributes no sessions.
    NoSessions { course_id: String },

    /// No room can seat the course; every placement breaches capacity.
    NoRoomFits {
        course_id: String,
        student_count: u32,
        largest_room: u32,
    },

    /// The lecturer's weekly demand exceeds the configured cap.
    LecturerOverCommitted {
        lecturer_id: String,
        demand: u32,
        cap: u32,
    },
}

impl fmt::Display for InstanceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceWarning::NoLecturers { course_id } => {
                write!(f, "course '{}' has no lecturers", course_id)
            }
            InstanceWarning::NoDepartments { course_id } => {
                write!(f, "course '{}' has no departments", course_id)
            }
            InstanceWarning::NoSessions { course_id } => {
                write!(f, "course '{}' requires zero lectures per week", course_id)
            }
            InstanceWarning::NoRoomFits {
                course_id,
                student_count,
                largest_room,
            } => write!(
                f,
                "course '{}' has {} students but the largest room seats {}",
                course_id, student_count, largest_room
            ),
            InstanceWarning::LecturerOverCommitted {
                lecturer_id,
                demand,
                cap,
            } => write!(
                f,
                "lecturer '{}' is assigned {} sessions per week (cap {})",
                lecturer_id, demand, cap
            ),
        }
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("invalid calendar: {0}")]
    Calendar(#[from] CalendarError),
}

// ── Solve ─────────────────────────────────────────────────────────────────────

/// Why a solve did not produce a timetable.
#[derive(Debug, Error)]
pub enum SolveError {
    /// Backtracking exhausted its explored ordering, or its step/time budget.
    ///
    /// This depends on the randomized ordering; it is not a proof of global
    /// infeasibility.
    #[error("no valid timetable found for {sessions} session(s) after {steps} step(s){}",
        budget_note(.budget_exhausted))]
    Infeasible {
        sessions: usize,
        steps: u64,
        budget_exhausted: bool,
    },

    /// The optimizer's best result did not clear the acceptability bar.
    ///
    /// The rejected timetable is carried for diagnostics only.
    #[error("best timetable scored {score} with {hard_violations} hard violation(s){}",
        threshold_note(.threshold))]
    BelowThreshold {
        score: i64,
        threshold: Option<i64>,
        hard_violations: u32,
        best: Box<Timetable>,
    },

    #[error("invalid instance: {0}")]
    InvalidInstance(#[from] InstanceIssue),

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}

fn budget_note(exhausted: &bool) -> &'static str {
    if *exhausted {
        " (search budget exhausted)"
    } else {
        ""
    }
}

fn threshold_note(threshold: &Option<i64>) -> String {
    threshold
        .map(|t| format!(" (threshold {t})"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infeasible_message_mentions_budget() {
        let err = SolveError::Infeasible {
            sessions: 4,
            steps: 100,
            budget_exhausted: true,
        };
        let msg = err.to_string();
        assert!(msg.contains("4 session(s)"));
        assert!(msg.contains("budget exhausted"));
    }

    #[test]
    fn test_below_threshold_message() {
        let err = SolveError::BelowThreshold {
            score: -350,
            threshold: Some(-100),
            hard_violations: 3,
            best: Box::default(),
        };
        assert_eq!(
            err.to_string(),
            "best timetable scored -350 with 3 hard violation(s) (threshold -100)"
        );
    }

    #[test]
    fn test_warning_display() {
        let w = InstanceWarning::LecturerOverCommitted {
            lecturer_id: "l1".into(),
            demand: 24,
            cap: 20,
        };
        assert_eq!(
            w.to_string(),
            "lecturer 'l1' is assigned 24 sessions per week (cap 20)"
        );
    }
}
