//! Domain model.
//!
//! - [`Course`], [`Room`], [`Lecturer`], [`Department`]: caller-owned input
//! - [`Calendar`]: the discretized weekly slot grid
//! - [`ProblemInstance`]: the read-only instance with interned indices
//! - [`Assignment`], [`Timetable`]: solver output

mod calendar;
mod entities;
mod instance;
mod timetable;

pub use calendar::{Calendar, CalendarConfig, Day, TimeOfDay};
pub use entities::{Course, Department, Lecturer, Room};
pub use instance::{CohortIndex, CourseIndex, LecturerIndex, ProblemInstance, RoomIndex};
pub use timetable::{Assignment, AssignmentRecord, Timetable};
