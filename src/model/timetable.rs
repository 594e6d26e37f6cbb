//! Solver output: assignments and timetables.

use serde::{Deserialize, Serialize};

use super::calendar::{Day, TimeOfDay};
use super::instance::{CourseIndex, ProblemInstance, RoomIndex};

/// One session placed at a (day, slot, room).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub course: CourseIndex,
    pub room: RoomIndex,
    pub day: Day,
    /// Zero-based period within the day.
    pub slot: usize,
}

impl Assignment {
    pub fn new(course: CourseIndex, room: RoomIndex, day: Day, slot: usize) -> Self {
        Self {
            course,
            room,
            day,
            slot,
        }
    }

    /// Whether both assignments occupy the same (day, slot).
    pub fn same_time(&self, other: &Assignment) -> bool {
        self.day == other.day && self.slot == other.slot
    }
}

/// Fully resolved view of an assignment for consumers.
///
/// Carries enough identifying data to resolve display names without access
/// to engine internals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub course_id: String,
    pub course_name: String,
    pub room_id: String,
    pub day: Day,
    pub slot: usize,
    pub time: Option<TimeOfDay>,
    pub level: String,
    pub lecturer_ids: Vec<String>,
    pub departments: Vec<String>,
}

/// An ordered sequence of assignments, one per required session.
///
/// Timetables emitted by the engine hold exactly
/// [`ProblemInstance::session_count`] assignments, in session order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    assignments: Vec<Assignment>,
}

impl Timetable {
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter()
    }

    pub fn into_inner(self) -> Vec<Assignment> {
        self.assignments
    }

    /// Resolves every assignment against its instance.
    pub fn records(&self, instance: &ProblemInstance) -> Vec<AssignmentRecord> {
        self.assignments
            .iter()
            .map(|a| {
                let course = instance.course(a.course);
                AssignmentRecord {
                    course_id: course.id.clone(),
                    course_name: course.name.clone(),
                    room_id: instance.room(a.room).id.clone(),
                    day: a.day,
                    slot: a.slot,
                    time: instance.calendar().time_of(a.slot),
                    level: course.level.clone(),
                    lecturer_ids: course.lecturer_ids.clone(),
                    departments: course.departments.clone(),
                }
            })
            .collect()
    }

    /// Assignments taught by the given lecturer.
    pub fn for_lecturer<'a>(
        &'a self,
        instance: &'a ProblemInstance,
        lecturer_id: &str,
    ) -> Vec<&'a Assignment> {
        let Some(lecturer) = instance.find_lecturer(lecturer_id) else {
            return Vec::new();
        };
        self.assignments
            .iter()
            .filter(|a| instance.lecturers_of(a.course).contains(&lecturer))
            .collect()
    }

    /// Assignments attended by students of the given department.
    pub fn for_department<'a>(
        &'a self,
        instance: &'a ProblemInstance,
        department: &str,
    ) -> Vec<&'a Assignment> {
        self.assignments
            .iter()
            .filter(|a| {
                instance
                    .course(a.course)
                    .departments
                    .iter()
                    .any(|d| d == department)
            })
            .collect()
    }
}

impl From<Vec<Assignment>> for Timetable {
    fn from(assignments: Vec<Assignment>) -> Self {
        Self::new(assignments)
    }
}

impl<'a> IntoIterator for &'a Timetable {
    type Item = &'a Assignment;
    type IntoIter = std::slice::Iter<'a, Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}
