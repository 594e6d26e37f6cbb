//! Problem instance with interned indices.
//!
//! [`ProblemInstance`] owns the caller's entities and precomputes dense
//! integer indices for lecturers and cohorts so the constraint engine never
//! compares strings on the hot path.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::calendar::Calendar;
use super::entities::{Course, Department, Lecturer, Room};
use crate::error::{InstanceIssue, InstanceWarning};

/// Position of a course in [`ProblemInstance::courses`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CourseIndex(pub usize);

/// Position of a room in [`ProblemInstance::rooms`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomIndex(pub usize);

/// Interned lecturer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LecturerIndex(pub usize);

/// Interned (level, department) cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CohortIndex(pub usize);

/// A fully known, read-only problem instance.
///
/// Referential integrity is assumed: lecturer ids referenced by a course
/// but missing from `lecturers` are still interned and behave like any
/// other lecturer.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    courses: Vec<Course>,
    rooms: Vec<Room>,
    lecturers: Vec<Lecturer>,
    departments: Vec<Department>,
    calendar: Calendar,

    lecturer_ids: Vec<String>,
    course_lecturers: Vec<Vec<LecturerIndex>>,
    cohorts: Vec<(String, String)>,
    course_cohorts: Vec<Vec<CohortIndex>>,
    sessions: Vec<CourseIndex>,
}

impl ProblemInstance {
    /// Builds an instance and its interned indices.
    pub fn new(
        courses: Vec<Course>,
        rooms: Vec<Room>,
        lecturers: Vec<Lecturer>,
        departments: Vec<Department>,
        calendar: Calendar,
    ) -> Self {
        let mut lecturer_lookup: HashMap<String, LecturerIndex> = HashMap::new();
        let mut lecturer_ids = Vec::new();
        let mut intern_lecturer = |id: &str| -> LecturerIndex {
            if let Some(&idx) = lecturer_lookup.get(id) {
                return idx;
            }
            let idx = LecturerIndex(lecturer_ids.len());
            lecturer_ids.push(id.to_string());
            lecturer_lookup.insert(id.to_string(), idx);
            idx
        };

        for lecturer in &lecturers {
            intern_lecturer(&lecturer.id);
        }

        let course_lecturers: Vec<Vec<LecturerIndex>> = courses
            .iter()
            .map(|course| {
                let mut ids: Vec<LecturerIndex> = course
                    .lecturer_ids
                    .iter()
                    .map(|id| intern_lecturer(id))
                    .collect();
                ids.sort_unstable();
                ids.dedup();
                ids
            })
            .collect();

        let mut cohort_lookup: HashMap<(String, String), CohortIndex> = HashMap::new();
        let mut cohorts = Vec::new();
        let course_cohorts: Vec<Vec<CohortIndex>> = courses
            .iter()
            .map(|course| {
                let mut ids: Vec<CohortIndex> = course
                    .departments
                    .iter()
                    .map(|dept| {
                        let key = (course.level.clone(), dept.clone());
                        *cohort_lookup.entry(key.clone()).or_insert_with(|| {
                            cohorts.push(key);
                            CohortIndex(cohorts.len() - 1)
                        })
                    })
                    .collect();
                ids.sort_unstable();
                ids.dedup();
                ids
            })
            .collect();

        let sessions = courses
            .iter()
            .enumerate()
            .flat_map(|(i, course)| {
                std::iter::repeat(CourseIndex(i)).take(course.lectures_per_week as usize)
            })
            .collect();

        Self {
            courses,
            rooms,
            lecturers,
            departments,
            calendar,
            lecturer_ids,
            course_lecturers,
            cohorts,
            course_cohorts,
            sessions,
        }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn lecturers(&self) -> &[Lecturer] {
        &self.lecturers
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn course(&self, idx: CourseIndex) -> &Course {
        &self.courses[idx.0]
    }

    pub fn room(&self, idx: RoomIndex) -> &Room {
        &self.rooms[idx.0]
    }

    /// Lecturers of a course, deduplicated and sorted.
    pub fn lecturers_of(&self, course: CourseIndex) -> &[LecturerIndex] {
        &self.course_lecturers[course.0]
    }

    /// Cohorts of a course, deduplicated and sorted.
    pub fn cohorts_of(&self, course: CourseIndex) -> &[CohortIndex] {
        &self.course_cohorts[course.0]
    }

    /// Number of interned lecturers (including ids only referenced by courses).
    pub fn lecturer_count(&self) -> usize {
        self.lecturer_ids.len()
    }

    pub fn cohort_count(&self) -> usize {
        self.cohorts.len()
    }

    pub fn lecturer_id(&self, idx: LecturerIndex) -> &str {
        &self.lecturer_ids[idx.0]
    }

    /// `(level, department)` of a cohort.
    pub fn cohort(&self, idx: CohortIndex) -> (&str, &str) {
        let (level, dept) = &self.cohorts[idx.0];
        (level, dept)
    }

    pub fn find_lecturer(&self, id: &str) -> Option<LecturerIndex> {
        self.lecturer_ids
            .iter()
            .position(|l| l == id)
            .map(LecturerIndex)
    }

    /// One entry per required session, in course order.
    pub fn sessions(&self) -> &[CourseIndex] {
        &self.sessions
    }

    /// Sum of `lectures_per_week` over all courses.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Checks that every session can at least be encoded.
    ///
    /// # Errors
    /// [`InstanceIssue::NoRooms`] or [`InstanceIssue::NoSlots`] when sessions
    /// exist but there is nowhere to put them.
    pub fn check_encodable(&self) -> Result<(), InstanceIssue> {
        let sessions = self.session_count();
        if sessions == 0 {
            return Ok(());
        }
        if self.rooms.is_empty() {
            return Err(InstanceIssue::NoRooms { sessions });
        }
        if self.calendar.is_empty() {
            return Err(InstanceIssue::NoSlots { sessions });
        }
        Ok(())
    }

    /// Data-quality findings for this instance.
    ///
    /// `max_lecturer_sessions` is the weekly cap used for the
    /// over-commitment check.
    pub fn warnings(&self, max_lecturer_sessions: u32) -> Vec<InstanceWarning> {
        let mut warnings = Vec::new();
        let largest_room = self.rooms.iter().map(|r| r.capacity).max();

        for (i, course) in self.courses.iter().enumerate() {
            let idx = CourseIndex(i);
            if course.lectures_per_week == 0 {
                warnings.push(InstanceWarning::NoSessions {
                    course_id: course.id.clone(),
                });
                continue;
            }
            if self.lecturers_of(idx).is_empty() {
                warnings.push(InstanceWarning::NoLecturers {
                    course_id: course.id.clone(),
                });
            }
            if self.cohorts_of(idx).is_empty() {
                warnings.push(InstanceWarning::NoDepartments {
                    course_id: course.id.clone(),
                });
            }
            if let Some(largest) = largest_room {
                if largest < course.student_count {
                    warnings.push(InstanceWarning::NoRoomFits {
                        course_id: course.id.clone(),
                        student_count: course.student_count,
                        largest_room: largest,
                    });
                }
            }
        }

        let mut demand = vec![0u32; self.lecturer_count()];
        for (i, course) in self.courses.iter().enumerate() {
            for lecturer in self.lecturers_of(CourseIndex(i)) {
                demand[lecturer.0] = demand[lecturer.0].saturating_add(course.lectures_per_week);
            }
        }
        for (i, &d) in demand.iter().enumerate() {
            if d > max_lecturer_sessions {
                warnings.push(InstanceWarning::LecturerOverCommitted {
                    lecturer_id: self.lecturer_ids[i].clone(),
                    demand: d,
                    cap: max_lecturer_sessions,
                });
            }
        }

        warnings
    }
}
