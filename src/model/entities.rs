//! Problem-instance entities.
//!
//! These records are supplied by the caller and never mutated by the engine.

use serde::{Deserialize, Serialize};

/// A course that needs `lectures_per_week` sessions placed each week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Human-readable title.
    pub name: String,
    /// Lecturers teaching every session of this course.
    #[serde(default)]
    pub lecturer_ids: Vec<String>,
    /// Departments whose students attend this course.
    #[serde(default)]
    pub departments: Vec<String>,
    /// Cohort tag (e.g. "100", "200").
    pub level: String,
    /// Enrolled students; rooms must hold at least this many.
    pub student_count: u32,
    /// Sessions required per week.
    pub lectures_per_week: u32,
}

impl Course {
    /// Creates a course with no lecturers or departments.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        level: impl Into<String>,
        student_count: u32,
        lectures_per_week: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lecturer_ids: Vec::new(),
            departments: Vec::new(),
            level: level.into(),
            student_count,
            lectures_per_week,
        }
    }

    /// Adds a lecturer.
    pub fn with_lecturer(mut self, lecturer_id: impl Into<String>) -> Self {
        self.lecturer_ids.push(lecturer_id.into());
        self
    }

    /// Adds a department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.departments.push(department.into());
        self
    }
}

/// A teaching room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    /// Seats available.
    pub capacity: u32,
}

impl Room {
    pub fn new(id: impl Into<String>, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            capacity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecturer {
    pub id: String,
    pub name: String,
}

impl Lecturer {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
}

impl Department {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
