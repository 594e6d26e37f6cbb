//! Hard-constraint violation kinds.

use std::fmt;

/// A hard constraint a single assignment can break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViolationKind {
    /// Another session already uses the same room at the same (day, slot).
    RoomClash,
    /// A lecturer of the course is already teaching at the same (day, slot).
    LecturerClash,
    /// A (level, department) cohort is already in class at the same (day, slot).
    CohortClash,
    /// The room seats fewer students than the course enrols.
    CapacityExceeded,
}

impl ViolationKind {
    pub const ALL: [ViolationKind; 4] = [
        ViolationKind::RoomClash,
        ViolationKind::LecturerClash,
        ViolationKind::CohortClash,
        ViolationKind::CapacityExceeded,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViolationKind::RoomClash => "room clash",
            ViolationKind::LecturerClash => "lecturer clash",
            ViolationKind::CohortClash => "cohort clash",
            ViolationKind::CapacityExceeded => "capacity exceeded",
        };
        f.write_str(name)
    }
}

/// Set of [`ViolationKind`]s.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ViolationSet(u8);

impl ViolationSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, kind: ViolationKind) {
        self.0 |= kind.bit();
    }

    pub fn contains(&self, kind: ViolationKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = ViolationKind> + '_ {
        ViolationKind::ALL
            .into_iter()
            .filter(move |k| self.contains(*k))
    }
}

impl fmt::Debug for ViolationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<ViolationKind> for ViolationSet {
    fn from_iter<T: IntoIterator<Item = ViolationKind>>(iter: T) -> Self {
        let mut set = Self::empty();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

/// A violation found by a full-timetable audit.
///
/// `first`/`second` are positions in the audited timetable. Capacity
/// breaches involve a single assignment and have `second == None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub kind: ViolationKind,
    pub first: usize,
    pub second: Option<usize>,
}
