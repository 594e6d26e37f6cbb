//! Occupancy views used by the hard-constraint predicates.
//!
//! [`Occupancy`] answers "is this room / lecturer / cohort busy at
//! (day, slot)". Two implementations:
//!
//! - [`OccupancyIndex`]: dense per-slot counters, O(1) queries and
//!   commit/release. Used by the backtracking search and by scoring.
//! - [`PlacedSlice`]: a linear scan over already placed assignments.

use crate::model::{
    Assignment, CohortIndex, Day, LecturerIndex, ProblemInstance, RoomIndex,
};

/// Query interface over a set of placed assignments.
pub trait Occupancy {
    fn room_busy(&self, room: RoomIndex, day: Day, slot: usize) -> bool;
    fn lecturer_busy(&self, lecturer: LecturerIndex, day: Day, slot: usize) -> bool;
    fn cohort_busy(&self, cohort: CohortIndex, day: Day, slot: usize) -> bool;
}

/// Dense occupancy counters keyed by flat calendar slot.
///
/// Counters (not flags) so that committing two clashing assignments and
/// releasing one of them leaves the other still recorded.
#[derive(Debug, Clone)]
pub struct OccupancyIndex<'a> {
    instance: &'a ProblemInstance,
    slot_count: usize,
    rooms: Vec<u32>,
    lecturers: Vec<u32>,
    cohorts: Vec<u32>,
    lecturer_load: Vec<u32>,
    placed: usize,
}

impl<'a> OccupancyIndex<'a> {
    /// Creates an empty index sized for the instance.
    pub fn new(instance: &'a ProblemInstance) -> Self {
        let slot_count = instance.calendar().slot_count();
        Self {
            instance,
            slot_count,
            rooms: vec![0; slot_count * instance.rooms().len()],
            lecturers: vec![0; slot_count * instance.lecturer_count()],
            cohorts: vec![0; slot_count * instance.cohort_count()],
            lecturer_load: vec![0; instance.lecturer_count()],
            placed: 0,
        }
    }

    fn flat(&self, day: Day, slot: usize) -> Option<usize> {
        self.instance.calendar().flat_index(day, slot)
    }

    fn apply(&mut self, assignment: &Assignment, add: bool) {
        let Some(s) = self.flat(assignment.day, assignment.slot) else {
            return;
        };
        let instance = self.instance;
        let n = self.slot_count;
        let bump = |counter: &mut u32| {
            if add {
                *counter += 1;
            } else {
                *counter = counter.saturating_sub(1);
            }
        };

        bump(&mut self.rooms[assignment.room.0 * n + s]);
        for lecturer in instance.lecturers_of(assignment.course) {
            bump(&mut self.lecturers[lecturer.0 * n + s]);
            bump(&mut self.lecturer_load[lecturer.0]);
        }
        for cohort in instance.cohorts_of(assignment.course) {
            bump(&mut self.cohorts[cohort.0 * n + s]);
        }
        if add {
            self.placed += 1;
        } else {
            self.placed = self.placed.saturating_sub(1);
        }
    }

    /// Records an assignment.
    pub fn commit(&mut self, assignment: &Assignment) {
        self.apply(assignment, true);
    }

    /// Reverses a previous [`commit`](Self::commit) of the same assignment.
    pub fn release(&mut self, assignment: &Assignment) {
        self.apply(assignment, false);
    }

    /// Number of committed assignments.
    pub fn placed(&self) -> usize {
        self.placed
    }

    /// Sessions currently committed for a lecturer across the week.
    pub fn lecturer_load(&self, lecturer: LecturerIndex) -> u32 {
        self.lecturer_load[lecturer.0]
    }

    pub(crate) fn lecturer_loads(&self) -> &[u32] {
        &self.lecturer_load
    }

    /// Slots (within `day`) at which the lecturer is busy, ascending.
    pub(crate) fn lecturer_slots(&self, lecturer: LecturerIndex, day: Day) -> Vec<usize> {
        self.busy_slots(&self.lecturers, lecturer.0, day)
    }

    /// Slots (within `day`) at which the cohort is busy, ascending.
    pub(crate) fn cohort_slots(&self, cohort: CohortIndex, day: Day) -> Vec<usize> {
        self.busy_slots(&self.cohorts, cohort.0, day)
    }

    fn busy_slots(&self, table: &[u32], row: usize, day: Day) -> Vec<usize> {
        let per_day = self.instance.calendar().slots_per_day();
        (0..per_day)
            .filter(|&slot| {
                self.flat(day, slot)
                    .is_some_and(|s| table[row * self.slot_count + s] > 0)
            })
            .collect()
    }

    fn busy(&self, table: &[u32], row: usize, day: Day, slot: usize) -> bool {
        self.flat(day, slot)
            .is_some_and(|s| table[row * self.slot_count + s] > 0)
    }
}

impl Occupancy for OccupancyIndex<'_> {
    fn room_busy(&self, room: RoomIndex, day: Day, slot: usize) -> bool {
        self.busy(&self.rooms, room.0, day, slot)
    }

    fn lecturer_busy(&self, lecturer: LecturerIndex, day: Day, slot: usize) -> bool {
        self.busy(&self.lecturers, lecturer.0, day, slot)
    }

    fn cohort_busy(&self, cohort: CohortIndex, day: Day, slot: usize) -> bool {
        self.busy(&self.cohorts, cohort.0, day, slot)
    }
}

/// Occupancy answered by scanning a slice of placed assignments.
#[derive(Debug, Clone, Copy)]
pub struct PlacedSlice<'a> {
    instance: &'a ProblemInstance,
    placed: &'a [Assignment],
}

impl<'a> PlacedSlice<'a> {
    pub fn new(instance: &'a ProblemInstance, placed: &'a [Assignment]) -> Self {
        Self { instance, placed }
    }

    fn at(&self, day: Day, slot: usize) -> impl Iterator<Item = &'a Assignment> {
        self.placed
            .iter()
            .filter(move |a| a.day == day && a.slot == slot)
    }
}

impl Occupancy for PlacedSlice<'_> {
    fn room_busy(&self, room: RoomIndex, day: Day, slot: usize) -> bool {
        self.at(day, slot).any(|a| a.room == room)
    }

    fn lecturer_busy(&self, lecturer: LecturerIndex, day: Day, slot: usize) -> bool {
        self.at(day, slot)
            .any(|a| self.instance.lecturers_of(a.course).contains(&lecturer))
    }

    fn cohort_busy(&self, cohort: CohortIndex, day: Day, slot: usize) -> bool {
        self.at(day, slot)
            .any(|a| self.instance.cohorts_of(a.course).contains(&cohort))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Calendar, Course, CourseIndex, Room};

    fn instance() -> ProblemInstance {
        ProblemInstance::new(
            vec![
                Course::new("c1", "A", "100", 10, 2)
                    .with_lecturer("l1")
                    .with_department("math"),
                Course::new("c2", "B", "100", 10, 1)
                    .with_lecturer("l2")
                    .with_department("math"),
            ],
            vec![Room::new("r1", "R1", 30), Room::new("r2", "R2", 30)],
            Vec::new(),
            Vec::new(),
            Calendar::default(),
        )
    }

    #[test]
    fn test_commit_and_release() {
        let inst = instance();
        let mut index = OccupancyIndex::new(&inst);
        let a = Assignment::new(CourseIndex(0), RoomIndex(1), Day::Wednesday, 3);

        index.commit(&a);
        assert!(index.room_busy(RoomIndex(1), Day::Wednesday, 3));
        assert!(!index.room_busy(RoomIndex(0), Day::Wednesday, 3));
        assert!(index.lecturer_busy(LecturerIndex(0), Day::Wednesday, 3));
        assert!(index.cohort_busy(CohortIndex(0), Day::Wednesday, 3));
        assert_eq!(index.lecturer_load(LecturerIndex(0)), 1);
        assert_eq!(index.placed(), 1);

        index.release(&a);
        assert!(!index.room_busy(RoomIndex(1), Day::Wednesday, 3));
        assert!(!index.lecturer_busy(LecturerIndex(0), Day::Wednesday, 3));
        assert_eq!(index.lecturer_load(LecturerIndex(0)), 0);
        assert_eq!(index.placed(), 0);
    }

    #[test]
    fn test_counters_survive_partial_release() {
        let inst = instance();
        let mut index = OccupancyIndex::new(&inst);
        let a = Assignment::new(CourseIndex(0), RoomIndex(0), Day::Monday, 0);
        let b = Assignment::new(CourseIndex(1), RoomIndex(0), Day::Monday, 0);
        index.commit(&a);
        index.commit(&b);
        index.release(&a);
        assert!(index.room_busy(RoomIndex(0), Day::Monday, 0));
        assert!(index.cohort_busy(CohortIndex(0), Day::Monday, 0));
    }

    #[test]
    fn test_busy_slots_sorted() {
        let inst = instance();
        let mut index = OccupancyIndex::new(&inst);
        index.commit(&Assignment::new(CourseIndex(0), RoomIndex(0), Day::Friday, 5));
        index.commit(&Assignment::new(CourseIndex(0), RoomIndex(0), Day::Friday, 1));
        assert_eq!(index.lecturer_slots(LecturerIndex(0), Day::Friday), vec![1, 5]);
        assert!(index.lecturer_slots(LecturerIndex(0), Day::Monday).is_empty());
    }

    #[test]
    fn test_slice_agrees_with_index() {
        let inst = instance();
        let placed = [
            Assignment::new(CourseIndex(0), RoomIndex(0), Day::Tuesday, 2),
            Assignment::new(CourseIndex(1), RoomIndex(1), Day::Tuesday, 4),
        ];
        let slice = PlacedSlice::new(&inst, &placed);
        let mut index = OccupancyIndex::new(&inst);
        for a in &placed {
            index.commit(a);
        }
        for slot in 0..inst.calendar().slots_per_day() {
            for r in 0..2 {
                assert_eq!(
                    slice.room_busy(RoomIndex(r), Day::Tuesday, slot),
                    index.room_busy(RoomIndex(r), Day::Tuesday, slot)
                );
            }
            for l in 0..2 {
                assert_eq!(
                    slice.lecturer_busy(LecturerIndex(l), Day::Tuesday, slot),
                    index.lecturer_busy(LecturerIndex(l), Day::Tuesday, slot)
                );
            }
            assert_eq!(
                slice.cohort_busy(CohortIndex(0), Day::Tuesday, slot),
                index.cohort_busy(CohortIndex(0), Day::Tuesday, slot)
            );
        }
    }
}
