//! The constraint engine.
//!
//! [`ConstraintEngine`] is the single definition of what makes a timetable
//! valid or good. Both solvers call it; neither re-implements clash logic.

use super::occupancy::{Occupancy, OccupancyIndex};
use super::score::{Evaluation, ViolationCounts};
use super::violation::{Conflict, ViolationKind, ViolationSet};
use super::weights::ScoreWeights;
use crate::model::{
    Assignment, CohortIndex, CourseIndex, LecturerIndex, ProblemInstance, RoomIndex,
};

/// Pure, side-effect-free evaluation over one problem instance.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintEngine<'a> {
    instance: &'a ProblemInstance,
    weights: ScoreWeights,
    max_lecturer_sessions: u32,
}

impl<'a> ConstraintEngine<'a> {
    /// Creates an engine.
    ///
    /// `max_lecturer_sessions` is the weekly cap per lecturer.
    pub fn new(
        instance: &'a ProblemInstance,
        weights: ScoreWeights,
        max_lecturer_sessions: u32,
    ) -> Self {
        Self {
            instance,
            weights,
            max_lecturer_sessions,
        }
    }

    pub fn instance(&self) -> &'a ProblemInstance {
        self.instance
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn max_lecturer_sessions(&self) -> u32 {
        self.max_lecturer_sessions
    }

    /// Whether the room seats the course.
    pub fn fits(&self, course: CourseIndex, room: RoomIndex) -> bool {
        self.instance.room(room).capacity >= self.instance.course(course).student_count
    }

    /// Hard constraints `candidate` would break against `placed`.
    ///
    /// Each kind is checked independently. A cohort clash needs the same
    /// level and a shared department; matching only one of the two is not a
    /// clash.
    pub fn violations<O: Occupancy + ?Sized>(
        &self,
        candidate: &Assignment,
        placed: &O,
    ) -> ViolationSet {
        let (day, slot) = (candidate.day, candidate.slot);
        let mut set = ViolationSet::empty();

        if placed.room_busy(candidate.room, day, slot) {
            set.insert(ViolationKind::RoomClash);
        }
        if self
            .instance
            .lecturers_of(candidate.course)
            .iter()
            .any(|&l| placed.lecturer_busy(l, day, slot))
        {
            set.insert(ViolationKind::LecturerClash);
        }
        if self
            .instance
            .cohorts_of(candidate.course)
            .iter()
            .any(|&c| placed.cohort_busy(c, day, slot))
        {
            set.insert(ViolationKind::CohortClash);
        }
        if !self.fits(candidate.course, candidate.room) {
            set.insert(ViolationKind::CapacityExceeded);
        }
        set
    }

    /// Largest soft penalty any timetable of this instance can reach.
    ///
    /// A lecturer has at most `slots_per_day - 1` back-to-back pairs a day
    /// and a cohort at most `slots_per_day - 2` idle periods.
    pub fn soft_ceiling(&self) -> u64 {
        let calendar = self.instance.calendar();
        let days = calendar.days().len() as u64;
        let per_day = calendar.slots_per_day() as u64;
        let pairs = (self.instance.lecturer_count() as u64)
            .saturating_mul(days)
            .saturating_mul(per_day.saturating_sub(1));
        let gaps = (self.instance.cohort_count() as u64)
            .saturating_mul(days)
            .saturating_mul(per_day.saturating_sub(2));
        pairs
            .saturating_mul(self.weights.lecturer_consecutive)
            .saturating_add(gaps.saturating_mul(self.weights.cohort_gap))
    }

    /// Evaluates a complete or partial timetable.
    ///
    /// Hard violations are counted per assignment and kind against the
    /// assignments before it, so two sessions sharing a room count once.
    pub fn evaluate(&self, assignments: &[Assignment]) -> Evaluation {
        let mut index = OccupancyIndex::new(self.instance);
        let mut counts = ViolationCounts::default();

        for a in assignments {
            for kind in self.violations(a, &index).iter() {
                match kind {
                    ViolationKind::RoomClash => counts.room_clashes += 1,
                    ViolationKind::LecturerClash => counts.lecturer_clashes += 1,
                    ViolationKind::CohortClash => counts.cohort_clashes += 1,
                    ViolationKind::CapacityExceeded => counts.capacity_breaches += 1,
                }
            }
            index.commit(a);
        }

        counts.overloaded_lecturers = index
            .lecturer_loads()
            .iter()
            .filter(|&&load| load > self.max_lecturer_sessions)
            .count() as u32;

        let calendar = self.instance.calendar();
        for &day in calendar.days() {
            for l in 0..self.instance.lecturer_count() {
                let slots = index.lecturer_slots(LecturerIndex(l), day);
                counts.consecutive_pairs +=
                    slots.windows(2).filter(|w| w[1] == w[0] + 1).count() as u32;
            }
            for c in 0..self.instance.cohort_count() {
                let slots = index.cohort_slots(CohortIndex(c), day);
                counts.gap_periods += slots
                    .windows(2)
                    .map(|w| (w[1] - w[0] - 1) as u32)
                    .sum::<u32>();
            }
        }

        Evaluation {
            penalty: counts.penalty(&self.weights),
            counts,
            soft_ceiling: self.soft_ceiling(),
        }
    }

    /// Scalar score of a timetable. Higher is better, `0` is perfect.
    pub fn score(&self, assignments: &[Assignment]) -> i64 {
        self.evaluate(assignments).score()
    }

    /// Lists every pairwise clash and every capacity breach.
    ///
    /// Quadratic; intended for verification and diagnostics.
    pub fn audit(&self, assignments: &[Assignment]) -> Vec<Conflict> {
        let mut conflicts = Vec::new();
        for (i, a) in assignments.iter().enumerate() {
            if !self.fits(a.course, a.room) {
                conflicts.push(Conflict {
                    kind: ViolationKind::CapacityExceeded,
                    first: i,
                    second: None,
                });
            }
            for (j, b) in assignments.iter().enumerate().skip(i + 1) {
                if !a.same_time(b) {
                    continue;
                }
                let mut pair = |kind| {
                    conflicts.push(Conflict {
                        kind,
                        first: i,
                        second: Some(j),
                    })
                };
                if a.room == b.room {
                    pair(ViolationKind::RoomClash);
                }
                if sorted_intersect(
                    self.instance.lecturers_of(a.course),
                    self.instance.lecturers_of(b.course),
                ) {
                    pair(ViolationKind::LecturerClash);
                }
                if sorted_intersect(
                    self.instance.cohorts_of(a.course),
                    self.instance.cohorts_of(b.course),
                ) {
                    pair(ViolationKind::CohortClash);
                }
            }
        }
        conflicts
    }
}

/// Whether two ascending slices share an element.
fn sorted_intersect<T: Ord>(a: &[T], b: &[T]) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => return true,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{Penalty, PlacedSlice};
    use crate::model::{Calendar, Course, Day, Room};

    fn instance() -> ProblemInstance {
        ProblemInstance::new(
            vec![
                // 0: l1, (100, math)
                Course::new("c0", "A", "100", 20, 1)
                    .with_lecturer("l1")
                    .with_department("math"),
                // 1: l1, (200, phys)
                Course::new("c1", "B", "200", 20, 1)
                    .with_lecturer("l1")
                    .with_department("phys"),
                // 2: l2, (100, phys): same level as 0, different department
                Course::new("c2", "C", "100", 20, 1)
                    .with_lecturer("l2")
                    .with_department("phys"),
                // 3: l3, (100, math): same cohort as 0
                Course::new("c3", "D", "100", 50, 1)
                    .with_lecturer("l3")
                    .with_department("math"),
                // 4: no lecturers, no departments
                Course::new("c4", "E", "100", 5, 1),
            ],
            vec![Room::new("r0", "Small", 30), Room::new("r1", "Big", 60)],
            Vec::new(),
            Vec::new(),
            Calendar::default(),
        )
    }

    fn engine(inst: &ProblemInstance) -> ConstraintEngine<'_> {
        ConstraintEngine::new(inst, ScoreWeights::default(), 20)
    }

    fn at(course: usize, room: usize, day: Day, slot: usize) -> Assignment {
        Assignment::new(CourseIndex(course), RoomIndex(room), day, slot)
    }

    #[test]
    fn test_room_clash_only() {
        let inst = instance();
        let e = engine(&inst);
        let placed = [at(2, 0, Day::Monday, 0)];
        let v = e.violations(&at(4, 0, Day::Monday, 0), &PlacedSlice::new(&inst, &placed));
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![ViolationKind::RoomClash]);
    }

    #[test]
    fn test_lecturer_clash() {
        let inst = instance();
        let e = engine(&inst);
        let placed = [at(0, 0, Day::Monday, 0)];
        let v = e.violations(&at(1, 1, Day::Monday, 0), &PlacedSlice::new(&inst, &placed));
        assert!(v.contains(ViolationKind::LecturerClash));
        assert!(!v.contains(ViolationKind::CohortClash));
        let other_slot = e.violations(&at(1, 1, Day::Monday, 1), &PlacedSlice::new(&inst, &placed));
        assert!(other_slot.is_empty());
    }

    #[test]
    fn test_cohort_needs_level_and_department() {
        let inst = instance();
        let e = engine(&inst);
        let placed = [at(0, 0, Day::Tuesday, 2)];
        let view = PlacedSlice::new(&inst, &placed);

        // same level, other department
        assert!(e.violations(&at(2, 1, Day::Tuesday, 2), &view).is_empty());
        // other level and department, shared lecturer
        assert!(!e
            .violations(&at(1, 1, Day::Tuesday, 2), &view)
            .contains(ViolationKind::CohortClash));
        // same level and department
        assert!(e
            .violations(&at(3, 1, Day::Tuesday, 2), &view)
            .contains(ViolationKind::CohortClash));
    }

    #[test]
    fn test_capacity() {
        let inst = instance();
        let e = engine(&inst);
        let empty = PlacedSlice::new(&inst, &[]);
        assert!(e
            .violations(&at(3, 0, Day::Friday, 0), &empty)
            .contains(ViolationKind::CapacityExceeded));
        assert!(e.violations(&at(3, 1, Day::Friday, 0), &empty).is_empty());
    }

    #[test]
    fn test_index_and_slice_agree() {
        let inst = instance();
        let e = engine(&inst);
        let placed = [at(0, 0, Day::Monday, 0), at(2, 1, Day::Monday, 1)];
        let mut index = OccupancyIndex::new(&inst);
        for a in &placed {
            index.commit(a);
        }
        let slice = PlacedSlice::new(&inst, &placed);
        for course in 0..5 {
            for room in 0..2 {
                for slot in 0..3 {
                    let c = at(course, room, Day::Monday, slot);
                    assert_eq!(e.violations(&c, &index), e.violations(&c, &slice));
                }
            }
        }
    }

    #[test]
    fn test_evaluate_perfect() {
        let inst = instance();
        let e = engine(&inst);
        let tt = [
            at(0, 0, Day::Monday, 0),
            at(1, 0, Day::Tuesday, 0),
            at(2, 0, Day::Wednesday, 0),
            at(3, 1, Day::Thursday, 0),
            at(4, 0, Day::Friday, 0),
        ];
        let eval = e.evaluate(&tt);
        assert!(eval.is_feasible());
        assert_eq!(eval.score(), 0);
        assert!(e.audit(&tt).is_empty());
    }

    #[test]
    fn test_evaluate_counts_hard_and_soft() {
        let inst = instance();
        let e = engine(&inst);
        let tt = [
            at(0, 0, Day::Monday, 0),
            // lecturer l1 clash + room clash with 0
            at(1, 0, Day::Monday, 0),
            // capacity breach; cohort (100, math) on Monday at 3 -> gap of 2 after slot 0
            at(3, 0, Day::Monday, 3),
        ];
        let eval = e.evaluate(&tt);
        assert_eq!(eval.counts.room_clashes, 1);
        assert_eq!(eval.counts.lecturer_clashes, 1);
        assert_eq!(eval.counts.cohort_clashes, 0);
        assert_eq!(eval.counts.capacity_breaches, 1);
        assert_eq!(eval.counts.gap_periods, 2);
        assert_eq!(eval.counts.consecutive_pairs, 0);
        assert_eq!(eval.penalty.hard, 300);
        assert_eq!(eval.penalty.soft, 4);
        // 3 lecturers * 5 days * 8 pairs * 5 + 3 cohorts * 5 days * 7 gaps * 2
        assert_eq!(eval.soft_ceiling, 810);
        assert_eq!(eval.score(), -(300 * 811 + 4));

        let audit = e.audit(&tt);
        assert_eq!(audit.len(), 3);
        assert!(audit.contains(&Conflict {
            kind: ViolationKind::CapacityExceeded,
            first: 2,
            second: None
        }));
    }

    #[test]
    fn test_consecutive_and_overload() {
        let inst = instance();
        let e = ConstraintEngine::new(&inst, ScoreWeights::default(), 1);
        let tt = [at(0, 0, Day::Monday, 4), at(1, 0, Day::Monday, 5)];
        let eval = e.evaluate(&tt);
        assert_eq!(eval.counts.consecutive_pairs, 1);
        assert_eq!(eval.counts.overloaded_lecturers, 1);
        assert_eq!(eval.penalty.hard, 1000);
        assert_eq!(eval.penalty.soft, 5);
        // overload is penalized but does not make the timetable infeasible
        assert_eq!(eval.hard_violations(), 0);
        assert!(eval.is_feasible());
        assert!(eval.score() < -(eval.soft_ceiling as i64));
    }

    #[test]
    fn test_back_to_back_never_outscores_a_breach() {
        // one lecturer, 25 sessions, no departments
        let inst = ProblemInstance::new(
            vec![Course::new("c0", "A", "100", 10, 25).with_lecturer("l1")],
            vec![Room::new("r0", "Hall", 30), Room::new("r1", "Closet", 5)],
            Vec::new(),
            Vec::new(),
            Calendar::default(),
        );
        let e = ConstraintEngine::new(&inst, ScoreWeights::default(), 30);

        // 9 + 9 + 7 sessions packed into Monday to Wednesday: 22 pairs
        let packed: Vec<Assignment> = [(Day::Monday, 9), (Day::Tuesday, 9), (Day::Wednesday, 7)]
            .into_iter()
            .flat_map(|(day, n)| (0..n).map(move |slot| at(0, 0, day, slot)))
            .collect();
        // every other slot all week, one session in the small room
        let mut spread: Vec<Assignment> = Day::ALL
            .into_iter()
            .flat_map(|day| (0..9).step_by(2).map(move |slot| at(0, 0, day, slot)))
            .collect();
        spread[0].room = RoomIndex(1);

        let a = e.evaluate(&packed);
        let b = e.evaluate(&spread);
        assert!(a.is_feasible());
        assert_eq!(a.counts.consecutive_pairs, 22);
        assert_eq!(a.penalty.soft, 110);
        assert!(!b.is_feasible());
        assert_eq!(b.penalty, Penalty::new(100, 0));

        assert!(a.penalty < b.penalty);
        assert!(a.score() > b.score());
    }
}
