//! Genetic operators for the timetable encoding.
//!
//! A chromosome is the list of assignments in session order, so gene `i`
//! always belongs to session `i`. Crossover only exchanges whole genes
//! between equal positions, which keeps each course's session count intact.
//!
//! # Crossover Operators
//!
//! - [`single_point_crossover`]: cut once, swap tails
//!
//! # Mutation Operators
//!
//! - [`mutate_assignment`]: move one session in time, or to another room
//! - [`random_assignment`]: uniform draw used for initialization

use rand::Rng;

use crate::model::{Assignment, CourseIndex, ProblemInstance, RoomIndex};

// ============================================================================
// Crossover operators
// ============================================================================

/// Single-point crossover.
///
/// Draws a cut point in `1..n` and returns both children: `p1[..cut] +
/// p2[cut..]` and `p2[..cut] + p1[cut..]`. Parents shorter than two genes
/// have no valid cut and are returned unchanged.
///
/// # Panics
/// Panics if parents have different lengths.
pub fn single_point_crossover<T: Clone, R: Rng>(
    parent1: &[T],
    parent2: &[T],
    rng: &mut R,
) -> (Vec<T>, Vec<T>) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");

    if n < 2 {
        return (parent1.to_vec(), parent2.to_vec());
    }

    let cut = rng.random_range(1..n);
    let child1 = parent1[..cut].iter().chain(&parent2[cut..]).cloned().collect();
    let child2 = parent2[..cut].iter().chain(&parent1[cut..]).cloned().collect();
    (child1, child2)
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Uniform random placement of one session of `course`.
///
/// Returns `None` when the instance has no rooms or no slots.
pub fn random_assignment<R: Rng>(
    instance: &ProblemInstance,
    course: CourseIndex,
    rng: &mut R,
) -> Option<Assignment> {
    let calendar = instance.calendar();
    if instance.rooms().is_empty() || calendar.is_empty() {
        return None;
    }
    let (day, slot) = calendar.from_flat(rng.random_range(0..calendar.slot_count()))?;
    let room = RoomIndex(rng.random_range(0..instance.rooms().len()));
    Some(Assignment::new(course, room, day, slot))
}

/// Mutates one random gene.
///
/// With equal probability the gene gets a new uniform (day, slot) or a new
/// uniform room. The course never changes. Empty chromosomes are left alone.
pub fn mutate_assignment<R: Rng>(
    genes: &mut [Assignment],
    instance: &ProblemInstance,
    rng: &mut R,
) {
    if genes.is_empty() {
        return;
    }
    let Some(drawn) = random_assignment(instance, genes[0].course, rng) else {
        return;
    };

    let idx = rng.random_range(0..genes.len());
    let gene = &mut genes[idx];
    if rng.random_bool(0.5) {
        gene.day = drawn.day;
        gene.slot = drawn.slot;
    } else {
        gene.room = drawn.room;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Calendar, Course, Day, Room};
    use crate::random::create_rng;

    fn instance() -> ProblemInstance {
        let courses = vec![
            Course::new("c1", "Algebra", "100", 30, 2),
            Course::new("c2", "Physics", "100", 20, 1),
        ];
        let rooms = vec![Room::new("r1", "Hall", 50), Room::new("r2", "Lab", 25)];
        ProblemInstance::new(courses, rooms, vec![], vec![], Calendar::default())
    }

    #[test]
    fn test_crossover_swaps_tails() {
        let p1 = vec![1, 1, 1, 1, 1];
        let p2 = vec![2, 2, 2, 2, 2];
        let mut rng = create_rng(42);

        for _ in 0..50 {
            let (c1, c2) = single_point_crossover(&p1, &p2, &mut rng);
            assert_eq!(c1.len(), 5);
            assert_eq!(c2.len(), 5);
            // cut in 1..n: head from own parent, tail from the other
            assert_eq!(c1[0], 1);
            assert_eq!(c1[4], 2);
            assert_eq!(c2[0], 2);
            assert_eq!(c2[4], 1);
            let cut = c1.iter().position(|&g| g == 2).unwrap();
            assert!(c1[cut..].iter().all(|&g| g == 2));
            assert!(c2[..cut].iter().all(|&g| g == 2));
        }
    }

    #[test]
    fn test_crossover_short_parents_unchanged() {
        let mut rng = create_rng(1);
        let (c1, c2) = single_point_crossover(&[7], &[9], &mut rng);
        assert_eq!((c1, c2), (vec![7], vec![9]));

        let empty: [u8; 0] = [];
        let (c1, c2) = single_point_crossover(&empty, &empty, &mut rng);
        assert!(c1.is_empty() && c2.is_empty());
    }

    #[test]
    fn test_random_assignment_in_range() {
        let inst = instance();
        let mut rng = create_rng(5);
        for _ in 0..200 {
            let a = random_assignment(&inst, CourseIndex(1), &mut rng).unwrap();
            assert_eq!(a.course, CourseIndex(1));
            assert!(a.room.0 < 2);
            assert!(a.slot < inst.calendar().slots_per_day());
            assert!(inst.calendar().flat_index(a.day, a.slot).is_some());
        }
    }

    #[test]
    fn test_mutation_changes_time_or_room_only() {
        let inst = instance();
        let mut rng = create_rng(11);
        let original = vec![
            Assignment::new(CourseIndex(0), RoomIndex(0), Day::Monday, 0),
            Assignment::new(CourseIndex(0), RoomIndex(0), Day::Tuesday, 1),
            Assignment::new(CourseIndex(1), RoomIndex(1), Day::Friday, 8),
        ];

        for _ in 0..200 {
            let mut genes = original.clone();
            mutate_assignment(&mut genes, &inst, &mut rng);

            let changed: Vec<usize> = (0..3).filter(|&i| genes[i] != original[i]).collect();
            assert!(changed.len() <= 1);
            for i in changed {
                let (before, after) = (&original[i], &genes[i]);
                assert_eq!(before.course, after.course);
                let moved = before.day != after.day || before.slot != after.slot;
                let rehoused = before.room != after.room;
                assert!(!(moved && rehoused), "both time and room changed");
            }
        }
    }

    #[test]
    fn test_mutation_without_rooms_is_noop() {
        let inst = ProblemInstance::new(
            vec![Course::new("c1", "Algebra", "100", 30, 1)],
            vec![],
            vec![],
            vec![],
            Calendar::default(),
        );
        let mut genes = vec![Assignment::new(CourseIndex(0), RoomIndex(0), Day::Monday, 0)];
        let before = genes.clone();
        mutate_assignment(&mut genes, &inst, &mut create_rng(1));
        assert_eq!(genes, before);
    }
}
