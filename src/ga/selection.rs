//! Selection strategies for the GA.
//!
//! Selection determines which individuals are chosen as parents for
//! crossover. Different strategies provide different selection pressure.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::types::Individual;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Selection strategy for choosing parents.
///
/// All strategies assume **minimization** (lower fitness = better).
/// [`TopHalf`](Selection::TopHalf) and [`TopTwo`](Selection::TopTwo) read
/// positions, so they expect the population sorted best-first; the runner
/// sorts before every breeding round.
///
/// # Examples
///
/// ```
/// use u_timetable::ga::Selection;
///
/// // Uniform draw among the better half (the default)
/// let sel = Selection::default();
/// assert_eq!(sel, Selection::TopHalf);
///
/// // Tournament with size 3 (moderate selection pressure)
/// let sel = Selection::Tournament(3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Tournament selection: pick `k` individuals at random, select the best.
    ///
    /// Higher `k` = stronger selection pressure.
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Rank-based selection.
    ///
    /// Individuals are sorted by fitness and selection probability is
    /// proportional to rank position, not raw fitness value. Works with
    /// lexicographic fitness, which has no meaningful magnitude.
    ///
    /// # Complexity
    /// O(n log n) per selection
    Rank,

    /// Uniform draw among the best half of the population.
    TopHalf,

    /// Always the two best individuals.
    ///
    /// The strongest pressure possible. Diversity comes from mutation alone.
    TopTwo,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::TopHalf
    }
}

impl Selection {
    /// Select a parent index from the population.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<I: Individual, R: Rng>(&self, population: &[I], rng: &mut R) -> usize {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        match self {
            Selection::Tournament(k) => tournament(population, *k, rng),
            Selection::Rank => rank(population, rng),
            Selection::TopHalf => {
                let half = population.len().div_ceil(2);
                rng.random_range(0..half)
            }
            Selection::TopTwo => 0,
        }
    }

    /// Select two parent indices.
    ///
    /// For [`TopTwo`](Selection::TopTwo) this is `(0, 1)`; the other
    /// strategies make two independent draws.
    pub fn select_pair<I: Individual, R: Rng>(
        &self,
        population: &[I],
        rng: &mut R,
    ) -> (usize, usize) {
        match self {
            Selection::TopTwo => {
                assert!(
                    !population.is_empty(),
                    "cannot select from empty population"
                );
                (0, 1.min(population.len() - 1))
            }
            _ => (self.select(population, rng), self.select(population, rng)),
        }
    }
}

/// Tournament selection: pick k random individuals, return best.
fn tournament<I: Individual, R: Rng>(population: &[I], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if population[idx].fitness() < population[best_idx].fitness() {
            best_idx = idx;
        }
    }
    best_idx
}

/// Rank-based selection using linear ranking.
///
/// Rank 0 (best) gets weight `n`, the worst gets weight `1`.
fn rank<I: Individual, R: Rng>(population: &[I], rng: &mut R) -> usize {
    let n = population.len();
    if n == 1 {
        return 0;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        population[a]
            .fitness()
            .partial_cmp(&population[b].fitness())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let total = n * (n + 1) / 2;
    let mut threshold = rng.random_range(0..total);
    for (rank, &idx) in order.iter().enumerate() {
        let weight = n - rank;
        if threshold < weight {
            return idx;
        }
        threshold -= weight;
    }

    order[n - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::Penalty;
    use crate::random::create_rng;

    #[derive(Clone)]
    struct TestInd {
        fit: Penalty,
    }

    impl Individual for TestInd {
        type Fitness = Penalty;
        fn fitness(&self) -> Penalty {
            self.fit
        }
        fn set_fitness(&mut self, f: Penalty) {
            self.fit = f;
        }
    }

    /// One individual per soft penalty value.
    fn make_population(soft: &[u64]) -> Vec<TestInd> {
        soft.iter()
            .map(|&s| TestInd {
                fit: Penalty::new(0, s),
            })
            .collect()
    }

    #[test]
    fn test_tournament_favors_best() {
        let pop = make_population(&[10, 5, 1, 8]);
        let mut rng = create_rng(42);

        let mut counts = [0u32; 4];
        let n = 10000;
        for _ in 0..n {
            let idx = Selection::Tournament(4).select(&pop, &mut rng);
            counts[idx] += 1;
        }
        let best_count = counts[2];
        assert!(
            best_count > 6000,
            "expected best to be selected >60% of the time, got {best_count}/{n}"
        );
    }

    #[test]
    fn test_rank_favors_best() {
        let pop = make_population(&[100, 50, 1, 80]);
        let mut rng = create_rng(42);

        let mut counts = [0u32; 4];
        for _ in 0..10000 {
            let idx = Selection::Rank.select(&pop, &mut rng);
            counts[idx] += 1;
        }
        // weights 4:3:2:1 over ranks
        assert!(counts[2] > counts[1]);
        assert!(counts[1] > counts[3]);
        assert!(counts[3] > counts[0]);
    }

    #[test]
    fn test_top_half_stays_in_front() {
        let pop = make_population(&[1, 2, 3, 4, 5]);
        let mut rng = create_rng(7);

        let mut seen = [false; 5];
        for _ in 0..1000 {
            let idx = Selection::TopHalf.select(&pop, &mut rng);
            assert!(idx < 3, "index {idx} outside the better half");
            seen[idx] = true;
        }
        assert!(seen[..3].iter().all(|&s| s));
    }

    #[test]
    fn test_top_two_pair() {
        let pop = make_population(&[1, 2, 3]);
        let mut rng = create_rng(42);
        assert_eq!(Selection::TopTwo.select_pair(&pop, &mut rng), (0, 1));

        let single = make_population(&[1]);
        assert_eq!(Selection::TopTwo.select_pair(&single, &mut rng), (0, 0));
    }

    #[test]
    fn test_single_individual() {
        let pop = make_population(&[5]);
        let mut rng = create_rng(42);

        assert_eq!(Selection::Tournament(3).select(&pop, &mut rng), 0);
        assert_eq!(Selection::Rank.select(&pop, &mut rng), 0);
        assert_eq!(Selection::TopHalf.select(&pop, &mut rng), 0);
        assert_eq!(Selection::TopTwo.select(&pop, &mut rng), 0);
    }

    #[test]
    fn test_serde_names() {
        let sel: Selection = serde_json::from_str("\"top_half\"").unwrap();
        assert_eq!(sel, Selection::TopHalf);
        let sel: Selection = serde_json::from_str(r#"{"tournament": 4}"#).unwrap();
        assert_eq!(sel, Selection::Tournament(4));
    }

    #[test]
    #[should_panic(expected = "cannot select from empty population")]
    fn test_empty_population_panics() {
        let pop: Vec<TestInd> = vec![];
        let mut rng = create_rng(42);
        Selection::Tournament(3).select(&pop, &mut rng);
    }
}
