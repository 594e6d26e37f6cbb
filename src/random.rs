//! Seeded random sources.
//!
//! Every stochastic step of the engine (backtracking shuffles, population
//! creation, selection, crossover points, mutation targets) draws from a
//! random source passed in by the caller. These helpers build that source.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Random source used by the solvers.
pub type SolverRng = StdRng;

/// Creates a deterministic random source from a seed.
///
/// Two sources created from the same seed produce identical streams.
pub fn create_rng(seed: u64) -> SolverRng {
    StdRng::seed_from_u64(seed)
}

/// Resolves an optional seed, drawing a fresh one when `None`.
///
/// The returned seed is what callers should log to allow replay.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

/// Shuffles a slice in place (Fisher–Yates).
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}
