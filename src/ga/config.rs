//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use super::selection::Selection;

/// Configuration for the genetic optimizer.
///
/// # Defaults
///
/// The defaults mirror the settings the timetabling service shipped with:
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 200);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_timetable::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(60)
///     .with_selection(Selection::Tournament(4))
///     .with_mutation_rate(0.2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct GaConfig {
    /// Number of individuals in the population.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub max_generations: usize,

    /// Selection strategy for choosing parents.
    pub selection: Selection,

    /// Fraction of the population copied unchanged into the next generation.
    ///
    /// At least one elite (the best individual) is always kept, so the best
    /// fitness never gets worse from one generation to the next.
    pub elite_ratio: f64,

    /// Probability of recombining a pair of parents (0.0 to 1.0).
    ///
    /// When crossover is not applied, the first parent passes through.
    pub crossover_rate: f64,

    /// Probability of mutating an offspring (0.0 to 1.0).
    pub mutation_rate: f64,

    /// Generations without improvement before stopping. `0` disables.
    pub stagnation_limit: usize,

    /// Whether to evaluate individuals on the rayon pool.
    ///
    /// Only honoured with the `parallel` feature. Breeding always uses the
    /// single seeded stream, so the result does not depend on this flag.
    pub parallel: bool,

    /// Optional wall-clock limit in milliseconds, checked once per generation.
    pub time_limit_ms: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 200,
            selection: Selection::default(),
            elite_ratio: 0.0,
            crossover_rate: 0.7,
            mutation_rate: 0.05,
            stagnation_limit: 0,
            parallel: false,
            time_limit_ms: None,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Sets the elite ratio, clamped to `[0, 1)`.
    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio.clamp(0.0, 0.99);
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Number of individuals carried over unchanged. Always at least one.
    pub fn elite_count(&self) -> usize {
        let n = (self.population_size as f64 * self.elite_ratio) as usize;
        n.clamp(1, self.population_size.max(1))
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size == 0 {
            return Err("population_size must be at least 1".into());
        }
        if self.max_generations == 0 {
            return Err("max_generations must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err("crossover_rate must be within [0, 1]".into());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err("mutation_rate must be within [0, 1]".into());
        }
        if !(0.0..1.0).contains(&self.elite_ratio) {
            return Err("elite_ratio must be within [0, 1)".into());
        }
        if let Selection::Tournament(0) = self.selection {
            return Err("tournament size must be at least 1".into());
        }
        if self.time_limit_ms == Some(0) {
            return Err("time_limit_ms must be positive or None".into());
        }
        Ok(())
    }
}
