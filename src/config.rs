//! Solver configuration loading.
//!
//! The expected JSON structure (every key optional):
//! ```json
//! {
//!   "population_size": 100,
//!   "generations": 200,
//!   "mutation_rate": 0.05,
//!   "crossover_rate": 0.7,
//!   "max_lecturer_hours_per_week": 20,
//!   "acceptability_threshold": -50,
//!   "seed": 42,
//!   "calendar": { "start": "08:00", "end": "17:00", "session_minutes": 60 }
//! }
//! ```
//!
//! The legacy settings keys `ga_population_size`, `ga_generations`,
//! `ga_mutation_rate` and `ga_crossover_rate` are accepted too. Unknown keys
//! are ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::backtrack::{BacktrackConfig, SessionOrder};
use crate::constraints::ScoreWeights;
use crate::error::ConfigError;
use crate::ga::{GaConfig, Selection};
use crate::model::{Calendar, CalendarConfig};

/// Every tunable of a solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    #[serde(alias = "ga_population_size")]
    pub population_size: usize,

    #[serde(alias = "ga_generations")]
    pub generations: usize,

    #[serde(alias = "ga_mutation_rate")]
    pub mutation_rate: f64,

    #[serde(alias = "ga_crossover_rate")]
    pub crossover_rate: f64,

    /// Weekly session cap per lecturer.
    pub max_lecturer_hours_per_week: u32,

    /// Minimum score a genetic result needs to be accepted. `None` only
    /// requires zero hard violations.
    pub acceptability_threshold: Option<i64>,

    /// Seed for every random draw. `None` draws (and logs) a fresh one.
    pub seed: Option<u64>,

    pub elite_ratio: f64,
    pub selection: Selection,
    /// Generations without improvement before the optimizer gives up. `0` disables.
    pub stagnation_limit: usize,
    /// Wall-clock budget for either strategy.
    pub time_limit_ms: Option<u64>,
    pub max_backtrack_steps: Option<u64>,
    pub session_order: SessionOrder,
    /// `Auto` uses backtracking up to this many sessions.
    pub auto_backtrack_limit: usize,
    /// Evaluate GA populations on the rayon pool (`parallel` feature).
    pub parallel: bool,

    pub weights: ScoreWeights,
    /// Slot grid the instance must be built on. `None` accepts whatever
    /// calendar the instance carries.
    pub calendar: Option<CalendarConfig>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 200,
            mutation_rate: 0.05,
            crossover_rate: 0.7,
            max_lecturer_hours_per_week: 20,
            acceptability_threshold: None,
            seed: None,
            elite_ratio: 0.0,
            selection: Selection::default(),
            stagnation_limit: 0,
            time_limit_ms: None,
            max_backtrack_steps: None,
            session_order: SessionOrder::default(),
            auto_backtrack_limit: 60,
            parallel: false,
            weights: ScoreWeights::default(),
            calendar: None,
        }
    }
}

impl SolverConfig {
    /// Parses a JSON document.
    ///
    /// # Errors
    /// [`ConfigError::Parse`] on malformed JSON or wrongly typed values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON file.
    ///
    /// The result is not validated; call [`validate`](Self::validate) or hand
    /// it to [`Solver::new`](crate::solver::Solver::new).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&raw)?;
        info!(path = %path.display(), "loaded solver configuration");
        debug!(?config, "solver configuration");
        Ok(config)
    }

    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    pub fn with_max_lecturer_hours(mut self, cap: u32) -> Self {
        self.max_lecturer_hours_per_week = cap;
        self
    }

    pub fn with_acceptability_threshold(mut self, threshold: i64) -> Self {
        self.acceptability_threshold = Some(threshold);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn with_max_backtrack_steps(mut self, steps: u64) -> Self {
        self.max_backtrack_steps = Some(steps);
        self
    }

    pub fn with_session_order(mut self, order: SessionOrder) -> Self {
        self.session_order = order;
        self
    }

    pub fn with_auto_backtrack_limit(mut self, sessions: usize) -> Self {
        self.auto_backtrack_limit = sessions;
        self
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_calendar(mut self, calendar: CalendarConfig) -> Self {
        self.calendar = Some(calendar);
        self
    }

    /// Checks every range and the weight ordering.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_lecturer_hours_per_week == 0 {
            return Err(ConfigError::Invalid(
                "max_lecturer_hours_per_week must be at least 1".into(),
            ));
        }
        self.ga_config().validate().map_err(ConfigError::Invalid)?;
        self.backtrack_config()
            .validate()
            .map_err(ConfigError::Invalid)?;
        self.weights.validate().map_err(ConfigError::Invalid)?;
        if let Some(calendar) = &self.calendar {
            calendar.validate()?;
        }
        Ok(())
    }

    /// Genetic optimizer parameters.
    pub fn ga_config(&self) -> GaConfig {
        GaConfig {
            population_size: self.population_size,
            max_generations: self.generations,
            selection: self.selection,
            elite_ratio: self.elite_ratio,
            crossover_rate: self.crossover_rate,
            mutation_rate: self.mutation_rate,
            stagnation_limit: self.stagnation_limit,
            parallel: self.parallel,
            time_limit_ms: self.time_limit_ms,
        }
    }

    /// Backtracking parameters.
    pub fn backtrack_config(&self) -> BacktrackConfig {
        BacktrackConfig {
            seed: self.seed,
            max_steps: self.max_backtrack_steps,
            time_limit_ms: self.time_limit_ms,
            order: self.session_order,
        }
    }

    /// Builds the configured slot grid, or the default one.
    pub fn build_calendar(&self) -> Result<Calendar, ConfigError> {
        match &self.calendar {
            Some(calendar) => Ok(Calendar::new(calendar)?),
            None => Ok(Calendar::default()),
        }
    }
}
