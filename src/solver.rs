//! Solver façade.
//!
//! [`Solver`] picks a strategy, threads the configuration and the random
//! source into it, and turns the strategy's [`SolveResult`] into either a
//! [`Solution`] or a [`SolveError`]. It holds no conflict logic of its own.

use std::fmt;
use std::sync::atomic::AtomicBool;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::backtrack::{BacktrackOutcome, BacktrackSolver};
use crate::config::SolverConfig;
use crate::constraints::{ConstraintEngine, Evaluation};
use crate::error::{ConfigError, InstanceIssue, InstanceWarning, SolveError};
use crate::ga::{GaOutcome, GeneticOptimizer};
use crate::model::{AssignmentRecord, Calendar, ProblemInstance, Timetable};
use crate::random::{create_rng, resolve_seed};

/// Search strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Exact search; fails rather than return a violating timetable.
    Backtracking,
    /// Population search; scales further, may not reach zero violations.
    Genetic,
    /// Backtracking for small instances, genetic beyond
    /// [`SolverConfig::auto_backtrack_limit`] sessions.
    #[default]
    Auto,
}

impl Strategy {
    /// Resolves `Auto` for an instance of `sessions` sessions.
    pub fn resolve(self, sessions: usize, auto_backtrack_limit: usize) -> Strategy {
        match self {
            Strategy::Auto if sessions <= auto_backtrack_limit => Strategy::Backtracking,
            Strategy::Auto => Strategy::Genetic,
            other => other,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Backtracking => "backtracking",
            Strategy::Genetic => "genetic",
            Strategy::Auto => "auto",
        };
        f.write_str(name)
    }
}

/// Uniform outcome of one strategy run, before the acceptability rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult {
    Found(Timetable),
    /// Backtracking ran out of candidates or budget.
    Infeasible {
        sessions: usize,
        steps: u64,
        budget_exhausted: bool,
    },
    /// The optimizer's best did not clear the acceptability bar.
    BestEffort {
        timetable: Timetable,
        evaluation: Evaluation,
    },
}

impl SolveResult {
    /// Classifies a genetic outcome.
    pub fn from_genetic(outcome: GaOutcome, threshold: Option<i64>) -> Self {
        if is_acceptable(&outcome.evaluation, threshold) {
            SolveResult::Found(outcome.timetable)
        } else {
            SolveResult::BestEffort {
                timetable: outcome.timetable,
                evaluation: outcome.evaluation,
            }
        }
    }

    /// Classifies a backtracking outcome.
    pub fn from_backtracking(outcome: BacktrackOutcome, sessions: usize, steps: u64) -> Self {
        match outcome {
            BacktrackOutcome::Found(timetable) => SolveResult::Found(timetable),
            BacktrackOutcome::Infeasible => SolveResult::Infeasible {
                sessions,
                steps,
                budget_exhausted: false,
            },
            BacktrackOutcome::BudgetExhausted => SolveResult::Infeasible {
                sessions,
                steps,
                budget_exhausted: true,
            },
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SolveResult::Found(_))
    }

    /// The timetable of a `Found` result; every other outcome is an error.
    ///
    /// `threshold` is only reported in [`SolveError::BelowThreshold`].
    pub fn into_timetable(self, threshold: Option<i64>) -> Result<Timetable, SolveError> {
        match self {
            SolveResult::Found(timetable) => Ok(timetable),
            SolveResult::Infeasible {
                sessions,
                steps,
                budget_exhausted,
            } => Err(SolveError::Infeasible {
                sessions,
                steps,
                budget_exhausted,
            }),
            SolveResult::BestEffort {
                timetable,
                evaluation,
            } => Err(SolveError::BelowThreshold {
                score: evaluation.score(),
                threshold,
                hard_violations: evaluation.hard_violations(),
                best: Box::new(timetable),
            }),
        }
    }
}

/// A result is acceptable with zero hard violations and, when a threshold
/// is set, a score at or above it.
pub fn is_acceptable(evaluation: &Evaluation, threshold: Option<i64>) -> bool {
    evaluation.is_feasible() && threshold.map_or(true, |t| evaluation.score() >= t)
}

/// An accepted timetable.
#[derive(Debug, Clone)]
pub struct Solution {
    pub timetable: Timetable,
    pub evaluation: Evaluation,
    /// The strategy that ran (never `Auto`).
    pub strategy: Strategy,
    /// Data-quality findings about the instance.
    pub warnings: Vec<InstanceWarning>,
}

impl Solution {
    pub fn score(&self) -> i64 {
        self.evaluation.score()
    }

    /// Resolved view for consumers.
    pub fn records(&self, instance: &ProblemInstance) -> Vec<AssignmentRecord> {
        self.timetable.records(instance)
    }
}

/// Entry point for solving timetabling instances.
///
/// # Examples
///
/// ```
/// use u_timetable::model::{Calendar, Course, ProblemInstance, Room};
/// use u_timetable::{Solver, SolverConfig, Strategy};
///
/// let courses = vec![Course::new("c1", "Algebra", "100", 20, 2).with_lecturer("l1")];
/// let rooms = vec![Room::new("r1", "Hall", 30)];
/// let instance = ProblemInstance::new(courses, rooms, vec![], vec![], Calendar::default());
///
/// let solver = Solver::new(SolverConfig::default().with_seed(7)).unwrap();
/// let solution = solver.solve(&instance, Strategy::Backtracking).unwrap();
/// assert_eq!(solution.timetable.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// Creates a solver after validating `config`.
    pub fn new(config: SolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves with the configured seed, or a fresh one that gets logged.
    pub fn solve(
        &self,
        instance: &ProblemInstance,
        strategy: Strategy,
    ) -> Result<Solution, SolveError> {
        let seed = resolve_seed(self.config.seed);
        info!(seed, "random seed");
        self.solve_with_rng(instance, strategy, &mut create_rng(seed))
    }

    /// Like [`solve`](Self::solve), but stops early once `cancel` is set.
    ///
    /// A cancelled backtracking run reports [`SolveError::Infeasible`] with
    /// `budget_exhausted`; a cancelled genetic run is judged on its best
    /// timetable so far.
    pub fn solve_with_cancel(
        &self,
        instance: &ProblemInstance,
        strategy: Strategy,
        cancel: &AtomicBool,
    ) -> Result<Solution, SolveError> {
        let seed = resolve_seed(self.config.seed);
        info!(seed, "random seed");
        self.run(instance, strategy, &mut create_rng(seed), Some(cancel))
    }

    /// Solves drawing every random choice from `rng`.
    ///
    /// # Errors
    /// - [`SolveError::InvalidInstance`]: sessions but no rooms or slots, or
    ///   an instance calendar other than the configured one
    /// - [`SolveError::Infeasible`]: backtracking found nothing
    /// - [`SolveError::BelowThreshold`]: the optimizer's best was rejected
    pub fn solve_with_rng<R: Rng>(
        &self,
        instance: &ProblemInstance,
        strategy: Strategy,
        rng: &mut R,
    ) -> Result<Solution, SolveError> {
        self.run(instance, strategy, rng, None)
    }

    fn run<R: Rng>(
        &self,
        instance: &ProblemInstance,
        strategy: Strategy,
        rng: &mut R,
        cancel: Option<&AtomicBool>,
    ) -> Result<Solution, SolveError> {
        instance.check_encodable()?;
        self.check_calendar(instance)?;

        let warnings = instance.warnings(self.config.max_lecturer_hours_per_week);
        for warning in &warnings {
            warn!(%warning, "instance data");
        }

        let strategy = self.resolve(strategy, instance);
        info!(
            %strategy,
            sessions = instance.session_count(),
            rooms = instance.rooms().len(),
            slots = instance.calendar().slot_count(),
            "solving timetable"
        );

        let threshold = self.config.acceptability_threshold;
        let result = self.attempt(instance, strategy, rng, cancel)?;
        match &result {
            SolveResult::BestEffort { evaluation, .. } => warn!(
                score = evaluation.score(),
                hard_violations = evaluation.hard_violations(),
                ?threshold,
                "best timetable rejected"
            ),
            SolveResult::Infeasible {
                steps,
                budget_exhausted,
                ..
            } => info!(steps, budget_exhausted, "no valid timetable"),
            SolveResult::Found(_) => {}
        }
        let timetable = result.into_timetable(threshold)?;

        let evaluation = self.engine(instance).evaluate(timetable.assignments());
        info!(
            %strategy,
            score = evaluation.score(),
            hard_violations = evaluation.hard_violations(),
            "timetable found"
        );

        Ok(Solution {
            timetable,
            evaluation,
            strategy,
            warnings,
        })
    }

    /// Runs one strategy and reports its raw outcome.
    ///
    /// `Auto` is resolved first. Only instance and configuration problems
    /// are errors here.
    pub fn attempt<R: Rng>(
        &self,
        instance: &ProblemInstance,
        strategy: Strategy,
        rng: &mut R,
        cancel: Option<&AtomicBool>,
    ) -> Result<SolveResult, SolveError> {
        self.check_calendar(instance)?;
        let engine = self.engine(instance);
        let strategy = self.resolve(strategy, instance);

        match strategy {
            Strategy::Backtracking => {
                let solver = BacktrackSolver::new(engine, self.config.backtrack_config());
                let result = solver.run_with_rng(rng, cancel)?;
                Ok(SolveResult::from_backtracking(
                    result.outcome,
                    instance.session_count(),
                    result.steps,
                ))
            }
            Strategy::Genetic | Strategy::Auto => {
                let optimizer = GeneticOptimizer::new(engine, self.config.ga_config());
                let outcome = optimizer.run(rng, cancel)?;
                Ok(SolveResult::from_genetic(
                    outcome,
                    self.config.acceptability_threshold,
                ))
            }
        }
    }

    /// The instance must be built on the configured calendar, if one is set.
    fn check_calendar(&self, instance: &ProblemInstance) -> Result<(), SolveError> {
        let Some(config) = &self.config.calendar else {
            return Ok(());
        };
        let configured = Calendar::new(config).map_err(ConfigError::from)?;
        if &configured != instance.calendar() {
            return Err(InstanceIssue::CalendarMismatch {
                configured: configured.slot_count(),
                found: instance.calendar().slot_count(),
            }
            .into());
        }
        Ok(())
    }

    fn resolve(&self, strategy: Strategy, instance: &ProblemInstance) -> Strategy {
        strategy.resolve(instance.session_count(), self.config.auto_backtrack_limit)
    }

    fn engine<'a>(&self, instance: &'a ProblemInstance) -> ConstraintEngine<'a> {
        ConstraintEngine::new(
            instance,
            self.config.weights,
            self.config.max_lecturer_hours_per_week,
        )
    }
}

/// Solves `instance` with `strategy` under `config`.
///
/// Shorthand for [`Solver::new`] followed by [`Solver::solve`].
pub fn solve(
    instance: &ProblemInstance,
    strategy: Strategy,
    config: &SolverConfig,
) -> Result<Solution, SolveError> {
    Solver::new(config.clone())?.solve(instance, strategy)
}
