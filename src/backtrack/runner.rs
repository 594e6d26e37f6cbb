//! Depth-first search over sessions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::debug;

use super::config::{BacktrackConfig, SessionOrder};
use crate::constraints::{ConstraintEngine, OccupancyIndex};
use crate::error::{ConfigError, SolveError};
use crate::model::{Assignment, CourseIndex, RoomIndex, Timetable};
use crate::random::{create_rng, resolve_seed, shuffle};

/// How a backtracking run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BacktrackOutcome {
    /// Every session placed without a hard violation.
    Found(Timetable),
    /// The search exhausted every candidate under its shuffled ordering.
    Infeasible,
    /// `max_steps` or the time limit ran out first, or the run was cancelled.
    BudgetExhausted,
}

/// Result of a backtracking run.
#[derive(Debug, Clone)]
pub struct BacktrackResult {
    pub outcome: BacktrackOutcome,

    /// Candidate triples tested.
    pub steps: u64,

    /// Committed placements later undone.
    pub backtracks: u64,
}

impl BacktrackResult {
    pub fn is_found(&self) -> bool {
        matches!(self.outcome, BacktrackOutcome::Found(_))
    }
}

/// Exact solver: places sessions one at a time and undoes on dead ends.
///
/// A found timetable has zero hard violations. The weekly lecturer cap is
/// not a pruning rule; an overloaded lecturer only shows in the score.
/// Sessions of a course with no lecturers are placed like any other; they
/// just never meet a lecturer clash.
#[derive(Debug, Clone)]
pub struct BacktrackSolver<'a> {
    engine: ConstraintEngine<'a>,
    config: BacktrackConfig,
}

impl<'a> BacktrackSolver<'a> {
    pub fn new(engine: ConstraintEngine<'a>, config: BacktrackConfig) -> Self {
        Self { engine, config }
    }

    pub fn config(&self) -> &BacktrackConfig {
        &self.config
    }

    /// Runs with the seed from the config (or a fresh one).
    pub fn run(&self) -> Result<BacktrackResult, SolveError> {
        let mut rng = create_rng(resolve_seed(self.config.seed));
        self.run_with_rng(&mut rng, None)
    }

    /// Runs the search, drawing every shuffle from `rng`.
    ///
    /// A set `cancel` flag ends the run as [`BacktrackOutcome::BudgetExhausted`];
    /// it is read together with the clock.
    ///
    /// # Errors
    /// [`SolveError::InvalidInstance`] when sessions exist but there are no
    /// rooms or no slots; [`SolveError::InvalidConfig`] for a zero budget.
    pub fn run_with_rng<R: Rng>(
        &self,
        rng: &mut R,
        cancel: Option<&AtomicBool>,
    ) -> Result<BacktrackResult, SolveError> {
        self.config
            .validate()
            .map_err(ConfigError::Invalid)?;
        let instance = self.engine.instance();
        instance.check_encodable()?;

        let started = Instant::now();
        let order = self.session_order();
        let mut search = Search {
            engine: self.engine,
            sessions: instance.sessions(),
            order: &order,
            index: OccupancyIndex::new(instance),
            placed: vec![None; instance.session_count()],
            solution: None,
            rng,
            steps: 0,
            backtracks: 0,
            max_steps: self.config.max_steps,
            deadline: self
                .config
                .time_limit_ms
                .map(|ms| started + Duration::from_millis(ms)),
            cancel,
        };

        let outcome = match search.place(0) {
            Step::Solved => match search.solution.take() {
                Some(timetable) => BacktrackOutcome::Found(timetable),
                None => BacktrackOutcome::Infeasible,
            },
            Step::Failed => BacktrackOutcome::Infeasible,
            Step::OutOfBudget => BacktrackOutcome::BudgetExhausted,
        };

        debug!(
            sessions = order.len(),
            steps = search.steps,
            backtracks = search.backtracks,
            found = matches!(outcome, BacktrackOutcome::Found(_)),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "backtracking finished"
        );

        Ok(BacktrackResult {
            outcome,
            steps: search.steps,
            backtracks: search.backtracks,
        })
    }

    /// Session positions in placement order.
    fn session_order(&self) -> Vec<usize> {
        let instance = self.engine.instance();
        let mut order: Vec<usize> = (0..instance.session_count()).collect();
        if self.config.order == SessionOrder::MostConstrainedFirst {
            let sessions = instance.sessions();
            order.sort_by_key(|&i| {
                let course = sessions[i];
                std::cmp::Reverse((
                    instance.course(course).student_count,
                    instance.lecturers_of(course).len(),
                ))
            });
        }
        order
    }
}

enum Step {
    Solved,
    Failed,
    OutOfBudget,
}

/// Search state, scoped to one run.
struct Search<'s, 'a, R> {
    engine: ConstraintEngine<'a>,
    sessions: &'a [CourseIndex],
    order: &'s [usize],
    index: OccupancyIndex<'a>,
    /// Indexed by session position, not by depth.
    placed: Vec<Option<Assignment>>,
    solution: Option<Timetable>,
    rng: &'s mut R,
    steps: u64,
    backtracks: u64,
    max_steps: Option<u64>,
    deadline: Option<Instant>,
    cancel: Option<&'s AtomicBool>,
}

impl<R: Rng> Search<'_, '_, R> {
    fn place(&mut self, depth: usize) -> Step {
        if depth == self.order.len() {
            let assignments = self.placed.iter().flatten().copied().collect();
            self.solution = Some(Timetable::new(assignments));
            return Step::Solved;
        }

        let session = self.order[depth];
        let course = self.sessions[session];
        let calendar = self.engine.instance().calendar();

        let mut days = calendar.days().to_vec();
        let mut slots: Vec<usize> = (0..calendar.slots_per_day()).collect();
        let mut rooms: Vec<usize> = (0..self.engine.instance().rooms().len()).collect();
        shuffle(&mut days, &mut *self.rng);
        shuffle(&mut slots, &mut *self.rng);
        shuffle(&mut rooms, &mut *self.rng);

        for &day in &days {
            for &slot in &slots {
                for &room in &rooms {
                    if self.out_of_budget() {
                        return Step::OutOfBudget;
                    }
                    self.steps += 1;

                    let candidate = Assignment::new(course, RoomIndex(room), day, slot);
                    if !self.engine.violations(&candidate, &self.index).is_empty() {
                        continue;
                    }

                    self.index.commit(&candidate);
                    self.placed[session] = Some(candidate);
                    let step = self.place(depth + 1);
                    self.placed[session] = None;
                    self.index.release(&candidate);

                    match step {
                        Step::Failed => self.backtracks += 1,
                        done => return done,
                    }
                }
            }
        }
        Step::Failed
    }

    fn out_of_budget(&self) -> bool {
        if self.max_steps.is_some_and(|max| self.steps >= max) {
            return true;
        }
        // clock and cancel flag read every 256 steps
        self.steps % 256 == 0
            && (self.deadline.is_some_and(|d| Instant::now() >= d)
                || self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)))
    }
}
