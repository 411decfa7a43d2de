//! Solver invocation.
//!
//! `SolverBackend` is the seam between the timetable model and a concrete
//! optimization engine. `MilpSolver` hands the model to `good_lp` as a
//! 0-1 integer program and enforces the wall-clock budget by waiting on a
//! worker thread. The backend cannot be interrupted, so a worker that
//! outlives its budget keeps its slot until it finishes; once every slot
//! is taken, further solves fail with `SolverError::Saturated` instead of
//! piling up threads.

use std::fmt::{self, Debug};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use good_lp::{
    constraint, default_solver, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::model::{Relation, TimetableModel};
use crate::error::SolverError;

/// Terminal status of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    /// Objective minimized and proven optimal.
    Optimal,
    /// Valid assignment found, optimality unproven.
    Feasible,
    /// Proven that no assignment satisfies the constraints.
    Infeasible,
    /// Budget exhausted without a proof either way.
    Unknown,
}

impl SolveStatus {
    /// Optimal and feasible both yield a usable timetable.
    pub fn is_success(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one solve.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    /// Value per variable (indexed by `VarId`); empty unless successful.
    pub values: Vec<bool>,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

impl SolveOutcome {
    /// An outcome without an assignment.
    pub fn without_solution(status: SolveStatus, elapsed: Duration) -> Self {
        Self {
            status,
            values: Vec::new(),
            elapsed,
        }
    }
}

/// A constraint/optimization engine able to solve a `TimetableModel`.
///
/// Implementations must support boolean variables, `≤`/`=` linear
/// constraints, a linear objective and a bounded-time search.
pub trait SolverBackend: Send + Sync + Debug {
    /// Backend name (for logs).
    fn name(&self) -> &'static str;

    /// Solves the model within `time_limit`.
    ///
    /// Infeasibility and timeouts are statuses, not errors.
    fn solve(&self, model: &TimetableModel, time_limit: Duration)
        -> Result<SolveOutcome, SolverError>;
}

/// 0-1 integer programming backend built on `good_lp`.
///
/// Clones share the worker limit.
#[derive(Debug, Clone)]
pub struct MilpSolver {
    max_workers: usize,
    in_flight: Arc<AtomicUsize>,
}

impl MilpSolver {
    /// Creates a solver allowing one worker per available CPU.
    pub fn new() -> Self {
        let cpus = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        Self {
            max_workers: cpus,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sets the maximum number of concurrently running workers (at least 1).
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Workers currently computing, including ones past their budget.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn acquire(&self) -> Option<WorkerPermit> {
        self.in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.max_workers).then_some(n + 1)
            })
            .ok()?;
        Some(WorkerPermit(Arc::clone(&self.in_flight)))
    }
}

impl Default for MilpSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// One occupied worker slot, released on drop.
struct WorkerPermit(Arc<AtomicUsize>);

impl Drop for WorkerPermit {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SolverBackend for MilpSolver {
    fn name(&self) -> &'static str {
        "good_lp"
    }

    fn solve(
        &self,
        model: &TimetableModel,
        time_limit: Duration,
    ) -> Result<SolveOutcome, SolverError> {
        let Some(permit) = self.acquire() else {
            warn!(limit = self.max_workers, "all solver workers busy");
            return Err(SolverError::Saturated {
                limit: self.max_workers,
            });
        };

        let program = Program::from_model(model);
        debug!(
            variables = program.fixed_false.len(),
            constraints = program.constraints.len(),
            "handing model to good_lp"
        );

        let started = Instant::now();
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("u-timetable-solver".into())
            .spawn(move || {
                let result = program.solve();
                // Freed before reporting, so a caller that got the result can solve again.
                drop(permit);
                // The receiver is gone after a timeout; nothing to report then.
                let _ = tx.send(result);
            })?;

        match rx.recv_timeout(time_limit) {
            Ok(result) => {
                let (status, values) = result?;
                let elapsed = started.elapsed();
                info!(%status, elapsed_ms = elapsed.as_millis() as u64, "solver finished");
                Ok(SolveOutcome {
                    status,
                    values,
                    elapsed,
                })
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    limit_secs = time_limit.as_secs_f64(),
                    in_flight = self.in_flight(),
                    "solver budget exhausted, worker left to finish"
                );
                Ok(SolveOutcome::without_solution(
                    SolveStatus::Unknown,
                    started.elapsed(),
                ))
            }
            Err(RecvTimeoutError::Disconnected) => Err(SolverError::WorkerLost),
        }
    }
}

/// Owned, index-based copy of a model that can move to the worker thread.
struct Program {
    fixed_false: Vec<bool>,
    constraints: Vec<(Vec<(usize, f64)>, Relation, f64)>,
    objective: Vec<(usize, f64)>,
}

impl Program {
    fn from_model(model: &TimetableModel) -> Self {
        let mut fixed_false = vec![false; model.variable_count()];
        let mut constraints = Vec::new();

        // Single-variable `x = 0` rows become bounds.
        for c in model.constraints() {
            if let Some(var) = c.forced_false() {
                fixed_false[var.index()] = true;
                continue;
            }
            let terms = c
                .terms
                .iter()
                .map(|&(v, coef)| (v.index(), f64::from(coef)))
                .collect();
            constraints.push((terms, c.relation, f64::from(c.rhs)));
        }

        let objective = model
            .objective()
            .map(|costs| costs.iter().map(|&(v, c)| (v.index(), c)).collect())
            .unwrap_or_default();

        Self {
            fixed_false,
            constraints,
            objective,
        }
    }

    fn solve(self) -> Result<(SolveStatus, Vec<bool>), SolverError> {
        let mut vars = ProblemVariables::new();
        let handles: Vec<Variable> = self
            .fixed_false
            .iter()
            .map(|&fixed| {
                let definition = variable().binary();
                vars.add(if fixed { definition.max(0.0) } else { definition })
            })
            .collect();

        let objective = linear(&handles, &self.objective);
        let mut problem = vars.minimise(objective).using(default_solver);
        for (terms, relation, rhs) in &self.constraints {
            let lhs = linear(&handles, terms);
            let rhs = *rhs;
            problem = match relation {
                Relation::LessEq => problem.with(constraint!(lhs <= rhs)),
                Relation::Equal => problem.with(constraint!(lhs == rhs)),
            };
        }

        match problem.solve() {
            Ok(solution) => {
                let values = handles.iter().map(|&v| solution.value(v) > 0.5).collect();
                Ok((SolveStatus::Optimal, values))
            }
            Err(ResolutionError::Infeasible) => Ok((SolveStatus::Infeasible, Vec::new())),
            Err(ResolutionError::Unbounded) => Ok((SolveStatus::Unknown, Vec::new())),
            Err(other) => Err(SolverError::Backend(other.to_string())),
        }
    }
}

fn linear(handles: &[Variable], terms: &[(usize, f64)]) -> Expression {
    terms
        .iter()
        .fold(Expression::from(0.0), |acc, &(i, coef)| acc + handles[i] * coef)
}
