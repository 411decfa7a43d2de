//! Error types.
//!
//! Only faults are errors. Expected outcomes such as an overloaded group
//! or an infeasible model are reported through `ScheduleResult`.

use thiserror::Error;

use crate::validation::ValidationError;

/// A fault that prevents a scheduling request from being evaluated.
#[derive(Debug, Error)]
pub enum TimetableError {
    /// The domain data is structurally malformed.
    #[error("invalid input: {}", summarize(.0))]
    InvalidInput(Vec<ValidationError>),

    /// The rule configuration is unusable.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The solving backend failed internally.
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// A fault inside the solving backend.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The worker thread could not be started.
    #[error("failed to spawn solver worker: {0}")]
    Spawn(#[from] std::io::Error),

    /// The worker thread ended without reporting a result.
    #[error("solver worker terminated without a result")]
    WorkerLost,

    /// Every worker slot is held by a running solve.
    #[error("all {limit} solver workers are busy")]
    Saturated { limit: usize },

    /// The backend rejected the model.
    #[error("solver backend error: {0}")]
    Backend(String),
}

fn summarize(errors: &[ValidationError]) -> String {
    match errors {
        [] => "no details".to_string(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!("{} (and {} more)", first.message, rest.len()),
    }
}
