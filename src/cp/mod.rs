//! Timetable formulation as a 0-1 integer program.
//!
//! Builds one boolean per candidate class meeting, restricts the
//! variables with the rule families, attaches the early-period objective
//! and hands the result to a `SolverBackend`.
//!
//! # Pipeline
//! `VariableSpace::build` → `ConstraintEngine::apply` → `apply_objective`
//! → `SolverBackend::solve`
//!
//! # Reference
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Wolsey (1998), "Integer Programming", Ch. 1

mod constraints;
mod model;
mod objective;
mod solver;
mod variables;

pub use constraints::{ConstraintEngine, ConstraintFamily};
pub use model::{LinearConstraint, Relation, TimetableModel, VarId};
pub use objective::{apply_objective, period_cost};
pub use solver::{MilpSolver, SolveOutcome, SolveStatus, SolverBackend};
pub use variables::VariableSpace;
