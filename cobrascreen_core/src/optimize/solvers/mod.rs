//! Solver backends for [`Problem`]
pub mod clarabel;

use thiserror::Error;

use crate::optimize::problem::{Problem, ProblemType};
use crate::optimize::ProblemSolution;

/// Interface to a backend able to solve a [`Problem`]
pub trait Solver {
    /// Name of the backend, used in logs
    fn name(&self) -> &'static str;

    /// Whether the backend can handle integer and binary variables
    fn integer_variable_capable(&self) -> bool;

    /// Solve the problem
    ///
    /// An infeasible or unbounded problem is not an error, it is reported through
    /// the status of the returned [`ProblemSolution`]. Errors are reserved for
    /// problems the backend cannot attempt at all.
    fn solve(&mut self, problem: &Problem) -> Result<ProblemSolution, SolverError>;
}

/// Errors raised by a solver backend
#[derive(Error, Debug, Clone)]
pub enum SolverError {
    /// The backend does not support this type of problem
    #[error("Solver {solver} does not support problems of type {problem_type:?}")]
    UnsupportedProblemType {
        solver: &'static str,
        problem_type: ProblemType,
    },
    /// The backend rejected its settings
    #[error("Invalid solver settings: {0}")]
    InvalidSettings(String),
}
