use thiserror::Error;

use crate::mdp::Action;

/// Errors raised while building a grid world or a solver.
///
/// Running out of iterations is not an error; see
/// [`SolveStatus::MaxIterationsExceeded`](crate::mdp::SolveStatus::MaxIterationsExceeded).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error(
        "Environment moved ({row}, {col}) {action} to ({successor_row}, {successor_col}), outside the grid"
    )]
    SuccessorOutOfBounds {
        row: usize,
        col: usize,
        action: Action,
        successor_row: usize,
        successor_col: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
