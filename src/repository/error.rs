//! Repository error types.

use thiserror::Error;
use uuid::Uuid;

use super::unit_of_work::TxState;
use super::workspace::WorkspaceError;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors reported by a [`Repository`](super::Repository) implementation.
///
/// These cross a task boundary (the commit worker records them into the
/// unit of work's error slot and the waiting caller reads them back), so
/// the type is `Clone` and backend errors are carried flattened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// A unit of work needs a non-empty name.
    #[error("unit of work name must not be empty")]
    EmptyName,

    /// An operation found the unit of work in the wrong state.
    #[error("unit of work is {actual}, expected {expected}")]
    InvalidState {
        /// The state the operation requires.
        expected: TxState,
        /// The state the unit of work was actually in.
        actual: TxState,
    },

    /// The unit of work is not registered with this repository.
    #[error("unknown unit of work {0}")]
    UnknownUnitOfWork(Uuid),

    /// The commit completion signal was dropped before firing; the
    /// repository worker went away.
    #[error("commit completion signal was dropped before firing")]
    SignalDropped,

    /// The backing workspace store failed.
    #[error("workspace error: {0}")]
    Workspace(String),
}

impl From<WorkspaceError> for RepositoryError {
    fn from(err: WorkspaceError) -> Self {
        Self::Workspace(err.to_string())
    }
}
