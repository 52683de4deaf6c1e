//! Transaction-bridge error types.

use std::time::Duration;

use thiserror::Error;

use crate::repository::RepositoryError;

/// Boxed error type for caller-supplied work.
///
/// Work closures carry their own error types; the bridge only needs to
/// propagate them, so they cross this layer boxed.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for bridge operations.
pub type TxnResult<T> = Result<T, TransactionError>;

/// Errors surfaced by [`TransactionRunner`](super::TransactionRunner).
///
/// None of these are fatal to the process, and none are retried here;
/// retry policy belongs to the caller. A retried call opens a fresh unit
/// of work with no state carried over.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// A caller-supplied argument was rejected before any work ran.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The caller-supplied work failed; the unit of work was rolled back
    /// and commit was never issued.
    #[error("transaction work failed: {0}")]
    WorkFailed(#[source] BoxError),

    /// The commit completion signal did not fire within the ceiling.
    ///
    /// The underlying commit may still complete asynchronously; the caller
    /// must not assume either outcome without polling the repository.
    #[error("transaction '{name}' timed out waiting for commit after {}s", .ceiling.as_secs())]
    CommitTimeout {
        /// Name of the transaction that timed out.
        name: String,
        /// The configured wait ceiling.
        ceiling: Duration,
    },

    /// The repository reported an error, either when opening the unit of
    /// work or through the commit completion signal.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl TransactionError {
    /// Wrap a caller-supplied work error.
    pub fn work_failed(err: impl Into<BoxError>) -> Self {
        Self::WorkFailed(err.into())
    }

    /// Whether this error leaves the commit outcome unknown.
    ///
    /// True only for [`TransactionError::CommitTimeout`]: the commit was
    /// issued but its completion was never observed.
    pub fn is_outcome_unknown(&self) -> bool {
        matches!(self, Self::CommitTimeout { .. })
    }
}
