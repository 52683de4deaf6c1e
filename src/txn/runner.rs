//! TransactionRunner: the synchronous-over-asynchronous commit bridge.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::repository::Repository;
use crate::repository::UnitOfWork;

use super::error::{BoxError, TransactionError, TxnResult};
use super::signal::{CommitSignal, WaitOutcome};
use super::DEFAULT_COMMIT_CEILING;

/// Runs caller-supplied work inside exactly one unit of work and bridges
/// the repository's asynchronous commit into a bounded wait.
///
/// Within one call, `work` executes strictly before commit is issued, and
/// commit is issued strictly before the wait begins. Across calls, units
/// of work are independent; this layer imposes no cross-transaction
/// ordering or isolation beyond what the repository provides.
///
/// # Example
///
/// ```ignore
/// use strata::txn::TransactionRunner;
///
/// let runner = TransactionRunner::new(repository.clone());
/// let ddl = runner
///     .run_in_transaction("read_schema", true, move |uow| async move {
///         let record = repository.find_schema(&uow, "pg_sales").await?;
///         Ok(record.map(|r| r.ddl))
///     })
///     .await?;
/// ```
pub struct TransactionRunner {
    repository: Arc<dyn Repository>,
    commit_ceiling: Duration,
}

impl TransactionRunner {
    /// Create a runner with the default 30 second commit-wait ceiling.
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self::with_commit_ceiling(repository, DEFAULT_COMMIT_CEILING)
    }

    /// Create a runner with a custom commit-wait ceiling.
    pub fn with_commit_ceiling(repository: Arc<dyn Repository>, commit_ceiling: Duration) -> Self {
        Self {
            repository,
            commit_ceiling,
        }
    }

    /// The configured commit-wait ceiling.
    pub fn commit_ceiling(&self) -> Duration {
        self.commit_ceiling
    }

    /// Run `work` inside a fresh unit of work and return its result.
    ///
    /// `name` identifies the transaction in diagnostics and must be
    /// non-empty. `rollback_only` forces the commit into a rollback
    /// regardless of success; read-only operations use it to guarantee
    /// nothing they staged can become visible.
    ///
    /// # Errors
    ///
    /// - [`TransactionError::InvalidArgument`] — empty name, before any
    ///   work runs.
    /// - [`TransactionError::WorkFailed`] — `work` returned an error; the
    ///   unit of work was rolled back and commit was never issued.
    /// - [`TransactionError::CommitTimeout`] — the completion signal did
    ///   not fire within the ceiling. The commit is not retracted and may
    ///   still complete.
    /// - [`TransactionError::Repository`] — the repository failed to open
    ///   the unit of work, or reported an error through the completion
    ///   signal. The unit of work's own error slot takes precedence over
    ///   the error carried by the signal.
    pub async fn run_in_transaction<T, F, Fut>(
        &self,
        name: &str,
        rollback_only: bool,
        work: F,
    ) -> TxnResult<T>
    where
        F: FnOnce(UnitOfWork) -> Fut,
        Fut: Future<Output = Result<T, BoxError>> + Send,
        T: Send,
    {
        if name.trim().is_empty() {
            return Err(TransactionError::InvalidArgument(
                "transaction name must not be empty".to_string(),
            ));
        }

        let (notifier, signal) = CommitSignal::channel();
        let uow = self
            .repository
            .begin_unit_of_work(name, rollback_only, notifier)
            .await?;

        let value = match work(uow.clone()).await {
            Ok(value) => value,
            Err(err) => {
                if let Err(rollback_err) = self.repository.rollback(&uow).await {
                    log::warn!(
                        "rollback of '{}' after failed work also failed: {}",
                        name,
                        rollback_err
                    );
                }
                return Err(TransactionError::WorkFailed(err));
            }
        };

        self.repository.commit(&uow).await?;

        match signal.wait(self.commit_ceiling).await {
            WaitOutcome::Completed(callback_result) => {
                // Unit-of-work error slot takes precedence over the error
                // carried by the signal.
                if let Some(err) = uow.error() {
                    return Err(TransactionError::Repository(err));
                }
                callback_result.map_err(TransactionError::Repository)?;
                Ok(value)
            }
            WaitOutcome::TimedOut => Err(TransactionError::CommitTimeout {
                name: name.to_string(),
                ceiling: self.commit_ceiling,
            }),
            WaitOutcome::Dropped => Err(TransactionError::Repository(
                crate::repository::RepositoryError::SignalDropped,
            )),
        }
    }
}
