//! Repository collaborator boundary.
//!
//! The metadata repository owns persistence; this crate owns coordination.
//! The boundary is the [`Repository`] trait: open a named unit of work,
//! stage schema-record changes against it, then commit (asynchronous,
//! completion reported through a [`CommitNotifier`]) or roll back.
//!
//! There is no ambient "current transaction": every data operation takes
//! the [`UnitOfWork`] handle explicitly.
//!
//! [`EmbeddedRepository`] is the in-process implementation, backed by a
//! [`SqliteWorkspace`] store. It applies commits on a worker task and
//! reports completion through the notifier.
//!
//! [`CommitNotifier`]: crate::txn::CommitNotifier

mod embedded;
mod error;
mod unit_of_work;
mod workspace;

pub use embedded::EmbeddedRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use unit_of_work::{TxState, UnitOfWork};
pub use workspace::{SchemaRecord, SqliteWorkspace, WorkspaceError, WorkspaceResult};

use async_trait::async_trait;

use crate::txn::CommitNotifier;

/// The repository collaborator contract.
///
/// `commit` is asynchronous in effect as well as signature: it drives the
/// unit of work to a terminal state on the repository's own worker and
/// fires the notifier exactly once when done. Callers that need to observe
/// completion wait on the paired [`CommitSignal`](crate::txn::CommitSignal)
/// — which is what [`TransactionRunner`](crate::txn::TransactionRunner)
/// does.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Open a unit of work in state [`TxState::NotStarted`].
    ///
    /// The notifier is fired exactly once, when a later `commit` finishes
    /// processing (or is forced into rollback by `rollback_only`).
    async fn begin_unit_of_work(
        &self,
        name: &str,
        rollback_only: bool,
        notifier: CommitNotifier,
    ) -> RepositoryResult<UnitOfWork>;

    /// Issue the commit for a not-yet-started unit of work.
    ///
    /// Returns once the commit has been handed to the repository's worker;
    /// completion is reported through the notifier. A unit of work opened
    /// `rollback_only` is driven to [`TxState::RolledBack`] instead, with
    /// its staged changes discarded, and still completes without error.
    async fn commit(&self, uow: &UnitOfWork) -> RepositoryResult<()>;

    /// Roll back a not-yet-started unit of work, discarding staged changes.
    async fn rollback(&self, uow: &UnitOfWork) -> RepositoryResult<()>;

    /// Look up a stored schema record.
    ///
    /// Reads see committed state overlaid with the calling unit of work's
    /// own staged changes.
    async fn find_schema(
        &self,
        uow: &UnitOfWork,
        id: &str,
    ) -> RepositoryResult<Option<SchemaRecord>>;

    /// Stage a create-or-update of a schema record.
    async fn upsert_schema(&self, uow: &UnitOfWork, record: SchemaRecord) -> RepositoryResult<()>;

    /// Stage removal of a schema record.
    ///
    /// Returns whether a record was visible to remove (committed or staged
    /// by this unit of work).
    async fn delete_schema(&self, uow: &UnitOfWork, id: &str) -> RepositoryResult<bool>;
}
