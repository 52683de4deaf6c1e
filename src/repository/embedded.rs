//! In-process repository implementation.
//!
//! Writes are staged per unit of work and only applied to the
//! [`SqliteWorkspace`] by a commit worker task; the caller observes
//! completion through the notifier wired in at begin.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::txn::CommitNotifier;

use super::error::{RepositoryError, RepositoryResult};
use super::unit_of_work::{TxState, UnitOfWork};
use super::workspace::{SchemaRecord, SqliteWorkspace, WorkspaceError, WorkspaceResult};
use super::Repository;

/// A staged change, applied in order on commit.
#[derive(Debug)]
enum SchemaOp {
    Upsert(SchemaRecord),
    Delete(String),
}

/// Per-unit-of-work staging area, dropped on rollback.
struct Session {
    staged: Vec<SchemaOp>,
    notifier: CommitNotifier,
}

/// Repository backed by a local [`SqliteWorkspace`].
pub struct EmbeddedRepository {
    workspace: Arc<Mutex<SqliteWorkspace>>,
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl EmbeddedRepository {
    /// Wrap an already-open workspace store.
    pub fn new(workspace: SqliteWorkspace) -> Self {
        Self {
            workspace: Arc::new(Mutex::new(workspace)),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Open the repository over a workspace database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> WorkspaceResult<Self> {
        Ok(Self::new(SqliteWorkspace::open(path)?))
    }

    /// Open the repository over an in-memory workspace (for testing).
    pub fn in_memory() -> WorkspaceResult<Self> {
        Ok(Self::new(SqliteWorkspace::open_in_memory()?))
    }

    /// What the staging area says about `id`: `Some(Some(_))` staged
    /// upsert, `Some(None)` staged delete, `None` untouched.
    fn staged_lookup(session: &Session, id: &str) -> Option<Option<SchemaRecord>> {
        for op in session.staged.iter().rev() {
            match op {
                SchemaOp::Upsert(record) if record.id == id => {
                    return Some(Some(record.clone()))
                }
                SchemaOp::Delete(op_id) if op_id == id => return Some(None),
                _ => {}
            }
        }
        None
    }
}

#[async_trait]
impl Repository for EmbeddedRepository {
    async fn begin_unit_of_work(
        &self,
        name: &str,
        rollback_only: bool,
        notifier: CommitNotifier,
    ) -> RepositoryResult<UnitOfWork> {
        let uow = UnitOfWork::new(name, rollback_only)?;
        self.sessions.lock().insert(
            uow.id(),
            Session {
                staged: Vec::new(),
                notifier,
            },
        );
        log::debug!("opened unit of work '{}' ({})", name, uow.id());
        Ok(uow)
    }

    async fn commit(&self, uow: &UnitOfWork) -> RepositoryResult<()> {
        let session = {
            let mut sessions = self.sessions.lock();
            match sessions.remove(&uow.id()) {
                None => return Err(RepositoryError::UnknownUnitOfWork(uow.id())),
                Some(session) => {
                    if let Err(err) = uow.begin_commit() {
                        sessions.insert(uow.id(), session);
                        return Err(err);
                    }
                    session
                }
            }
        };

        if uow.rollback_only() {
            // Forced rollback: discard staged changes, complete normally.
            log::debug!("unit of work '{}' is rollback-only, discarding", uow.name());
            uow.complete(TxState::RolledBack)?;
            session.notifier.complete(Ok(()));
            return Ok(());
        }

        let workspace = Arc::clone(&self.workspace);
        let worker_uow = uow.clone();
        let Session { staged, notifier } = session;

        tokio::spawn(async move {
            let applied = tokio::task::spawn_blocking(move || -> Result<(), WorkspaceError> {
                let workspace = workspace.lock();
                for op in staged {
                    match op {
                        SchemaOp::Upsert(record) => workspace.put(&record)?,
                        SchemaOp::Delete(id) => {
                            workspace.remove(&id)?;
                        }
                    }
                }
                Ok(())
            })
            .await;

            let outcome: Result<(), RepositoryError> = match applied {
                Ok(Ok(())) => Ok(()),
                Ok(Err(err)) => Err(RepositoryError::from(err)),
                Err(join_err) => Err(RepositoryError::Workspace(join_err.to_string())),
            };

            match outcome {
                Ok(()) => {
                    if let Err(err) = worker_uow.complete(TxState::Committed) {
                        log::error!(
                            "commit worker for '{}' could not finish the lifecycle: {}",
                            worker_uow.name(),
                            err
                        );
                    }
                    notifier.complete(Ok(()));
                }
                Err(err) => {
                    log::warn!(
                        "commit of unit of work '{}' failed: {}",
                        worker_uow.name(),
                        err
                    );
                    worker_uow.record_error(err.clone());
                    if let Err(state_err) = worker_uow.complete(TxState::Error) {
                        log::error!(
                            "commit worker for '{}' could not finish the lifecycle: {}",
                            worker_uow.name(),
                            state_err
                        );
                    }
                    notifier.complete(Err(err));
                }
            }
        });

        Ok(())
    }

    async fn rollback(&self, uow: &UnitOfWork) -> RepositoryResult<()> {
        let mut sessions = self.sessions.lock();
        match sessions.remove(&uow.id()) {
            None => Err(RepositoryError::UnknownUnitOfWork(uow.id())),
            Some(session) => {
                if let Err(err) = uow.ensure_not_started() {
                    sessions.insert(uow.id(), session);
                    return Err(err);
                }
                uow.complete(TxState::RolledBack)?;
                log::debug!("rolled back unit of work '{}'", uow.name());
                // The notifier is dropped unfired: nothing waits on a unit
                // of work whose commit was never issued.
                Ok(())
            }
        }
    }

    async fn find_schema(
        &self,
        uow: &UnitOfWork,
        id: &str,
    ) -> RepositoryResult<Option<SchemaRecord>> {
        uow.ensure_not_started()?;
        {
            let sessions = self.sessions.lock();
            let session = sessions
                .get(&uow.id())
                .ok_or(RepositoryError::UnknownUnitOfWork(uow.id()))?;
            if let Some(staged) = Self::staged_lookup(session, id) {
                return Ok(staged);
            }
        }
        Ok(self.workspace.lock().get(id)?)
    }

    async fn upsert_schema(&self, uow: &UnitOfWork, record: SchemaRecord) -> RepositoryResult<()> {
        uow.ensure_not_started()?;
        let mut sessions = self.sessions.lock();
        let session = sessions
            .get_mut(&uow.id())
            .ok_or(RepositoryError::UnknownUnitOfWork(uow.id()))?;
        session.staged.push(SchemaOp::Upsert(record));
        Ok(())
    }

    async fn delete_schema(&self, uow: &UnitOfWork, id: &str) -> RepositoryResult<bool> {
        uow.ensure_not_started()?;

        let visible = {
            let sessions = self.sessions.lock();
            let session = sessions
                .get(&uow.id())
                .ok_or(RepositoryError::UnknownUnitOfWork(uow.id()))?;
            match Self::staged_lookup(session, id) {
                Some(staged) => staged.is_some(),
                None => self.workspace.lock().get(id)?.is_some(),
            }
        };

        let mut sessions = self.sessions.lock();
        let session = sessions
            .get_mut(&uow.id())
            .ok_or(RepositoryError::UnknownUnitOfWork(uow.id()))?;
        session.staged.push(SchemaOp::Delete(id.to_string()));
        Ok(visible)
    }
}
