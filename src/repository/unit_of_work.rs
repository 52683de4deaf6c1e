//! Unit-of-work handle and lifecycle.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use super::error::{RepositoryError, RepositoryResult};

/// Lifecycle state of a unit of work.
///
/// Transitions are strictly forward: `NotStarted → Committing →
/// {Committed | RolledBack | Error}` (rollback may also go straight from
/// `NotStarted`). A unit of work is never reused after a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    /// Opened, work may run, nothing issued yet.
    NotStarted,
    /// Commit handed to the repository worker.
    Committing,
    /// Worker applied the change set.
    Committed,
    /// Discarded, either explicitly or because the unit of work was
    /// opened rollback-only.
    RolledBack,
    /// Worker failed; the error slot holds the cause.
    Error,
}

impl TxState {
    /// Whether this state ends the lifecycle.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::RolledBack | Self::Error)
    }
}

impl fmt::Display for TxState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotStarted => "not-started",
            Self::Committing => "committing",
            Self::Committed => "committed",
            Self::RolledBack => "rolled-back",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
struct UowInner {
    id: Uuid,
    name: String,
    rollback_only: bool,
    state: Mutex<TxState>,
    error: Mutex<Option<RepositoryError>>,
}

/// One logical change to the metadata repository.
///
/// The handle is a cheap clone over shared state: the repository's commit
/// worker holds one clone to record the outcome, the caller that opened
/// the transaction holds another to observe it. Logically the unit of work
/// belongs to the single `run_in_transaction` call that created it and
/// must not be retained beyond it.
#[derive(Debug, Clone)]
pub struct UnitOfWork {
    inner: Arc<UowInner>,
}

impl UnitOfWork {
    /// Create a unit of work in state [`TxState::NotStarted`].
    pub fn new(name: impl Into<String>, rollback_only: bool) -> RepositoryResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RepositoryError::EmptyName);
        }
        Ok(Self {
            inner: Arc::new(UowInner {
                id: Uuid::new_v4(),
                name,
                rollback_only,
                state: Mutex::new(TxState::NotStarted),
                error: Mutex::new(None),
            }),
        })
    }

    /// Unique id of this unit of work.
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Diagnostic name given at open.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether commit must be forced into rollback.
    pub fn rollback_only(&self) -> bool {
        self.inner.rollback_only
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TxState {
        *self.inner.state.lock()
    }

    /// The recorded error, if the worker stored one.
    pub fn error(&self) -> Option<RepositoryError> {
        self.inner.error.lock().clone()
    }

    /// Record an error into the unit of work's error slot.
    ///
    /// The slot is single-assignment: a second error is dropped so the
    /// first cause is the one the waiting caller sees.
    pub fn record_error(&self, err: RepositoryError) {
        let mut slot = self.inner.error.lock();
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    /// Move from `NotStarted` to `Committing`.
    ///
    /// Rejects any other starting state: a unit of work in a terminal
    /// state (or already committing) cannot be committed again.
    pub fn begin_commit(&self) -> RepositoryResult<()> {
        let mut state = self.inner.state.lock();
        if *state != TxState::NotStarted {
            return Err(RepositoryError::InvalidState {
                expected: TxState::NotStarted,
                actual: *state,
            });
        }
        *state = TxState::Committing;
        Ok(())
    }

    /// Move to a terminal state.
    ///
    /// Rejects non-terminal targets and transitions out of a terminal
    /// state; the lifecycle only moves forward.
    pub fn complete(&self, to: TxState) -> RepositoryResult<()> {
        let mut state = self.inner.state.lock();
        if !to.is_terminal() || state.is_terminal() {
            return Err(RepositoryError::InvalidState {
                expected: to,
                actual: *state,
            });
        }
        *state = to;
        Ok(())
    }

    /// Guard for operations that require a not-yet-started unit of work.
    pub fn ensure_not_started(&self) -> RepositoryResult<()> {
        let state = self.state();
        if state != TxState::NotStarted {
            return Err(RepositoryError::InvalidState {
                expected: TxState::NotStarted,
                actual: state,
            });
        }
        Ok(())
    }
}
