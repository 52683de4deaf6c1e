//! Transaction synchronization bridge.
//!
//! The repository applies commits asynchronously on its own worker and
//! reports completion through a callback. This module turns that into a
//! call the rest of the service can treat as synchronous and bounded:
//!
//! ```text
//! caller ──▶ TransactionRunner::run_in_transaction(name, rollback_only, work)
//!               │
//!               ├─ begin unit of work (NotStarted)
//!               ├─ work(uow).await          ── failure ▶ rollback, WorkFailed
//!               ├─ commit(uow)              ── issued strictly after work
//!               └─ CommitSignal::wait(ceiling)
//!                     ├─ fired ok            ▶ work's result
//!                     ├─ fired with error    ▶ Repository error
//!                     └─ ceiling elapsed     ▶ CommitTimeout
//! ```
//!
//! The completion callback is a typed single-producer/single-consumer pair:
//! the repository's commit worker holds the [`CommitNotifier`], the waiting
//! caller holds the [`CommitSignal`]. At most one firing is enforced by
//! move semantics, not by runtime checks.

mod error;
mod runner;
mod signal;

pub use error::{BoxError, TransactionError, TxnResult};
pub use runner::TransactionRunner;
pub use signal::{CommitNotifier, CommitSignal, WaitOutcome};

use std::time::Duration;

/// Default ceiling for the post-commit wait (30 seconds).
pub const DEFAULT_COMMIT_CEILING: Duration = Duration::from_secs(30);
