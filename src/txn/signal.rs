//! Single-fire commit completion signal.
//!
//! One commit, one signal. The repository's commit worker holds the
//! notifier half; the caller blocked in the bridge holds the waiting half.
//! A reader observes exactly one of: still pending, fired without error,
//! fired with error.

use std::time::Duration;

use tokio::sync::oneshot;

use crate::repository::RepositoryError;

/// Producer half of a commit completion signal.
///
/// Held by the repository worker that processes the commit. Firing
/// consumes the notifier, so a second firing is unrepresentable.
#[derive(Debug)]
pub struct CommitNotifier {
    tx: oneshot::Sender<Result<(), RepositoryError>>,
}

impl CommitNotifier {
    /// Fire the signal with the commit outcome.
    ///
    /// The send result is discarded: if the waiter timed out and dropped
    /// the signal, the outcome has nowhere to go and that is expected.
    pub fn complete(self, result: Result<(), RepositoryError>) {
        let _ = self.tx.send(result);
    }
}

/// Consumer half of a commit completion signal.
#[derive(Debug)]
pub struct CommitSignal {
    rx: oneshot::Receiver<Result<(), RepositoryError>>,
}

/// What the waiter observed.
#[derive(Debug)]
pub enum WaitOutcome {
    /// The signal fired within the ceiling, carrying the commit outcome.
    Completed(Result<(), RepositoryError>),
    /// The ceiling elapsed before the signal fired.
    TimedOut,
    /// The notifier was dropped without firing; the repository worker
    /// went away.
    Dropped,
}

impl CommitSignal {
    /// Create a connected notifier/signal pair.
    pub fn channel() -> (CommitNotifier, CommitSignal) {
        let (tx, rx) = oneshot::channel();
        (CommitNotifier { tx }, CommitSignal { rx })
    }

    /// Wait for the signal to fire, bounded by `ceiling`.
    ///
    /// Consumes the signal: after the ceiling elapses the commit outcome
    /// is no longer observable through this primitive.
    pub async fn wait(self, ceiling: Duration) -> WaitOutcome {
        match tokio::time::timeout(ceiling, self.rx).await {
            Ok(Ok(result)) => WaitOutcome::Completed(result),
            Ok(Err(_)) => WaitOutcome::Dropped,
            Err(_) => WaitOutcome::TimedOut,
        }
    }

    /// Non-blocking probe, for callers that poll instead of waiting.
    pub fn try_observe(&mut self) -> Option<Result<(), RepositoryError>> {
        self.rx.try_recv().ok()
    }
}
