//! One-shot result handle for delete and rename.

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

/// Resolves to `true` once the operation succeeded, `false` once it failed.
///
/// The value is sent when the controller applies the operation's
/// settlement, so the store already reflects the result when it arrives.
/// A dropped operation resolves to `false`.
#[derive(Debug)]
pub struct Outcome(oneshot::Receiver<bool>);

impl Outcome {
    pub(crate) fn channel() -> (oneshot::Sender<bool>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self(rx))
    }

    /// An outcome that is already decided.
    pub(crate) fn ready(value: bool) -> Self {
        let (tx, outcome) = Self::channel();
        let _ = tx.send(value);
        outcome
    }

    /// Wait for the result.
    pub async fn wait(self) -> bool {
        self.0.await.unwrap_or(false)
    }

    /// The result if it has arrived, without waiting.
    pub fn try_get(&mut self) -> Option<bool> {
        match self.0.try_recv() {
            Ok(value) => Some(value),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(false),
        }
    }
}
