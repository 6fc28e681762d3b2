//! Request-scoped cancellation and deadlines
//!
//! Every lifecycle callback receives a [`Context`]. HTTP calls race against
//! [`Context::cancelled`] so an interrupted plan or apply stops promptly.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Cheap to clone; clones share one cancellation flag.
#[derive(Clone)]
pub struct Context {
    cancel: Arc<watch::Sender<bool>>,
    deadline: Option<Instant>,
}

impl Context {
    pub fn new() -> Self {
        let (cancel, _) = watch::channel(false);
        Self {
            cancel: Arc::new(cancel),
            deadline: None,
        }
    }

    /// Same cancellation flag, plus a deadline `timeout` from now.
    /// An earlier existing deadline wins.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        self.deadline = Some(self.deadline.map_or(deadline, |d| d.min(deadline)));
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    /// Resolves once [`Context::cancel`] has been called on any clone
    /// or the deadline has passed
    pub async fn cancelled(&self) {
        let mut flag = self.cancel.subscribe();
        // the sender is held by `self`, so the channel cannot close here
        let cancelled = flag.wait_for(|cancelled| *cancelled);
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = cancelled => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => {
                let _ = cancelled.await;
            }
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
