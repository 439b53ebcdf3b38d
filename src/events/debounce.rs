//! Time-delayed coalescing of rapid input events.

use log::*;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Delays an action until its input has been quiet for a while.
///
/// Every call to [`Debouncer::run`] supersedes the calls still waiting, so
/// in a burst of calls only the last one runs its action.
///
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    latest: AtomicU64,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Debouncer {
            quiet,
            latest: AtomicU64::new(0),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Wait for the quiet period, then run `action` unless a newer call
    /// arrived meanwhile. Returns `None` for superseded calls.
    ///
    pub async fn run<F, Fut>(&self, action: F) -> Option<Fut::Output>
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.quiet).await;
        if self.latest.load(Ordering::SeqCst) != ticket {
            trace!("Debounced call {} superseded.", ticket);
            return None;
        }
        Some(action().await)
    }

    /// Drop every pending call.
    ///
    pub fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}
