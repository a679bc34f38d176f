//! Broadcast cancellation with optional deadlines
//!
//! A [`CancellationToken`] is a one-shot latch shared by every stage of a
//! pipeline. Once cancelled it stays cancelled; every clone observes the
//! signal. Blocking points race their operation against
//! [`CancellationToken::cancelled`] inside `tokio::select!`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::{CancellationToken as InnerToken, DropGuard};

/// Shared stop signal, optionally armed with a deadline
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: InnerToken,
    deadline: Option<Instant>,
    // Shared by every handle; the last drop stops the deadline timer
    timer_stop: Option<Arc<DropGuard>>,
}

impl CancellationToken {
    /// Create a token that is only cancelled explicitly
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a token that cancels itself once `timeout` has elapsed.
    ///
    /// Must be called from within a Tokio runtime: the deadline timer runs as
    /// a spawned task.
    ///
    /// The timer task exits at the deadline, on cancellation, or once every
    /// handle to the token has been dropped.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Create a token that cancels itself at `deadline`
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::armed(InnerToken::new(), deadline)
    }

    /// A token cancelled together with `self`, but which can also be
    /// cancelled on its own without affecting `self`
    pub fn child_token(&self) -> Self {
        Self {
            inner: self.inner.child_token(),
            deadline: self.deadline,
            timer_stop: self.timer_stop.clone(),
        }
    }

    /// A child token that additionally cancels itself after `timeout`.
    /// The effective deadline is the earlier of the parent's and the new one.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let mut deadline = Instant::now() + timeout;
        if let Some(parent) = self.deadline {
            deadline = deadline.min(parent);
        }
        Self::armed(self.inner.child_token(), deadline)
    }

    fn armed(inner: InnerToken, deadline: Instant) -> Self {
        let timer = inner.clone();
        let stop = InnerToken::new();
        let stopped = stop.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = timer.cancelled() => {}
                _ = stopped.cancelled() => {}
                _ = sleep_until(deadline) => {
                    log::debug!("Cancellation deadline elapsed");
                    timer.cancel();
                }
            }
        });

        Self {
            inner,
            deadline: Some(deadline),
            timer_stop: Some(Arc::new(stop.drop_guard())),
        }
    }

    /// Signal cancellation. Calling this more than once has no further effect.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// Resolves once the token is cancelled; immediately if it already is
    pub fn cancelled(&self) -> impl Future<Output = ()> + Send + '_ {
        self.inner.cancelled()
    }

    /// Owned variant of [`cancelled`](Self::cancelled) for futures that
    /// must outlive a borrow of the token
    pub fn cancelled_owned(self) -> impl Future<Output = ()> + Send + 'static {
        self.inner.cancelled_owned()
    }

    /// The deadline this token was armed with, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline, zero once it has passed
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Cancel the token when the returned guard is dropped
    pub fn drop_guard(self) -> DropGuard {
        self.inner.drop_guard()
    }
}
