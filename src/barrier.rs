//! Completion barrier used by merge to close its output exactly once

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

struct BarrierState {
    parties: usize,
    remaining: AtomicUsize,
    notify: Notify,
}

/// Latch that opens once a fixed number of parties have arrived.
///
/// Only the arrival that takes the count from one to zero returns `true`,
/// so exactly one caller is told that the barrier fired.
#[derive(Clone)]
pub struct CompletionBarrier {
    state: Arc<BarrierState>,
}

impl CompletionBarrier {
    pub fn new(parties: usize) -> Self {
        Self {
            state: Arc::new(BarrierState {
                parties,
                remaining: AtomicUsize::new(parties),
                notify: Notify::new(),
            }),
        }
    }

    /// Record one arrival. Returns `true` for the arrival that opened the barrier.
    /// Arrivals after the barrier opened are ignored.
    pub fn arrive(&self) -> bool {
        let previous = self
            .state
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));

        match previous {
            Ok(1) => {
                self.state.notify.notify_waiters();
                true
            }
            _ => false,
        }
    }

    /// A guard that arrives when dropped, including during a panic unwind
    pub fn guard(&self) -> ArrivalGuard {
        ArrivalGuard {
            barrier: Some(self.clone()),
        }
    }

    /// Wait until every party has arrived
    pub async fn wait(&self) {
        loop {
            // Register before checking so a concurrent final arrival is not missed
            let notified = self.state.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.is_open() {
                return;
            }
            notified.await;
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.remaining.load(Ordering::Acquire) == 0
    }

    /// Parties that have not arrived yet
    pub fn remaining(&self) -> usize {
        self.state.remaining.load(Ordering::Acquire)
    }

    pub fn parties(&self) -> usize {
        self.state.parties
    }
}

impl std::fmt::Debug for CompletionBarrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionBarrier")
            .field("parties", &self.parties())
            .field("remaining", &self.remaining())
            .finish()
    }
}

/// Arrives at its barrier on drop
#[derive(Debug)]
pub struct ArrivalGuard {
    barrier: Option<CompletionBarrier>,
}

impl ArrivalGuard {
    /// Arrive now instead of on drop
    pub fn arrive(mut self) -> bool {
        self.barrier.take().map_or(false, |barrier| barrier.arrive())
    }
}

impl Drop for ArrivalGuard {
    fn drop(&mut self) {
        if let Some(barrier) = self.barrier.take() {
            barrier.arrive();
        }
    }
}
