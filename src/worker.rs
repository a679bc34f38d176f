//! Workers: the units that [`distribute`](crate::distribute::distribute) replicates
//!
//! A worker drains an input stream, transforms each value, and emits the
//! results on a fresh output stream that it alone owns. It must close that
//! output on every exit path (input closed, cancellation, or failure) and
//! race every send against the cancellation token. If a worker leaves its
//! output open forever, the merge downstream of it can never close.
//!
//! The simplest way to honour the contract is to move the output
//! [`Sender`] into the task spawned by the worker: when the task ends, by
//! returning or by panicking, the sender is dropped and the stream closes.
//! [`map_worker`] and [`map_worker_async`] are built that way.

use std::future::Future;
use std::sync::Arc;

use crate::cancel::CancellationToken;
use crate::channel::{self, Receiver, Sender};
use crate::stream_configuration::WorkerConfig;

/// Something that turns an input stream into an output stream.
///
/// Implemented for every `Fn(CancellationToken, Receiver<T>) -> Receiver<U>`.
pub trait Worker<T, U>: Send + Sync + 'static {
    /// Start draining `input`, returning the stream of results
    fn run(&self, token: CancellationToken, input: Receiver<T>) -> Receiver<U>;
}

impl<T, U, F> Worker<T, U> for F
where
    F: Fn(CancellationToken, Receiver<T>) -> Receiver<U> + Send + Sync + 'static,
{
    fn run(&self, token: CancellationToken, input: Receiver<T>) -> Receiver<U> {
        self(token, input)
    }
}

/// Worker applying a synchronous, possibly CPU-heavy function to each value
pub struct MapWorker<F> {
    f: Arc<F>,
    config: WorkerConfig,
}

impl<F> Clone for MapWorker<F> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
            config: self.config.clone(),
        }
    }
}

/// Build a worker from a per-value function.
///
/// By default the function runs on Tokio's blocking pool so long
/// computations do not stall other tasks. Cancellation stops the worker
/// from waiting on a computation in progress, but the computation itself
/// runs to completion on its blocking thread.
pub fn map_worker<T, U, F>(f: F) -> MapWorker<F>
where
    F: Fn(T) -> U + Send + Sync + 'static,
{
    MapWorker {
        f: Arc::new(f),
        config: WorkerConfig::default(),
    }
}

impl<F> MapWorker<F> {
    pub fn with_config(mut self, config: WorkerConfig) -> Self {
        self.config = config;
        self
    }
}

impl<T, U, F> Worker<T, U> for MapWorker<F>
where
    T: Send + 'static,
    U: Send + 'static,
    F: Fn(T) -> U + Send + Sync + 'static,
{
    fn run(&self, token: CancellationToken, input: Receiver<T>) -> Receiver<U> {
        let (tx, rx) = channel::with_config(&self.config.output);
        let f = Arc::clone(&self.f);
        let use_blocking = self.config.use_blocking;

        tokio::spawn(drain(token, input, tx, move |item| {
            let f = Arc::clone(&f);
            async move {
                if !use_blocking {
                    return Some((*f)(item));
                }
                match tokio::task::spawn_blocking(move || (*f)(item)).await {
                    Ok(value) => Some(value),
                    Err(e) => {
                        log::warn!("Worker transform failed, closing worker output: {}", e);
                        None
                    }
                }
            }
        }));

        rx
    }
}

/// Worker applying an async function to each value
pub struct AsyncMapWorker<F> {
    f: Arc<F>,
    config: WorkerConfig,
}

impl<F> Clone for AsyncMapWorker<F> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
            config: self.config.clone(),
        }
    }
}

/// Build a worker from an async per-value function
pub fn map_worker_async<T, U, F, Fut>(f: F) -> AsyncMapWorker<F>
where
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = U> + Send + 'static,
{
    AsyncMapWorker {
        f: Arc::new(f),
        config: WorkerConfig::default(),
    }
}

impl<F> AsyncMapWorker<F> {
    pub fn with_config(mut self, config: WorkerConfig) -> Self {
        self.config = config;
        self
    }
}

impl<T, U, F, Fut> Worker<T, U> for AsyncMapWorker<F>
where
    T: Send + 'static,
    U: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = U> + Send + 'static,
{
    fn run(&self, token: CancellationToken, input: Receiver<T>) -> Receiver<U> {
        let (tx, rx) = channel::with_config(&self.config.output);
        let f = Arc::clone(&self.f);

        tokio::spawn(drain(token, input, tx, move |item| {
            let fut = (*f)(item);
            async move { Some(fut.await) }
        }));

        rx
    }
}

/// Shared worker loop. `tx` is owned here and dropped on return, closing the output.
async fn drain<T, U, F, Fut>(
    token: CancellationToken,
    input: Receiver<T>,
    tx: Sender<U>,
    mut transform: F,
) where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Option<U>>,
{
    let mut processed = 0usize;

    while let Some(item) = input.recv_or_cancel(&token).await {
        let result = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            result = transform(item) => result,
        };

        let Some(value) = result else {
            break;
        };
        if tx.send_or_cancel(&token, value).await.is_err() {
            break;
        }
        processed += 1;
    }

    log::debug!(
        "Worker closed after {} items (cancelled: {})",
        processed,
        token.is_cancelled()
    );
}
