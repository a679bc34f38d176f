//! Close-terminated streams with competing receivers
//!
//! A stream is a bounded tokio channel split into one [`Sender`] and any
//! number of [`Receiver`] clones. Each value is handed to exactly one
//! receiver, which is what lets several workers share one input without
//! duplicating work. Closing is idempotent and also happens when the
//! sender is dropped, so a producer task that exits by any path (including
//! a panic) closes its stream.

use std::fmt;
use std::sync::Arc;

use async_stream::stream;
use futures_core::stream::BoxStream;
use tokio::sync::{mpsc, Mutex};

use crate::cancel::CancellationToken;
use crate::error::SendError;
use crate::stream_configuration::StreamConfig;

/// Create a stream holding up to `capacity` values before `send` suspends.
///
/// A capacity of zero is treated as one.
pub fn bounded<T>(capacity: usize) -> (Sender<T>, Receiver<T>)
where
    T: Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        Sender { inner: Some(tx) },
        Receiver {
            inner: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Create a stream sized by `config`
pub fn with_config<T>(config: &StreamConfig) -> (Sender<T>, Receiver<T>)
where
    T: Send + 'static,
{
    bounded(config.capacity())
}

/// Writing half of a stream. Owned by exactly one producer.
pub struct Sender<T> {
    inner: Option<mpsc::Sender<T>>,
}

impl<T> Sender<T>
where
    T: Send + 'static,
{
    /// Send a value, suspending while the buffer is full
    pub async fn send(&self, value: T) -> Result<(), SendError<T>> {
        match &self.inner {
            Some(tx) => tx.send(value).await.map_err(|e| SendError::Closed(e.0)),
            None => Err(SendError::Closed(value)),
        }
    }

    /// Send a value unless `token` fires first.
    ///
    /// Cancellation is checked before the send, so an already-cancelled
    /// token never lets a value through.
    pub async fn send_or_cancel(
        &self,
        token: &CancellationToken,
        value: T,
    ) -> Result<(), SendError<T>> {
        let tx = match &self.inner {
            Some(tx) => tx,
            None => return Err(SendError::Closed(value)),
        };
        if token.is_cancelled() {
            return Err(SendError::Cancelled(value));
        }

        // Reserve first so the value is never lost inside a dropped send future
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(SendError::Cancelled(value)),
            permit = tx.reserve() => match permit {
                Ok(permit) => {
                    permit.send(value);
                    Ok(())
                }
                Err(_) => Err(SendError::Closed(value)),
            },
        }
    }

    /// Close the stream. Receivers see the buffered values, then `None`.
    /// Closing an already closed stream does nothing.
    pub fn close(&mut self) {
        self.inner.take();
    }

    /// True once closed, or once every receiver has been dropped
    pub fn is_closed(&self) -> bool {
        match &self.inner {
            Some(tx) => tx.is_closed(),
            None => true,
        }
    }

    /// Another handle onto the same stream, used by merge forwarders.
    /// The stream only closes once every fork is closed or dropped.
    pub(crate) fn fork(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for Sender<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sender")
            .field("closed", &self.inner.as_ref().map_or(true, |tx| tx.is_closed()))
            .finish()
    }
}

/// Reading half of a stream.
///
/// Clones compete for values: every value is delivered to exactly one of
/// them.
pub struct Receiver<T> {
    inner: Arc<Mutex<mpsc::Receiver<T>>>,
}

impl<T> Clone for Receiver<T> {
    fn clone(&self) -> Self {
        Receiver {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Receiver<T>
where
    T: Send + 'static,
{
    /// Wait for the next value. `None` means the stream is closed and drained.
    pub async fn recv(&self) -> Option<T> {
        let mut rx = self.inner.lock().await;
        rx.recv().await
    }

    /// Wait for the next value unless `token` fires first.
    ///
    /// Returns `None` when the stream is closed or the token is cancelled;
    /// check [`CancellationToken::is_cancelled`] to tell them apart.
    pub async fn recv_or_cancel(&self, token: &CancellationToken) -> Option<T> {
        tokio::select! {
            biased;
            _ = token.cancelled() => None,
            item = self.recv() => item,
        }
    }

    /// Take a value if one is buffered right now
    pub fn try_recv(&self) -> Option<T> {
        let mut rx = self.inner.try_lock().ok()?;
        rx.try_recv().ok()
    }

    /// Receive until the stream closes
    pub async fn collect_all(&self) -> Vec<T> {
        let mut items = Vec::new();
        while let Some(item) = self.recv().await {
            items.push(item);
        }
        items
    }

    /// Adapt into a `futures` stream that ends when this stream closes
    pub fn into_stream(self) -> BoxStream<'static, T> {
        let stream = stream! {
            while let Some(item) = self.recv().await {
                yield item;
            }
        };

        Box::pin(stream)
    }
}

impl<T> fmt::Debug for Receiver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Receiver")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}
