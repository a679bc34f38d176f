//! Linear operator pipelines
//!
//! An [`Operator`] is a function from one stream to another. Each built-in
//! operator spawns one task that owns its output, races every send against
//! the cancellation token, and closes the output when it exits.

use std::sync::Arc;
use std::time::Duration;

use crate::cancel::CancellationToken;
use crate::channel::{self, Receiver};
use crate::stream_configuration::StreamConfig;

/// A stream transformation from `Receiver<I>` to `Receiver<O>`
pub struct Operator<I, O> {
    f: Arc<dyn Fn(CancellationToken, Receiver<I>) -> Receiver<O> + Send + Sync + 'static>,
}

impl<I, O> Clone for Operator<I, O> {
    fn clone(&self) -> Self {
        Operator {
            f: Arc::clone(&self.f),
        }
    }
}

impl<I, O> Operator<I, O> {
    /// Create an operator from a function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(CancellationToken, Receiver<I>) -> Receiver<O> + Send + Sync + 'static,
    {
        Operator { f: Arc::new(f) }
    }

    /// Apply this operator to a stream
    pub fn apply(&self, token: CancellationToken, input: Receiver<I>) -> Receiver<O> {
        (self.f)(token, input)
    }
}

/// Apply `f` to every value
pub fn map<I, O, F>(f: F) -> Operator<I, O>
where
    F: Fn(I) -> O + Send + Sync + Clone + 'static,
    I: Send + 'static,
    O: Send + 'static,
{
    Operator::new(move |token: CancellationToken, input: Receiver<I>| {
        let f = f.clone();
        let (tx, rx) = channel::with_config(&StreamConfig::default());
        tokio::spawn(async move {
            while let Some(item) = input.recv_or_cancel(&token).await {
                if tx.send_or_cancel(&token, f(item)).await.is_err() {
                    break;
                }
            }
            log::debug!("Map operator closed");
        });
        rx
    })
}

/// Keep only the values matching `predicate`
pub fn filter<I, F>(predicate: F) -> Operator<I, I>
where
    F: Fn(&I) -> bool + Send + Sync + Clone + 'static,
    I: Send + 'static,
{
    Operator::new(move |token: CancellationToken, input: Receiver<I>| {
        let predicate = predicate.clone();
        let (tx, rx) = channel::with_config(&StreamConfig::default());
        tokio::spawn(async move {
            while let Some(item) = input.recv_or_cancel(&token).await {
                if !predicate(&item) {
                    continue;
                }
                if tx.send_or_cancel(&token, item).await.is_err() {
                    break;
                }
            }
            log::debug!("Filter operator closed");
        });
        rx
    })
}

/// Wait `period` before passing on each value
pub fn delay<I>(period: Duration) -> Operator<I, I>
where
    I: Send + 'static,
{
    Operator::new(move |token: CancellationToken, input: Receiver<I>| {
        let (tx, rx) = channel::with_config(&StreamConfig::default());
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(period) => {}
                }
                // Recheck the token after the delay
                let Some(item) = input.recv_or_cancel(&token).await else {
                    break;
                };
                if tx.send_or_cancel(&token, item).await.is_err() {
                    break;
                }
            }
            log::debug!("Delay operator closed");
        });
        rx
    })
}

/// Compose two operators together
pub fn compose<I, M, O>(first: Operator<I, M>, second: Operator<M, O>) -> Operator<I, O>
where
    I: Send + 'static,
    M: Send + 'static,
    O: Send + 'static,
{
    Operator::new(move |token: CancellationToken, input| {
        let middle = first.apply(token.clone(), input);
        second.apply(token, middle)
    })
}

/// Identity operator that passes the stream through untouched
pub fn identity<I>() -> Operator<I, I>
where
    I: Send + 'static,
{
    Operator::new(|_token, input| input)
}

/// Chain `operators` onto `source`, in order
pub fn pipeline<T>(
    token: CancellationToken,
    source: Receiver<T>,
    operators: impl IntoIterator<Item = Operator<T, T>>,
) -> Receiver<T>
where
    T: Send + 'static,
{
    operators
        .into_iter()
        .fold(source, |stream, operator| operator.apply(token.clone(), stream))
}

/// Consume `input` until it closes or `token` is cancelled, calling `f` on each value.
/// Returns the number of values seen.
pub async fn for_each<T, F>(token: &CancellationToken, input: Receiver<T>, mut f: F) -> usize
where
    T: Send + 'static,
    F: FnMut(T),
{
    let mut seen = 0;
    while let Some(item) = input.recv_or_cancel(token).await {
        f(item);
        seen += 1;
    }
    seen
}

/// Extension trait for composing operators
pub trait OperatorExt<I, O> {
    /// Compose this operator with another operator
    fn compose<P>(self, other: Operator<O, P>) -> Operator<I, P>
    where
        P: Send + 'static;
}

impl<I, O> OperatorExt<I, O> for Operator<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    fn compose<P>(self, other: Operator<O, P>) -> Operator<I, P>
    where
        P: Send + 'static,
    {
        compose(self, other)
    }
}
