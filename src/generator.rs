//! Self-pacing generators
//!
//! A generator task computes the next value only once the previous one has
//! been accepted by the stream, so a small buffer keeps it just ahead of
//! its consumer. It stops when the token is cancelled, when every receiver
//! is dropped, or when the step function ends the sequence.

use crate::cancel::CancellationToken;
use crate::channel::{self, Receiver};
use crate::stream_configuration::StreamConfig;

/// Emit values produced by repeatedly applying `f` to a state.
///
/// `f` returns the next value together with the following state, or `None`
/// to end the stream.
///
/// # Examples
/// ```
/// use fanout_stream::{generator::unfold, CancellationToken, StreamConfig};
///
/// # #[tokio::main]
/// # async fn main() {
/// let token = CancellationToken::new();
/// let countdown = unfold(token, &StreamConfig::default(), 3u32, |n| {
///     if n == 0 { None } else { Some((n, n - 1)) }
/// });
/// assert_eq!(countdown.collect_all().await, vec![3, 2, 1]);
/// # }
/// ```
pub fn unfold<S, T, F>(
    token: CancellationToken,
    config: &StreamConfig,
    init: S,
    mut f: F,
) -> Receiver<T>
where
    S: Send + 'static,
    T: Send + 'static,
    F: FnMut(S) -> Option<(T, S)> + Send + 'static,
{
    let (tx, rx) = channel::with_config(config);

    tokio::spawn(async move {
        let mut state = init;
        let mut emitted = 0u64;
        loop {
            let Some((item, next)) = f(state) else {
                break;
            };
            if tx.send_or_cancel(&token, item).await.is_err() {
                break;
            }
            state = next;
            emitted += 1;
        }
        log::debug!(
            "Generator closed after {} items (cancelled: {})",
            emitted,
            token.is_cancelled()
        );
    });

    rx
}

/// The Fibonacci sequence 0, 1, 1, 2, 3, ...
///
/// Ends after the largest value that fits in a `u64`.
pub fn fibonacci(token: CancellationToken, config: &StreamConfig) -> Receiver<u64> {
    unfold(token, config, (Some(0u64), Some(1u64)), |(a, b)| {
        let a = a?;
        let next = b.and_then(|b| a.checked_add(b));
        Some((a, (b, next)))
    })
}
