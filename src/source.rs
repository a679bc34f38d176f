//! Streams built from in-memory sequences

use crate::cancel::CancellationToken;
use crate::channel::{self, Receiver};
use crate::stream_configuration::StreamConfig;

/// Emit `items` in order on a new stream, then close it.
///
/// Each send races `token`; once it fires the remaining items are dropped
/// and the stream closes.
///
/// # Examples
/// ```
/// use fanout_stream::{source_stream, CancellationToken};
///
/// # #[tokio::main]
/// # async fn main() {
/// let token = CancellationToken::new();
/// let stream = source_stream(token, vec![1, 2, 3]);
/// assert_eq!(stream.collect_all().await, vec![1, 2, 3]);
/// # }
/// ```
pub fn source_stream<I, T>(token: CancellationToken, items: I) -> Receiver<T>
where
    I: IntoIterator<Item = T> + Send + 'static,
    <I as IntoIterator>::IntoIter: Send,
    T: Send + 'static,
{
    source_stream_with_config(token, items, &StreamConfig::default())
}

/// [`source_stream`] with an explicit buffer size
pub fn source_stream_with_config<I, T>(
    token: CancellationToken,
    items: I,
    config: &StreamConfig,
) -> Receiver<T>
where
    I: IntoIterator<Item = T> + Send + 'static,
    <I as IntoIterator>::IntoIter: Send,
    T: Send + 'static,
{
    let (tx, rx) = channel::with_config(config);

    tokio::spawn(async move {
        let mut emitted = 0usize;
        for item in items {
            if tx.send_or_cancel(&token, item).await.is_err() {
                break;
            }
            emitted += 1;
        }
        log::debug!(
            "Source stream closed after {} items (cancelled: {})",
            emitted,
            token.is_cancelled()
        );
    });

    rx
}
