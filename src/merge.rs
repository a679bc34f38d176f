//! Fan-in: combine several streams into one
//!
//! Every source gets a forwarding task that copies its values onto a shared
//! output. A coordinator task waits on a [`CompletionBarrier`] for all
//! forwarders to finish and only then closes the output, so the merged
//! stream closes exactly once no matter how many sources fed it.

use crate::barrier::CompletionBarrier;
use crate::cancel::CancellationToken;
use crate::channel::{self, Receiver, Sender};
use crate::stream_configuration::StreamConfig;

/// Merge `sources` into a single stream.
///
/// Values from one source keep their order; values from different sources
/// interleave in arrival order. The result closes after every source has
/// closed, or once `token` is cancelled and the forwarders have stopped.
/// With no sources the result is already closed.
///
/// # Examples
/// ```
/// use fanout_stream::{merge, source_stream, CancellationToken};
///
/// # #[tokio::main]
/// # async fn main() {
/// let token = CancellationToken::new();
/// let a = source_stream(token.clone(), vec![1, 2]);
/// let b = source_stream(token.clone(), vec![3]);
///
/// let mut merged = merge(token, vec![a, b]).collect_all().await;
/// merged.sort();
/// assert_eq!(merged, vec![1, 2, 3]);
/// # }
/// ```
pub fn merge<T>(token: CancellationToken, sources: Vec<Receiver<T>>) -> Receiver<T>
where
    T: Send + 'static,
{
    merge_with_config(token, sources, &StreamConfig::default())
}

/// [`merge`] with an explicit output buffer size
pub fn merge_with_config<T>(
    token: CancellationToken,
    sources: Vec<Receiver<T>>,
    config: &StreamConfig,
) -> Receiver<T>
where
    T: Send + 'static,
{
    let (tx, rx) = channel::with_config(config);
    let barrier = CompletionBarrier::new(sources.len());

    for (index, source) in sources.into_iter().enumerate() {
        let out = tx.fork();
        let guard = barrier.guard();
        let token = token.clone();

        tokio::spawn(async move {
            forward(index, &token, source, out).await;
            // Arrive only after the fork is dropped inside `forward`
            guard.arrive();
        });
    }

    tokio::spawn(coordinate(barrier, tx));

    rx
}

async fn forward<T>(index: usize, token: &CancellationToken, source: Receiver<T>, out: Sender<T>)
where
    T: Send + 'static,
{
    let mut forwarded = 0usize;
    while let Some(item) = source.recv_or_cancel(token).await {
        if out.send_or_cancel(token, item).await.is_err() {
            break;
        }
        forwarded += 1;
    }
    log::debug!("Merge source {} finished after {} items", index, forwarded);
}

async fn coordinate<T>(barrier: CompletionBarrier, mut tx: Sender<T>)
where
    T: Send + 'static,
{
    barrier.wait().await;
    tx.close();
    log::debug!("Merged stream closed after {} sources", barrier.parties());
}
