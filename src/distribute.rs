//! Fan-out: run several replicas of one worker over a shared input
//!
//! Every replica is handed a clone of the same [`Receiver`]. Because each
//! value goes to exactly one receiver, an idle replica simply picks up the
//! next value, which balances load without any scheduler. The replica
//! outputs are then combined with [`merge`].

use crate::cancel::CancellationToken;
use crate::channel::Receiver;
use crate::error::{StreamError, StreamResult};
use crate::merge::{merge, merge_with_config};
use crate::stream_configuration::DistributeConfig;
use crate::worker::Worker;

/// Run `replicas` copies of `worker` against `input` and merge their results.
///
/// Fails with [`StreamError::InvalidReplicas`] before spawning anything if
/// `replicas` is zero. Replicas beyond the number of available values see
/// the input close and exit.
///
/// # Examples
/// ```
/// use fanout_stream::{distribute, map_worker, source_stream, CancellationToken};
///
/// # #[tokio::main]
/// # async fn main() {
/// let token = CancellationToken::new();
/// let input = source_stream(token.clone(), 1u64..=4);
///
/// let output = distribute(token, input, map_worker(|x: u64| x * x), 2).unwrap();
/// let mut squares = output.collect_all().await;
/// squares.sort();
/// assert_eq!(squares, vec![1, 4, 9, 16]);
/// # }
/// ```
pub fn distribute<T, U, W>(
    token: CancellationToken,
    input: Receiver<T>,
    worker: W,
    replicas: usize,
) -> StreamResult<Receiver<U>>
where
    T: Send + 'static,
    U: Send + 'static,
    W: Worker<T, U>,
{
    if replicas == 0 {
        return Err(StreamError::InvalidReplicas(replicas));
    }

    let outputs = spawn_replicas(&token, &input, &worker, replicas);
    Ok(merge(token, outputs))
}

/// [`distribute`] driven by a [`DistributeConfig`]
pub fn distribute_with_config<T, U, W>(
    token: CancellationToken,
    input: Receiver<T>,
    worker: W,
    config: &DistributeConfig,
) -> StreamResult<Receiver<U>>
where
    T: Send + 'static,
    U: Send + 'static,
    W: Worker<T, U>,
{
    config.validate()?;

    let outputs = spawn_replicas(&token, &input, &worker, config.replicas);
    Ok(merge_with_config(token, outputs, &config.output))
}

fn spawn_replicas<T, U, W>(
    token: &CancellationToken,
    input: &Receiver<T>,
    worker: &W,
    replicas: usize,
) -> Vec<Receiver<U>>
where
    T: Send + 'static,
    U: Send + 'static,
    W: Worker<T, U>,
{
    log::debug!("Distributing input across {} replicas", replicas);
    (0..replicas)
        .map(|_| worker.run(token.clone(), input.clone()))
        .collect()
}

/// Extension trait for fanning a stream out to worker replicas
pub trait DistributeExt<T> {
    /// Process this stream with `replicas` copies of `worker`
    fn distribute<U, W>(
        self,
        token: CancellationToken,
        worker: W,
        replicas: usize,
    ) -> StreamResult<Receiver<U>>
    where
        U: Send + 'static,
        W: Worker<T, U>;

    /// Process this stream as described by `config`
    fn distribute_with_config<U, W>(
        self,
        token: CancellationToken,
        worker: W,
        config: &DistributeConfig,
    ) -> StreamResult<Receiver<U>>
    where
        U: Send + 'static,
        W: Worker<T, U>;
}

impl<T> DistributeExt<T> for Receiver<T>
where
    T: Send + 'static,
{
    fn distribute<U, W>(
        self,
        token: CancellationToken,
        worker: W,
        replicas: usize,
    ) -> StreamResult<Receiver<U>>
    where
        U: Send + 'static,
        W: Worker<T, U>,
    {
        distribute(token, self, worker, replicas)
    }

    fn distribute_with_config<U, W>(
        self,
        token: CancellationToken,
        worker: W,
        config: &DistributeConfig,
    ) -> StreamResult<Receiver<U>>
    where
        U: Send + 'static,
        W: Worker<T, U>,
    {
        distribute_with_config(token, self, worker, config)
    }
}
