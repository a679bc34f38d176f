//! Cancellable fan-out/fan-in streams for Tokio
//!
//! A single input stream is consumed by several competing worker replicas
//! ([`distribute`]) and their outputs are recombined into one stream
//! ([`merge`]), with a shared [`CancellationToken`] able to stop every
//! stage at once.
//!
//! ```
//! use fanout_stream::{distribute, map_worker, source_stream, CancellationToken};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let token = CancellationToken::new();
//! let input = source_stream(token.clone(), vec![1u64, 2, 3, 4, 5]);
//! let doubled = distribute(token, input, map_worker(|x: u64| x * 2), 3).unwrap();
//!
//! let mut results = doubled.collect_all().await;
//! results.sort();
//! assert_eq!(results, vec![2, 4, 6, 8, 10]);
//! # }
//! ```

pub mod barrier;
pub mod cancel;
pub mod channel;
pub mod distribute;
pub mod error;
pub mod generator;
pub mod merge;
pub mod pipe;
pub mod source;
pub mod stream_configuration;
pub mod worker;

pub use barrier::CompletionBarrier;
pub use cancel::CancellationToken;
pub use channel::{bounded, Receiver, Sender};
pub use distribute::{distribute, distribute_with_config, DistributeExt};
pub use error::{SendError, StreamError, StreamResult};
pub use merge::{merge, merge_with_config};
pub use source::{source_stream, source_stream_with_config};
pub use stream_configuration::{DistributeConfig, StreamConfig, WorkerConfig};
pub use worker::{map_worker, map_worker_async, AsyncMapWorker, MapWorker, Worker};
