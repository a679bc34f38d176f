use fanout_stream::{source_stream, source_stream_with_config, CancellationToken, StreamConfig};
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
async fn test_emits_in_order_then_closes() {
    let token = CancellationToken::new();
    let stream = source_stream(token, vec![40, 41, 42, 43, 44]);

    let items = timeout(Duration::from_secs(1), stream.collect_all())
        .await
        .expect("source should close after the last item");
    assert_eq!(items, vec![40, 41, 42, 43, 44]);
}

#[tokio::test]
async fn test_empty_source_closes_immediately() {
    let token = CancellationToken::new();
    let stream = source_stream(token, Vec::<u32>::new());
    assert_eq!(stream.recv().await, None);
}

#[tokio::test]
async fn test_cancel_stops_emission_and_closes() {
    let token = CancellationToken::new();
    let stream = source_stream(token.clone(), 0..1_000_000u64);

    assert_eq!(stream.recv().await, Some(0));
    assert_eq!(stream.recv().await, Some(1));
    token.cancel();

    // At most the buffered value is left, then the stream closes
    let rest = timeout(Duration::from_secs(1), stream.collect_all())
        .await
        .expect("source should close once cancelled");
    assert!(rest.len() <= 1, "remaining items were dropped, got {:?}", rest);
}

#[tokio::test]
async fn test_pre_cancelled_source_emits_nothing() {
    let token = CancellationToken::new();
    token.cancel();

    let stream = source_stream(token, vec![1, 2, 3]);
    assert_eq!(stream.collect_all().await, Vec::<i32>::new());
}

#[tokio::test]
async fn test_buffered_source_runs_ahead() {
    let token = CancellationToken::new();
    let stream = source_stream_with_config(token, 0..4, &StreamConfig::new().buffer_size(4));

    // Give the producer time to fill the buffer without a reader
    tokio::time::sleep(Duration::from_millis(20)).await;
    let buffered: Vec<_> = std::iter::from_fn(|| stream.try_recv()).collect();
    assert_eq!(buffered, vec![0, 1, 2, 3]);
}
