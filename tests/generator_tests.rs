use fanout_stream::generator::{fibonacci, unfold};
use fanout_stream::{CancellationToken, StreamConfig};
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
async fn test_fibonacci_prefix() {
    let token = CancellationToken::new();
    let stream = fibonacci(token.clone(), &StreamConfig::default());

    let mut values = Vec::new();
    for _ in 0..10 {
        values.push(stream.recv().await.unwrap());
    }
    assert_eq!(values, vec![0, 1, 1, 2, 3, 5, 8, 13, 21, 34]);
    token.cancel();
}

#[tokio::test]
async fn test_fibonacci_ends_before_overflow() {
    let token = CancellationToken::new();
    let values = fibonacci(token, &StreamConfig::new().buffer_size(16))
        .collect_all()
        .await;

    // F(0) through F(93) fit in a u64
    assert_eq!(values.len(), 94);
    assert_eq!(values.last(), Some(&12200160415121876738));
}

#[tokio::test]
async fn test_cancel_closes_generator() {
    let token = CancellationToken::new();
    let stream = fibonacci(token.clone(), &StreamConfig::default());

    for _ in 0..5 {
        stream.recv().await.unwrap();
    }
    token.cancel();

    let rest = timeout(Duration::from_secs(1), stream.collect_all())
        .await
        .expect("generator should close after cancel");
    assert!(rest.len() <= 1);
}

#[tokio::test]
async fn test_buffered_generator_keeps_buffered_values() {
    let token = CancellationToken::new();
    let stream = fibonacci(token.clone(), &StreamConfig::new().buffer_size(5));

    tokio::time::sleep(Duration::from_millis(20)).await;
    token.cancel();

    // The five values produced ahead of time are still delivered
    let rest = stream.collect_all().await;
    assert_eq!(rest, vec![0, 1, 1, 2, 3]);
}

#[tokio::test]
async fn test_timeout_closes_generator() {
    let token = CancellationToken::with_timeout(Duration::from_millis(20));
    let stream = fibonacci(token.clone(), &StreamConfig::default());

    let mut count = 0;
    let drained = timeout(Duration::from_secs(1), async {
        while stream.recv_or_cancel(&token).await.is_some() {
            count += 1;
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await;

    assert!(drained.is_ok());
    assert!(count < 94);
}

#[tokio::test]
async fn test_unfold_finite_sequence() {
    let token = CancellationToken::new();
    let stream = unfold(token, &StreamConfig::default(), 1u32, |n| {
        if n > 100 {
            None
        } else {
            Some((n, n * 2))
        }
    });
    assert_eq!(stream.collect_all().await, vec![1, 2, 4, 8, 16, 32, 64]);
}
