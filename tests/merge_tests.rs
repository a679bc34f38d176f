use fanout_stream::{bounded, merge, merge_with_config, source_stream, CancellationToken, StreamConfig};
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
async fn test_merge_no_sources_closes_immediately() {
    let token = CancellationToken::new();
    let merged = merge::<u32>(token, Vec::new());

    let next = timeout(Duration::from_secs(1), merged.recv())
        .await
        .expect("empty merge should close right away");
    assert_eq!(next, None);
}

#[tokio::test]
async fn test_merge_forwards_everything() {
    let token = CancellationToken::new();
    let sources = vec![
        source_stream(token.clone(), 0..100),
        source_stream(token.clone(), 100..200),
        source_stream(token.clone(), 200..300),
    ];

    let mut items = merge(token, sources).collect_all().await;
    items.sort();
    assert_eq!(items, (0..300).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_merge_preserves_order_within_source() {
    let token = CancellationToken::new();
    let sources = vec![
        source_stream(token.clone(), (0..50).map(|i| ('a', i))),
        source_stream(token.clone(), (0..50).map(|i| ('b', i))),
    ];

    let items = merge(token, sources).collect_all().await;
    for tag in ['a', 'b'] {
        let seq: Vec<_> = items.iter().filter(|(t, _)| *t == tag).map(|(_, i)| *i).collect();
        assert_eq!(seq, (0..50).collect::<Vec<_>>(), "source {} out of order", tag);
    }
}

#[tokio::test]
async fn test_merge_waits_for_every_source() {
    let token = CancellationToken::new();
    let (mut slow_tx, slow_rx) = bounded(1);
    let fast = source_stream(token.clone(), vec![1, 2]);

    let merged = merge(token, vec![fast, slow_rx]);

    let mut seen = vec![merged.recv().await.unwrap(), merged.recv().await.unwrap()];
    seen.sort();
    assert_eq!(seen, vec![1, 2]);

    // Fast source is done, but the slow one is still open
    assert!(timeout(Duration::from_millis(50), merged.recv()).await.is_err());

    slow_tx.send(3).await.unwrap();
    assert_eq!(merged.recv().await, Some(3));
    slow_tx.close();

    let end = timeout(Duration::from_secs(1), merged.recv())
        .await
        .expect("merge should close once the last source closes");
    assert_eq!(end, None);

    // Closed stays closed
    assert_eq!(merged.recv().await, None);
}

#[tokio::test]
async fn test_merge_single_source() {
    let token = CancellationToken::new();
    let merged = merge(token.clone(), vec![source_stream(token, vec![3, 1, 2])]);
    assert_eq!(merged.collect_all().await, vec![3, 1, 2]);
}

#[tokio::test]
async fn test_cancel_unblocks_parked_forwarders() {
    let token = CancellationToken::new();

    // Sources that never close, and nobody reads the merged output
    let mut senders = Vec::new();
    let mut sources = Vec::new();
    for _ in 0..3 {
        let (tx, rx) = bounded(1);
        senders.push(tx);
        sources.push(rx);
    }
    let merged = merge_with_config(token.clone(), sources, &StreamConfig::new().buffer_size(1));

    for (i, tx) in senders.iter().enumerate() {
        tx.send(i).await.unwrap();
    }
    tokio::time::sleep(Duration::from_millis(20)).await;

    token.cancel();

    let drained = timeout(Duration::from_secs(1), merged.collect_all())
        .await
        .expect("merge must close after cancellation even with open sources");
    assert!(drained.len() <= 1, "only the buffered value can remain: {:?}", drained);
}
