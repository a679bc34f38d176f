use fanout_stream::{DistributeConfig, StreamConfig, StreamError, WorkerConfig};

#[test]
fn test_defaults() {
    assert_eq!(StreamConfig::default().buffer_size, 1);

    let worker = WorkerConfig::default();
    assert!(worker.use_blocking);
    assert_eq!(worker.output, StreamConfig::default());

    let distribute = DistributeConfig::default();
    assert_eq!(distribute.replicas, num_cpus::get());
    assert!(distribute.validate().is_ok());
}

#[test]
fn test_builders() {
    let config = DistributeConfig::new().replicas(3).output_buffer_size(16);
    assert_eq!(config.replicas, 3);
    assert_eq!(config.output.buffer_size, 16);

    let worker = WorkerConfig::new().use_blocking(false).output_buffer_size(0);
    assert!(!worker.use_blocking);
    assert_eq!(worker.output.buffer_size, 0);
}

#[test]
fn test_zero_replicas_invalid() {
    let config = DistributeConfig::new().replicas(0);
    assert_eq!(config.validate(), Err(StreamError::InvalidReplicas(0)));
}

#[test]
fn test_from_json() {
    let config = DistributeConfig::from_json(r#"{"replicas": 4, "output": {"buffer_size": 32}}"#).unwrap();
    assert_eq!(config.replicas, 4);
    assert_eq!(config.output.buffer_size, 32);

    // Missing fields fall back to defaults
    let config = DistributeConfig::from_json(r#"{"replicas": 2}"#).unwrap();
    assert_eq!(config.output, StreamConfig::default());
}

#[test]
fn test_from_json_rejects_bad_input() {
    assert_eq!(
        DistributeConfig::from_json(r#"{"replicas": 0}"#),
        Err(StreamError::InvalidReplicas(0))
    );
    assert!(matches!(
        DistributeConfig::from_json("not json"),
        Err(StreamError::InvalidConfiguration(_))
    ));
}
