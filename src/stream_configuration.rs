//! Configuration types for stream distribution

use serde::{Deserialize, Serialize};

use crate::error::{StreamError, StreamResult};

/// Buffer configuration for a single stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Number of values a stream holds before `send` suspends. Zero is treated as one.
    pub buffer_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self { buffer_size: 1 }
    }
}

impl StreamConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the buffer size
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Capacity actually handed to the channel
    pub(crate) fn capacity(&self) -> usize {
        self.buffer_size.max(1)
    }
}

/// Configuration for the worker helpers in [`crate::worker`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Buffer of the worker's output stream
    pub output: StreamConfig,
    /// Whether to use spawn_blocking for CPU-intensive transforms
    pub use_blocking: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            output: StreamConfig::default(),
            use_blocking: true,
        }
    }
}

impl WorkerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_buffer_size(mut self, buffer_size: usize) -> Self {
        self.output = self.output.buffer_size(buffer_size);
        self
    }

    pub fn use_blocking(mut self, use_blocking: bool) -> Self {
        self.use_blocking = use_blocking;
        self
    }
}

/// Configuration for [`crate::distribute::distribute_with_config`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributeConfig {
    /// Number of worker replicas competing for the input
    pub replicas: usize,
    /// Buffer of the merged output stream
    pub output: StreamConfig,
}

impl Default for DistributeConfig {
    fn default() -> Self {
        Self {
            replicas: num_cpus::get(),
            output: StreamConfig::default(),
        }
    }
}

impl DistributeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of replicas
    pub fn replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    pub fn output_buffer_size(mut self, buffer_size: usize) -> Self {
        self.output = self.output.buffer_size(buffer_size);
        self
    }

    /// Reject configurations that cannot run. Called before any task is spawned.
    pub fn validate(&self) -> StreamResult<()> {
        if self.replicas == 0 {
            return Err(StreamError::InvalidReplicas(self.replicas));
        }
        Ok(())
    }

    /// Parse a configuration from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> StreamResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| StreamError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
