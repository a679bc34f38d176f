//! Error types for stream distribution
//!
//! Cancellation and closure are not errors in this crate: stages simply close
//! their output. The types here cover configuration mistakes and the values
//! handed back by a failed send.

use std::fmt;

/// Main error type for fan-out/fan-in operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StreamError {
    /// Replica count must be at least one
    #[error("Invalid replica count {0}: at least one replica is required")]
    InvalidReplicas(usize),
    /// Any other rejected configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Operation was cancelled
    #[error("Operation cancelled")]
    Cancelled,
    /// Stream has been closed
    #[error("Stream is closed")]
    Closed,
}

/// Result type for stream operations
pub type StreamResult<T> = Result<T, StreamError>;

/// Returned by a send that could not deliver its value.
///
/// The undelivered value is handed back in both cases.
#[derive(PartialEq, Eq)]
pub enum SendError<T> {
    /// The sender was closed, or every receiver has been dropped
    Closed(T),
    /// The cancellation token fired before the value was accepted
    Cancelled(T),
}

impl<T> SendError<T> {
    /// Recover the value that was not sent
    pub fn into_inner(self) -> T {
        match self {
            SendError::Closed(value) | SendError::Cancelled(value) => value,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SendError::Cancelled(_))
    }
}

// Hand-written so that `T` does not need to be `Debug`
impl<T> fmt::Debug for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::Closed(_) => f.write_str("Closed(..)"),
            SendError::Cancelled(_) => f.write_str("Cancelled(..)"),
        }
    }
}

impl<T> fmt::Display for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::Closed(_) => write!(f, "Send failed: stream is closed"),
            SendError::Cancelled(_) => write!(f, "Send failed: operation cancelled"),
        }
    }
}

impl<T> std::error::Error for SendError<T> {}

impl<T> From<SendError<T>> for StreamError {
    fn from(err: SendError<T>) -> Self {
        match err {
            SendError::Closed(_) => StreamError::Closed,
            SendError::Cancelled(_) => StreamError::Cancelled,
        }
    }
}
