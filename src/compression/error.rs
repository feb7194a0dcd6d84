//! Compression engine error types
//!
//! Every error here is a usage-contract violation detected locally; none are
//! transient, so callers should not retry without changing the input.

use thiserror::Error;

/// Errors that can occur while building or driving a compression session
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompressionError {
    /// Invalid deviation or max interval, raised at session construction
    #[error("Configuration error: {0}")]
    Config(String),

    /// A fed point does not strictly follow the previous one in time
    #[error("Out-of-order point: time {time} does not follow previous time {previous}")]
    Order { previous: f64, time: f64 },

    /// Operation not allowed in the session's current state
    #[error("Invalid session state: {0}")]
    State(&'static str),

    /// A fed point has a NaN or infinite coordinate
    #[error("Invalid point: time={time}, value={value} must both be finite")]
    InvalidPoint { time: f64, value: f64 },
}

/// Result type alias for compression operations
pub type CompressionResult<T> = Result<T, CompressionError>;
