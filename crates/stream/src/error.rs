//! Error types for the stream crate

use std::io;
use thiserror::Error;

use kfeed_protocol::ProtocolError;

/// Errors that can occur in the event log and feed server
#[derive(Debug, Error)]
pub enum StreamError {
    /// Log capacity must be at least one entry; reported at construction,
    /// never at call time
    #[error("event log capacity must be greater than zero")]
    InvalidCapacity,

    /// I/O error (socket operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Wire protocol error (malformed messages)
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Client opened a connection without a subscribe handshake
    #[error("expected subscribe message")]
    ExpectedSubscribe,
}

/// Result type for stream operations
pub type Result<T> = std::result::Result<T, StreamError>;
