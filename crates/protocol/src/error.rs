//! Error types for the protocol crate

use thiserror::Error;

/// Errors that can occur while encoding or decoding feed messages
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Malformed or truncated wire data
    #[error("malformed message: {0}")]
    Malformed(String),

    /// Unknown message discriminant
    #[error("unknown message type: {0}")]
    UnknownMessage(u8),

    /// Change type byte outside the known range
    #[error("invalid change type: {0}")]
    InvalidChangeType(u8),

    /// Start position byte outside the known range
    #[error("invalid start position: {0}")]
    InvalidStartPosition(u8),
}
