//! kfeed Protocol - Core event types for the kfeed event feed
//!
//! This crate provides the types that flow through the feed:
//! - `Event` - an immutable recorded change, shared via `Arc` after append
//! - `EventRecord` - the caller-supplied portion of an event before append
//! - `ChangeType` - Added, Modified, Deleted
//! - `FeedMessage` - the length-prefixed wire protocol for live tailing
//!
//! # Design Principles
//!
//! - **Immutable after append**: an `Event` never changes once the log has
//!   assigned its sequence number
//! - **Zero-copy payloads**: `bytes::Bytes` lets one payload fan out to any
//!   number of consumers without copying
//! - **Opaque payloads**: the feed stores and forwards payload bytes, it
//!   never inspects them

mod change;
mod error;
mod event;
mod wire;

pub use change::ChangeType;
pub use error::ProtocolError;
pub use event::{Event, EventRecord};
pub use wire::{EventFrame, FeedMessage, StartPosition, SubscribeRequest, read_length_prefix};

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

// Test modules - only compiled during testing
#[cfg(test)]
mod change_test;
#[cfg(test)]
mod event_test;
#[cfg(test)]
mod wire_test;
