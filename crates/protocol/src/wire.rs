//! Wire protocol for the live feed
//!
//! Defines the message types exchanged between the feed server and tailing
//! clients. Uses a simple length-prefixed binary format so non-Rust clients
//! can speak it without a serialization framework.
//!
//! # Wire Format
//!
//! All messages are length-prefixed:
//! ```text
//! ┌──────────────┬─────────────────────────────────────┐
//! │ 4 bytes      │ N bytes                             │
//! │ length (BE)  │ payload                             │
//! └──────────────┴─────────────────────────────────────┘
//! ```
//!
//! # Message Types
//!
//! - `Subscribe` (0x01): Client → Server, open a filtered tail
//! - `Event` (0x02): Server → Client, one event in sequence order
//! - `Gap` (0x03): Server → Client, the client's cursor fell behind the
//!   retained window and `dropped` events were evicted unread
//! - `Heartbeat` (0x04): Server → Client, keep-alive
//! - `Error` (0x05): Server → Client, error message

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::change::ChangeType;
use crate::error::ProtocolError;
use crate::event::Event;
use crate::Result;

/// Message type discriminants
const MSG_SUBSCRIBE: u8 = 0x01;
const MSG_EVENT: u8 = 0x02;
const MSG_GAP: u8 = 0x03;
const MSG_HEARTBEAT: u8 = 0x04;
const MSG_ERROR: u8 = 0x05;

/// Messages exchanged between the feed server and clients
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    /// Client → Server: open a filtered tail
    Subscribe(SubscribeRequest),
    /// Server → Client: one event
    Event(EventFrame),
    /// Server → Client: events were evicted before delivery
    Gap { dropped: u64 },
    /// Server → Client: keep-alive ping
    Heartbeat,
    /// Server → Client: error message
    Error(String),
}

/// Where a new tail starts reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartPosition {
    /// Only events appended after the session opens
    #[default]
    Live,
    /// Replay everything still retained, then go live
    Oldest,
}

impl StartPosition {
    /// Convert to raw wire value
    #[inline]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Live => 0,
            Self::Oldest => 1,
        }
    }

    /// Parse from raw wire value
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Live),
            1 => Some(Self::Oldest),
            _ => None,
        }
    }
}

/// Subscription request from a tailing client
///
/// Filters are optional; `None` (or an empty string on the wire) means
/// "match all" on that field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubscribeRequest {
    /// Filter by watched kind (None = all resources)
    pub resource: Option<String>,
    /// Filter by namespace (None = all namespaces)
    pub namespace: Option<String>,
    /// Where to start reading
    pub start: StartPosition,
}

impl SubscribeRequest {
    /// Create a request with no filters, starting at the live edge
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resource filter
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Set the namespace filter
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the start position
    pub fn with_start(mut self, start: StartPosition) -> Self {
        self.start = start;
        self
    }

    fn encode(&self, buf: &mut BytesMut) {
        encode_option_string(&self.resource, buf);
        encode_option_string(&self.namespace, buf);
        buf.put_u8(self.start.as_u8());
    }

    fn decode(buf: &mut Bytes) -> Result<Self> {
        let resource = decode_option_string(buf)?;
        let namespace = decode_option_string(buf)?;

        if buf.remaining() < 1 {
            return Err(ProtocolError::Malformed(
                "truncated subscribe request".into(),
            ));
        }
        let raw = buf.get_u8();
        let start = StartPosition::from_u8(raw).ok_or(ProtocolError::InvalidStartPosition(raw))?;

        Ok(Self {
            resource,
            namespace,
            start,
        })
    }
}

/// One event as sent to tailing clients
///
/// Carries the full stored event; the payload is forwarded verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct EventFrame {
    /// Sequence number assigned by the log
    pub sequence: u64,
    /// Watched kind tag
    pub resource: String,
    /// Change type
    pub change: ChangeType,
    /// Object namespace (empty for cluster-scoped objects)
    pub namespace: String,
    /// Object name
    pub name: String,
    /// Observation timestamp, milliseconds since the Unix epoch
    pub observed_at_ms: i64,
    /// Opaque payload (untouched)
    pub payload: Bytes,
}

impl From<&Event> for EventFrame {
    fn from(event: &Event) -> Self {
        Self {
            sequence: event.sequence(),
            resource: event.resource().to_string(),
            change: event.change(),
            namespace: event.namespace().to_string(),
            name: event.name().to_string(),
            observed_at_ms: event.observed_at().timestamp_millis(),
            payload: event.payload().clone(),
        }
    }
}

impl EventFrame {
    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64(self.sequence);
        encode_string(&self.resource, buf);
        buf.put_u8(self.change.as_u8());
        encode_string(&self.namespace, buf);
        encode_string(&self.name, buf);
        buf.put_i64(self.observed_at_ms);
        buf.put_u32(self.payload.len() as u32);
        buf.put_slice(&self.payload);
    }

    fn decode(buf: &mut Bytes) -> Result<Self> {
        if buf.remaining() < 8 {
            return Err(ProtocolError::Malformed("truncated event frame".into()));
        }
        let sequence = buf.get_u64();

        let resource = decode_string(buf)?;

        if buf.remaining() < 1 {
            return Err(ProtocolError::Malformed("truncated event frame".into()));
        }
        let raw = buf.get_u8();
        let change = ChangeType::from_u8(raw).ok_or(ProtocolError::InvalidChangeType(raw))?;

        let namespace = decode_string(buf)?;
        let name = decode_string(buf)?;

        if buf.remaining() < 8 {
            return Err(ProtocolError::Malformed("truncated event frame".into()));
        }
        let observed_at_ms = buf.get_i64();

        if buf.remaining() < 4 {
            return Err(ProtocolError::Malformed("truncated event frame".into()));
        }
        let payload_len = buf.get_u32() as usize;
        if buf.remaining() < payload_len {
            return Err(ProtocolError::Malformed("truncated payload".into()));
        }
        let payload = buf.split_to(payload_len);

        Ok(Self {
            sequence,
            resource,
            change,
            namespace,
            name,
            observed_at_ms,
            payload,
        })
    }
}

impl FeedMessage {
    /// Encode message to bytes with length prefix
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(256);

        // Reserve space for length prefix (filled in at end)
        buf.put_u32(0);

        match self {
            FeedMessage::Subscribe(req) => {
                buf.put_u8(MSG_SUBSCRIBE);
                req.encode(&mut buf);
            }
            FeedMessage::Event(frame) => {
                buf.put_u8(MSG_EVENT);
                frame.encode(&mut buf);
            }
            FeedMessage::Gap { dropped } => {
                buf.put_u8(MSG_GAP);
                buf.put_u64(*dropped);
            }
            FeedMessage::Heartbeat => {
                buf.put_u8(MSG_HEARTBEAT);
            }
            FeedMessage::Error(msg) => {
                buf.put_u8(MSG_ERROR);
                encode_string(msg, &mut buf);
            }
        }

        // Write length prefix (excluding the 4-byte length field itself)
        let len = (buf.len() - 4) as u32;
        buf[0..4].copy_from_slice(&len.to_be_bytes());

        buf.freeze()
    }

    /// Decode message from bytes (without length prefix)
    ///
    /// Expects the payload after the length prefix has been read.
    pub fn decode(mut buf: Bytes) -> Result<Self> {
        if buf.is_empty() {
            return Err(ProtocolError::Malformed("empty message".into()));
        }

        let msg_type = buf.get_u8();

        match msg_type {
            MSG_SUBSCRIBE => {
                let req = SubscribeRequest::decode(&mut buf)?;
                Ok(FeedMessage::Subscribe(req))
            }
            MSG_EVENT => {
                let frame = EventFrame::decode(&mut buf)?;
                Ok(FeedMessage::Event(frame))
            }
            MSG_GAP => {
                if buf.remaining() < 8 {
                    return Err(ProtocolError::Malformed("truncated gap message".into()));
                }
                Ok(FeedMessage::Gap {
                    dropped: buf.get_u64(),
                })
            }
            MSG_HEARTBEAT => Ok(FeedMessage::Heartbeat),
            MSG_ERROR => {
                let msg = decode_string(&mut buf)?;
                Ok(FeedMessage::Error(msg))
            }
            other => Err(ProtocolError::UnknownMessage(other)),
        }
    }
}

// ============================================================================
// Encoding helpers
// ============================================================================

fn encode_string(s: &str, buf: &mut BytesMut) {
    let bytes = s.as_bytes();
    buf.put_u32(bytes.len() as u32);
    buf.put_slice(bytes);
}

fn decode_string(buf: &mut Bytes) -> Result<String> {
    if buf.remaining() < 4 {
        return Err(ProtocolError::Malformed("truncated string length".into()));
    }
    let len = buf.get_u32() as usize;
    if buf.remaining() < len {
        return Err(ProtocolError::Malformed("truncated string".into()));
    }
    let bytes = buf.split_to(len);
    String::from_utf8(bytes.to_vec())
        .map_err(|e| ProtocolError::Malformed(format!("invalid UTF-8: {e}")))
}

fn encode_option_string(opt: &Option<String>, buf: &mut BytesMut) {
    match opt {
        Some(s) => {
            buf.put_u8(1);
            encode_string(s, buf);
        }
        None => buf.put_u8(0),
    }
}

fn decode_option_string(buf: &mut Bytes) -> Result<Option<String>> {
    if buf.remaining() < 1 {
        return Err(ProtocolError::Malformed("truncated option".into()));
    }
    if buf.get_u8() == 0 {
        return Ok(None);
    }
    Ok(Some(decode_string(buf)?))
}

/// Read exactly 4 bytes for length prefix
pub fn read_length_prefix(buf: &[u8]) -> Option<u32> {
    if buf.len() < 4 {
        return None;
    }
    Some(u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]))
}
