//! API view types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kfeed_protocol::Event;

/// JSON view of one stored event
#[derive(Debug, Serialize)]
pub struct EventView {
    /// Sequence number assigned by the log
    pub sequence: u64,
    /// Watched kind tag
    pub resource: String,
    /// Change type name
    #[serde(rename = "type")]
    pub change: &'static str,
    /// Object namespace (empty for cluster-scoped objects)
    pub namespace: String,
    /// Object name
    pub name: String,
    /// When the event entered the log
    pub observed_at: DateTime<Utc>,
    /// Opaque payload; emitted verbatim when it is valid JSON, as a string
    /// otherwise, `null` when absent
    pub payload: serde_json::Value,
}

impl From<&Event> for EventView {
    fn from(event: &Event) -> Self {
        Self {
            sequence: event.sequence(),
            resource: event.resource().to_string(),
            change: event.change().as_str(),
            namespace: event.namespace().to_string(),
            name: event.name().to_string(),
            observed_at: event.observed_at(),
            payload: payload_to_json(event.payload()),
        }
    }
}

/// Render the opaque payload for JSON transport
///
/// The log never interprets payloads; this is purely a transport-layer
/// rendering decision.
fn payload_to_json(payload: &[u8]) -> serde_json::Value {
    if payload.is_empty() {
        return serde_json::Value::Null;
    }
    match serde_json::from_slice(payload) {
        Ok(value) => value,
        Err(_) => serde_json::Value::String(String::from_utf8_lossy(payload).into_owned()),
    }
}

/// Query parameters for the events endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventQuery {
    /// Filter by watched kind
    pub resource: Option<String>,
    /// Filter by namespace
    pub namespace: Option<String>,
    /// Filter by change type: added, modified, deleted
    #[serde(rename = "type")]
    pub change: Option<String>,
    /// At most N most recent events (0 = all)
    pub limit: Option<usize>,
}
