//! Event - immutable record of one observed change
//!
//! The `Event` struct is the core data type of the feed. The log creates it
//! from an `EventRecord` at append time, stamping the sequence number and
//! observation timestamp; from then on it never changes and is shared with
//! consumers as `Arc<Event>`. The payload rides along as reference-counted
//! `Bytes`, so fan-out to many sessions never copies it.

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::change::ChangeType;

/// An immutable recorded change with a unique, monotonic sequence number
#[derive(Debug, Clone)]
pub struct Event {
    /// Assigned by the log at append time; unique, never reused
    sequence: u64,

    /// Watched kind tag, e.g. "Pod"
    resource: String,

    /// What happened to the object
    change: ChangeType,

    /// Object namespace; empty for cluster-scoped objects
    namespace: String,

    /// Object name; empty when the source did not provide one
    name: String,

    /// When the event entered the log (not the source's own timestamp)
    observed_at: DateTime<Utc>,

    /// Opaque caller-supplied data; stored and forwarded, never inspected
    payload: Bytes,
}

impl Event {
    /// Assemble a stored event from its record
    ///
    /// Only the log calls this: `sequence` and `observed_at` belong to the
    /// log, not to the caller that produced the record.
    pub fn from_record(record: EventRecord, sequence: u64, observed_at: DateTime<Utc>) -> Self {
        Self {
            sequence,
            resource: record.resource,
            change: record.change,
            namespace: record.namespace,
            name: record.name,
            observed_at,
            payload: record.payload,
        }
    }

    /// Get the sequence number
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Get the watched kind tag
    #[inline]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Get the change type
    #[inline]
    pub fn change(&self) -> ChangeType {
        self.change
    }

    /// Get the object namespace (empty for cluster-scoped objects)
    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Get the object name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the observation timestamp
    #[inline]
    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    /// Get the raw payload
    #[inline]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }
}

/// The caller-supplied portion of an event
///
/// A record carries everything except the sequence number and timestamp,
/// which the log assigns at append time.
#[derive(Debug, Clone)]
pub struct EventRecord {
    /// Watched kind tag, e.g. "Pod"
    pub resource: String,
    /// What happened to the object
    pub change: ChangeType,
    /// Object namespace; empty for cluster-scoped objects
    pub namespace: String,
    /// Object name
    pub name: String,
    /// Opaque payload bytes
    pub payload: Bytes,
}

impl EventRecord {
    /// Create a record with empty object identity and payload
    pub fn new(resource: impl Into<String>, change: ChangeType) -> Self {
        Self {
            resource: resource.into(),
            change,
            namespace: String::new(),
            name: String::new(),
            payload: Bytes::new(),
        }
    }

    /// Set the affected object's identity
    pub fn with_object(mut self, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self.name = name.into();
        self
    }

    /// Attach the opaque payload
    pub fn with_payload(mut self, payload: Bytes) -> Self {
        self.payload = payload;
        self
    }
}
