//! Tests for Event and EventRecord

use bytes::Bytes;
use chrono::Utc;

use crate::change::ChangeType;
use crate::event::{Event, EventRecord};

// =============================================================================
// EventRecord construction
// =============================================================================

#[test]
fn test_record_new_defaults() {
    let record = EventRecord::new("Pod", ChangeType::Added);

    assert_eq!(record.resource, "Pod");
    assert_eq!(record.change, ChangeType::Added);
    assert!(record.namespace.is_empty());
    assert!(record.name.is_empty());
    assert!(record.payload.is_empty());
}

#[test]
fn test_record_builders() {
    let record = EventRecord::new("Service", ChangeType::Modified)
        .with_object("default", "api-gateway")
        .with_payload(Bytes::from_static(b"{\"spec\":{}}"));

    assert_eq!(record.namespace, "default");
    assert_eq!(record.name, "api-gateway");
    assert_eq!(record.payload.as_ref(), b"{\"spec\":{}}");
}

// =============================================================================
// Event assembly
// =============================================================================

#[test]
fn test_from_record_stamps_sequence_and_time() {
    let now = Utc::now();
    let record = EventRecord::new("Pod", ChangeType::Deleted).with_object("kube-system", "dns-1");

    let event = Event::from_record(record, 42, now);

    assert_eq!(event.sequence(), 42);
    assert_eq!(event.resource(), "Pod");
    assert_eq!(event.change(), ChangeType::Deleted);
    assert_eq!(event.namespace(), "kube-system");
    assert_eq!(event.name(), "dns-1");
    assert_eq!(event.observed_at(), now);
}

#[test]
fn test_payload_is_shared_not_copied() {
    let payload = Bytes::from(vec![7u8; 1024]);
    let record = EventRecord::new("Pod", ChangeType::Added).with_payload(payload.clone());
    let event = Event::from_record(record, 0, Utc::now());

    // Same underlying allocation
    assert_eq!(event.payload().as_ptr(), payload.as_ptr());
}
