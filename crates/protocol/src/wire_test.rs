//! Tests for the feed wire protocol

use bytes::{Buf, Bytes};

use crate::change::ChangeType;
use crate::error::ProtocolError;
use crate::wire::{EventFrame, FeedMessage, StartPosition, SubscribeRequest, read_length_prefix};

/// Strip the length prefix and decode, checking the prefix is consistent
fn decode_framed(encoded: Bytes) -> FeedMessage {
    let len = read_length_prefix(&encoded).unwrap() as usize;
    assert_eq!(encoded.len(), 4 + len);
    let mut payload = encoded;
    payload.advance(4);
    FeedMessage::decode(payload).unwrap()
}

fn sample_frame() -> EventFrame {
    EventFrame {
        sequence: 17,
        resource: "Pod".into(),
        change: ChangeType::Modified,
        namespace: "default".into(),
        name: "nginx-7d9c".into(),
        observed_at_ms: 1_722_470_400_123,
        payload: Bytes::from_static(b"{\"phase\":\"Running\"}"),
    }
}

// =============================================================================
// Framing
// =============================================================================

#[test]
fn test_length_prefix_matches_payload() {
    let encoded = FeedMessage::Heartbeat.encode();
    assert_eq!(read_length_prefix(&encoded), Some(1));
    assert_eq!(encoded.len(), 5);
}

#[test]
fn test_read_length_prefix_too_short() {
    assert_eq!(read_length_prefix(&[0, 0, 1]), None);
}

// =============================================================================
// Subscribe
// =============================================================================

#[test]
fn test_subscribe_round_trip_with_filters() {
    let request = SubscribeRequest::new()
        .with_resource("Pod")
        .with_namespace("kube-system")
        .with_start(StartPosition::Oldest);
    let msg = FeedMessage::Subscribe(request.clone());

    match decode_framed(msg.encode()) {
        FeedMessage::Subscribe(decoded) => assert_eq!(decoded, request),
        other => panic!("expected Subscribe, got {other:?}"),
    }
}

#[test]
fn test_subscribe_round_trip_match_all() {
    let request = SubscribeRequest::new();
    assert_eq!(request.start, StartPosition::Live);

    match decode_framed(FeedMessage::Subscribe(request.clone()).encode()) {
        FeedMessage::Subscribe(decoded) => {
            assert_eq!(decoded.resource, None);
            assert_eq!(decoded.namespace, None);
            assert_eq!(decoded.start, StartPosition::Live);
        }
        other => panic!("expected Subscribe, got {other:?}"),
    }
}

#[test]
fn test_subscribe_invalid_start_position() {
    // None resource, None namespace, start byte 9
    let payload = Bytes::from_static(&[0x01, 0, 0, 9]);
    match FeedMessage::decode(payload) {
        Err(ProtocolError::InvalidStartPosition(9)) => {}
        other => panic!("expected InvalidStartPosition, got {other:?}"),
    }
}

// =============================================================================
// Event frames
// =============================================================================

#[test]
fn test_event_frame_round_trip() {
    let frame = sample_frame();

    match decode_framed(FeedMessage::Event(frame.clone()).encode()) {
        FeedMessage::Event(decoded) => assert_eq!(decoded, frame),
        other => panic!("expected Event, got {other:?}"),
    }
}

#[test]
fn test_event_frame_empty_fields() {
    // Cluster-scoped object: empty namespace, empty payload
    let frame = EventFrame {
        sequence: 0,
        resource: "Node".into(),
        change: ChangeType::Added,
        namespace: String::new(),
        name: "worker-1".into(),
        observed_at_ms: 0,
        payload: Bytes::new(),
    };

    match decode_framed(FeedMessage::Event(frame.clone()).encode()) {
        FeedMessage::Event(decoded) => assert_eq!(decoded, frame),
        other => panic!("expected Event, got {other:?}"),
    }
}

#[test]
fn test_event_frame_invalid_change_type() {
    let mut encoded = FeedMessage::Event(sample_frame()).encode().to_vec();
    // Change byte sits right after the type byte, sequence, and resource
    // (4 prefix + 1 type + 8 sequence + 4 len + 3 "Pod")
    encoded[20] = 0xFF;
    let mut payload = Bytes::from(encoded);
    payload.advance(4);

    match FeedMessage::decode(payload) {
        Err(ProtocolError::InvalidChangeType(0xFF)) => {}
        other => panic!("expected InvalidChangeType, got {other:?}"),
    }
}

// =============================================================================
// Gap, Error, and malformed input
// =============================================================================

#[test]
fn test_gap_round_trip() {
    match decode_framed(FeedMessage::Gap { dropped: 12 }.encode()) {
        FeedMessage::Gap { dropped } => assert_eq!(dropped, 12),
        other => panic!("expected Gap, got {other:?}"),
    }
}

#[test]
fn test_error_round_trip() {
    match decode_framed(FeedMessage::Error("too many sessions".into()).encode()) {
        FeedMessage::Error(msg) => assert_eq!(msg, "too many sessions"),
        other => panic!("expected Error, got {other:?}"),
    }
}

#[test]
fn test_decode_empty_message() {
    assert!(FeedMessage::decode(Bytes::new()).is_err());
}

#[test]
fn test_decode_unknown_discriminant() {
    match FeedMessage::decode(Bytes::from_static(&[0x7F])) {
        Err(ProtocolError::UnknownMessage(0x7F)) => {}
        other => panic!("expected UnknownMessage, got {other:?}"),
    }
}

#[test]
fn test_decode_truncated_gap() {
    let payload = Bytes::from_static(&[0x03, 0, 0, 1]);
    assert!(FeedMessage::decode(payload).is_err());
}

#[test]
fn test_decode_truncated_string() {
    // Error message claiming 100 bytes but carrying none
    let payload = Bytes::from_static(&[0x05, 0, 0, 0, 100]);
    assert!(FeedMessage::decode(payload).is_err());
}
