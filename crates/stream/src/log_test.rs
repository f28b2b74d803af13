//! Tests for the bounded event log

use super::*;
use kfeed_protocol::ChangeType;

/// Helper to create a test record with a recognizable name
fn make_record(resource: &str, n: usize) -> EventRecord {
    EventRecord::new(resource, ChangeType::Added).with_object("default", format!("obj-{n}"))
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_new_log_is_empty() {
    let log = EventLog::new(10).unwrap();
    assert!(log.is_empty());
    assert_eq!(log.len(), 0);
    assert_eq!(log.capacity(), 10);
    assert_eq!(log.next_sequence(), 0);
    assert_eq!(log.oldest_retained_sequence(), 0);
}

#[test]
fn test_zero_capacity_rejected_at_construction() {
    match EventLog::new(0) {
        Err(StreamError::InvalidCapacity) => {}
        other => panic!("expected InvalidCapacity, got {other:?}"),
    }
}

// ============================================================================
// Append
// ============================================================================

#[test]
fn test_append_assigns_consecutive_sequences_from_zero() {
    let log = EventLog::new(10).unwrap();

    for expected in 0..5u64 {
        let event = log.append(make_record("Pod", expected as usize));
        assert_eq!(event.sequence(), expected);
    }
    assert_eq!(log.next_sequence(), 5);
}

#[test]
fn test_append_evicts_single_oldest_when_full() {
    // Scenario: capacity 3, append 4, the first event is gone
    let log = EventLog::new(3).unwrap();
    for n in 0..4 {
        log.append(make_record("Pod", n));
    }

    assert_eq!(log.len(), 3);
    let events = log.snapshot(0);
    let sequences: Vec<u64> = events.iter().map(|e| e.sequence()).collect();
    assert_eq!(sequences, vec![1, 2, 3]);
    assert_eq!(log.oldest_retained_sequence(), 1);
}

#[test]
fn test_retains_newest_capacity_events() {
    let log = EventLog::new(5).unwrap();
    for n in 0..100 {
        log.append(make_record("Pod", n));
    }

    let sequences: Vec<u64> = log.snapshot(0).iter().map(|e| e.sequence()).collect();
    assert_eq!(sequences, vec![95, 96, 97, 98, 99]);
}

// ============================================================================
// Snapshot
// ============================================================================

#[test]
fn test_snapshot_zero_limit_returns_all_oldest_first() {
    let log = EventLog::new(100).unwrap();
    for n in 0..10 {
        log.append(make_record("Pod", n));
    }

    let events = log.snapshot(0);
    assert_eq!(events.len(), 10);
    for (i, event) in events.iter().enumerate() {
        assert_eq!(event.sequence(), i as u64);
    }
}

#[test]
fn test_snapshot_limit_returns_most_recent() {
    // Scenario: capacity 100, 50 appends, snapshot(10) = last 10, oldest-first
    let log = EventLog::new(100).unwrap();
    for n in 0..50 {
        log.append(make_record("Pod", n));
    }

    let events = log.snapshot(10);
    let sequences: Vec<u64> = events.iter().map(|e| e.sequence()).collect();
    assert_eq!(sequences, (40..50).collect::<Vec<u64>>());
}

#[test]
fn test_snapshot_limit_larger_than_len() {
    let log = EventLog::new(100).unwrap();
    for n in 0..3 {
        log.append(make_record("Pod", n));
    }
    assert_eq!(log.snapshot(50).len(), 3);
}

#[test]
fn test_snapshot_empty_log() {
    let log = EventLog::new(10).unwrap();
    assert!(log.snapshot(0).is_empty());
    assert!(log.snapshot(5).is_empty());
}

#[test]
fn test_snapshot_does_not_mutate() {
    let log = EventLog::new(10).unwrap();
    log.append(make_record("Pod", 0));

    let _ = log.snapshot(0);
    let _ = log.snapshot(0);
    assert_eq!(log.len(), 1);
    assert_eq!(log.next_sequence(), 1);
}

// ============================================================================
// events_since
// ============================================================================

#[test]
fn test_events_since_returns_suffix() {
    let log = EventLog::new(100).unwrap();
    for n in 0..10 {
        log.append(make_record("Pod", n));
    }

    let result = log.events_since(7);
    assert_eq!(result.dropped, 0);
    let sequences: Vec<u64> = result.events.iter().map(|e| e.sequence()).collect();
    assert_eq!(sequences, vec![7, 8, 9]);
}

#[test]
fn test_events_since_at_live_edge_is_empty() {
    let log = EventLog::new(100).unwrap();
    for n in 0..10 {
        log.append(make_record("Pod", n));
    }

    let result = log.events_since(10);
    assert_eq!(result.dropped, 0);
    assert!(result.events.is_empty());
}

#[test]
fn test_events_since_reports_dropped_after_eviction() {
    // Scenario: capacity 3, appends 0..=3, cursor 0 → dropped 1, resume at 1
    let log = EventLog::new(3).unwrap();
    for n in 0..4 {
        log.append(make_record("Pod", n));
    }

    let result = log.events_since(0);
    assert_eq!(result.dropped, 1);
    let sequences: Vec<u64> = result.events.iter().map(|e| e.sequence()).collect();
    assert_eq!(sequences, vec![1, 2, 3]);
}

#[test]
fn test_events_since_dropped_count_matches_distance() {
    let log = EventLog::new(5).unwrap();
    for n in 0..20 {
        log.append(make_record("Pod", n));
    }
    // Retained: 15..=19
    assert_eq!(log.oldest_retained_sequence(), 15);

    let result = log.events_since(10);
    assert_eq!(result.dropped, 5);
    assert_eq!(result.events.len(), 5);
    assert_eq!(result.events[0].sequence(), 15);
}

#[test]
fn test_events_since_idempotent_without_appends() {
    let log = EventLog::new(10).unwrap();
    for n in 0..5 {
        log.append(make_record("Pod", n));
    }

    let first = log.events_since(2);
    let second = log.events_since(2);

    assert_eq!(first.dropped, second.dropped);
    let a: Vec<u64> = first.events.iter().map(|e| e.sequence()).collect();
    let b: Vec<u64> = second.events.iter().map(|e| e.sequence()).collect();
    assert_eq!(a, b);
}

#[test]
fn test_events_since_on_empty_log_counts_assigned_history() {
    let log = EventLog::new(10).unwrap();
    let result = log.events_since(0);
    assert_eq!(result.dropped, 0);
    assert!(result.events.is_empty());
}

// ============================================================================
// Append wake signal
// ============================================================================

#[tokio::test]
async fn test_watch_appends_wakes_on_append() {
    let log = EventLog::new(10).unwrap();
    let mut rx = log.watch_appends();

    log.append(make_record("Pod", 0));

    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), 1);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_appends_produce_gapless_total_order() {
    let log = Arc::new(EventLog::new(200).unwrap());

    let mut writers = Vec::new();
    for w in 0..4 {
        let log = Arc::clone(&log);
        writers.push(tokio::spawn(async move {
            for n in 0..25 {
                log.append(make_record("Pod", w * 25 + n));
                tokio::task::yield_now().await;
            }
        }));
    }

    for writer in writers {
        writer.await.unwrap();
    }

    let sequences: Vec<u64> = log.snapshot(0).iter().map(|e| e.sequence()).collect();
    assert_eq!(sequences, (0..100).collect::<Vec<u64>>());
    assert_eq!(log.next_sequence(), 100);
}

#[tokio::test]
async fn test_concurrent_reads_see_consistent_state() {
    let log = Arc::new(EventLog::new(50).unwrap());

    let writer = {
        let log = Arc::clone(&log);
        tokio::spawn(async move {
            for n in 0..200 {
                log.append(make_record("Pod", n));
                tokio::task::yield_now().await;
            }
        })
    };

    let reader = {
        let log = Arc::clone(&log);
        tokio::spawn(async move {
            for _ in 0..100 {
                // Every observed view must be ascending and gapless
                let events = log.snapshot(0);
                let sequences: Vec<u64> = events.iter().map(|e| e.sequence()).collect();
                for pair in sequences.windows(2) {
                    assert_eq!(pair[1], pair[0] + 1);
                }
                assert!(events.len() <= log.capacity());
                tokio::task::yield_now().await;
            }
        })
    };

    writer.await.unwrap();
    reader.await.unwrap();
}
