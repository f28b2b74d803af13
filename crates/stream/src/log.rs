//! Bounded event log
//!
//! `EventLog` retains the newest `capacity` events, each stamped with a
//! monotonically increasing sequence number at append time. One writer and
//! any number of readers share the log; a single `RwLock` keeps every read
//! consistent with respect to an in-flight append.
//!
//! Readers address the log by sequence number: eviction shifts buffer
//! positions but sequence numbers never move, so a consumer's cursor
//! survives eviction and `events_since` can report exactly how many events
//! were lost to it.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tokio::sync::watch;

use kfeed_protocol::{Event, EventRecord};

use crate::error::{Result, StreamError};

/// Bounded, eviction-on-overflow ordered store of events
#[derive(Debug)]
pub struct EventLog {
    /// Internal storage
    inner: RwLock<LogInner>,
    /// Latest `next_sequence`, published after each append to wake tails
    appends: watch::Sender<u64>,
    /// Maximum number of retained entries
    capacity: usize,
}

#[derive(Debug)]
struct LogInner {
    /// Retained events, oldest at the front
    entries: VecDeque<Arc<Event>>,
    /// Sequence number the next append will receive
    next_sequence: u64,
}

/// Result of [`EventLog::events_since`]
///
/// `events` is the retained suffix from the requested sequence onward,
/// oldest-first. `dropped` counts requested events that eviction already
/// took; when it is non-zero the caller's cursor fell behind the retained
/// window and `events` starts at the oldest retained sequence.
#[derive(Debug, Clone, Default)]
pub struct EventsSince {
    /// Retained events with `sequence >= from`, ascending
    pub events: Vec<Arc<Event>>,
    /// Requested events already evicted (`oldest_retained - from`)
    pub dropped: u64,
}

impl EventLog {
    /// Create a log holding at most `capacity` events
    ///
    /// A zero capacity is a configuration error, reported here and never at
    /// call time.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(StreamError::InvalidCapacity);
        }
        let (appends, _) = watch::channel(0);
        Ok(Self {
            inner: RwLock::new(LogInner {
                entries: VecDeque::with_capacity(capacity),
                next_sequence: 0,
            }),
            appends,
            capacity,
        })
    }

    /// Append one event, assigning the next sequence number
    ///
    /// Evicts the single oldest entry when the log is full. The mutation is
    /// atomic: a reader sees the log either before the append or after it,
    /// never in between. Returns the stored event.
    pub fn append(&self, record: EventRecord) -> Arc<Event> {
        let (event, next) = {
            let mut inner = self.inner.write();
            let sequence = inner.next_sequence;
            let event = Arc::new(Event::from_record(record, sequence, Utc::now()));
            if inner.entries.len() == self.capacity {
                inner.entries.pop_front();
            }
            inner.entries.push_back(Arc::clone(&event));
            inner.next_sequence = sequence + 1;
            (event, inner.next_sequence)
        };

        // Wake waiting tail sessions; done after the lock is released so no
        // woken reader can contend with the append itself.
        self.appends.send_replace(next);
        event
    }

    /// Up to `limit` most recent events, oldest-first
    ///
    /// A `limit` of zero returns everything retained.
    pub fn snapshot(&self, limit: usize) -> Vec<Arc<Event>> {
        let inner = self.inner.read();
        let len = inner.entries.len();
        let take = if limit == 0 || limit > len { len } else { limit };
        inner.entries.iter().skip(len - take).cloned().collect()
    }

    /// All retained events with `sequence >= from`, oldest-first
    ///
    /// If `from` fell behind the retained window, `dropped` reports how
    /// many events between `from` and the oldest retained sequence were
    /// evicted unread, so the caller can surface the gap instead of
    /// silently skipping.
    pub fn events_since(&self, from: u64) -> EventsSince {
        let inner = self.inner.read();
        let oldest = inner.next_sequence - inner.entries.len() as u64;

        if from >= inner.next_sequence {
            return EventsSince::default();
        }

        let (dropped, start) = if from < oldest {
            (oldest - from, 0)
        } else {
            (0, (from - oldest) as usize)
        };

        EventsSince {
            events: inner.entries.iter().skip(start).cloned().collect(),
            dropped,
        }
    }

    /// Subscribe to the append wake signal
    ///
    /// The receiver's value is the latest `next_sequence`; a change means
    /// "new events may exist", which is all a tail session needs to know.
    pub fn watch_appends(&self) -> watch::Receiver<u64> {
        self.appends.subscribe()
    }

    /// Sequence number the next append will receive
    pub fn next_sequence(&self) -> u64 {
        self.inner.read().next_sequence
    }

    /// Oldest sequence number still retained
    ///
    /// Equals `next_sequence` when the log is empty.
    pub fn oldest_retained_sequence(&self) -> u64 {
        let inner = self.inner.read();
        inner.next_sequence - inner.entries.len() as u64
    }

    /// Number of retained events
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    /// Check if the log holds no events
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of retained events
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
#[path = "log_test.rs"]
mod tests;
