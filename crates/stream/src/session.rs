//! Tail sessions
//!
//! A `TailSession` is one consumer's live, filtered view of the log. It
//! owns a cursor in sequence-number space and pulls everything the log has
//! retained past that cursor on each dispatch cycle, so a session never
//! re-orders or duplicates events and always learns when eviction outran
//! it.
//!
//! The session holds no lock between cycles and the log holds no session
//! state: a session that dies leaves nothing behind to clean up.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use kfeed_protocol::{Event, StartPosition};

use crate::filter::EventFilter;
use crate::log::EventLog;

/// Upper bound on how long a session sleeps between dispatch cycles when no
/// append wakes it. Also bounds how long cancellation can go unnoticed.
pub const IDLE_INTERVAL: Duration = Duration::from_secs(1);

/// One item delivered to a tail consumer
#[derive(Debug, Clone)]
pub enum TailItem {
    /// An event matching the session filter, in sequence order
    Event(Arc<Event>),
    /// The session's cursor fell behind the retained window; `dropped`
    /// events were evicted before they could be delivered
    Gap { dropped: u64 },
}

/// Output of one dispatch cycle
#[derive(Debug, Default)]
pub struct TailBatch {
    /// Events evicted unread since the previous cycle
    pub dropped: u64,
    /// Filter matches, in sequence order
    pub events: Vec<Arc<Event>>,
}

impl TailBatch {
    /// True when the cycle produced nothing to deliver
    pub fn is_empty(&self) -> bool {
        self.dropped == 0 && self.events.is_empty()
    }
}

/// A live, filtered, continuously-advancing read of the log
pub struct TailSession {
    log: Arc<EventLog>,
    filter: EventFilter,
    /// Sequence number of the next event this consumer has not seen
    next_wanted: u64,
    appends: watch::Receiver<u64>,
}

impl TailSession {
    /// Open a session starting either at the oldest retained event or at
    /// the live edge
    pub fn open(log: Arc<EventLog>, filter: EventFilter, start: StartPosition) -> Self {
        let appends = log.watch_appends();
        let next_wanted = match start {
            StartPosition::Oldest => 0,
            StartPosition::Live => log.next_sequence(),
        };
        Self {
            log,
            filter,
            next_wanted,
            appends,
        }
    }

    /// The next sequence number this session has not yet seen
    #[inline]
    pub fn cursor(&self) -> u64 {
        self.next_wanted
    }

    /// Get the session filter
    #[inline]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Run one dispatch cycle
    ///
    /// Reads everything retained past the cursor, accounts for eviction,
    /// applies the filter, and advances. The cursor tracks log position,
    /// not filter matches: it moves past every observed sequence so
    /// filtered-out events are never re-read.
    pub fn poll(&mut self) -> TailBatch {
        let since = self.log.events_since(self.next_wanted);

        if since.dropped > 0 {
            // Resynchronize at the oldest retained sequence.
            self.next_wanted += since.dropped;
        }

        let mut events = Vec::new();
        for event in since.events {
            self.next_wanted = event.sequence() + 1;
            if self.filter.matches(&event) {
                events.push(event);
            }
        }

        TailBatch {
            dropped: since.dropped,
            events,
        }
    }

    /// Wait until new events may exist or the idle interval elapses
    pub async fn idle(&mut self) {
        tokio::select! {
            result = self.appends.changed() => {
                // The sender lives inside the log, which this session holds
                // an Arc to; a closed channel only happens during teardown.
                if result.is_err() {
                    trace!("append signal closed");
                }
            }
            _ = tokio::time::sleep(IDLE_INTERVAL) => {}
        }
    }

    /// Pump this session into `tx` until the consumer goes away or `cancel`
    /// fires
    ///
    /// A failed send means the consumer's transport dropped its receiver;
    /// the session closes without affecting the writer or other sessions.
    /// Already-sent items are never retracted.
    pub async fn run(mut self, tx: mpsc::Sender<TailItem>, cancel: CancellationToken) {
        loop {
            let batch = self.poll();

            if batch.dropped > 0 {
                debug!(
                    dropped = batch.dropped,
                    cursor = self.next_wanted,
                    "tail fell behind retained window"
                );
                let gap = TailItem::Gap {
                    dropped: batch.dropped,
                };
                if !forward(&tx, &cancel, gap).await {
                    return;
                }
            }

            for event in batch.events {
                if !forward(&tx, &cancel, TailItem::Event(event)).await {
                    return;
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = self.idle() => {}
            }
        }
    }
}

/// Send one item, bailing out if the consumer disconnected or the session
/// was cancelled mid-send
async fn forward(tx: &mpsc::Sender<TailItem>, cancel: &CancellationToken, item: TailItem) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        sent = tx.send(item) => sent.is_ok(),
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
