//! Watch-source ingest boundary
//!
//! The cluster watch source lives outside this system. Whatever it is, it
//! hands raw change notifications to an mpsc channel and the adapter task
//! here normalizes them into the log. Only add/modify/delete notifications
//! are appended; anything else the source emits (bookmarks, watch errors)
//! is discarded at this boundary, so the log never sees a change type it
//! does not model.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use kfeed_protocol::{ChangeType, EventRecord};

use crate::log::EventLog;

/// A raw change notification as the watch source produced it
#[derive(Debug, Clone)]
pub struct WatchNotification {
    /// Watched kind, e.g. "Pod"
    pub resource: String,
    /// Raw change tag from the source, e.g. "ADDED"
    pub change: String,
    /// Object namespace; empty for cluster-scoped objects
    pub namespace: String,
    /// Object name
    pub name: String,
    /// Opaque object data; stored but never interpreted
    pub payload: Bytes,
}

/// Counters reported when the ingest task stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Notifications appended to the log
    pub appended: u64,
    /// Notifications with unrecognized change tags, dropped
    pub discarded: u64,
}

/// Spawn the adapter task that drains `rx` into the log
///
/// Runs until the channel closes or `cancel` fires. Nothing it encounters
/// can fail the log: malformed change tags are counted and dropped.
pub fn spawn_ingest(
    log: Arc<EventLog>,
    mut rx: mpsc::Receiver<WatchNotification>,
    cancel: CancellationToken,
) -> JoinHandle<IngestStats> {
    tokio::spawn(async move {
        let mut stats = IngestStats::default();

        loop {
            let notification = tokio::select! {
                _ = cancel.cancelled() => break,
                received = rx.recv() => match received {
                    Some(notification) => notification,
                    None => break,
                },
            };

            match ChangeType::from_watch_tag(&notification.change) {
                Some(change) => {
                    let record = EventRecord::new(notification.resource, change)
                        .with_object(notification.namespace, notification.name)
                        .with_payload(notification.payload);
                    let event = log.append(record);
                    stats.appended += 1;
                    trace!(
                        sequence = event.sequence(),
                        resource = %event.resource(),
                        change = %event.change(),
                        "event appended"
                    );
                }
                None => {
                    stats.discarded += 1;
                    debug!(
                        tag = %notification.change,
                        resource = %notification.resource,
                        "discarding unrecognized change notification"
                    );
                }
            }
        }

        info!(
            appended = stats.appended,
            discarded = stats.discarded,
            "ingest stopped"
        );
        stats
    })
}

#[cfg(test)]
#[path = "ingest_test.rs"]
mod tests;
