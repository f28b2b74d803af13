//! Application state

use std::sync::Arc;

use kfeed_stream::EventLog;

/// Shared application state
///
/// Handlers only ever read from the log; the writer side lives with the
/// ingest adapter.
#[derive(Clone)]
pub struct AppState {
    /// The shared event log every handler reads from
    pub log: Arc<EventLog>,
}

impl AppState {
    /// Create new application state around a log
    pub fn new(log: Arc<EventLog>) -> Self {
        Self { log }
    }
}
