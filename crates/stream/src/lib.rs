//! kfeed Stream - bounded event log and live tailing
//!
//! This crate is the heart of kfeed: a fixed-capacity, in-memory log of
//! cluster change events with one writer and any number of concurrent
//! readers, plus the per-consumer tail sessions that stream it.
//!
//! # Architecture
//!
//! ```text
//! watch source ──→ ingest ──→ EventLog (bounded, sequence-numbered)
//!                                 │
//!                    ┌────────────┼──────────────┐
//!                    ▼            ▼              ▼
//!               snapshot     TailSession    TailSession ◄── EventFilter
//!               (HTTP API)       │              │
//!                                ▼              ▼
//!                            FeedServer (TCP, length-prefixed frames)
//! ```
//!
//! Consumers address the log by sequence number, never by buffer position.
//! Eviction shifts positions but sequence numbers are forever, so a tail's
//! cursor survives eviction and the log can report exactly how many events
//! a slow consumer missed (`TailItem::Gap`).

pub mod filter;
pub mod ingest;
pub mod log;
pub mod server;
pub mod session;

mod error;

pub use error::{Result, StreamError};
pub use filter::EventFilter;
pub use ingest::{IngestStats, WatchNotification, spawn_ingest};
pub use log::{EventLog, EventsSince};
pub use server::{FeedServer, FeedServerConfig};
pub use session::{TailBatch, TailItem, TailSession};
