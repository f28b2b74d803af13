//! kfeed API
//!
//! HTTP API for one-shot queries against the event log. Built on Axum;
//! tailing consumers use the stream transport instead.
//!
//! # Usage
//!
//! ```ignore
//! use kfeed_api::{AppState, build_router};
//! use kfeed_stream::EventLog;
//!
//! let log = Arc::new(EventLog::new(1000)?);
//! let app = build_router(AppState::new(log));
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! # Endpoints
//!
//! - `GET /health` - liveness probe
//! - `GET /api/v1/events` - snapshot of retained events, oldest-first
//! - `GET /api/v1/events/stats` - counts keyed `resource:change:namespace`
//!
//! # Query Parameters
//!
//! `/api/v1/events` accepts:
//! - `resource` - watched kind, e.g. `Pod`
//! - `namespace` - object namespace
//! - `type` - change type: `added`, `modified`, `deleted`
//! - `limit` - at most N most recent events (0 = all)
//!
//! Filters are applied by this transport layer after the snapshot is
//! taken; the log itself serves unfiltered history.

mod error;
mod routes;
mod state;
mod types;

pub use error::{ApiError, Result};
pub use routes::build_router;
pub use state::AppState;
pub use types::{EventQuery, EventView};
