//! API routes and handlers

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use kfeed_protocol::ChangeType;
use kfeed_stream::EventFilter;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{EventQuery, EventView};

/// Build the API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/events", get(list_events))
        .route("/api/v1/events/stats", get(event_stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

/// Liveness probe
///
/// GET /health
async fn health() -> &'static str {
    "ok"
}

/// Snapshot of retained events, oldest-first
///
/// GET /api/v1/events?resource=&namespace=&type=&limit=
///
/// The snapshot is taken first, then filters run here in the transport
/// layer; the log serves unfiltered history.
async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> Result<Json<Vec<EventView>>, ApiError> {
    let filter = build_filter(&query)?;
    let events = state.log.snapshot(query.limit.unwrap_or(0));

    let views = events
        .iter()
        .filter(|event| filter.matches(event))
        .map(|event| EventView::from(event.as_ref()))
        .collect();

    Ok(Json(views))
}

/// Event counts keyed `resource:change:namespace`
///
/// GET /api/v1/events/stats
async fn event_stats(State(state): State<AppState>) -> Json<BTreeMap<String, u64>> {
    let mut stats = BTreeMap::new();

    for event in state.log.snapshot(0) {
        let key = format!(
            "{}:{}:{}",
            event.resource(),
            event.change(),
            event.namespace()
        );
        *stats.entry(key).or_insert(0) += 1;
    }

    Json(stats)
}

/// Translate query parameters into an event filter
fn build_filter(query: &EventQuery) -> Result<EventFilter, ApiError> {
    let mut filter = EventFilter::new();

    if let Some(ref resource) = query.resource {
        if !resource.is_empty() {
            filter = filter.with_resource(resource.clone());
        }
    }
    if let Some(ref namespace) = query.namespace {
        if !namespace.is_empty() {
            filter = filter.with_namespace(namespace.clone());
        }
    }
    if let Some(ref change) = query.change {
        if !change.is_empty() {
            let change: ChangeType = change.parse().map_err(|_| {
                ApiError::InvalidFilter(format!(
                    "unknown change type '{change}' (expected added, modified, or deleted)"
                ))
            })?;
            filter = filter.with_change(change);
        }
    }

    Ok(filter)
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
