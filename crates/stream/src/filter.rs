//! Metadata filter for event delivery
//!
//! `EventFilter` matches on metadata the event already carries, so it is
//! safe in the dispatch hot path.
//!
//! # Filter Logic
//!
//! - All fields are optional (None = match all)
//! - Set fields are AND'd (must match all specified fields)
//! - On the wire an empty string also means match-all; `from_subscribe`
//!   normalizes that form away

use kfeed_protocol::{ChangeType, Event, SubscribeRequest};

/// Metadata filter for event matching
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    /// Watched kind to match (None = match all)
    resource: Option<String>,
    /// Namespace to match (None = match all)
    namespace: Option<String>,
    /// Change type to match (None = match all); used by the snapshot query
    /// path, tail subscriptions leave it unset
    change: Option<ChangeType>,
}

impl EventFilter {
    /// Create an empty filter (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create filter from a subscribe request
    ///
    /// Empty strings are the wire form of "match all" and normalize to an
    /// unset field.
    pub fn from_subscribe(request: &SubscribeRequest) -> Self {
        Self {
            resource: normalize(request.resource.as_deref()),
            namespace: normalize(request.namespace.as_deref()),
            change: None,
        }
    }

    /// Add resource filter
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Add namespace filter
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Add change type filter
    pub fn with_change(mut self, change: ChangeType) -> Self {
        self.change = Some(change);
        self
    }

    /// Check if filter is empty (matches everything)
    #[inline]
    pub fn is_match_all(&self) -> bool {
        self.resource.is_none() && self.namespace.is_none() && self.change.is_none()
    }

    /// Check if an event matches this filter
    #[inline]
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(ref resource) = self.resource {
            if resource != event.resource() {
                return false;
            }
        }
        if let Some(ref namespace) = self.namespace {
            if namespace != event.namespace() {
                return false;
            }
        }
        if let Some(change) = self.change {
            if change != event.change() {
                return false;
            }
        }
        true
    }

    /// Get resource filter (for logging)
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// Get namespace filter (for logging)
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Get change type filter (for logging)
    pub fn change(&self) -> Option<ChangeType> {
        self.change
    }
}

fn normalize(field: Option<&str>) -> Option<String> {
    match field {
        None | Some("") => None,
        Some(value) => Some(value.to_string()),
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
