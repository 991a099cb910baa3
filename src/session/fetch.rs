//! Fetch lifecycle for the dashboard data resource.

use crate::payload::{DashboardData, PayloadDescription};

/// Lifecycle of an asynchronously fetched resource
///
/// Exactly one of these states holds at a time, and transitions are explicit
/// method calls, not flag juggling.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResourceState<T> {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// The last request delivered
    Succeeded(T),
    /// The last request failed
    Failed(String),
}

impl<T> ResourceState<T> {
    /// Whether a request is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The delivered value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    /// The failure message, if any
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Dashboard data fetch state with request de-duplication
///
/// A fetch is keyed by the value-identity of its payload description: asking
/// again for a payload that is already loading, loaded, or failed is refused
/// until the payload changes or [`invalidate`](Self::invalidate) runs.
#[derive(Debug, Default)]
pub struct DashboardResource {
    state: ResourceState<DashboardData>,
    requested: Option<PayloadDescription>,
}

impl DashboardResource {
    /// Create an idle resource
    pub fn new() -> Self {
        Self::default()
    }

    /// Current fetch state
    pub fn state(&self) -> &ResourceState<DashboardData> {
        &self.state
    }

    /// Delivered data, when the last fetch succeeded
    pub fn data(&self) -> Option<&DashboardData> {
        self.state.value()
    }

    /// Ask to fetch for `payload`
    ///
    /// Returns `true` when the caller should actually issue the request (the
    /// state moves to `Loading`); `false` when this exact payload is already
    /// being handled.
    pub fn request(&mut self, payload: &PayloadDescription) -> bool {
        if self.requested.as_ref() == Some(payload) {
            return false;
        }
        self.requested = Some(payload.clone());
        self.state = ResourceState::Loading;
        true
    }

    /// Deliver data for a fetch started with [`request`](Self::request)
    ///
    /// Ignored when the payload is no longer the one being tracked (the
    /// answer to a question nobody is asking anymore).
    pub fn complete(&mut self, payload: &PayloadDescription, data: DashboardData) {
        if self.requested.as_ref() != Some(payload) {
            log::debug!("discarding dashboard data for a superseded payload");
            return;
        }
        self.state = ResourceState::Succeeded(data);
    }

    /// Record a fetch failure, under the same staleness rule as `complete`
    pub fn fail(&mut self, payload: &PayloadDescription, error: impl Into<String>) {
        if self.requested.as_ref() != Some(payload) {
            log::debug!("discarding dashboard error for a superseded payload");
            return;
        }
        self.state = ResourceState::Failed(error.into());
    }

    /// Drop everything and return to idle
    ///
    /// Also clears the de-duplication key, so the next [`request`](Self::request)
    /// goes through even for the same payload (this is how a failed fetch is
    /// retried).
    pub fn invalidate(&mut self) {
        self.state = ResourceState::Idle;
        self.requested = None;
    }
}
