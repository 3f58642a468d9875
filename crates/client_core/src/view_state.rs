//! Per-query UI state with latest-request-wins completion.

use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum ViewState<T> {
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Sequence number handed out when a fetch starts. Only the ticket matching
/// the newest issued number may complete the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub struct QuerySlot<T> {
    name: &'static str,
    state: ViewState<T>,
    issued: u64,
    pending: Option<u64>,
    mounted: bool,
}

impl<T> QuerySlot<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: ViewState::Idle,
            issued: 0,
            pending: None,
            mounted: true,
        }
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Starts a new cycle. Any earlier ticket becomes stale.
    pub fn begin(&mut self) -> FetchTicket {
        self.issued += 1;
        self.pending = Some(self.issued);
        self.state = ViewState::Loading;
        FetchTicket(self.issued)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.mounted && self.pending == Some(ticket.0)
    }

    /// Applies the outcome if `ticket` is still current, settling the cycle.
    /// Returns whether the state changed.
    pub fn complete(&mut self, ticket: FetchTicket, outcome: Result<T, String>) -> bool {
        if !self.is_current(ticket) {
            debug!(
                slot = self.name,
                seq = ticket.0,
                latest = self.issued,
                mounted = self.mounted,
                "discarding stale fetch result"
            );
            return false;
        }

        self.pending = None;
        self.state = match outcome {
            Ok(data) => ViewState::Success(data),
            Err(message) => ViewState::Error(message),
        };
        true
    }

    /// Moves straight to `Error` without a fetch, superseding anything in
    /// flight.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.issued += 1;
        self.pending = None;
        self.state = ViewState::Error(message.into());
    }

    /// Invalidates every outstanding ticket; later completions are dropped.
    pub fn unmount(&mut self) {
        self.issued += 1;
        self.pending = None;
        self.mounted = false;
    }
}

#[cfg(test)]
#[path = "tests/view_state_tests.rs"]
mod tests;
