//! Stale-fetch guard for view-scoped requests
//!
//! Every in-flight indexer fetch belongs to the view state that issued it.
//! When the query changes or the view goes away, results that arrive later
//! must be ignored, not applied. The session hands out a ticket per fetch;
//! a result is only applied while its ticket is still the current one.

use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket identifying one fetch within a [`FetchSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Issues fetch tickets and decides whether a completed fetch is still fresh
#[derive(Debug, Default)]
pub struct FetchSession {
    current: AtomicU64,
}

impl FetchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new fetch, superseding any fetch still in flight
    pub fn begin(&self) -> FetchTicket {
        FetchTicket(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether a result carrying this ticket may still be applied
    pub fn accept(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.current.load(Ordering::SeqCst)
    }

    /// Drop all in-flight fetches, e.g. when the view is torn down
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_is_accepted() {
        let session = FetchSession::new();
        let ticket = session.begin();
        assert!(session.accept(ticket));
    }

    #[test]
    fn test_superseded_ticket_is_rejected() {
        let session = FetchSession::new();
        let first = session.begin();
        let second = session.begin();
        assert!(!session.accept(first));
        assert!(session.accept(second));
    }

    #[test]
    fn test_invalidate_rejects_all_in_flight() {
        let session = FetchSession::new();
        let ticket = session.begin();
        session.invalidate();
        assert!(!session.accept(ticket));
    }
}
