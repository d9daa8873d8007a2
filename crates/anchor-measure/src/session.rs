//! Session sequencing for discarding stale measurements.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// Identifies one measurement session. Only the latest ticket is current.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionTicket(u64);

impl SessionTicket {
    /// Raw sequence number.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Monotonic session sequence.
///
/// Every open (and every close) advances the counter; asynchronous work
/// captures a ticket first and drops its result if the ticket is no longer
/// current when the work completes.
#[derive(Clone, Debug, Default)]
pub struct SessionCounter {
    /// Latest issued sequence number.
    seq: Arc<AtomicU64>,
}

impl SessionCounter {
    /// Create a counter at session zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session, invalidating every earlier ticket.
    pub fn advance(&self) -> SessionTicket {
        SessionTicket(self.seq.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Ticket for the current session without advancing.
    #[must_use]
    pub fn ticket(&self) -> SessionTicket {
        SessionTicket(self.seq.load(Ordering::SeqCst))
    }

    /// Whether `ticket` still belongs to the current session.
    #[must_use]
    pub fn is_current(&self, ticket: SessionTicket) -> bool {
        self.seq.load(Ordering::SeqCst) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advancing_invalidates_earlier_tickets() {
        let counter = SessionCounter::new();
        let first = counter.advance();
        assert!(counter.is_current(first));
        let second = counter.advance();
        assert!(!counter.is_current(first));
        assert!(counter.is_current(second));
        assert_eq!(counter.ticket(), second);
        assert!(second.get() > first.get());
    }

    #[test]
    fn clones_share_the_sequence() {
        let a = SessionCounter::new();
        let b = a.clone();
        let t = a.advance();
        assert!(b.is_current(t));
        b.advance();
        assert!(!a.is_current(t));
    }
}
