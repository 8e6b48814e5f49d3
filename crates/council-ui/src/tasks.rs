//! In-flight tracking for collaborator calls
//!
//! Every outgoing command carries a [`Ticket`]. The slot that issued it
//! remembers the ticket; a result is applied only if it comes back to a slot
//! still holding that ticket. Anything else (restart, overlay closed, debate
//! re-opened) is stale and gets discarded.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Ticket(u64);

impl Ticket {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic ticket source; never reuses a value for the lifetime of the app
#[derive(Debug, Default)]
pub struct TicketIssuer {
    last: u64,
}

impl TicketIssuer {
    pub fn issue(&mut self) -> Ticket {
        self.last += 1;
        Ticket(self.last)
    }
}

/// Boolean in-flight flag per operation, keyed by the outstanding ticket.
/// Not a queue: a second request while one is pending is refused.
#[derive(Debug, Clone, Default)]
pub struct PendingSlot(Option<Ticket>);

impl PendingSlot {
    pub fn is_in_flight(&self) -> bool {
        self.0.is_some()
    }

    /// Claim the slot. Returns false if a request is already outstanding.
    pub fn begin(&mut self, ticket: Ticket) -> bool {
        if self.0.is_some() {
            return false;
        }
        self.0 = Some(ticket);
        true
    }

    /// Release the slot if `ticket` is the outstanding one
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        if self.0 == Some(ticket) {
            self.0 = None;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_refuses_second_request() {
        let mut issuer = TicketIssuer::default();
        let mut slot = PendingSlot::default();
        let first = issuer.issue();
        let second = issuer.issue();
        assert!(slot.begin(first));
        assert!(!slot.begin(second));
        assert!(!slot.finish(second));
        assert!(slot.finish(first));
        assert!(!slot.is_in_flight());
    }

    #[test]
    fn cleared_slot_rejects_late_result() {
        let mut issuer = TicketIssuer::default();
        let mut slot = PendingSlot::default();
        let ticket = issuer.issue();
        slot.begin(ticket);
        slot.clear();
        assert!(!slot.finish(ticket));
    }
}
