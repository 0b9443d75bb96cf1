//! Checkout submission gate.
//!
//! Allows one in-flight checkout per session. Session data is a per-request
//! snapshot, so the flag lives in shared state keyed by session ID rather
//! than in the session record itself.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use tower_sessions::session::Id;

/// Tracks sessions with a checkout in flight.
#[derive(Debug, Clone, Default)]
pub struct CheckoutGate {
    in_flight: Arc<Mutex<HashSet<Id>>>,
}

/// Held while a checkout is submitted; releases the session on drop.
#[derive(Debug)]
pub struct CheckoutPermit {
    gate: CheckoutGate,
    session_id: Id,
}

impl CheckoutGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate for `session_id`, or `None` if a checkout is already running.
    #[must_use]
    pub fn try_acquire(&self, session_id: Id) -> Option<CheckoutPermit> {
        let inserted = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session_id);

        inserted.then(|| CheckoutPermit {
            gate: self.clone(),
            session_id,
        })
    }

    #[cfg(test)]
    fn is_in_flight(&self, session_id: Id) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&session_id)
    }
}

impl Drop for CheckoutPermit {
    fn drop(&mut self) {
        self.gate
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_submit_is_rejected_until_release() {
        let gate = CheckoutGate::new();
        let id = Id::default();

        let permit = gate.try_acquire(id);
        assert!(permit.is_some());
        assert!(gate.is_in_flight(id));
        assert!(gate.try_acquire(id).is_none());

        drop(permit);
        assert!(!gate.is_in_flight(id));
        assert!(gate.try_acquire(id).is_some());
    }

    #[test]
    fn test_sessions_are_independent() {
        let gate = CheckoutGate::new();
        let _first = gate.try_acquire(Id(1));
        assert!(gate.try_acquire(Id(2)).is_some());
    }
}
