//! Request sequencing for delayed derivations
//!
//! Every derivation request gets a ticket from a monotonically increasing
//! counter. Issuing a ticket supersedes all earlier ones, so a result may only
//! be published if its ticket is still the current one.

use serde::{Deserialize, Serialize};

/// Sequence number identifying one derivation request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, superseding every earlier one
    pub fn issue(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest != 0 && ticket.0 == self.latest
    }

    pub fn latest(&self) -> Option<RequestTicket> {
        (self.latest != 0).then_some(RequestTicket(self.latest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tickets_increase() {
        let mut sequencer = RequestSequencer::new();
        assert!(sequencer.latest().is_none());

        let first = sequencer.issue();
        let second = sequencer.issue();
        assert!(second > first);
        assert_eq!(sequencer.latest(), Some(second));
    }

    #[test]
    fn test_only_latest_is_current() {
        let mut sequencer = RequestSequencer::new();
        let stale = sequencer.issue();
        assert!(sequencer.is_current(stale));

        let fresh = sequencer.issue();
        assert!(!sequencer.is_current(stale));
        assert!(sequencer.is_current(fresh));
    }

    #[test]
    fn test_display() {
        let mut sequencer = RequestSequencer::new();
        assert_eq!(sequencer.issue().to_string(), "#1");
    }

    proptest! {
        /// Of any number of issued tickets, only the last one is current
        #[test]
        fn prop_only_last_ticket_is_current(count in 1usize..50) {
            let mut sequencer = RequestSequencer::new();
            let tickets: Vec<RequestTicket> = (0..count).map(|_| sequencer.issue()).collect();

            prop_assert!(tickets.windows(2).all(|pair| pair[0] < pair[1]));
            let (last, earlier) = tickets.split_last().unwrap();
            prop_assert!(sequencer.is_current(*last));
            prop_assert!(earlier.iter().all(|ticket| !sequencer.is_current(*ticket)));
            prop_assert_eq!(sequencer.latest(), Some(*last));
        }
    }
}
