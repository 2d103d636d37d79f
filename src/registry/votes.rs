//! Vote ledger
//!
//! One vote per player per cycle. Re-casting moves the vote; the tally
//! is recomputed on demand. Cleared by the cycle cleanup together with
//! the roster.

use std::collections::HashMap;

use dashmap::DashMap;

use super::events::EventTypeId;
use super::roster::PlayerId;

/// Votes cast for the next event type in the current cycle.
#[derive(Debug, Default)]
pub struct VoteLedger {
    votes: DashMap<PlayerId, EventTypeId>,
}

impl VoteLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Casts (or moves) a player's vote. Returns the previous vote when
    /// the player had already voted.
    pub fn cast(&self, player: PlayerId, event: EventTypeId) -> Option<EventTypeId> {
        self.votes.insert(player, event)
    }

    /// Retracts a player's vote. Returns `false` if they had not voted.
    pub fn retract(&self, player: PlayerId) -> bool {
        self.votes.remove(&player).is_some()
    }

    /// Number of votes cast.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.votes.len() as u64
    }

    /// Vote totals per event type.
    #[must_use]
    pub fn tally(&self) -> HashMap<EventTypeId, u64> {
        let mut totals = HashMap::new();
        for entry in &self.votes {
            *totals.entry(entry.value().clone()).or_insert(0) += 1;
        }
        totals
    }

    /// Clears all votes at the end of a cycle.
    pub fn clear(&self) {
        self.votes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_and_tally() {
        let ledger = VoteLedger::new();
        ledger.cast(PlayerId(1), EventTypeId::new("dm"));
        ledger.cast(PlayerId(2), EventTypeId::new("dm"));
        ledger.cast(PlayerId(3), EventTypeId::new("ctf"));

        let tally = ledger.tally();
        assert_eq!(tally[&EventTypeId::new("dm")], 2);
        assert_eq!(tally[&EventTypeId::new("ctf")], 1);
        assert_eq!(ledger.count(), 3);
    }

    #[test]
    fn test_recast_moves_vote() {
        let ledger = VoteLedger::new();
        assert!(ledger.cast(PlayerId(1), EventTypeId::new("dm")).is_none());
        let previous = ledger.cast(PlayerId(1), EventTypeId::new("ctf"));
        assert_eq!(previous, Some(EventTypeId::new("dm")));

        let tally = ledger.tally();
        assert!(!tally.contains_key(&EventTypeId::new("dm")));
        assert_eq!(tally[&EventTypeId::new("ctf")], 1);
    }

    #[test]
    fn test_retract() {
        let ledger = VoteLedger::new();
        ledger.cast(PlayerId(1), EventTypeId::new("dm"));
        assert!(ledger.retract(PlayerId(1)));
        assert!(!ledger.retract(PlayerId(1)));
        assert!(ledger.tally().is_empty());
    }

    #[test]
    fn test_clear() {
        let ledger = VoteLedger::new();
        ledger.cast(PlayerId(1), EventTypeId::new("dm"));
        ledger.clear();
        assert_eq!(ledger.count(), 0);
    }
}
