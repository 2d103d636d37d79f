//! Participant roster
//!
//! Tracks players signed up for the current cycle. Registration is only
//! meaningful during the registration phase; the cycle cleanup clears
//! the roster. Concurrent access comes from command handlers in an
//! embedding server, so the map is `DashMap`-backed.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Newtype wrapper for player identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered participant.
#[derive(Debug, Clone)]
pub struct Participant {
    /// Player identifier.
    pub id: PlayerId,
    /// Player display name.
    pub name: String,
    /// When the player registered.
    pub registered_at: DateTime<Utc>,
}

/// Roster of participants registered for the current cycle.
#[derive(Debug, Default)]
pub struct ParticipantRoster {
    players: DashMap<PlayerId, Participant>,
}

impl ParticipantRoster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a player. Returns `false` if they were already
    /// registered (the existing entry is kept).
    pub fn register(&self, id: PlayerId, name: impl Into<String>) -> bool {
        if self.players.contains_key(&id) {
            return false;
        }
        self.players.insert(
            id,
            Participant {
                id,
                name: name.into(),
                registered_at: Utc::now(),
            },
        );
        true
    }

    /// Removes a player from the roster. Returns `false` if they were
    /// not registered.
    pub fn unregister(&self, id: PlayerId) -> bool {
        self.players.remove(&id).is_some()
    }

    /// Returns whether the player is registered.
    #[must_use]
    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.contains_key(&id)
    }

    /// Number of registered participants.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.players.len() as u64
    }

    /// Returns whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Clears the roster at the end of a cycle.
    pub fn clear(&self) {
        self.players.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_count() {
        let roster = ParticipantRoster::new();
        assert!(roster.register(PlayerId(1), "alice"));
        assert!(roster.register(PlayerId(2), "bob"));
        assert_eq!(roster.count(), 2);
        assert!(roster.contains(PlayerId(1)));
    }

    #[test]
    fn test_double_register_is_rejected() {
        let roster = ParticipantRoster::new();
        assert!(roster.register(PlayerId(1), "alice"));
        assert!(!roster.register(PlayerId(1), "alice-again"));
        assert_eq!(roster.count(), 1);
    }

    #[test]
    fn test_unregister() {
        let roster = ParticipantRoster::new();
        roster.register(PlayerId(1), "alice");
        assert!(roster.unregister(PlayerId(1)));
        assert!(!roster.unregister(PlayerId(1)));
        assert!(roster.is_empty());
    }

    #[test]
    fn test_clear() {
        let roster = ParticipantRoster::new();
        roster.register(PlayerId(1), "alice");
        roster.register(PlayerId(2), "bob");
        roster.clear();
        assert!(roster.is_empty());
        assert_eq!(roster.count(), 0);
    }
}
