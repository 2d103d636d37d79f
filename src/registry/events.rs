//! Event types and instances
//!
//! [`EventRegistry`] holds the configured event descriptors in
//! declaration order; that order is the tie-break for vote tallies.
//! A descriptor instantiates into an opaque [`EventInstance`]; failure
//! is an `Option`, never a panic, so callers must handle the fallback.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::RootConfig;

use super::roster::ParticipantRoster;
use super::votes::VoteLedger;

// ============================================================================
// Identifiers
// ============================================================================

/// Newtype wrapper for event type identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventTypeId(String);

impl EventTypeId {
    /// Creates a new `EventTypeId` from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Descriptor & instance
// ============================================================================

/// A selectable event type: identity plus the facts needed to
/// instantiate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDescriptor {
    /// Stable identifier.
    pub id: EventTypeId,
    /// Display name substituted into announcements.
    pub name: String,
    /// Participant floor checked again at instantiation time.
    pub min_participants: u64,
}

impl EventDescriptor {
    /// Attempts to create a live instance of this event.
    ///
    /// Returns `None` when instantiation is impossible, e.g. when
    /// participants dropped below the floor between the registration
    /// deadline and this call. The caller decides the fallback; this
    /// never fails the tick itself.
    #[must_use]
    pub fn instantiate(&self, roster: &ParticipantRoster) -> Option<EventInstance> {
        if roster.count() < self.min_participants {
            return None;
        }
        Some(EventInstance {
            id: Uuid::new_v4(),
            event_type: self.id.clone(),
            started_at: Utc::now(),
        })
    }
}

/// A live, running event.
///
/// Opaque to the lifecycle driver: once started it is owned and driven
/// by the running-event subsystem, which signals completion by
/// requesting the `Ended` phase.
#[derive(Debug, Clone)]
pub struct EventInstance {
    /// Unique instance identifier.
    pub id: Uuid,
    /// The event type this instance was created from.
    pub event_type: EventTypeId,
    /// When the instance was created.
    pub started_at: DateTime<Utc>,
}

// ============================================================================
// Registry
// ============================================================================

/// Ordered set of selectable event types.
#[derive(Debug, Default)]
pub struct EventRegistry {
    descriptors: Vec<EventDescriptor>,
}

impl EventRegistry {
    /// Creates a registry from pre-built descriptors, preserving order.
    #[must_use]
    pub fn new(descriptors: Vec<EventDescriptor>) -> Self {
        Self { descriptors }
    }

    /// Builds the registry from configuration, applying per-event
    /// participant floors where configured.
    #[must_use]
    pub fn from_config(config: &RootConfig) -> Self {
        let descriptors = config
            .events
            .iter()
            .map(|e| EventDescriptor {
                id: EventTypeId::new(e.id.clone()),
                name: e.name.clone(),
                min_participants: e
                    .min_participants
                    .unwrap_or(config.engine.min_participants),
            })
            .collect();
        Self { descriptors }
    }

    /// Number of registered event types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Looks up a descriptor by id.
    #[must_use]
    pub fn get(&self, id: &EventTypeId) -> Option<&EventDescriptor> {
        self.descriptors.iter().find(|d| &d.id == id)
    }

    /// Picks a uniformly random event type.
    ///
    /// `None` only on an empty registry, which configuration validation
    /// rejects up front.
    #[must_use]
    pub fn pick_random(&self) -> Option<&EventDescriptor> {
        self.pick_random_with(&mut rand::rng())
    }

    /// Picks a uniformly random event type using the supplied RNG.
    #[must_use]
    pub fn pick_random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&EventDescriptor> {
        self.descriptors.choose(rng)
    }

    /// Picks the most-voted event type.
    ///
    /// Tie-break is declaration order: the earliest-declared descriptor
    /// among those with the maximum vote count wins. With no votes cast
    /// every count is zero and the first descriptor wins.
    #[must_use]
    pub fn pick_most_voted(&self, ledger: &VoteLedger) -> Option<&EventDescriptor> {
        let tally = ledger.tally();
        let mut best: Option<(&EventDescriptor, u64)> = None;
        for descriptor in &self.descriptors {
            let votes = tally.get(&descriptor.id).copied().unwrap_or(0);
            // Strictly-greater keeps the earliest-declared among ties
            if best.is_none_or(|(_, top)| votes > top) {
                best = Some((descriptor, votes));
            }
        }
        best.map(|(descriptor, _)| descriptor)
    }
}
