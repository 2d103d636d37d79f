//! Configuration schema types
//!
//! Types deserialized from the YAML engine configuration. The engine
//! section is immutable for the duration of a cycle; a reload between
//! cycles swaps the whole `Arc<RootConfig>`.

use serde::{Deserialize, Serialize};

use crate::announce::BroadcastScope;

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Root configuration for an `arenaloop` engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RootConfig {
    /// Lifecycle timing, thresholds, and feature flags.
    pub engine: EngineConfig,

    /// Selectable event types, in declaration order.
    ///
    /// Declaration order is load-bearing: it is the tie-break order for
    /// vote tallies.
    pub events: Vec<EventTypeConfig>,
}

// ============================================================================
// Engine Section
// ============================================================================

/// Lifecycle timings, thresholds, and feature flags.
///
/// Minute-based fields are stored as configured and converted to seconds
/// at the point of use via the `*_seconds` helpers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Whether a voting phase precedes registration.
    #[serde(default)]
    pub voting_enabled: bool,

    /// Length of the voting phase, in minutes.
    #[serde(default = "default_voting_minutes")]
    pub voting_minutes: u64,

    /// Length of the registration phase, in minutes.
    #[serde(default = "default_registration_minutes")]
    pub registration_minutes: u64,

    /// Idle time between cycles, in minutes.
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,

    /// Minimum registered participants required to start an event.
    #[serde(default = "default_min_participants")]
    pub min_participants: u64,

    /// Whether announcements target all players or only nearby ones.
    #[serde(default = "default_global_message")]
    pub global_message: bool,
}

const fn default_voting_minutes() -> u64 {
    5
}

const fn default_registration_minutes() -> u64 {
    10
}

const fn default_interval_minutes() -> u64 {
    60
}

const fn default_min_participants() -> u64 {
    2
}

const fn default_global_message() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            voting_enabled: false,
            voting_minutes: default_voting_minutes(),
            registration_minutes: default_registration_minutes(),
            interval_minutes: default_interval_minutes(),
            min_participants: default_min_participants(),
            global_message: default_global_message(),
        }
    }
}

impl EngineConfig {
    /// Voting phase length in seconds.
    #[must_use]
    pub const fn voting_seconds(&self) -> u64 {
        self.voting_minutes * 60
    }

    /// Registration phase length in seconds.
    #[must_use]
    pub const fn registration_seconds(&self) -> u64 {
        self.registration_minutes * 60
    }

    /// Inter-cycle idle time in seconds.
    #[must_use]
    pub const fn interval_seconds(&self) -> u64 {
        self.interval_minutes * 60
    }

    /// Broadcast scope derived from the `global_message` flag.
    #[must_use]
    pub const fn broadcast_scope(&self) -> BroadcastScope {
        if self.global_message {
            BroadcastScope::AllPlayers
        } else {
            BroadcastScope::NearbyPlayers
        }
    }
}

// ============================================================================
// Event Types
// ============================================================================

/// A selectable event type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventTypeConfig {
    /// Stable identifier used in votes and the journal.
    pub id: String,

    /// Display name substituted into announcements.
    pub name: String,

    /// Per-event participant floor; overrides `engine.min_participants`
    /// at instantiation time when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_participants: Option<u64>,
}
