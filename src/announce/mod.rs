//! Announcement channel
//!
//! The lifecycle driver never renders user-facing text; it emits template
//! keys with substitutions into an [`Announcer`] sink. Sinks are
//! fire-and-forget and order-preserving: the driver needs no
//! acknowledgment, but announcements emitted within one tick must reach
//! the sink in emission order.

pub mod sink;

use serde::Serialize;

pub use sink::{ChannelAnnouncer, TracingAnnouncer};

// ============================================================================
// Template keys
// ============================================================================

/// Template keys understood by announcement sinks.
///
/// Localization and final rendering happen downstream; the driver only
/// selects a key and fills `%event%`-style substitutions.
pub mod keys {
    /// Voting phase has opened.
    pub const VOTING_STARTED: &str = "event_voting_started";
    /// Voting remaining-time heartbeat.
    pub const VOTING_STATE: &str = "event_voting_state";
    /// Voting phase has closed.
    pub const VOTING_ENDED: &str = "event_voting_ended";
    /// Registration has opened (`%event%` = chosen event name).
    pub const REGISTER_STARTED: &str = "event_register_started";
    /// Registration remaining-time heartbeat (`%event%`).
    pub const REGISTER_STATE: &str = "event_register_state";
    /// Registration has closed.
    pub const REGISTER_ENDED: &str = "event_register_ended";
    /// Cycle aborted for lack of participants.
    pub const ABORTED: &str = "event_aborted";
    /// Seconds until the next cycle begins.
    pub const NEXT: &str = "event_next";
    /// Event instantiation failed.
    pub const WRONG_RUN: &str = "wrong_run";
    /// The event is live.
    pub const STARTED: &str = "event_started";
    /// The event has finished.
    pub const END: &str = "event_end";
}

// ============================================================================
// Announcement model
// ============================================================================

/// Delivery priority of an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnounceKind {
    /// Regular broadcast.
    Announce,
    /// High-priority broadcast shown prominently to players.
    Critical,
}

/// Audience of an announcement.
///
/// Derived from the engine's `global_message` configuration flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastScope {
    /// Every connected player.
    AllPlayers,
    /// Only players near the event staging area.
    NearbyPlayers,
}

/// A fully-described announcement as delivered to a sink.
///
/// [`ChannelAnnouncer`] forwards these to an embedding server;
/// recording sinks collect them in tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Announcement {
    /// A one-shot templated broadcast.
    Broadcast {
        /// Delivery priority.
        kind: AnnounceKind,
        /// Template key (see [`keys`]).
        key: String,
        /// Target audience.
        scope: BroadcastScope,
        /// `(placeholder, value)` pairs, e.g. `("%event%", "Team Deathmatch")`.
        substitutions: Vec<(String, String)>,
    },
    /// A remaining-time heartbeat.
    Countdown {
        /// Delivery priority.
        kind: AnnounceKind,
        /// Template key (see [`keys`]).
        key: String,
        /// Target audience.
        scope: BroadcastScope,
        /// Seconds remaining.
        seconds: u64,
        /// `(placeholder, value)` pairs.
        substitutions: Vec<(String, String)>,
    },
}

// ============================================================================
// Sink contract
// ============================================================================

/// Write-only sink for lifecycle announcements.
///
/// Implementations must not block: the driver calls these synchronously
/// from its tick and expects them to return immediately.
pub trait Announcer: Send + Sync {
    /// Emits a templated broadcast.
    fn announce(
        &self,
        kind: AnnounceKind,
        key: &str,
        scope: BroadcastScope,
        substitutions: &[(&str, &str)],
    );

    /// Emits a remaining-time heartbeat.
    ///
    /// The driver calls this on every tick while a countdown is live;
    /// whether every value is surfaced to players (or only display marks)
    /// is the sink's concern.
    fn announce_countdown(
        &self,
        seconds: u64,
        key: &str,
        kind: AnnounceKind,
        scope: BroadcastScope,
        substitutions: &[(&str, &str)],
    );
}

/// Converts borrowed substitution pairs into owned ones.
///
/// Shared by sinks that store or forward announcements.
#[must_use]
pub fn own_substitutions(substitutions: &[(&str, &str)]) -> Vec<(String, String)> {
    substitutions
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}
