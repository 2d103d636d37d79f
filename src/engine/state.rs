//! Engine phases and mutable engine state
//!
//! [`EngineState`] is a plain record owned by the scheduler task and
//! handed to the driver by `&mut` on every tick. The driver is the only
//! writer of `phase` apart from the running-event subsystem's end
//! signal; concurrent readers observe snapshots published by the
//! scheduler, never this struct directly.

use serde::{Deserialize, Serialize};

use crate::registry::{EventDescriptor, EventInstance};

// ============================================================================
// Phases
// ============================================================================

/// One discrete stage of the event lifecycle.
///
/// The cycle is `Waiting → (Voting) → Registration → RunningSetup →
/// Running → Ended → Waiting`; voting is skipped when disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnginePhase {
    /// Idle between cycles, counting down to the next one.
    #[default]
    Waiting,
    /// Players vote on the next event type.
    Voting,
    /// Players sign up for the chosen event.
    Registration,
    /// The chosen event is being instantiated.
    RunningSetup,
    /// The event is live; the running-event subsystem owns pacing.
    Running,
    /// The event finished; cleanup pending.
    Ended,
}

impl EnginePhase {
    /// Stable snake_case name, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Voting => "voting",
            Self::Registration => "registration",
            Self::RunningSetup => "running_setup",
            Self::Running => "running",
            Self::Ended => "ended",
        }
    }
}

impl std::fmt::Display for EnginePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// State
// ============================================================================

/// Mutable lifecycle state for one engine.
///
/// Invariants: `active_event` is non-`None` only while the phase is
/// `Running` (it is being created during `RunningSetup`);
/// `selected_event` is non-`None` from selection until cleanup.
#[derive(Debug, Default)]
pub struct EngineState {
    /// Current lifecycle phase.
    pub phase: EnginePhase,
    /// Seconds remaining in the current phase.
    pub countdown_seconds: u64,
    /// The event type chosen to run next.
    pub selected_event: Option<EventDescriptor>,
    /// The live, running event.
    pub active_event: Option<EventInstance>,
}

impl EngineState {
    /// Creates a fresh state: `Waiting` with an elapsed countdown, so
    /// the first tick starts a cycle immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the per-cycle selections.
    ///
    /// Idempotent; `phase` and `countdown_seconds` are left for the
    /// driver to set. Roster and vote bookkeeping are cleared by their
    /// owners, not here.
    pub fn cleanup(&mut self) {
        self.selected_event = None;
        self.active_event = None;
    }
}
