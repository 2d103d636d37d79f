//! Lifecycle driver
//!
//! The single component that decides, on every tick, whether to remain
//! in the current phase, broadcast a status update, or transition to the
//! next phase. Each phase has one planner returning an explicit
//! [`TickPlan`] (an ordered effect list plus an optional next phase)
//! which is then applied to the engine state. Planning never mutates, so
//! a collaborator failure mid-decision cannot commit a partial
//! transition, and the transition table is unit-testable without a live
//! scheduler.

use tracing::{debug, info};

use crate::announce::{AnnounceKind, Announcer, BroadcastScope, keys};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::registry::{
    EventDescriptor, EventInstance, EventRegistry, EventTypeId, ParticipantRoster, VoteLedger,
};

use super::state::{EnginePhase, EngineState};

// ============================================================================
// Plans and effects
// ============================================================================

/// One ordered side effect of a tick decision.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Emit a templated broadcast.
    Announce {
        /// Delivery priority.
        kind: AnnounceKind,
        /// Template key.
        key: &'static str,
        /// `(placeholder, value)` pairs.
        substitutions: Vec<(String, String)>,
    },
    /// Emit a remaining-time heartbeat.
    AnnounceCountdown {
        /// Delivery priority.
        kind: AnnounceKind,
        /// Template key.
        key: &'static str,
        /// Seconds remaining.
        seconds: u64,
        /// `(placeholder, value)` pairs.
        substitutions: Vec<(String, String)>,
    },
    /// Write a fresh countdown (suppresses the end-of-tick decrement).
    SetCountdown(u64),
    /// Record the event type chosen for the next cycle.
    SelectEvent(EventDescriptor),
    /// Record the freshly instantiated live event.
    StartEvent(EventInstance),
    /// Clear per-cycle state: selections, roster, and votes.
    Cleanup,
}

/// Why a cycle was aborted back to `Waiting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// Too few participants at the registration deadline.
    InsufficientParticipants,
    /// The chosen event failed to instantiate.
    InstantiationFailed,
}

impl AbortReason {
    /// Stable label used in metrics and the journal.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InsufficientParticipants => "insufficient_participants",
            Self::InstantiationFailed => "instantiation_failed",
        }
    }
}

/// The decision for one tick: ordered effects plus an optional phase
/// transition.
#[derive(Debug, Default)]
pub struct TickPlan {
    /// Effects to apply, in order.
    pub effects: Vec<Effect>,
    /// Phase to enter, or `None` to stay.
    pub next: Option<EnginePhase>,
    /// Set when this plan aborts the cycle.
    pub aborted: Option<AbortReason>,
}

impl TickPlan {
    /// A plan that stays in the current phase with no effects.
    #[must_use]
    fn stay() -> Self {
        Self::default()
    }
}

/// A started event, as surfaced in the tick report.
#[derive(Debug, Clone)]
pub struct StartedEvent {
    /// Instance identifier.
    pub instance: uuid::Uuid,
    /// Event type the instance was created from.
    pub event_type: EventTypeId,
}

/// What one tick did, for the scheduler's metrics and journal.
#[derive(Debug, Default)]
pub struct TickReport {
    /// `(from, to)` when a phase transition occurred.
    pub transition: Option<(EnginePhase, EnginePhase)>,
    /// Number of announcements emitted.
    pub announcements: usize,
    /// Event type selected this tick, if any.
    pub selected: Option<EventTypeId>,
    /// Event instance started this tick, if any.
    pub started: Option<StartedEvent>,
    /// Set when the cycle was aborted this tick.
    pub aborted: Option<AbortReason>,
    /// Whether per-cycle state was cleared this tick.
    pub cleaned_up: bool,
    countdown_written: bool,
}

// ============================================================================
// Driver
// ============================================================================

/// The lifecycle state machine.
///
/// Stateless apart from configuration: every decision is re-derived from
/// the [`EngineState`] and collaborator facts passed in, so the periodic
/// re-invocation model is itself the retry mechanism. No retry counters
/// live here.
#[derive(Debug, Clone)]
pub struct LifecycleDriver {
    config: EngineConfig,
    scope: BroadcastScope,
}

impl LifecycleDriver {
    /// Creates a driver for the given engine configuration.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let scope = config.broadcast_scope();
        Self { config, scope }
    }

    /// Returns the configured broadcast scope.
    #[must_use]
    pub const fn scope(&self) -> BroadcastScope {
        self.scope
    }

    /// Executes one tick: plan for the entry phase, apply the effects in
    /// order, then write the countdown.
    ///
    /// Per invocation there is at most one phase write and at most one
    /// countdown write. The countdown is decremented unless the entry
    /// phase is `Running` (the live event owns its own pacing) or the
    /// plan carried a fresh [`Effect::SetCountdown`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] on invariant violations: `Running` with
    /// no active event, a deadline with no selected event, or selection
    /// against an empty registry. No state is mutated in that case.
    pub fn tick(
        &self,
        state: &mut EngineState,
        registry: &EventRegistry,
        roster: &ParticipantRoster,
        votes: &VoteLedger,
        announcer: &dyn Announcer,
    ) -> Result<TickReport, EngineError> {
        let entry_phase = state.phase;
        let plan = self.plan(state, registry, roster, votes)?;
        let mut report = self.apply(plan, state, roster, votes, announcer);

        if entry_phase != EnginePhase::Running && !report.countdown_written {
            state.countdown_seconds = state.countdown_seconds.saturating_sub(1);
        }

        if let Some((from, to)) = report.transition {
            info!(%from, %to, "phase transition");
        }
        Ok(report)
    }

    /// Computes the decision for the current phase without mutating
    /// anything.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] on invariant violations; see [`Self::tick`].
    pub fn plan(
        &self,
        state: &EngineState,
        registry: &EventRegistry,
        roster: &ParticipantRoster,
        votes: &VoteLedger,
    ) -> Result<TickPlan, EngineError> {
        match state.phase {
            EnginePhase::Waiting => self.plan_waiting(state, registry),
            EnginePhase::Voting => self.plan_voting(state, registry, votes),
            EnginePhase::Registration => self.plan_registration(state, roster),
            EnginePhase::RunningSetup => self.plan_running_setup(state, roster),
            EnginePhase::Running => Self::plan_running(state),
            EnginePhase::Ended => self.plan_ended(),
        }
    }

    fn plan_waiting(
        &self,
        state: &EngineState,
        registry: &EventRegistry,
    ) -> Result<TickPlan, EngineError> {
        if state.countdown_seconds > 0 {
            return Ok(TickPlan::stay());
        }

        if self.config.voting_enabled {
            return Ok(TickPlan {
                effects: vec![
                    announce(keys::VOTING_STARTED, vec![]),
                    Effect::SetCountdown(self.config.voting_seconds()),
                ],
                next: Some(EnginePhase::Voting),
                aborted: None,
            });
        }

        let chosen = registry.pick_random().ok_or(EngineError::EmptyRegistry)?;
        Ok(TickPlan {
            effects: vec![
                Effect::SelectEvent(chosen.clone()),
                Effect::SetCountdown(self.config.registration_seconds()),
                announce(keys::REGISTER_STARTED, event_subs(chosen)),
            ],
            next: Some(EnginePhase::Registration),
            aborted: None,
        })
    }

    fn plan_voting(
        &self,
        state: &EngineState,
        registry: &EventRegistry,
        votes: &VoteLedger,
    ) -> Result<TickPlan, EngineError> {
        if state.countdown_seconds > 0 {
            return Ok(TickPlan {
                effects: vec![countdown(keys::VOTING_STATE, state.countdown_seconds, vec![])],
                next: None,
                aborted: None,
            });
        }

        let winner = registry
            .pick_most_voted(votes)
            .ok_or(EngineError::EmptyRegistry)?;
        Ok(TickPlan {
            effects: vec![
                Effect::SelectEvent(winner.clone()),
                Effect::SetCountdown(self.config.registration_seconds()),
                announce(keys::VOTING_ENDED, vec![]),
                announce(keys::REGISTER_STARTED, event_subs(winner)),
            ],
            next: Some(EnginePhase::Registration),
            aborted: None,
        })
    }

    fn plan_registration(
        &self,
        state: &EngineState,
        roster: &ParticipantRoster,
    ) -> Result<TickPlan, EngineError> {
        let selected = state
            .selected_event
            .as_ref()
            .ok_or(EngineError::MissingSelectedEvent {
                phase: EnginePhase::Registration.as_str(),
            })?;

        if state.countdown_seconds > 0 {
            return Ok(TickPlan {
                effects: vec![countdown(
                    keys::REGISTER_STATE,
                    state.countdown_seconds,
                    event_subs(selected),
                )],
                next: None,
                aborted: None,
            });
        }

        if roster.count() < self.config.min_participants {
            let interval = self.config.interval_seconds();
            return Ok(TickPlan {
                effects: vec![
                    Effect::Cleanup,
                    Effect::SetCountdown(interval),
                    announce(keys::ABORTED, vec![]),
                    countdown(keys::NEXT, interval, vec![]),
                ],
                next: Some(EnginePhase::Waiting),
                aborted: Some(AbortReason::InsufficientParticipants),
            });
        }

        Ok(TickPlan {
            effects: vec![announce(keys::REGISTER_ENDED, vec![])],
            next: Some(EnginePhase::RunningSetup),
            aborted: None,
        })
    }

    fn plan_running_setup(
        &self,
        state: &EngineState,
        roster: &ParticipantRoster,
    ) -> Result<TickPlan, EngineError> {
        let selected = state
            .selected_event
            .as_ref()
            .ok_or(EngineError::MissingSelectedEvent {
                phase: EnginePhase::RunningSetup.as_str(),
            })?;

        selected.instantiate(roster).map_or_else(
            || {
                debug!(event = %selected.id, "event instantiation failed");
                let interval = self.config.interval_seconds();
                Ok(TickPlan {
                    effects: vec![
                        Effect::Cleanup,
                        Effect::SetCountdown(interval),
                        announce(keys::WRONG_RUN, vec![]),
                        countdown(keys::NEXT, interval, vec![]),
                    ],
                    next: Some(EnginePhase::Waiting),
                    aborted: Some(AbortReason::InstantiationFailed),
                })
            },
            |instance| {
                Ok(TickPlan {
                    effects: vec![
                        Effect::StartEvent(instance),
                        announce(keys::STARTED, vec![]),
                    ],
                    next: Some(EnginePhase::Running),
                    aborted: None,
                })
            },
        )
    }

    fn plan_running(state: &EngineState) -> Result<TickPlan, EngineError> {
        if state.active_event.is_none() {
            return Err(EngineError::MissingActiveEvent);
        }
        // The running-event subsystem owns pacing and requests `Ended`
        Ok(TickPlan::stay())
    }

    fn plan_ended(&self) -> Result<TickPlan, EngineError> {
        let interval = self.config.interval_seconds();
        Ok(TickPlan {
            effects: vec![
                Effect::Cleanup,
                Effect::SetCountdown(interval),
                announce(keys::END, vec![]),
                countdown(keys::NEXT, interval, vec![]),
            ],
            next: Some(EnginePhase::Waiting),
            aborted: None,
        })
    }

    /// Applies a plan: effects in order, then the phase write.
    fn apply(
        &self,
        plan: TickPlan,
        state: &mut EngineState,
        roster: &ParticipantRoster,
        votes: &VoteLedger,
        announcer: &dyn Announcer,
    ) -> TickReport {
        let mut report = TickReport {
            aborted: plan.aborted,
            ..TickReport::default()
        };

        for effect in plan.effects {
            match effect {
                Effect::Announce {
                    kind,
                    key,
                    substitutions,
                } => {
                    announcer.announce(kind, key, self.scope, &borrow_subs(&substitutions));
                    crate::observability::metrics::record_announcement(key);
                    report.announcements += 1;
                }
                Effect::AnnounceCountdown {
                    kind,
                    key,
                    seconds,
                    substitutions,
                } => {
                    announcer.announce_countdown(
                        seconds,
                        key,
                        kind,
                        self.scope,
                        &borrow_subs(&substitutions),
                    );
                    crate::observability::metrics::record_announcement(key);
                    report.announcements += 1;
                }
                Effect::SetCountdown(seconds) => {
                    state.countdown_seconds = seconds;
                    report.countdown_written = true;
                }
                Effect::SelectEvent(descriptor) => {
                    report.selected = Some(descriptor.id.clone());
                    state.selected_event = Some(descriptor);
                }
                Effect::StartEvent(instance) => {
                    report.started = Some(StartedEvent {
                        instance: instance.id,
                        event_type: instance.event_type.clone(),
                    });
                    state.active_event = Some(instance);
                }
                Effect::Cleanup => {
                    state.cleanup();
                    roster.clear();
                    votes.clear();
                    report.cleaned_up = true;
                }
            }
        }

        if let Some(next) = plan.next {
            report.transition = Some((state.phase, next));
            state.phase = next;
        }

        report
    }
}

fn announce(key: &'static str, substitutions: Vec<(String, String)>) -> Effect {
    Effect::Announce {
        kind: AnnounceKind::Critical,
        key,
        substitutions,
    }
}

fn countdown(key: &'static str, seconds: u64, substitutions: Vec<(String, String)>) -> Effect {
    Effect::AnnounceCountdown {
        kind: AnnounceKind::Critical,
        key,
        seconds,
        substitutions,
    }
}

fn event_subs(descriptor: &EventDescriptor) -> Vec<(String, String)> {
    vec![("%event%".to_string(), descriptor.name.clone())]
}

fn borrow_subs(substitutions: &[(String, String)]) -> Vec<(&str, &str)> {
    substitutions
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}
