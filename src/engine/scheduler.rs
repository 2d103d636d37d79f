//! Periodic engine scheduler
//!
//! Owns the [`EngineState`] and drives the [`LifecycleDriver`] on a
//! fixed period. Invocations never overlap: a single task awaits the
//! interval, and missed ticks are delayed rather than bursted. After
//! each tick a [`StatusSnapshot`] is published on a watch channel so
//! concurrent readers observe pre- or post-transition state atomically,
//! never a mix.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::announce::Announcer;
use crate::observability::{EventJournal, LifecycleEvent, metrics};
use crate::registry::{EventRegistry, ParticipantRoster, VoteLedger};

use super::driver::{LifecycleDriver, TickReport};
use super::state::{EnginePhase, EngineState};

// ============================================================================
// Status snapshots
// ============================================================================

/// Immutable view of the engine state after one tick.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusSnapshot {
    /// Current lifecycle phase.
    pub phase: EnginePhase,
    /// Seconds remaining in the current phase.
    pub countdown_seconds: u64,
    /// Display name of the selected event, when one is chosen.
    pub selected_event: Option<String>,
    /// Instance id of the live event, while one is running.
    pub active_event: Option<Uuid>,
}

// ============================================================================
// Completion signal
// ============================================================================

/// Handle given to the running-event subsystem to request the `Ended`
/// phase when its event finishes.
///
/// The scheduler consumes the signal at the start of the next tick, so
/// the phase write still happens on the scheduler task and the signal
/// never races a tick in progress.
#[derive(Debug, Clone, Default)]
pub struct EventEndSignal(Arc<AtomicBool>);

impl EventEndSignal {
    /// Creates an unsignaled handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the transition to `Ended`.
    pub fn signal(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Consumes the signal, returning whether it was set.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

// ============================================================================
// Scheduler
// ============================================================================

/// Periodic, non-overlapping driver invocation.
pub struct EngineScheduler {
    driver: LifecycleDriver,
    state: EngineState,
    registry: Arc<EventRegistry>,
    roster: Arc<ParticipantRoster>,
    votes: Arc<VoteLedger>,
    announcer: Arc<dyn Announcer>,
    journal: Option<EventJournal>,
    tick_period: Duration,
    cancel: CancellationToken,
    end_signal: EventEndSignal,
    status_tx: watch::Sender<StatusSnapshot>,
    voting_enabled: bool,
}

impl EngineScheduler {
    /// Creates a scheduler with a fresh [`EngineState`] and a one-second
    /// tick.
    #[must_use]
    pub fn new(
        driver: LifecycleDriver,
        registry: Arc<EventRegistry>,
        roster: Arc<ParticipantRoster>,
        votes: Arc<VoteLedger>,
        announcer: Arc<dyn Announcer>,
        voting_enabled: bool,
    ) -> Self {
        let (status_tx, _) = watch::channel(StatusSnapshot::default());
        Self {
            driver,
            state: EngineState::new(),
            registry,
            roster,
            votes,
            announcer,
            journal: None,
            tick_period: Duration::from_secs(1),
            cancel: CancellationToken::new(),
            end_signal: EventEndSignal::new(),
            status_tx,
            voting_enabled,
        }
    }

    /// Overrides the tick period.
    #[must_use]
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Attaches a lifecycle journal.
    #[must_use]
    pub fn with_journal(mut self, journal: EventJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Replaces the initial engine state.
    #[must_use]
    pub fn with_state(mut self, state: EngineState) -> Self {
        self.state = state;
        self
    }

    /// Subscribes to post-tick status snapshots.
    #[must_use]
    pub fn status(&self) -> watch::Receiver<StatusSnapshot> {
        self.status_tx.subscribe()
    }

    /// Token that stops the scheduler when cancelled.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Handle for the running-event subsystem to signal completion.
    #[must_use]
    pub fn end_signal(&self) -> EventEndSignal {
        self.end_signal.clone()
    }

    /// Runs the tick loop until the cancellation token fires.
    pub async fn run(mut self) {
        let started = Instant::now();
        let mut interval = tokio::time::interval(self.tick_period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            period_ms = u64::try_from(self.tick_period.as_millis()).unwrap_or(u64::MAX),
            voting_enabled = self.voting_enabled,
            "engine scheduler started"
        );
        self.emit(&LifecycleEvent::EngineStarted {
            timestamp: Utc::now(),
            tick_period_ms: u64::try_from(self.tick_period.as_millis()).unwrap_or(u64::MAX),
            voting_enabled: self.voting_enabled,
        });
        metrics::set_current_phase(self.state.phase, None);

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => {
                    debug!("engine scheduler cancelled");
                    self.emit(&LifecycleEvent::EngineStopped {
                        timestamp: Utc::now(),
                        reason: "cancelled".to_string(),
                    });
                    break;
                }
                _ = interval.tick() => {
                    self.step(started);
                }
            }
        }
    }

    /// Executes one scheduled invocation.
    fn step(&mut self, started: Instant) {
        // The running-event subsystem's completion request is applied on
        // this task, keeping the single-writer contract intact.
        if self.state.phase == EnginePhase::Running && self.end_signal.take() {
            self.state.phase = EnginePhase::Ended;
        }

        metrics::record_tick();
        match self.driver.tick(
            &mut self.state,
            &self.registry,
            &self.roster,
            &self.votes,
            self.announcer.as_ref(),
        ) {
            Ok(report) => self.observe(&report),
            Err(e) => {
                // Fatal to this invocation only; the next tick re-derives
                // a fresh decision from current state.
                error!(error = %e, phase = %self.state.phase, "tick failed");
                metrics::record_tick_error();
            }
        }

        metrics::set_countdown(self.state.countdown_seconds);
        metrics::set_participants(self.roster.count());
        metrics::set_votes(self.votes.count());
        metrics::set_uptime(started.elapsed());

        self.status_tx.send_replace(StatusSnapshot {
            phase: self.state.phase,
            countdown_seconds: self.state.countdown_seconds,
            selected_event: self.state.selected_event.as_ref().map(|d| d.name.clone()),
            active_event: self.state.active_event.as_ref().map(|i| i.id),
        });
    }

    /// Translates a tick report into metrics and journal entries.
    fn observe(&self, report: &TickReport) {
        if let Some(id) = &report.selected {
            let via = if report
                .transition
                .is_some_and(|(from, _)| from == EnginePhase::Voting)
            {
                "vote"
            } else {
                "random"
            };
            self.emit(&LifecycleEvent::EventSelected {
                timestamp: Utc::now(),
                event_type: id.to_string(),
                via,
            });
        }

        if let Some(started_event) = &report.started {
            metrics::record_event_started();
            self.emit(&LifecycleEvent::EventStarted {
                timestamp: Utc::now(),
                instance: started_event.instance,
                event_type: started_event.event_type.to_string(),
            });
        }

        if let Some(reason) = report.aborted {
            metrics::record_cycle_aborted(reason.as_str());
            self.emit(&LifecycleEvent::CycleAborted {
                timestamp: Utc::now(),
                reason: reason.as_str(),
            });
        }

        if let Some((from, to)) = report.transition {
            metrics::record_phase_transition(from, to);
            metrics::set_current_phase(to, Some(from));
            if from == EnginePhase::Ended {
                metrics::record_event_completed();
                self.emit(&LifecycleEvent::EventEnded {
                    timestamp: Utc::now(),
                });
            }
            self.emit(&LifecycleEvent::PhaseEntered {
                timestamp: Utc::now(),
                phase: to,
                countdown_seconds: self.state.countdown_seconds,
            });
        }
    }

    fn emit(&self, event: &LifecycleEvent) {
        if let Some(journal) = &self.journal {
            journal.emit(event);
        }
    }
}

impl std::fmt::Debug for EngineScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineScheduler")
            .field("phase", &self.state.phase)
            .field("countdown_seconds", &self.state.countdown_seconds)
            .field("tick_period", &self.tick_period)
            .finish_non_exhaustive()
    }
}
