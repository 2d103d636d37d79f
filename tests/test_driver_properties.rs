//! Property tests for the lifecycle driver.
//!
//! From any reachable state, one tick performs at most one phase write
//! and at most one countdown write, never underflows the countdown, and
//! keeps the active-event invariant intact.

mod common;

use arenaloop::engine::{EnginePhase, EngineState, LifecycleDriver};
use arenaloop::registry::{ParticipantRoster, PlayerId, VoteLedger};
use proptest::prelude::*;

use common::{RecordingAnnouncer, short_config, two_event_registry};

const ALL_PHASES: [EnginePhase; 6] = [
    EnginePhase::Waiting,
    EnginePhase::Voting,
    EnginePhase::Registration,
    EnginePhase::RunningSetup,
    EnginePhase::Running,
    EnginePhase::Ended,
];

/// Allowed successor phases per entry phase.
fn allowed_successors(phase: EnginePhase) -> Vec<EnginePhase> {
    match phase {
        EnginePhase::Waiting => vec![
            EnginePhase::Waiting,
            EnginePhase::Voting,
            EnginePhase::Registration,
        ],
        EnginePhase::Voting => vec![EnginePhase::Voting, EnginePhase::Registration],
        EnginePhase::Registration => vec![
            EnginePhase::Registration,
            EnginePhase::Waiting,
            EnginePhase::RunningSetup,
        ],
        EnginePhase::RunningSetup => vec![EnginePhase::Running, EnginePhase::Waiting],
        EnginePhase::Running => vec![EnginePhase::Running],
        EnginePhase::Ended => vec![EnginePhase::Waiting],
    }
}

/// Builds a state that satisfies the engine invariants for `phase`.
fn reachable_state(
    phase: EnginePhase,
    countdown: u64,
    roster: &ParticipantRoster,
) -> EngineState {
    let registry = two_event_registry();
    let mut state = EngineState {
        phase,
        countdown_seconds: countdown,
        ..EngineState::new()
    };
    if matches!(
        phase,
        EnginePhase::Registration | EnginePhase::RunningSetup | EnginePhase::Running
    ) {
        let descriptor = registry.pick_most_voted(&VoteLedger::new()).unwrap().clone();
        if phase == EnginePhase::Running {
            // Needs at least the per-event floor to instantiate
            state.active_event = descriptor.instantiate(roster);
        }
        state.selected_event = Some(descriptor);
    }
    state
}

proptest! {
    #[test]
    fn one_tick_obeys_the_state_machine_contract(
        phase_index in 0usize..6,
        countdown in 0u64..7200,
        participants in 0u64..12,
        min_participants in 1u64..6,
        voting_enabled: bool,
    ) {
        let phase = ALL_PHASES[phase_index];
        let roster = ParticipantRoster::new();
        for i in 0..participants {
            roster.register(PlayerId(i), format!("player{i}"));
        }
        // Running requires a live instance; skip inputs that cannot build one
        let mut state = reachable_state(phase, countdown, &roster);
        prop_assume!(phase != EnginePhase::Running || state.active_event.is_some());

        let config = short_config(voting_enabled, min_participants);
        let voting_secs = config.voting_seconds();
        let registration_secs = config.registration_seconds();
        let interval_secs = config.interval_seconds();

        let driver = LifecycleDriver::new(config);
        let registry = two_event_registry();
        let votes = VoteLedger::new();
        let sink = RecordingAnnouncer::new();

        let report = driver
            .tick(&mut state, &registry, &roster, &votes, &sink)
            .expect("reachable states always tick cleanly");

        // At most one phase write, to an allowed successor
        match report.transition {
            None => prop_assert_eq!(state.phase, phase),
            Some((from, to)) => {
                prop_assert_eq!(from, phase);
                prop_assert_eq!(state.phase, to);
                prop_assert_ne!(to, phase);
            }
        }
        prop_assert!(allowed_successors(phase).contains(&state.phase));

        // At most one countdown write: untouched while running, else a
        // decrement floored at zero or a configured reset
        if phase == EnginePhase::Running {
            prop_assert_eq!(state.countdown_seconds, countdown);
        } else {
            let decremented = countdown.saturating_sub(1);
            let resets = [voting_secs, registration_secs, interval_secs];
            prop_assert!(
                state.countdown_seconds == decremented
                    || resets.contains(&state.countdown_seconds),
                "countdown {} not a decrement of {} nor a reset",
                state.countdown_seconds,
                countdown,
            );
        }

        // Active event exists exactly while running
        prop_assert_eq!(
            state.active_event.is_some(),
            state.phase == EnginePhase::Running
        );

        // Selected event exists in every phase that needs it
        if matches!(
            state.phase,
            EnginePhase::Registration | EnginePhase::RunningSetup | EnginePhase::Running
        ) {
            prop_assert!(state.selected_event.is_some());
        }
    }
}
