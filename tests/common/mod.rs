//! Shared test helpers
#![allow(dead_code)] // each integration test binary uses a subset

use std::sync::Mutex;

use arenaloop::announce::{
    AnnounceKind, Announcement, Announcer, BroadcastScope, own_substitutions,
};
use arenaloop::config::EngineConfig;
use arenaloop::registry::{EventDescriptor, EventRegistry, EventTypeId};

/// Announcement sink that records everything in emission order.
#[derive(Debug, Default)]
pub struct RecordingAnnouncer {
    recorded: Mutex<Vec<Announcement>>,
}

impl RecordingAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Template keys of all recorded announcements, in order.
    pub fn keys(&self) -> Vec<String> {
        self.recorded
            .lock()
            .unwrap()
            .iter()
            .map(|a| match a {
                Announcement::Broadcast { key, .. } | Announcement::Countdown { key, .. } => {
                    key.clone()
                }
            })
            .collect()
    }

    /// Drains and returns the recorded announcements.
    pub fn take(&self) -> Vec<Announcement> {
        std::mem::take(&mut self.recorded.lock().unwrap())
    }
}

impl Announcer for RecordingAnnouncer {
    fn announce(
        &self,
        kind: AnnounceKind,
        key: &str,
        scope: BroadcastScope,
        substitutions: &[(&str, &str)],
    ) {
        self.recorded.lock().unwrap().push(Announcement::Broadcast {
            kind,
            key: key.to_string(),
            scope,
            substitutions: own_substitutions(substitutions),
        });
    }

    fn announce_countdown(
        &self,
        seconds: u64,
        key: &str,
        kind: AnnounceKind,
        scope: BroadcastScope,
        substitutions: &[(&str, &str)],
    ) {
        self.recorded.lock().unwrap().push(Announcement::Countdown {
            kind,
            key: key.to_string(),
            scope,
            seconds,
            substitutions: own_substitutions(substitutions),
        });
    }
}

/// Engine configuration with one-minute phases for fast tick counts.
pub fn short_config(voting_enabled: bool, min_participants: u64) -> EngineConfig {
    EngineConfig {
        voting_enabled,
        voting_minutes: 1,
        registration_minutes: 1,
        interval_minutes: 1,
        min_participants,
        global_message: true,
    }
}

/// Registry with two event types declared in a fixed order.
pub fn two_event_registry() -> EventRegistry {
    EventRegistry::new(vec![
        EventDescriptor {
            id: EventTypeId::new("dm"),
            name: "Team Deathmatch".to_string(),
            min_participants: 2,
        },
        EventDescriptor {
            id: EventTypeId::new("ctf"),
            name: "Capture the Flag".to_string(),
            min_participants: 2,
        },
    ])
}
