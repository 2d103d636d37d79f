//! Announcement sink implementations
//!
//! Two production sinks: [`TracingAnnouncer`] renders announcements as
//! structured log lines, [`ChannelAnnouncer`] forwards typed
//! [`Announcement`] values to an embedding game server over a broadcast
//! channel.

use tokio::sync::broadcast;
use tracing::info;

use super::{Announcement, AnnounceKind, Announcer, BroadcastScope, own_substitutions};

// ============================================================================
// Tracing sink
// ============================================================================

/// Sink that renders announcements as structured `tracing` events.
///
/// Countdown heartbeats arrive once per second; only display marks
/// (whole minutes, 30 seconds, and the final 10 seconds) are logged so
/// the output matches what players would see.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnnouncer;

impl TracingAnnouncer {
    /// Creates a new tracing sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Returns whether a countdown value is a display mark.
///
/// Marks are whole minutes, the 30-second warning, and each of the final
/// 10 seconds. Zero is never a mark; phase transitions announce
/// themselves.
#[must_use]
pub const fn is_display_mark(seconds: u64) -> bool {
    seconds > 0 && (seconds % 60 == 0 || seconds == 30 || seconds <= 10)
}

impl Announcer for TracingAnnouncer {
    fn announce(
        &self,
        kind: AnnounceKind,
        key: &str,
        scope: BroadcastScope,
        substitutions: &[(&str, &str)],
    ) {
        info!(?kind, ?scope, ?substitutions, "announce {key}");
    }

    fn announce_countdown(
        &self,
        seconds: u64,
        key: &str,
        kind: AnnounceKind,
        scope: BroadcastScope,
        substitutions: &[(&str, &str)],
    ) {
        if is_display_mark(seconds) {
            info!(?kind, ?scope, seconds, ?substitutions, "countdown {key}");
        }
    }
}

// ============================================================================
// Channel sink
// ============================================================================

/// Sink that forwards announcements to subscribers over a tokio
/// broadcast channel.
///
/// Sends are fire-and-forget: with no live subscribers the value is
/// dropped, which matches the driver's no-acknowledgment contract.
#[derive(Debug)]
pub struct ChannelAnnouncer {
    tx: broadcast::Sender<Announcement>,
}

impl ChannelAnnouncer {
    /// Creates a sink with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribes a new receiver to the announcement stream.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Announcement> {
        self.tx.subscribe()
    }
}

impl Announcer for ChannelAnnouncer {
    fn announce(
        &self,
        kind: AnnounceKind,
        key: &str,
        scope: BroadcastScope,
        substitutions: &[(&str, &str)],
    ) {
        let _ = self.tx.send(Announcement::Broadcast {
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
        let _ = self.tx.send(Announcement::Countdown {
            kind,
            key: key.to_string(),
            scope,
            seconds,
            substitutions: own_substitutions(substitutions),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announce::keys;

    #[test]
    fn test_display_marks() {
        assert!(is_display_mark(600));
        assert!(is_display_mark(60));
        assert!(is_display_mark(30));
        assert!(is_display_mark(10));
        assert!(is_display_mark(1));
        assert!(!is_display_mark(0));
        assert!(!is_display_mark(45));
        assert!(!is_display_mark(11));
    }

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let sink = ChannelAnnouncer::new(16);
        let mut rx = sink.subscribe();

        sink.announce(
            AnnounceKind::Critical,
            keys::VOTING_ENDED,
            BroadcastScope::AllPlayers,
            &[],
        );
        sink.announce(
            AnnounceKind::Critical,
            keys::REGISTER_STARTED,
            BroadcastScope::AllPlayers,
            &[("%event%", "Deathmatch")],
        );

        match rx.try_recv().unwrap() {
            Announcement::Broadcast { key, .. } => assert_eq!(key, keys::VOTING_ENDED),
            other => panic!("unexpected announcement: {other:?}"),
        }
        match rx.try_recv().unwrap() {
            Announcement::Broadcast { key, substitutions, .. } => {
                assert_eq!(key, keys::REGISTER_STARTED);
                assert_eq!(substitutions[0].1, "Deathmatch");
            }
            other => panic!("unexpected announcement: {other:?}"),
        }
    }

    #[test]
    fn test_channel_sink_without_subscribers_does_not_panic() {
        let sink = ChannelAnnouncer::new(4);
        sink.announce(
            AnnounceKind::Announce,
            keys::END,
            BroadcastScope::NearbyPlayers,
            &[],
        );
        sink.announce_countdown(
            30,
            keys::NEXT,
            AnnounceKind::Announce,
            BroadcastScope::NearbyPlayers,
            &[],
        );
    }

    #[test]
    fn test_countdown_carries_seconds() {
        let sink = ChannelAnnouncer::new(4);
        let mut rx = sink.subscribe();
        sink.announce_countdown(
            42,
            keys::VOTING_STATE,
            AnnounceKind::Critical,
            BroadcastScope::AllPlayers,
            &[],
        );
        match rx.try_recv().unwrap() {
            Announcement::Countdown { seconds, key, .. } => {
                assert_eq!(seconds, 42);
                assert_eq!(key, keys::VOTING_STATE);
            }
            other => panic!("unexpected announcement: {other:?}"),
        }
    }
}
