//! Structured lifecycle journal
//!
//! Discrete, typed events emitted as the engine moves through its
//! lifecycle. Events are serialized as newline-delimited JSON (JSONL)
//! and include a monotonically increasing sequence number for ordering
//! guarantees.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::engine::EnginePhase;

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event in the engine lifecycle.
///
/// Each variant is tagged with `"type"` when serialized to JSON so
/// consumers can dispatch on the event kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// The engine scheduler has started ticking.
    EngineStarted {
        /// When the scheduler started.
        timestamp: DateTime<Utc>,
        /// Tick period in milliseconds.
        tick_period_ms: u64,
        /// Whether a voting phase precedes registration.
        voting_enabled: bool,
    },

    /// A new phase has been entered.
    PhaseEntered {
        /// When the transition occurred.
        timestamp: DateTime<Utc>,
        /// Phase that was entered.
        phase: EnginePhase,
        /// Countdown at entry.
        countdown_seconds: u64,
    },

    /// An event type was chosen for the next cycle.
    EventSelected {
        /// When the selection occurred.
        timestamp: DateTime<Utc>,
        /// Chosen event type id.
        event_type: String,
        /// `"vote"` or `"random"`.
        via: &'static str,
    },

    /// An event instance went live.
    EventStarted {
        /// When the instance started.
        timestamp: DateTime<Utc>,
        /// Instance identifier.
        instance: Uuid,
        /// Event type id.
        event_type: String,
    },

    /// A cycle was aborted back to waiting.
    CycleAborted {
        /// When the abort occurred.
        timestamp: DateTime<Utc>,
        /// Stable abort reason label.
        reason: &'static str,
    },

    /// The running event finished and the engine cleaned up.
    EventEnded {
        /// When the cleanup occurred.
        timestamp: DateTime<Utc>,
    },

    /// The engine scheduler has stopped.
    EngineStopped {
        /// When the scheduler stopped.
        timestamp: DateTime<Utc>,
        /// Human-readable stop reason.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Envelope<'a> {
    seq: u64,
    #[serde(flatten)]
    event: &'a LifecycleEvent,
}

// ---------------------------------------------------------------------------
// Journal
// ---------------------------------------------------------------------------

/// Buffered JSONL writer for [`LifecycleEvent`]s.
///
/// Each event is written as one line and flushed immediately so an
/// abrupt shutdown loses at most the event being written.
#[derive(Debug)]
pub struct EventJournal {
    writer: Mutex<BufWriter<File>>,
    seq: AtomicU64,
}

impl EventJournal {
    /// Creates (or truncates) a journal file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be created.
    pub fn create(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            seq: AtomicU64::new(0),
        })
    }

    /// Emits one event.
    ///
    /// Serialization or write failures are logged and swallowed; the
    /// journal is an observer, not a participant, and must never fail a
    /// tick.
    pub fn emit(&self, event: &LifecycleEvent) {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        let envelope = Envelope { seq, event };
        let line = match serde_json::to_string(&envelope) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize journal event");
                return;
            }
        };
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(writer, "{line}").and_then(|()| writer.flush()) {
            tracing::warn!(error = %e, "failed to write journal event");
        }
    }

    /// Number of events emitted so far.
    #[must_use]
    pub fn emitted(&self) -> u64 {
        self.seq.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_events_written_as_jsonl_with_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");
        let journal = EventJournal::create(&path).unwrap();

        journal.emit(&LifecycleEvent::EngineStarted {
            timestamp: Utc::now(),
            tick_period_ms: 1000,
            voting_enabled: true,
        });
        journal.emit(&LifecycleEvent::PhaseEntered {
            timestamp: Utc::now(),
            phase: EnginePhase::Voting,
            countdown_seconds: 300,
        });

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["seq"], 0);
        assert_eq!(lines[0]["type"], "engine_started");
        assert_eq!(lines[1]["seq"], 1);
        assert_eq!(lines[1]["type"], "phase_entered");
        assert_eq!(lines[1]["phase"], "voting");
        assert_eq!(journal.emitted(), 2);
    }

    #[test]
    fn test_abort_event_carries_reason() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");
        let journal = EventJournal::create(&path).unwrap();

        journal.emit(&LifecycleEvent::CycleAborted {
            timestamp: Utc::now(),
            reason: "insufficient_participants",
        });

        let lines = read_lines(&path);
        assert_eq!(lines[0]["reason"], "insufficient_participants");
    }
}
