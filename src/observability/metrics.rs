//! Metrics collection
//!
//! Prometheus-compatible metrics for the lifecycle engine. Phase names
//! and template keys form closed sets defined in this crate, so labels
//! need no cardinality protection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::engine::EnginePhase;
use crate::error::ArenaLoopError;

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initializes the global metrics recorder.
///
/// When `port` is `Some`, a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`. When `None`, the recorder is installed without an
/// HTTP endpoint (metrics are recorded internally and can be read
/// programmatically).
///
/// # Errors
///
/// Returns `ArenaLoopError::Io` if the recorder or HTTP listener cannot
/// be installed (e.g. port already in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), ArenaLoopError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| ArenaLoopError::Io(std::io::Error::other(e.to_string())))?;

    describe_metrics();
    Ok(())
}

/// Registers metric descriptions with the global recorder.
fn describe_metrics() {
    describe_counter!("arenaloop_ticks_total", "Total lifecycle ticks executed");
    describe_counter!(
        "arenaloop_tick_errors_total",
        "Ticks that failed with an engine invariant violation"
    );
    describe_counter!(
        "arenaloop_phase_transitions_total",
        "Total number of phase transitions"
    );
    describe_counter!(
        "arenaloop_announcements_total",
        "Announcements emitted, by template key"
    );
    describe_counter!(
        "arenaloop_cycles_aborted_total",
        "Cycles aborted back to waiting, by reason"
    );
    describe_counter!("arenaloop_events_started_total", "Event instances started");
    describe_counter!(
        "arenaloop_events_completed_total",
        "Event instances that ran to completion"
    );
    describe_gauge!("arenaloop_current_phase", "Currently active phase (1 = active)");
    describe_gauge!(
        "arenaloop_countdown_seconds",
        "Seconds remaining in the current phase"
    );
    describe_gauge!(
        "arenaloop_participants_registered",
        "Participants registered for the current cycle"
    );
    describe_gauge!("arenaloop_votes_cast", "Votes cast in the current cycle");
    describe_gauge!("arenaloop_uptime_seconds", "Engine uptime in seconds");
}

/// Records one executed tick.
pub fn record_tick() {
    counter!("arenaloop_ticks_total").increment(1);
}

/// Records a tick that failed with an engine error.
pub fn record_tick_error() {
    counter!("arenaloop_tick_errors_total").increment(1);
}

/// Records a phase transition.
pub fn record_phase_transition(from: EnginePhase, to: EnginePhase) {
    counter!(
        "arenaloop_phase_transitions_total",
        "from" => from.as_str(),
        "to" => to.as_str(),
    )
    .increment(1);
}

/// Sets the currently active phase gauge.
///
/// Zeros out the previous phase label (if any) before setting the new
/// one, preventing stale labels from showing `1.0` in Prometheus.
pub fn set_current_phase(phase: EnginePhase, previous: Option<EnginePhase>) {
    if let Some(prev) = previous {
        gauge!("arenaloop_current_phase", "phase" => prev.as_str()).set(0.0);
    }
    gauge!("arenaloop_current_phase", "phase" => phase.as_str()).set(1.0);
}

/// Sets the countdown gauge.
#[allow(clippy::cast_precision_loss)]
pub fn set_countdown(seconds: u64) {
    gauge!("arenaloop_countdown_seconds").set(seconds as f64);
}

/// Records an emitted announcement by template key.
pub fn record_announcement(key: &'static str) {
    counter!("arenaloop_announcements_total", "key" => key).increment(1);
}

/// Records an aborted cycle.
pub fn record_cycle_aborted(reason: &'static str) {
    counter!("arenaloop_cycles_aborted_total", "reason" => reason).increment(1);
}

/// Records a started event instance.
pub fn record_event_started() {
    counter!("arenaloop_events_started_total").increment(1);
}

/// Records an event instance that ran to completion.
pub fn record_event_completed() {
    counter!("arenaloop_events_completed_total").increment(1);
}

/// Sets the registered-participants gauge.
#[allow(clippy::cast_precision_loss)]
pub fn set_participants(count: u64) {
    gauge!("arenaloop_participants_registered").set(count as f64);
}

/// Sets the votes-cast gauge.
#[allow(clippy::cast_precision_loss)]
pub fn set_votes(count: u64) {
    gauge!("arenaloop_votes_cast").set(count as f64);
}

/// Sets the engine uptime gauge.
pub fn set_uptime(duration: Duration) {
    gauge!("arenaloop_uptime_seconds").set(duration.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_functions_do_not_panic_without_recorder() {
        // metrics macros silently no-op when no global recorder is installed
        record_tick();
        record_tick_error();
        record_phase_transition(EnginePhase::Waiting, EnginePhase::Voting);
        set_current_phase(EnginePhase::Voting, Some(EnginePhase::Waiting));
        set_countdown(300);
        record_announcement(crate::announce::keys::STARTED);
        record_cycle_aborted("insufficient_participants");
        record_event_started();
        record_event_completed();
        set_participants(8);
        set_votes(5);
        set_uptime(Duration::from_secs(300));
    }
}
