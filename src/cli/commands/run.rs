//! The `run` command
//!
//! Loads configuration, wires the collaborators, and drives the engine
//! scheduler until a shutdown signal arrives.

use std::sync::Arc;

use tracing::{info, warn};

use crate::announce::{Announcer, TracingAnnouncer};
use crate::cli::args::RunArgs;
use crate::config::{ConfigLimits, loader};
use crate::engine::{EngineScheduler, LifecycleDriver};
use crate::error::ArenaLoopError;
use crate::observability::{EventJournal, init_metrics};
use crate::registry::{EventRegistry, ParticipantRoster, VoteLedger};

/// Runs the lifecycle engine until cancelled.
///
/// # Errors
///
/// Returns an error when configuration loading, metrics installation, or
/// journal creation fails. Tick-level engine errors never surface here;
/// the scheduler logs them and keeps going.
pub async fn run(args: &RunArgs) -> Result<(), ArenaLoopError> {
    let loaded = loader::load_file(&args.config, &ConfigLimits::default())?;
    for warning in &loaded.warnings {
        warn!(%warning, "configuration warning");
    }

    init_metrics(args.metrics_port)?;

    let config = loaded.config;
    let registry = Arc::new(EventRegistry::from_config(&config));
    let roster = Arc::new(ParticipantRoster::new());
    let votes = Arc::new(VoteLedger::new());
    let announcer: Arc<dyn Announcer> = Arc::new(TracingAnnouncer::new());

    let driver = LifecycleDriver::new(config.engine.clone());
    let mut scheduler = EngineScheduler::new(
        driver,
        registry,
        roster,
        votes,
        announcer,
        config.engine.voting_enabled,
    )
    .with_tick_period(args.tick);

    if let Some(path) = &args.journal {
        scheduler = scheduler.with_journal(EventJournal::create(path)?);
    }

    let cancel = scheduler.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            cancel.cancel();
        }
    });

    info!(
        config = %args.config.display(),
        events = config.events.len(),
        voting_enabled = config.engine.voting_enabled,
        "starting lifecycle engine"
    );
    scheduler.run().await;
    Ok(())
}
