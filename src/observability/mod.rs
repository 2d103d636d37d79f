//! Observability
//!
//! Logging, metrics, and the structured lifecycle journal.

pub mod events;
pub mod logging;
pub mod metrics;

pub use events::{EventJournal, LifecycleEvent};
pub use logging::{LogFormat, init_logging};
pub use metrics::init_metrics;
