//! Engine configuration
//!
//! YAML-backed configuration: schema types, loader pipeline, and
//! semantic validation. Configuration is read-only for the duration of a
//! tick; swapping it between cycles is the embedder's concern.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLimits, LoadResult, load_file};
pub use schema::{EngineConfig, EventTypeConfig, RootConfig};
pub use validation::{ValidationResult, Validator};
