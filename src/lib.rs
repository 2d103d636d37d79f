//! `arenaloop` - recurring competitive event lifecycle engine
//!
//! A tick-driven state machine cycling through
//! `Waiting → (Voting) → Registration → RunningSetup → Running → Ended`,
//! with participant, vote, and event registries as collaborators and a
//! pluggable announcement sink.

pub mod announce;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod observability;
pub mod registry;
