//! Participant, vote, and event registries
//!
//! The facts the lifecycle driver queries each tick: who signed up, what
//! was voted for, and which event types exist. All three are cleared
//! together by the cycle cleanup.

pub mod events;
pub mod roster;
pub mod votes;

pub use events::{EventDescriptor, EventInstance, EventRegistry, EventTypeId};
pub use roster::{Participant, ParticipantRoster, PlayerId};
pub use votes::VoteLedger;
