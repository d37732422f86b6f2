//! Storage layer for the eventsync ecosystem.
//!
//! This crate provides the types and persistence used by eventsync-cli:
//! - `Event`, `Participant` and `Priority` domain types
//! - `codec` for converting events to and from single storage lines
//! - `store` for whole-file save/load with participant resolution

pub mod codec;
pub mod constants;
pub mod error;
pub mod event;
pub mod participant;
pub mod priority;
pub mod settings;
pub mod store;
pub mod user_file;

pub use error::{StorageError, StorageResult};
pub use event::Event;
pub use participant::{AccessLevel, Participant, ParticipantDirectory, UserSource};
pub use priority::{Priority, PriorityRegistry};
pub use store::{EventStore, LoadPolicy, LoadedEvents, SkippedLine};
