//! Session status state machine
//!
//! Defines the lifecycle of a breathing session.
//! The state machine is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::Status;
