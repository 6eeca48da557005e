//! Session control
//!
//! Owns everything with a lifetime of one session: the lead-in, the
//! session clock, phase timers and the platform resources held while
//! breathing.

pub mod controller;
pub mod events;
pub mod timers;

pub use controller::{SessionController, SessionState, LEAD_IN_COUNT, TICK_MS, IDLE_RESET_MS};
pub use events::{Resource, SessionEvent, SessionSummary};
pub use timers::{TimerId, TimerSet};
