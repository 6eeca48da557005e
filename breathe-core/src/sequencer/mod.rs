//! Breathing phase sequencer
//!
//! Turns a phase configuration into the ordered sequence of phases the
//! session steps through, counting cycles as it goes.

pub mod executor;
pub mod phase;

pub use executor::{PhaseSequencer, Transition};
pub use phase::{Phase, PhaseEntry, Step, VisualScale};
