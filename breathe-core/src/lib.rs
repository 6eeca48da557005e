//! Board-agnostic core logic for the guided breathing timer
//!
//! This crate contains all application logic that does not depend on
//! a specific platform:
//!
//! - Preset definitions, per-preset adjustment rules and persisted settings
//! - Phase sequencer (inhale, hold, exhale, hold)
//! - Session controller (lead-in, countdown, timers, resource lifecycle)
//! - Session status state machine
//! - Presentation traits and the adapter that drives them
//! - The widget tying it all together

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod config;
pub mod presenter;
pub mod sequencer;
pub mod session;
pub mod state;
pub mod traits;
pub mod widget;

pub use widget::{Command, Notice, Widget};
