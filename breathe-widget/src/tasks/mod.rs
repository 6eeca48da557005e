//! Widget loops
//!
//! The tick task and the controller loop run on the embassy executor; the
//! input reader is an OS thread because stdin reads block.

pub mod controller;
pub mod input;
pub mod tick;

pub use controller::{controller_loop, RunOptions};
pub use input::spawn_input_reader;
pub use tick::tick_task;
