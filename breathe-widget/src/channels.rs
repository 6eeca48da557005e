//! Inter-task communication channels
//!
//! Defines the static channels between the stdin reader thread, the tick
//! loop and the controller loop. Uses embassy-sync primitives, which are
//! safe to feed from a plain OS thread on the std executor.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use crate::command::Input;

/// Channel capacity for parsed input lines
const INPUT_CHANNEL_SIZE: usize = 8;

/// Parsed commands from the stdin reader
pub static INPUT_CHANNEL: Channel<CriticalSectionRawMutex, Input, INPUT_CHANNEL_SIZE> =
    Channel::new();

/// Tick with the current time in milliseconds
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, u64> = Signal::new();
