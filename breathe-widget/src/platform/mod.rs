//! Host implementations of the platform capabilities

pub mod cues;
pub mod resources;
pub mod store;
pub mod terminal;

pub use cues::BellCuePlayer;
pub use resources::{HostAudioUnlock, HostWakeLock};
pub use store::{FileStore, HostStore};
pub use terminal::TerminalRenderer;
