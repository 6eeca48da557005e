//! Presentation abstraction traits
//!
//! These traits define the interface between the session logic and
//! platform-specific rendering and audio. Resource capabilities (wake
//! lock, audio unlock) and storage live in `breathe-hal`.

pub mod presentation;

pub use presentation::{Clock, Cue, CueError, CuePlayer, Renderer, View};
