//! Configuration types
//!
//! Phase timings, presets with their adjustment rules, themes, and the
//! settings store that persists the personal preset.

pub mod preset;
pub mod settings;
pub mod theme;
pub mod types;

pub use preset::{PresetName, PresetRule};
pub use settings::{Settings, SettingsError, SettingsView};
pub use theme::Theme;
pub use types::*;
