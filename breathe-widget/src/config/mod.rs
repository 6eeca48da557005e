//! Widget configuration
//!
//! Loaded from an optional `breathe.toml`; every value has a default, so a
//! missing file or section is never an error. Command-line flags override
//! the file.

pub mod loader;

use std::path::PathBuf;

use breathe_core::config::{PresetName, MAX_DURATION_MIN, MIN_DURATION_MIN};
use serde::Deserialize;

use loader::ConfigError;
pub use loader::load_config;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "breathe.toml";

/// Default settings directory
pub const DEFAULT_STORE_DIR: &str = ".breathe";

/// Allowed tick interval range (ms)
pub const TICK_MS_RANGE: core::ops::RangeInclusive<u64> = 10..=1000;

/// Complete widget configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidgetConfig {
    pub storage: StorageConfig,
    pub timing: TimingConfig,
    pub audio: AudioConfig,
    pub wake_lock: WakeLockConfig,
    pub session: SessionDefaults,
}

/// `[storage]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding one file per settings key
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_STORE_DIR),
        }
    }
}

/// `[timing]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// Redraw and timer polling interval (ms)
    pub tick_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { tick_ms: 100 }
    }
}

/// `[audio]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    /// Play cues at all
    pub enabled: bool,
    /// Ring the terminal bell for cues
    pub bell: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bell: true,
        }
    }
}

/// `[wake_lock]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WakeLockConfig {
    pub enabled: bool,
}

impl Default for WakeLockConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// `[session]`
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionDefaults {
    /// Preset to select at startup (otherwise the last used one)
    pub preset: Option<PresetName>,
    /// Session length at startup (minutes)
    pub duration_min: Option<u8>,
    /// Start a session immediately
    pub autostart: bool,
}

impl WidgetConfig {
    /// Check values serde cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !TICK_MS_RANGE.contains(&self.timing.tick_ms) {
            return Err(ConfigError::Invalid("timing.tick_ms"));
        }
        if let Some(minutes) = self.session.duration_min {
            if !(MIN_DURATION_MIN..=MAX_DURATION_MIN).contains(&minutes) {
                return Err(ConfigError::Invalid("session.duration_min"));
            }
        }
        Ok(())
    }
}
