//! Configuration type definitions
//!
//! Phase timings and the session configuration derived from the active
//! preset. All durations are whole seconds.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound for any single phase (seconds)
pub const MAX_PHASE_S: u16 = 30;

/// Minimum session duration (minutes)
pub const MIN_DURATION_MIN: u8 = 1;

/// Maximum session duration (minutes)
pub const MAX_DURATION_MIN: u8 = 60;

/// Session duration used until the user changes it (minutes)
pub const DEFAULT_DURATION_MIN: u8 = 5;

/// An adjustable setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Inhale,
    Hold1,
    Exhale,
    Hold2,
    /// Session length in minutes
    Duration,
}

impl Field {
    /// The four phase fields in cycle order
    pub const PHASES: [Field; 4] = [Field::Inhale, Field::Hold1, Field::Exhale, Field::Hold2];

    /// Parse a field from its short name
    ///
    /// Accepts `in`, `hold`, `out`, `hold2` and `duration` as well as the
    /// long spellings.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "in" | "inhale" => Some(Field::Inhale),
            "hold" | "hold1" => Some(Field::Hold1),
            "out" | "exhale" => Some(Field::Exhale),
            "hold2" => Some(Field::Hold2),
            "duration" | "min" => Some(Field::Duration),
            _ => None,
        }
    }

    /// Short name of the field
    pub fn name(self) -> &'static str {
        match self {
            Field::Inhale => "in",
            Field::Hold1 => "hold",
            Field::Exhale => "out",
            Field::Hold2 => "hold2",
            Field::Duration => "duration",
        }
    }

    /// Check if this field is one of the four phase timings
    pub fn is_phase(self) -> bool {
        !matches!(self, Field::Duration)
    }
}

/// Durations of the four phases of one breathing cycle
///
/// Holds of zero seconds are skipped. Inhale and exhale must be at least
/// one second for the configuration to be usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhaseConfig {
    /// Inhale duration (seconds)
    pub inhale_s: u16,
    /// Hold after inhale (seconds, 0 = skipped)
    pub hold1_s: u16,
    /// Exhale duration (seconds)
    pub exhale_s: u16,
    /// Hold after exhale (seconds, 0 = skipped)
    pub hold2_s: u16,
}

impl PhaseConfig {
    /// Create a configuration from the four phase durations
    pub const fn new(inhale_s: u16, hold1_s: u16, exhale_s: u16, hold2_s: u16) -> Self {
        Self {
            inhale_s,
            hold1_s,
            exhale_s,
            hold2_s,
        }
    }

    /// Create a configuration with all four phases equal
    pub const fn uniform(seconds: u16) -> Self {
        Self::new(seconds, seconds, seconds, seconds)
    }

    /// Check if the configuration can drive a session
    pub const fn is_usable(&self) -> bool {
        self.inhale_s >= 1 && self.exhale_s >= 1
    }

    /// Length of one full cycle (seconds)
    pub const fn cycle_s(&self) -> u32 {
        self.inhale_s as u32 + self.hold1_s as u32 + self.exhale_s as u32 + self.hold2_s as u32
    }

    /// Breaths per minute at this pacing
    pub fn breath_rate(&self) -> Option<BreathRate> {
        BreathRate::from_cycle_s(self.cycle_s())
    }

    /// Value of a phase field (None for `Field::Duration`)
    pub fn get(&self, field: Field) -> Option<u16> {
        match field {
            Field::Inhale => Some(self.inhale_s),
            Field::Hold1 => Some(self.hold1_s),
            Field::Exhale => Some(self.exhale_s),
            Field::Hold2 => Some(self.hold2_s),
            Field::Duration => None,
        }
    }

    /// Set a phase field; `Field::Duration` is ignored
    pub fn set(&mut self, field: Field, value: u16) {
        match field {
            Field::Inhale => self.inhale_s = value,
            Field::Hold1 => self.hold1_s = value,
            Field::Exhale => self.exhale_s = value,
            Field::Hold2 => self.hold2_s = value,
            Field::Duration => {}
        }
    }
}

/// Configuration for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionConfig {
    /// Phase timings copied from the active preset
    pub phases: PhaseConfig,
    /// Session length in minutes (1..=60)
    pub duration_min: u8,
}

impl SessionConfig {
    /// Create a session configuration
    pub const fn new(phases: PhaseConfig, duration_min: u8) -> Self {
        Self {
            phases,
            duration_min,
        }
    }

    /// Session length in seconds
    pub const fn total_s(&self) -> u32 {
        self.duration_min as u32 * 60
    }
}

/// Breaths per minute, kept in tenths
///
/// Displayed as a whole number when the rate divides evenly, otherwise
/// rounded half-up to one decimal (16 s cycle: 3.75 → "3.8").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BreathRate {
    tenths: u32,
    whole: bool,
}

impl BreathRate {
    /// Rate for a cycle length in seconds (None for a zero-length cycle)
    pub fn from_cycle_s(cycle_s: u32) -> Option<Self> {
        if cycle_s == 0 {
            return None;
        }
        let whole = 60 % cycle_s == 0;
        // 600 / cycle, rounded half-up
        let tenths = (1200 + cycle_s) / (2 * cycle_s);
        Some(Self { tenths, whole })
    }

    /// Rate in tenths of a breath per minute
    pub fn tenths(&self) -> u32 {
        self.tenths
    }

    /// Check if the rate is a whole number of breaths
    pub fn is_whole(&self) -> bool {
        self.whole
    }
}

impl fmt::Display for BreathRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.whole {
            write!(f, "{}", self.tenths / 10)
        } else {
            write!(f, "{}.{}", self.tenths / 10, self.tenths % 10)
        }
    }
}

/// Clamp a signed adjustment into `[min, max]`
pub(crate) fn clamp_adjust(value: u16, delta: i16, min: u16, max: u16) -> u16 {
    let next = value as i32 + delta as i32;
    next.clamp(min as i32, max as i32) as u16
}
