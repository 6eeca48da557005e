//! Breathing presets and their adjustment rules
//!
//! Each preset owns a [`PresetRule`] that decides which fields may be
//! adjusted and how values are clamped. The settings store looks the rule
//! up from the active preset instead of branching on the preset name.

use serde::{Deserialize, Serialize};

use super::types::{clamp_adjust, Field, PhaseConfig, MAX_PHASE_S};

/// Minimum box breathing phase (seconds)
pub const BOX_MIN_S: u16 = 2;

/// Maximum box breathing phase (seconds)
pub const BOX_MAX_S: u16 = 10;

/// Named presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PresetName {
    /// Four equal phases
    #[serde(rename = "box")]
    Box,
    /// Inhale 4, hold 7, exhale 8
    #[serde(rename = "478")]
    FourSevenEight,
    /// User defined, persisted
    #[default]
    #[serde(rename = "personal")]
    Personal,
}

impl PresetName {
    /// Number of presets
    pub const COUNT: usize = 3;

    /// All presets in display order
    pub const ALL: [PresetName; Self::COUNT] = [
        PresetName::Box,
        PresetName::FourSevenEight,
        PresetName::Personal,
    ];

    /// Stable name, used for persistence and commands
    pub fn as_str(self) -> &'static str {
        match self {
            PresetName::Box => "box",
            PresetName::FourSevenEight => "478",
            PresetName::Personal => "personal",
        }
    }

    /// Look a preset up by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == name)
    }

    /// One-line description shown under the preset selector
    pub fn description(self) -> &'static str {
        match self {
            PresetName::Box => "Four equal phases for calm focus.",
            PresetName::FourSevenEight => "Slows your heart, deepens calm and sleep",
            PresetName::Personal => "Make it yours \u{2014} I'll remember it.",
        }
    }

    /// Factory phase timings
    pub const fn defaults(self) -> PhaseConfig {
        match self {
            PresetName::Box => PhaseConfig::uniform(4),
            PresetName::FourSevenEight => PhaseConfig::new(4, 7, 8, 0),
            PresetName::Personal => PhaseConfig::new(5, 0, 5, 0),
        }
    }

    /// Adjustment rule for this preset
    pub fn rule(self) -> &'static dyn PresetRule {
        match self {
            PresetName::Box => &BoxRule,
            PresetName::FourSevenEight => &FourSevenEightRule,
            PresetName::Personal => &PersonalRule,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            PresetName::Box => 0,
            PresetName::FourSevenEight => 1,
            PresetName::Personal => 2,
        }
    }
}

/// Per-preset validation of phase adjustments
///
/// Session duration is not a phase field and is handled by the settings
/// store for every preset alike.
pub trait PresetRule {
    /// Check if a phase field can be adjusted under this preset
    fn is_adjustable(&self, field: Field) -> bool;

    /// Apply `delta` to `field`, clamping per the preset's bounds
    ///
    /// Returns false without touching `phases` if the field is not
    /// adjustable.
    fn adjust(&self, phases: &mut PhaseConfig, field: Field, delta: i16) -> bool;

    /// Check if edits under this preset are written to storage
    fn persists(&self) -> bool {
        false
    }
}

/// Box breathing: one master value drives all four phases
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxRule;

impl PresetRule for BoxRule {
    fn is_adjustable(&self, field: Field) -> bool {
        field == Field::Inhale
    }

    fn adjust(&self, phases: &mut PhaseConfig, field: Field, delta: i16) -> bool {
        if !self.is_adjustable(field) {
            return false;
        }
        let value = clamp_adjust(phases.inhale_s, delta, BOX_MIN_S, BOX_MAX_S);
        *phases = PhaseConfig::uniform(value);
        true
    }
}

/// 4-7-8 breathing: the second hold stays at zero
#[derive(Debug, Clone, Copy, Default)]
pub struct FourSevenEightRule;

impl PresetRule for FourSevenEightRule {
    fn is_adjustable(&self, field: Field) -> bool {
        matches!(field, Field::Inhale | Field::Hold1 | Field::Exhale)
    }

    fn adjust(&self, phases: &mut PhaseConfig, field: Field, delta: i16) -> bool {
        if !self.is_adjustable(field) {
            return false;
        }
        adjust_free(phases, field, delta);
        phases.hold2_s = 0;
        true
    }
}

/// Personal breathing: every phase free, edits persist
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonalRule;

impl PresetRule for PersonalRule {
    fn is_adjustable(&self, field: Field) -> bool {
        field.is_phase()
    }

    fn adjust(&self, phases: &mut PhaseConfig, field: Field, delta: i16) -> bool {
        if !self.is_adjustable(field) {
            return false;
        }
        adjust_free(phases, field, delta);
        true
    }

    fn persists(&self) -> bool {
        true
    }
}

/// Inhale/exhale floor at 1, holds at 0, all capped at [`MAX_PHASE_S`]
fn adjust_free(phases: &mut PhaseConfig, field: Field, delta: i16) {
    let Some(current) = phases.get(field) else {
        return;
    };
    let floor = phase_floor(field);
    phases.set(field, clamp_adjust(current, delta, floor, MAX_PHASE_S));
}

/// Lowest value a free-form phase may take
pub(crate) fn phase_floor(field: Field) -> u16 {
    match field {
        Field::Inhale | Field::Exhale => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_master_sets_all_phases() {
        let mut phases = PresetName::Box.defaults();
        assert!(BoxRule.adjust(&mut phases, Field::Inhale, 1));
        assert_eq!(phases, PhaseConfig::uniform(5));
    }

    #[test]
    fn test_box_clamps() {
        let mut phases = PresetName::Box.defaults();
        for _ in 0..10 {
            BoxRule.adjust(&mut phases, Field::Inhale, 1);
        }
        assert_eq!(phases, PhaseConfig::uniform(BOX_MAX_S));

        for _ in 0..20 {
            BoxRule.adjust(&mut phases, Field::Inhale, -1);
        }
        assert_eq!(phases, PhaseConfig::uniform(BOX_MIN_S));
    }

    #[test]
    fn test_box_other_fields_locked() {
        let mut phases = PresetName::Box.defaults();
        for field in [Field::Hold1, Field::Exhale, Field::Hold2] {
            assert!(!BoxRule.adjust(&mut phases, field, 1));
        }
        assert_eq!(phases, PhaseConfig::uniform(4));
    }

    #[test]
    fn test_478_hold2_fixed() {
        let mut phases = PresetName::FourSevenEight.defaults();
        assert!(!FourSevenEightRule.adjust(&mut phases, Field::Hold2, 1));
        assert_eq!(phases.hold2_s, 0);
    }

    #[test]
    fn test_478_floors() {
        let mut phases = PhaseConfig::new(1, 1, 1, 0);
        FourSevenEightRule.adjust(&mut phases, Field::Inhale, -1);
        FourSevenEightRule.adjust(&mut phases, Field::Exhale, -3);
        FourSevenEightRule.adjust(&mut phases, Field::Hold1, -1);
        assert_eq!(phases, PhaseConfig::new(1, 0, 1, 0));
    }

    #[test]
    fn test_personal_ceiling() {
        let mut phases = PresetName::Personal.defaults();
        PersonalRule.adjust(&mut phases, Field::Hold2, 100);
        assert_eq!(phases.hold2_s, MAX_PHASE_S);
    }

    #[test]
    fn test_duration_is_not_a_phase_rule() {
        let mut phases = PresetName::Personal.defaults();
        for name in PresetName::ALL {
            assert!(!name.rule().is_adjustable(Field::Duration));
            assert!(!name.rule().adjust(&mut phases, Field::Duration, 1));
        }
    }

    #[test]
    fn test_only_personal_persists() {
        assert!(!PresetName::Box.rule().persists());
        assert!(!PresetName::FourSevenEight.rule().persists());
        assert!(PresetName::Personal.rule().persists());
    }

    #[test]
    fn test_names() {
        for name in PresetName::ALL {
            assert_eq!(PresetName::from_name(name.as_str()), Some(name));
        }
        assert_eq!(PresetName::from_name("square"), None);
    }
}
