//! Breathing phases
//!
//! Phases are the atomic units of a cycle. Each has a duration taken from
//! the configuration, a label, an audio cue and a visual scale hint.
//! Hold phases with zero duration are skipped.

use crate::config::PhaseConfig;
use crate::traits::Cue;

/// One timed segment of a breathing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Inhale,
    /// Hold after inhaling
    Hold1,
    Exhale,
    /// Hold after exhaling
    Hold2,
}

/// Visual scale of the breathing indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VisualScale {
    /// Lungs full
    Expanded,
    /// Lungs empty, also the resting size
    Contracted,
}

impl VisualScale {
    /// Scale factor relative to the resting size
    pub fn factor(self) -> f32 {
        match self {
            VisualScale::Expanded => 1.5,
            VisualScale::Contracted => 1.0,
        }
    }
}

/// What follows a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Enter another phase of the same cycle
    Enter(Phase),
    /// The cycle is done; the next one starts at inhale
    CycleComplete,
}

impl Phase {
    /// All phases in cycle order
    pub const ALL: [Phase; 4] = [Phase::Inhale, Phase::Hold1, Phase::Exhale, Phase::Hold2];

    /// Configured duration of this phase (seconds)
    pub fn duration_s(self, config: &PhaseConfig) -> u16 {
        match self {
            Phase::Inhale => config.inhale_s,
            Phase::Hold1 => config.hold1_s,
            Phase::Exhale => config.exhale_s,
            Phase::Hold2 => config.hold2_s,
        }
    }

    /// Phase that follows this one, skipping zero-length holds
    pub fn next(self, config: &PhaseConfig) -> Step {
        match self {
            Phase::Inhale if config.hold1_s > 0 => Step::Enter(Phase::Hold1),
            Phase::Inhale | Phase::Hold1 => Step::Enter(Phase::Exhale),
            Phase::Exhale if config.hold2_s > 0 => Step::Enter(Phase::Hold2),
            Phase::Exhale | Phase::Hold2 => Step::CycleComplete,
        }
    }

    /// Text shown while in this phase
    pub fn label(self) -> &'static str {
        match self {
            Phase::Inhale => "Inhale",
            Phase::Hold1 | Phase::Hold2 => "Hold",
            Phase::Exhale => "Exhale",
        }
    }

    /// Cue played when entering this phase
    pub fn cue(self) -> Cue {
        match self {
            Phase::Inhale => Cue::Inhale,
            Phase::Hold1 | Phase::Hold2 => Cue::Hold,
            Phase::Exhale => Cue::Exhale,
        }
    }

    /// Indicator scale at the end of this phase
    pub fn scale(self) -> VisualScale {
        match self {
            Phase::Inhale | Phase::Hold1 => VisualScale::Expanded,
            Phase::Exhale | Phase::Hold2 => VisualScale::Contracted,
        }
    }

    /// Check if this is a hold phase
    pub fn is_hold(self) -> bool {
        matches!(self, Phase::Hold1 | Phase::Hold2)
    }

    /// Everything a presenter needs on entering this phase
    pub fn entry(self, config: &PhaseConfig) -> PhaseEntry {
        let duration_s = self.duration_s(config);
        PhaseEntry {
            phase: self,
            duration_s,
            scale: self.scale(),
            // Holds snap to their scale, breaths animate across the phase
            transition_s: if self.is_hold() { 0 } else { duration_s },
            label: self.label(),
            cue: self.cue(),
        }
    }
}

/// Emitted on entering a phase
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhaseEntry {
    /// Phase entered
    pub phase: Phase,
    /// Phase length (seconds)
    pub duration_s: u16,
    /// Target indicator scale
    pub scale: VisualScale,
    /// Time to reach the target scale (seconds)
    pub transition_s: u16,
    /// Display label
    pub label: &'static str,
    /// Audio cue
    pub cue: Cue,
}

impl PhaseEntry {
    /// Check if the indicator should move for this phase
    ///
    /// A zero-length phase leaves the indicator where it is.
    pub fn moves_indicator(&self) -> bool {
        self.duration_s > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle_order() {
        let config = PhaseConfig::uniform(4);
        assert_eq!(Phase::Inhale.next(&config), Step::Enter(Phase::Hold1));
        assert_eq!(Phase::Hold1.next(&config), Step::Enter(Phase::Exhale));
        assert_eq!(Phase::Exhale.next(&config), Step::Enter(Phase::Hold2));
        assert_eq!(Phase::Hold2.next(&config), Step::CycleComplete);
    }

    #[test]
    fn test_zero_holds_skipped() {
        let config = PhaseConfig::new(5, 0, 5, 0);
        assert_eq!(Phase::Inhale.next(&config), Step::Enter(Phase::Exhale));
        assert_eq!(Phase::Exhale.next(&config), Step::CycleComplete);
    }

    #[test]
    fn test_entry_hints() {
        let config = PhaseConfig::new(4, 7, 8, 0);

        let inhale = Phase::Inhale.entry(&config);
        assert_eq!(inhale.scale, VisualScale::Expanded);
        assert_eq!(inhale.transition_s, 4);
        assert_eq!(inhale.cue, Cue::Inhale);

        let hold = Phase::Hold1.entry(&config);
        assert_eq!(hold.scale, VisualScale::Expanded);
        assert_eq!(hold.transition_s, 0);
        assert_eq!(hold.label, "Hold");

        let exhale = Phase::Exhale.entry(&config);
        assert_eq!(exhale.scale, VisualScale::Contracted);
        assert_eq!(exhale.transition_s, 8);
        assert_eq!(exhale.cue, Cue::Exhale);
    }

    #[test]
    fn test_scale_factors() {
        assert_eq!(VisualScale::Expanded.factor(), 1.5);
        assert_eq!(VisualScale::Contracted.factor(), 1.0);
    }
}
