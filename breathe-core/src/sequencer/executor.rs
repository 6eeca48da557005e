//! Phase sequencer
//!
//! Walks the phases of a breathing cycle for a given configuration and
//! counts completed cycles. The sequencer does no timing of its own: the
//! session controller calls [`PhaseSequencer::advance`] when the current
//! phase's duration has elapsed, which keeps the phase duration the one
//! authoritative source of scheduling.

use super::phase::{Phase, PhaseEntry, Step};
use crate::config::PhaseConfig;

/// Result of advancing past a finished phase
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    /// True if the finished phase closed a cycle
    pub cycle_completed: bool,
    /// The phase now entered
    pub entry: PhaseEntry,
}

/// Breathing phase sequencer
#[derive(Debug, Clone, Default)]
pub struct PhaseSequencer {
    /// Configuration copied at start
    config: PhaseConfig,
    /// Current phase (None when halted)
    phase: Option<Phase>,
    /// Cycles completed since start
    completed_cycles: u32,
}

impl PhaseSequencer {
    /// Create a halted sequencer
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at inhale
    ///
    /// Returns None (and stays halted) if the configuration has no usable
    /// inhale or exhale. Settings never produce such a configuration.
    pub fn start(&mut self, config: PhaseConfig) -> Option<PhaseEntry> {
        if !config.is_usable() {
            return None;
        }
        self.config = config;
        self.completed_cycles = 0;
        self.phase = Some(Phase::Inhale);
        Some(Phase::Inhale.entry(&self.config))
    }

    /// Leave the current phase and enter the next one
    ///
    /// Closing a cycle counts it and re-enters inhale immediately.
    pub fn advance(&mut self) -> Option<Transition> {
        let current = self.phase?;
        let (next, cycle_completed) = match current.next(&self.config) {
            Step::Enter(phase) => (phase, false),
            Step::CycleComplete => {
                self.completed_cycles += 1;
                (Phase::Inhale, true)
            }
        };
        self.phase = Some(next);

        Some(Transition {
            cycle_completed,
            entry: next.entry(&self.config),
        })
    }

    /// Stop sequencing
    pub fn halt(&mut self) {
        self.phase = None;
    }

    /// Current phase
    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    /// Check if the sequencer is running
    pub fn is_running(&self) -> bool {
        self.phase.is_some()
    }

    /// Cycles completed since start
    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    /// Configuration in use
    pub fn config(&self) -> &PhaseConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_PHASE_S;
    use proptest::prelude::*;
    use std::vec::Vec;

    /// Phases visited during one cycle, with durations
    fn one_cycle(config: PhaseConfig) -> Vec<(Phase, u16)> {
        let mut seq = PhaseSequencer::new();
        let first = seq.start(config).unwrap();
        let mut visited = vec![(first.phase, first.duration_s)];
        loop {
            let transition = seq.advance().unwrap();
            if transition.cycle_completed {
                assert_eq!(transition.entry.phase, Phase::Inhale);
                assert_eq!(seq.completed_cycles(), 1);
                return visited;
            }
            visited.push((transition.entry.phase, transition.entry.duration_s));
        }
    }

    #[test]
    fn test_box_cycle() {
        let visited = one_cycle(PhaseConfig::uniform(4));
        assert_eq!(
            visited,
            vec![
                (Phase::Inhale, 4),
                (Phase::Hold1, 4),
                (Phase::Exhale, 4),
                (Phase::Hold2, 4)
            ]
        );
    }

    #[test]
    fn test_478_cycle() {
        let visited = one_cycle(PhaseConfig::new(4, 7, 8, 0));
        assert_eq!(
            visited,
            vec![(Phase::Inhale, 4), (Phase::Hold1, 7), (Phase::Exhale, 8)]
        );
    }

    #[test]
    fn test_rejects_unusable_config() {
        let mut seq = PhaseSequencer::new();
        assert!(seq.start(PhaseConfig::new(0, 0, 0, 0)).is_none());
        assert!(!seq.is_running());
        assert!(seq.advance().is_none());
    }

    #[test]
    fn test_cycles_count_up() {
        let mut seq = PhaseSequencer::new();
        seq.start(PhaseConfig::new(2, 0, 2, 0));
        for _ in 0..10 {
            seq.advance();
        }
        // Two phases per cycle
        assert_eq!(seq.completed_cycles(), 5);
        assert_eq!(seq.phase(), Some(Phase::Inhale));
    }

    #[test]
    fn test_restart_resets_cycles() {
        let mut seq = PhaseSequencer::new();
        seq.start(PhaseConfig::new(1, 0, 1, 0));
        seq.advance();
        seq.advance();
        assert_eq!(seq.completed_cycles(), 1);

        seq.halt();
        assert!(seq.advance().is_none());

        seq.start(PhaseConfig::new(1, 0, 1, 0));
        assert_eq!(seq.completed_cycles(), 0);
    }

    fn usable_config() -> impl Strategy<Value = PhaseConfig> {
        (1..=MAX_PHASE_S, 0..=MAX_PHASE_S, 1..=MAX_PHASE_S, 0..=MAX_PHASE_S)
            .prop_map(|(i, h1, e, h2)| PhaseConfig::new(i, h1, e, h2))
    }

    proptest! {
        #[test]
        fn prop_no_hold1_means_exhale_follows_inhale(config in usable_config()) {
            let config = PhaseConfig { hold1_s: 0, ..config };
            let visited = one_cycle(config);
            prop_assert_eq!(visited[1].0, Phase::Exhale);
            prop_assert!(visited.iter().all(|(phase, _)| *phase != Phase::Hold1));
        }

        #[test]
        fn prop_both_holds_visit_all_phases(
            config in usable_config(),
            hold1 in 1..=MAX_PHASE_S,
            hold2 in 1..=MAX_PHASE_S,
        ) {
            let config = PhaseConfig { hold1_s: hold1, hold2_s: hold2, ..config };
            let visited = one_cycle(config);
            let expected: Vec<(Phase, u16)> = Phase::ALL
                .iter()
                .map(|phase| (*phase, phase.duration_s(&config)))
                .collect();
            prop_assert_eq!(visited, expected);
        }

        #[test]
        fn prop_cycle_time_matches_config(config in usable_config()) {
            let total: u32 = one_cycle(config).iter().map(|(_, s)| *s as u32).sum();
            prop_assert_eq!(total, config.cycle_s());
        }
    }
}
