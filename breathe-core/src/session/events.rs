//! Events emitted by the session controller

use breathe_hal::ResourceError;

use crate::config::BreathRate;
use crate::sequencer::PhaseEntry;
use crate::traits::Cue;

/// Session-scoped platform resources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resource {
    /// Keeps the screen awake
    WakeLock,
    /// Lets cues play without further user interaction
    AudioUnlock,
}

/// Outcome of a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionSummary {
    /// True if the session ran to the end of its duration
    pub completed: bool,
    /// Cycles completed
    pub cycles: u32,
    /// Breathing time, excluding the lead-in (seconds)
    pub elapsed_s: u32,
}

/// Something the presentation layer should reflect
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionEvent {
    /// Session accepted; lead-in begins
    Started {
        rate: Option<BreathRate>,
        remaining_s: u32,
    },
    /// Lead-in step: `None` for "Ready...", then 3, 2, 1
    LeadIn { count: Option<u8> },
    /// A phase began
    PhaseEntered(PhaseEntry),
    /// Seconds left in the current phase
    PhaseCountdown(u16),
    /// Total cycles completed so far
    CycleCompleted(u32),
    /// Session seconds left
    RemainingTime(u32),
    /// Session ended, by completion or by stop
    Finished(SessionSummary),
    /// A completed session was dismissed; it winds down like a stop
    Dismissed,
    /// Back to idle after a stop
    Idle,
    /// A resource could not be acquired; the session continues without it
    ResourceUnavailable {
        resource: Resource,
        error: ResourceError,
    },
}

impl SessionEvent {
    /// Cue that accompanies this event, if any
    pub fn cue(&self) -> Option<Cue> {
        match self {
            SessionEvent::LeadIn { count: Some(_) } => Some(Cue::Hold),
            SessionEvent::PhaseEntered(entry) => Some(entry.cue),
            SessionEvent::Finished(summary) if summary.completed => Some(Cue::Completion),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhaseConfig;
    use crate::sequencer::Phase;

    #[test]
    fn test_cues() {
        let entry = Phase::Exhale.entry(&PhaseConfig::uniform(4));
        assert_eq!(SessionEvent::PhaseEntered(entry).cue(), Some(Cue::Exhale));
        assert_eq!(SessionEvent::LeadIn { count: Some(2) }.cue(), Some(Cue::Hold));
        assert_eq!(SessionEvent::LeadIn { count: None }.cue(), None);

        let stopped = SessionSummary {
            completed: false,
            cycles: 1,
            elapsed_s: 20,
        };
        assert_eq!(SessionEvent::Finished(stopped).cue(), None);
        assert_eq!(
            SessionEvent::Finished(SessionSummary {
                completed: true,
                ..stopped
            })
            .cue(),
            Some(Cue::Completion)
        );
        assert_eq!(SessionEvent::Dismissed.cue(), None);
    }
}
