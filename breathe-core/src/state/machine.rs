//! Session status definition
//!
//! Timers, resources and the visible view are all a function of the
//! current status.

use super::events::Event;

/// Session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Nothing running, settings editable
    #[default]
    Idle,
    /// "Ready..." and the 3-2-1 countdown
    LeadIn,
    /// Phases cycling, session clock running
    Breathing,
    /// Session time ran out
    Completed,
    /// User stopped; returns to idle shortly
    Stopped,
}

impl Status {
    /// Check if a session is in progress
    pub fn is_running(&self) -> bool {
        matches!(self, Status::LeadIn | Status::Breathing)
    }

    /// Check if settings may be changed
    pub fn settings_editable(&self) -> bool {
        !self.is_running()
    }

    /// Check if a new session may start
    pub fn can_start(&self) -> bool {
        matches!(self, Status::Idle | Status::Completed | Status::Stopped)
    }

    /// Process an event and return the next status
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use Status::*;

        match (self, event) {
            (Idle | Completed | Stopped, Start) => LeadIn,

            (LeadIn, LeadInDone) => Breathing,
            (LeadIn, Stop) => Stopped,

            (Breathing, Elapsed) => Completed,
            (Breathing, Stop) => Stopped,

            // Dismissing the completion view
            (Completed, Stop) => Stopped,

            (Stopped, IdleTimeout) => Idle,

            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_session() {
        let status = Status::Idle
            .transition(Event::Start)
            .transition(Event::LeadInDone);
        assert_eq!(status, Status::Breathing);

        let done = status.transition(Event::Elapsed);
        assert_eq!(done, Status::Completed);
    }

    #[test]
    fn test_stop_from_running_states() {
        for status in [Status::LeadIn, Status::Breathing, Status::Completed] {
            assert_eq!(status.transition(Event::Stop), Status::Stopped);
        }
        assert_eq!(
            Status::Stopped.transition(Event::IdleTimeout),
            Status::Idle
        );
    }

    #[test]
    fn test_stop_when_idle_is_ignored() {
        assert_eq!(Status::Idle.transition(Event::Stop), Status::Idle);
        assert_eq!(Status::Stopped.transition(Event::Stop), Status::Stopped);
    }

    #[test]
    fn test_start_while_running_is_ignored() {
        assert_eq!(Status::LeadIn.transition(Event::Start), Status::LeadIn);
        assert_eq!(Status::Breathing.transition(Event::Start), Status::Breathing);
    }

    #[test]
    fn test_restart_after_finish() {
        assert_eq!(Status::Completed.transition(Event::Start), Status::LeadIn);
        assert_eq!(Status::Stopped.transition(Event::Start), Status::LeadIn);
    }

    #[test]
    fn test_stale_timer_events_ignored() {
        assert_eq!(Status::Idle.transition(Event::LeadInDone), Status::Idle);
        assert_eq!(Status::Stopped.transition(Event::Elapsed), Status::Stopped);
        assert_eq!(Status::Breathing.transition(Event::IdleTimeout), Status::Breathing);
    }

    #[test]
    fn test_settings_lock() {
        assert!(Status::Idle.settings_editable());
        assert!(Status::Completed.settings_editable());
        assert!(!Status::LeadIn.settings_editable());
        assert!(!Status::Breathing.settings_editable());
    }
}
