//! Events that trigger status transitions

/// Events that can trigger status transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// User asked for a session
    Start,
    /// User stopped the session
    Stop,

    /// The lead-in countdown finished
    LeadInDone,
    /// Session time ran out
    Elapsed,
    /// The post-stop grace period ran out
    IdleTimeout,
}

impl Event {
    /// Check if this event is user-initiated
    pub fn is_user_event(&self) -> bool {
        matches!(self, Event::Start | Event::Stop)
    }

    /// Check if this event comes from a timer
    pub fn is_timer_event(&self) -> bool {
        !self.is_user_event()
    }
}
