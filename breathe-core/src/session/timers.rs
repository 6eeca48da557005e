//! Session timers
//!
//! Every timer the session uses lives in one [`TimerSet`], keyed by
//! [`TimerId`], so stopping a session can cancel all of them at once.
//! Deadlines are absolute milliseconds on the caller's clock. Periodic
//! timers advance from their previous deadline rather than from the time
//! they were serviced, so a late poll never shifts the schedule.

/// Timer identifiers, in firing priority for equal deadlines
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerId {
    /// One tick per lead-in count
    LeadIn,
    /// End of the current phase
    PhaseTransition,
    /// Per-second phase countdown display
    PhaseDisplay,
    /// Per-second session clock
    Countdown,
    /// Return to idle after a manual stop
    IdleReset,
}

impl TimerId {
    /// Number of timers
    pub const COUNT: usize = 5;

    /// All timers
    pub const ALL: [TimerId; Self::COUNT] = [
        TimerId::LeadIn,
        TimerId::PhaseTransition,
        TimerId::PhaseDisplay,
        TimerId::Countdown,
        TimerId::IdleReset,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    deadline_ms: u64,
    period_ms: Option<u64>,
}

/// Fixed set of one-shot and periodic timers
#[derive(Debug, Clone, Default)]
pub struct TimerSet {
    slots: [Option<Slot>; TimerId::COUNT],
}

impl TimerSet {
    /// Create an empty timer set
    pub const fn new() -> Self {
        Self {
            slots: [None; TimerId::COUNT],
        }
    }

    /// Fire `id` once at `deadline_ms`, replacing any earlier schedule
    pub fn schedule_once(&mut self, id: TimerId, deadline_ms: u64) {
        self.slots[id.index()] = Some(Slot {
            deadline_ms,
            period_ms: None,
        });
    }

    /// Fire `id` at `first_ms` and every `period_ms` after that
    ///
    /// A zero period is treated as a one-shot timer.
    pub fn schedule_every(&mut self, id: TimerId, first_ms: u64, period_ms: u64) {
        self.slots[id.index()] = Some(Slot {
            deadline_ms: first_ms,
            period_ms: (period_ms > 0).then_some(period_ms),
        });
    }

    /// Cancel one timer
    pub fn cancel(&mut self, id: TimerId) {
        self.slots[id.index()] = None;
    }

    /// Cancel every timer
    pub fn cancel_all(&mut self) {
        self.slots = [None; TimerId::COUNT];
    }

    /// Check if a timer is pending
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.slots[id.index()].is_some()
    }

    /// Deadline of a pending timer
    pub fn deadline(&self, id: TimerId) -> Option<u64> {
        self.slots[id.index()].map(|slot| slot.deadline_ms)
    }

    /// Number of pending timers
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<u64> {
        self.slots.iter().flatten().map(|slot| slot.deadline_ms).min()
    }

    /// Take the earliest timer due at `now_ms`
    ///
    /// Returns the timer and the deadline it was due at. Periodic timers
    /// are rescheduled one period later; one-shot timers are removed.
    /// Equal deadlines fire in [`TimerId`] order.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(TimerId, u64)> {
        let (id, slot) = TimerId::ALL
            .iter()
            .filter_map(|id| self.slots[id.index()].map(|slot| (*id, slot)))
            .filter(|(_, slot)| slot.deadline_ms <= now_ms)
            .min_by_key(|(id, slot)| (slot.deadline_ms, *id))?;

        self.slots[id.index()] = slot.period_ms.map(|period_ms| Slot {
            deadline_ms: slot.deadline_ms + period_ms,
            period_ms: Some(period_ms),
        });

        Some((id, slot.deadline_ms))
    }
}
