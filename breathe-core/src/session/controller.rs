//! Session controller
//!
//! Drives one breathing session from start to finish:
//!
//! 1. `start` acquires the wake lock and audio unlock, then shows
//!    "Ready..." followed by a 3-2-1 lead-in, one count per second.
//! 2. The tick after "1" starts the session clock and the sequencer.
//! 3. Phase timers step the sequencer; a cosmetic per-second timer counts
//!    the current phase down.
//! 4. The clock reaching zero completes the session. `stop` ends it early.
//!
//! All timing is driven by [`SessionController::poll`] with the caller's
//! monotonic clock in milliseconds. Each timer is rescheduled from the
//! deadline it fired at, so the schedule never drifts with poll latency.

use breathe_hal::{AudioUnlock, WakeLock};

use super::events::{Resource, SessionEvent, SessionSummary};
use super::timers::{TimerId, TimerSet};
use crate::config::SessionConfig;
use crate::sequencer::{Phase, PhaseEntry, PhaseSequencer};
use crate::state::{Event, Status};

/// Period of the session clock, lead-in and phase countdown
pub const TICK_MS: u64 = 1000;

/// Lead-in counts shown after "Ready..."
pub const LEAD_IN_COUNT: u8 = 3;

/// Delay between a manual stop and the return to idle
pub const IDLE_RESET_MS: u64 = 500;

/// Transient state of a running session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionState {
    /// Session seconds left
    pub remaining_s: u32,
    /// Cycles completed
    pub completed_cycles: u32,
    /// Current phase (None during the lead-in)
    pub current_phase: Option<Phase>,
    /// Seconds left in the current phase
    pub phase_remaining_s: u16,
    /// True while the session is live
    pub running: bool,
}

/// Session controller
///
/// Generic over the wake lock and audio unlock so that the same logic runs
/// against real platform handles or test fakes.
pub struct SessionController<W: WakeLock, A: AudioUnlock> {
    wake: W,
    audio: A,
    status: Status,
    timers: TimerSet,
    sequencer: PhaseSequencer,
    config: Option<SessionConfig>,
    state: Option<SessionState>,
    lead_in_left: u8,
    /// When the session clock runs out, once breathing has begun
    ends_at_ms: Option<u64>,
    wake_held: bool,
    audio_held: bool,
    last_summary: Option<SessionSummary>,
}

impl<W: WakeLock, A: AudioUnlock> SessionController<W, A> {
    /// Create an idle controller
    pub fn new(wake: W, audio: A) -> Self {
        Self {
            wake,
            audio,
            status: Status::Idle,
            timers: TimerSet::new(),
            sequencer: PhaseSequencer::new(),
            config: None,
            state: None,
            lead_in_left: 0,
            ends_at_ms: None,
            wake_held: false,
            audio_held: false,
            last_summary: None,
        }
    }

    /// Current status
    pub fn status(&self) -> Status {
        self.status
    }

    /// Check if a session is in progress
    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }

    /// State of the running session
    pub fn state(&self) -> Option<&SessionState> {
        self.state.as_ref()
    }

    /// Summary of the last finished session
    pub fn last_summary(&self) -> Option<SessionSummary> {
        self.last_summary
    }

    /// Pending timers
    pub fn timers(&self) -> &TimerSet {
        &self.timers
    }

    /// Earliest time [`poll`](Self::poll) has work to do
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Check if the wake lock is held
    pub fn wake_lock_held(&self) -> bool {
        self.wake_held
    }

    /// Check if audio is unlocked
    pub fn audio_unlocked(&self) -> bool {
        self.audio_held
    }

    /// Start a session
    ///
    /// Returns false without side effects if a session is already running
    /// or the configuration cannot drive one.
    pub fn start<F>(&mut self, config: SessionConfig, now_ms: u64, emit: &mut F) -> bool
    where
        F: FnMut(SessionEvent),
    {
        if !self.status.can_start() {
            return false;
        }
        if !config.phases.is_usable() || config.duration_min == 0 {
            return false;
        }

        // A pending return-to-idle from the last stop must not fire mid-session
        self.timers.cancel_all();
        self.status = self.status.transition(Event::Start);
        self.config = Some(config);
        self.lead_in_left = LEAD_IN_COUNT;
        self.ends_at_ms = None;
        self.state = Some(SessionState {
            remaining_s: config.total_s(),
            completed_cycles: 0,
            current_phase: None,
            phase_remaining_s: 0,
            running: true,
        });

        emit(SessionEvent::Started {
            rate: config.phases.breath_rate(),
            remaining_s: config.total_s(),
        });
        self.acquire_resources(emit);
        emit(SessionEvent::LeadIn { count: None });

        self.timers
            .schedule_every(TimerId::LeadIn, now_ms + TICK_MS, TICK_MS);
        true
    }

    /// Stop the session early
    ///
    /// Stopping a running session tears it down and reports its summary.
    /// Stopping a completed session dismisses it. Otherwise this is a
    /// no-op, so repeated stops never tear down twice. Returns true if
    /// anything changed.
    pub fn stop<F>(&mut self, now_ms: u64, emit: &mut F) -> bool
    where
        F: FnMut(SessionEvent),
    {
        match self.status {
            Status::LeadIn | Status::Breathing => {
                self.finish(false, now_ms, emit);
                true
            }
            Status::Completed => {
                self.status = self.status.transition(Event::Stop);
                emit(SessionEvent::Dismissed);
                self.timers
                    .schedule_once(TimerId::IdleReset, now_ms + IDLE_RESET_MS);
                true
            }
            Status::Idle | Status::Stopped => false,
        }
    }

    /// Service every timer due at `now_ms`
    pub fn poll<F>(&mut self, now_ms: u64, emit: &mut F)
    where
        F: FnMut(SessionEvent),
    {
        self.poll_timed(now_ms, &mut |event, _| emit(event));
    }

    /// Like [`poll`](Self::poll), also passing the deadline each event was
    /// due at
    ///
    /// After a long gap between polls, every missed deadline is serviced in
    /// order; the deadline lets the caller tell catch-up events from
    /// current ones.
    pub fn poll_timed<F>(&mut self, now_ms: u64, emit: &mut F)
    where
        F: FnMut(SessionEvent, u64),
    {
        while let Some((id, at_ms)) = self.timers.pop_due(now_ms) {
            self.on_timer(id, at_ms, &mut |event| emit(event, at_ms));
        }
    }

    fn on_timer<F>(&mut self, id: TimerId, at_ms: u64, emit: &mut F)
    where
        F: FnMut(SessionEvent),
    {
        match id {
            TimerId::LeadIn => self.on_lead_in(at_ms, emit),
            TimerId::PhaseTransition => self.on_phase_end(at_ms, emit),
            TimerId::PhaseDisplay => self.on_phase_tick(emit),
            TimerId::Countdown => self.on_clock_tick(at_ms, emit),
            TimerId::IdleReset => self.on_idle_reset(emit),
        }
    }

    fn on_lead_in<F>(&mut self, at_ms: u64, emit: &mut F)
    where
        F: FnMut(SessionEvent),
    {
        if self.lead_in_left > 0 {
            emit(SessionEvent::LeadIn {
                count: Some(self.lead_in_left),
            });
            self.lead_in_left -= 1;
            return;
        }

        self.timers.cancel(TimerId::LeadIn);
        self.begin_breathing(at_ms, emit);
    }

    fn begin_breathing<F>(&mut self, at_ms: u64, emit: &mut F)
    where
        F: FnMut(SessionEvent),
    {
        let Some(config) = self.config else {
            return;
        };
        let Some(entry) = self.sequencer.start(config.phases) else {
            // Unreachable: start() rejected unusable configs
            self.finish(false, at_ms, emit);
            return;
        };

        self.status = self.status.transition(Event::LeadInDone);
        self.ends_at_ms = Some(at_ms + config.total_s() as u64 * 1000);
        self.timers
            .schedule_every(TimerId::Countdown, at_ms + TICK_MS, TICK_MS);
        self.enter_phase(entry, at_ms, emit);
    }

    fn enter_phase<F>(&mut self, entry: PhaseEntry, at_ms: u64, emit: &mut F)
    where
        F: FnMut(SessionEvent),
    {
        if let Some(state) = self.state.as_mut() {
            state.current_phase = Some(entry.phase);
            state.phase_remaining_s = entry.duration_s;
        }
        emit(SessionEvent::PhaseEntered(entry));

        let duration_ms = entry.duration_s as u64 * 1000;
        self.timers
            .schedule_once(TimerId::PhaseTransition, at_ms + duration_ms);
        self.timers
            .schedule_every(TimerId::PhaseDisplay, at_ms + TICK_MS, TICK_MS);
    }

    fn on_phase_end<F>(&mut self, at_ms: u64, emit: &mut F)
    where
        F: FnMut(SessionEvent),
    {
        let Some(transition) = self.sequencer.advance() else {
            return;
        };

        if transition.cycle_completed {
            let cycles = self.sequencer.completed_cycles();
            if let Some(state) = self.state.as_mut() {
                state.completed_cycles = cycles;
            }
            emit(SessionEvent::CycleCompleted(cycles));
        }

        // The session clock finishes the session at this same instant
        if self.ends_at_ms.is_some_and(|end| at_ms >= end) {
            self.timers.cancel(TimerId::PhaseDisplay);
            return;
        }

        self.enter_phase(transition.entry, at_ms, emit);
    }

    fn on_phase_tick<F>(&mut self, emit: &mut F)
    where
        F: FnMut(SessionEvent),
    {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if state.phase_remaining_s > 0 {
            state.phase_remaining_s -= 1;
            emit(SessionEvent::PhaseCountdown(state.phase_remaining_s));
        }
    }

    fn on_clock_tick<F>(&mut self, at_ms: u64, emit: &mut F)
    where
        F: FnMut(SessionEvent),
    {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        state.remaining_s = state.remaining_s.saturating_sub(1);
        let remaining_s = state.remaining_s;
        emit(SessionEvent::RemainingTime(remaining_s));

        if remaining_s == 0 {
            self.finish(true, at_ms, emit);
        }
    }

    fn on_idle_reset<F>(&mut self, emit: &mut F)
    where
        F: FnMut(SessionEvent),
    {
        if self.status == Status::Stopped {
            self.status = self.status.transition(Event::IdleTimeout);
            emit(SessionEvent::Idle);
        }
    }

    /// Tear the session down
    ///
    /// Timers are cancelled before resources are released.
    fn finish<F>(&mut self, completed: bool, at_ms: u64, emit: &mut F)
    where
        F: FnMut(SessionEvent),
    {
        self.timers.cancel_all();
        self.sequencer.halt();
        self.release_resources();

        let total_s = self.config.map(|c| c.total_s()).unwrap_or(0);
        let summary = match self.state.take() {
            Some(state) => SessionSummary {
                completed,
                cycles: state.completed_cycles,
                elapsed_s: total_s.saturating_sub(state.remaining_s),
            },
            None => SessionSummary {
                completed,
                cycles: 0,
                elapsed_s: 0,
            },
        };
        self.config = None;
        self.ends_at_ms = None;
        self.last_summary = Some(summary);

        let event = if completed { Event::Elapsed } else { Event::Stop };
        self.status = self.status.transition(event);
        emit(SessionEvent::Finished(summary));

        if !completed {
            self.timers
                .schedule_once(TimerId::IdleReset, at_ms + IDLE_RESET_MS);
        }
    }

    fn acquire_resources<F>(&mut self, emit: &mut F)
    where
        F: FnMut(SessionEvent),
    {
        if !self.wake_held {
            match self.wake.acquire() {
                Ok(()) => self.wake_held = true,
                Err(error) => emit(SessionEvent::ResourceUnavailable {
                    resource: Resource::WakeLock,
                    error,
                }),
            }
        }
        if !self.audio_held {
            match self.audio.unlock() {
                Ok(()) => self.audio_held = true,
                Err(error) => emit(SessionEvent::ResourceUnavailable {
                    resource: Resource::AudioUnlock,
                    error,
                }),
            }
        }
    }

    fn release_resources(&mut self) {
        if self.wake_held {
            self.wake.release();
            self.wake_held = false;
        }
        if self.audio_held {
            self.audio.pause();
            self.audio_held = false;
        }
    }
}
