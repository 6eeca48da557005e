//! The breathing widget
//!
//! Ties the settings store, session controller and presenter together and
//! exposes the two entry points a host needs: [`Widget::handle`] for user
//! commands and [`Widget::poll`] for the passage of time.

use breathe_hal::{AudioUnlock, KeyValueStore, WakeLock};

use crate::config::{Field, PresetName, Settings, SettingsError};
use crate::presenter::Presenter;
use crate::session::{SessionController, SessionEvent, TICK_MS};
use crate::state::Status;
use crate::traits::{Cue, CueError, CuePlayer, Renderer, View};

/// User commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Start a session
    Start,
    /// Stop the session, or dismiss a completed one
    Stop,
    /// Tap on the indicator: starts a session unless one is running
    Click,
    /// Switch preset (idle only)
    SelectPreset(PresetName),
    /// Adjust a field by a signed step (idle only)
    Adjust(Field, i16),
    /// Advance to the next theme (idle only)
    CycleTheme,
}

/// Things the host may want to log or surface
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notice {
    /// A session event, already presented
    Event(SessionEvent),
    /// A cue could not be played
    CueFailed(Cue, CueError),
    /// A settings change could not be persisted
    Storage(SettingsError),
}

/// Breathing timer widget
pub struct Widget<S, W, A, R, C>
where
    S: KeyValueStore,
    W: WakeLock,
    A: AudioUnlock,
    R: Renderer,
    C: CuePlayer,
{
    settings: Settings<S>,
    controller: SessionController<W, A>,
    presenter: Presenter<R, C>,
}

impl<S, W, A, R, C> Widget<S, W, A, R, C>
where
    S: KeyValueStore,
    W: WakeLock,
    A: AudioUnlock,
    R: Renderer,
    C: CuePlayer,
{
    /// Create a widget and draw its idle state
    pub fn new(settings: Settings<S>, wake: W, audio: A, renderer: R, cues: C) -> Self {
        let mut widget = Self {
            settings,
            controller: SessionController::new(wake, audio),
            presenter: Presenter::new(renderer, cues),
        };
        widget.refresh();
        widget
    }

    /// Redraw theme, settings and the idle view
    pub fn refresh(&mut self) {
        self.presenter.set_theme(self.settings.theme());
        self.presenter.show_settings(&self.settings.view());
        if self.controller.status() == Status::Idle {
            self.presenter.renderer_mut().set_view(View::Idle);
        }
    }

    pub fn settings(&self) -> &Settings<S> {
        &self.settings
    }

    /// Mutable settings access for startup overrides
    ///
    /// Changes made here are not published until [`Self::refresh`].
    pub fn settings_mut(&mut self) -> &mut Settings<S> {
        &mut self.settings
    }

    pub fn controller(&self) -> &SessionController<W, A> {
        &self.controller
    }

    pub fn renderer(&self) -> &R {
        self.presenter.renderer()
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        self.presenter.renderer_mut()
    }

    /// Current session status
    pub fn status(&self) -> Status {
        self.controller.status()
    }

    /// Earliest time [`Self::poll`] has work to do
    pub fn next_deadline(&self) -> Option<u64> {
        self.controller.next_deadline()
    }

    /// Apply a user command at `now_ms`
    ///
    /// Returns false if the command was ignored: starting while running,
    /// stopping while idle, or changing settings during a session.
    pub fn handle<F>(&mut self, command: Command, now_ms: u64, observe: &mut F) -> bool
    where
        F: FnMut(Notice),
    {
        match command {
            Command::Start => self.start(now_ms, observe),
            Command::Click => {
                if self.controller.status().can_start() {
                    self.start(now_ms, observe)
                } else {
                    false
                }
            }
            Command::Stop => {
                let presenter = &mut self.presenter;
                self.controller
                    .stop(now_ms, &mut |event| Self::dispatch(presenter, observe, event))
            }
            _ if self.controller.is_running() => false,
            Command::SelectPreset(preset) => {
                let result = self.settings.select_preset(preset);
                self.settings_changed(result.map(|_| true), observe)
            }
            Command::Adjust(field, delta) => {
                let result = self.settings.adjust(field, delta);
                self.settings_changed(result, observe)
            }
            Command::CycleTheme => {
                let result = self.settings.cycle_theme();
                self.presenter.set_theme(self.settings.theme());
                self.settings_changed(result.map(|_| true), observe)
            }
        }
    }

    /// Service timers due at `now_ms`
    ///
    /// Session state always catches up with every missed deadline, but
    /// events more than a tick overdue are drawn without their cue, and a
    /// single poll plays at most one cue.
    pub fn poll<F>(&mut self, now_ms: u64, observe: &mut F)
    where
        F: FnMut(Notice),
    {
        let presenter = &mut self.presenter;
        let stale_before = now_ms.saturating_sub(TICK_MS);
        let mut cued = false;
        self.controller.poll_timed(now_ms, &mut |event, due_ms| {
            let audible = !cued && due_ms >= stale_before;
            if audible && event.cue().is_some() {
                cued = true;
            }
            Self::dispatch_with(presenter, observe, event, audible)
        });
    }

    fn start<F>(&mut self, now_ms: u64, observe: &mut F) -> bool
    where
        F: FnMut(Notice),
    {
        let config = self.settings.session_config();
        let presenter = &mut self.presenter;
        self.controller
            .start(config, now_ms, &mut |event| Self::dispatch(presenter, observe, event))
    }

    fn settings_changed<F>(&mut self, result: Result<bool, SettingsError>, observe: &mut F) -> bool
    where
        F: FnMut(Notice),
    {
        // Failed writes leave the in-memory change in place
        let changed = match result {
            Ok(changed) => changed,
            Err(e) => {
                observe(Notice::Storage(e));
                true
            }
        };
        self.presenter.show_settings(&self.settings.view());
        changed
    }

    fn dispatch<F>(presenter: &mut Presenter<R, C>, observe: &mut F, event: SessionEvent)
    where
        F: FnMut(Notice),
    {
        Self::dispatch_with(presenter, observe, event, true)
    }

    fn dispatch_with<F>(
        presenter: &mut Presenter<R, C>,
        observe: &mut F,
        event: SessionEvent,
        audible: bool,
    ) where
        F: FnMut(Notice),
    {
        let cue_result = if audible {
            presenter.apply(&event)
        } else {
            presenter.apply_silent(&event);
            Ok(())
        };
        observe(Notice::Event(event));
        if let Err((cue, error)) = cue_result {
            observe(Notice::CueFailed(cue, error));
        }
    }
}
