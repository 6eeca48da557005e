//! Presentation adapter
//!
//! Maps session events onto render calls and audio cues. Visual updates
//! always happen before the cue, so a failing cue never leaves the display
//! behind.

use core::fmt::Write;

use crate::config::{SettingsView, Theme};
use crate::session::SessionEvent;
use crate::traits::{Clock, Cue, CueError, CuePlayer, Renderer, View};

/// Indicator scale at rest
pub const REST_SCALE: f32 = 1.0;

/// Shrink back to rest after a completed session (ms)
pub const COMPLETE_SHRINK_MS: u32 = 1500;

/// Shrink back to rest after a stop (ms)
pub const STOP_SHRINK_MS: u32 = 500;

/// Control captions
pub const CONTROL_STOP: &str = "Stop Session";
pub const CONTROL_COMPLETE: &str = "Complete";

/// Drives a renderer and cue player from session events
pub struct Presenter<R: Renderer, C: CuePlayer> {
    renderer: R,
    cues: C,
}

impl<R: Renderer, C: CuePlayer> Presenter<R, C> {
    pub fn new(renderer: R, cues: C) -> Self {
        Self { renderer, cues }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[cfg(test)]
    pub(crate) fn cues(&self) -> &C {
        &self.cues
    }

    /// Publish settings and theme
    pub fn show_settings(&mut self, settings: &SettingsView) {
        self.renderer.show_settings(settings);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.renderer.set_theme(theme);
    }

    /// Reflect one session event
    ///
    /// Returns the cue that failed to play, if any.
    pub fn apply(&mut self, event: &SessionEvent) -> Result<(), (Cue, CueError)> {
        self.draw(event);
        match event.cue() {
            Some(cue) => self.play(cue),
            None => Ok(()),
        }
    }

    /// Reflect one session event without its cue
    pub fn apply_silent(&mut self, event: &SessionEvent) {
        self.draw(event);
    }

    fn draw(&mut self, event: &SessionEvent) {
        match *event {
            SessionEvent::Started { rate, remaining_s } => {
                self.renderer.set_view(View::Active);
                self.renderer.set_control(CONTROL_STOP);
                if let Some(rate) = rate {
                    self.renderer.set_breath_rate(rate);
                }
                self.renderer.set_cycle_count(0);
                self.renderer.set_remaining(Clock(remaining_s));
            }
            SessionEvent::LeadIn { count: None } => {
                self.renderer.set_label("Ready...");
                self.renderer.set_phase_countdown(None);
            }
            SessionEvent::LeadIn { count: Some(count) } => {
                let mut text: heapless::String<4> = heapless::String::new();
                let _ = write!(text, "{}", count);
                self.renderer.set_label(&text);
            }
            SessionEvent::PhaseEntered(entry) => {
                self.renderer.set_label(entry.label);
                self.renderer.set_phase_countdown(Some(entry.duration_s));
                if entry.moves_indicator() {
                    self.renderer
                        .set_visual_scale(entry.scale.factor(), entry.transition_s as u32 * 1000);
                }
            }
            SessionEvent::PhaseCountdown(seconds) => {
                self.renderer.set_phase_countdown(Some(seconds));
            }
            SessionEvent::CycleCompleted(cycles) => self.renderer.set_cycle_count(cycles),
            SessionEvent::RemainingTime(seconds) => self.renderer.set_remaining(Clock(seconds)),
            SessionEvent::Finished(summary) if summary.completed => {
                self.renderer.set_phase_countdown(None);
                self.renderer.set_label("Well done");
                self.renderer.set_control(CONTROL_COMPLETE);
                self.renderer.set_view(View::Completed);
                self.renderer
                    .set_visual_scale(REST_SCALE, COMPLETE_SHRINK_MS);
            }
            SessionEvent::Finished(_) | SessionEvent::Dismissed => self.wind_down(),
            SessionEvent::Idle => self.renderer.set_view(View::Idle),
            // Reported by the caller; nothing to draw
            SessionEvent::ResourceUnavailable { .. } => {}
        }
    }

    /// Stopped by the user: back towards the start screen
    fn wind_down(&mut self) {
        self.renderer.set_phase_countdown(None);
        self.renderer.set_label("Start");
        self.renderer.set_view(View::Stopping);
        self.renderer.set_visual_scale(REST_SCALE, STOP_SHRINK_MS);
    }

    fn play(&mut self, cue: Cue) -> Result<(), (Cue, CueError)> {
        self.cues.play(cue).map_err(|e| (cue, e))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording fakes shared by the presenter and widget tests

    use super::*;
    use crate::config::BreathRate;
    use std::string::{String, ToString};
    use std::vec::Vec;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Scale(f32, u32),
        Label(String),
        PhaseCountdown(Option<u16>),
        Cycles(u32),
        Remaining(String),
        Rate(String),
        Control(String),
        View(View),
        Settings(SettingsView),
        Theme(Theme),
    }

    #[derive(Default)]
    pub struct RecordingRenderer {
        pub calls: Vec<Call>,
    }

    impl RecordingRenderer {
        pub fn labels(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Label(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub fn last_settings(&self) -> Option<&SettingsView> {
            self.calls.iter().rev().find_map(|c| match c {
                Call::Settings(view) => Some(view),
                _ => None,
            })
        }
    }

    impl Renderer for RecordingRenderer {
        fn set_visual_scale(&mut self, factor: f32, transition_ms: u32) {
            self.calls.push(Call::Scale(factor, transition_ms));
        }

        fn set_label(&mut self, text: &str) {
            self.calls.push(Call::Label(text.to_string()));
        }

        fn set_phase_countdown(&mut self, seconds: Option<u16>) {
            self.calls.push(Call::PhaseCountdown(seconds));
        }

        fn set_cycle_count(&mut self, cycles: u32) {
            self.calls.push(Call::Cycles(cycles));
        }

        fn set_remaining(&mut self, clock: Clock) {
            self.calls.push(Call::Remaining(clock.to_string()));
        }

        fn set_breath_rate(&mut self, rate: BreathRate) {
            self.calls.push(Call::Rate(rate.to_string()));
        }

        fn set_control(&mut self, caption: &str) {
            self.calls.push(Call::Control(caption.to_string()));
        }

        fn set_view(&mut self, view: View) {
            self.calls.push(Call::View(view));
        }

        fn show_settings(&mut self, settings: &SettingsView) {
            self.calls.push(Call::Settings(*settings));
        }

        fn set_theme(&mut self, theme: Theme) {
            self.calls.push(Call::Theme(theme));
        }
    }

    #[derive(Default)]
    pub struct RecordingCues {
        pub played: Vec<Cue>,
        pub fail: bool,
    }

    impl CuePlayer for RecordingCues {
        fn play(&mut self, cue: Cue) -> Result<(), CueError> {
            if self.fail {
                return Err(CueError::Unavailable);
            }
            self.played.push(cue);
            Ok(())
        }
    }
}
