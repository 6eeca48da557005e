//! Render and cue capabilities

use core::fmt;

use crate::config::{BreathRate, SettingsView, Theme};

/// Audio cue identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cue {
    Inhale,
    Hold,
    Exhale,
    /// Session finished normally
    Completion,
}

/// Errors that can occur when playing a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CueError {
    /// No audio output available
    Unavailable,
    /// Output refused to play (not unlocked yet)
    Blocked,
}

impl fmt::Display for CueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CueError::Unavailable => f.write_str("audio output unavailable"),
            CueError::Blocked => f.write_str("audio output blocked"),
        }
    }
}

/// Which part of the widget is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum View {
    /// Settings shown, session controls hidden
    #[default]
    Idle,
    /// Session in progress
    Active,
    /// Session finished, summary shown
    Completed,
    /// Stopped, waiting to return to idle
    Stopping,
}

/// Trait for drawing the widget
///
/// Calls are fire-and-forget; a renderer that cannot draw simply drops
/// the update.
pub trait Renderer {
    /// Animate the indicator to `factor` over `transition_ms`
    ///
    /// A transition of 0 snaps.
    fn set_visual_scale(&mut self, factor: f32, transition_ms: u32);

    /// Main label ("Inhale", "Ready...", "3", "Well done", ...)
    fn set_label(&mut self, text: &str);

    /// Seconds left in the current phase, or blank
    fn set_phase_countdown(&mut self, seconds: Option<u16>);

    /// Completed cycle count
    fn set_cycle_count(&mut self, cycles: u32);

    /// Session time left
    fn set_remaining(&mut self, clock: Clock);

    /// Breaths per minute for the session's config
    fn set_breath_rate(&mut self, rate: BreathRate);

    /// Start/stop control caption ("Start", "Stop", "Complete")
    fn set_control(&mut self, caption: &str);

    /// Switch the visible part of the widget
    fn set_view(&mut self, view: View);

    /// Publish current settings
    fn show_settings(&mut self, settings: &SettingsView);

    /// Apply a colour theme
    fn set_theme(&mut self, theme: Theme);
}

/// Trait for playing audio cues
pub trait CuePlayer {
    /// Play a short cue
    fn play(&mut self, cue: Cue) -> Result<(), CueError>;
}

impl<T: Renderer + ?Sized> Renderer for &mut T {
    fn set_visual_scale(&mut self, factor: f32, transition_ms: u32) {
        (**self).set_visual_scale(factor, transition_ms)
    }

    fn set_label(&mut self, text: &str) {
        (**self).set_label(text)
    }

    fn set_phase_countdown(&mut self, seconds: Option<u16>) {
        (**self).set_phase_countdown(seconds)
    }

    fn set_cycle_count(&mut self, cycles: u32) {
        (**self).set_cycle_count(cycles)
    }

    fn set_remaining(&mut self, clock: Clock) {
        (**self).set_remaining(clock)
    }

    fn set_breath_rate(&mut self, rate: BreathRate) {
        (**self).set_breath_rate(rate)
    }

    fn set_control(&mut self, caption: &str) {
        (**self).set_control(caption)
    }

    fn set_view(&mut self, view: View) {
        (**self).set_view(view)
    }

    fn show_settings(&mut self, settings: &SettingsView) {
        (**self).show_settings(settings)
    }

    fn set_theme(&mut self, theme: Theme) {
        (**self).set_theme(theme)
    }
}

impl<T: CuePlayer + ?Sized> CuePlayer for &mut T {
    fn play(&mut self, cue: Cue) -> Result<(), CueError> {
        (**self).play(cue)
    }
}

/// Remaining session time, displayed as `MM:SS`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Clock(pub u32);

impl Clock {
    pub fn minutes(self) -> u32 {
        self.0 / 60
    }

    pub fn seconds(self) -> u32 {
        self.0 % 60
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes(), self.seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn test_clock_format() {
        assert_eq!(Clock(300).to_string(), "05:00");
        assert_eq!(Clock(59).to_string(), "00:59");
        assert_eq!(Clock(3600).to_string(), "60:00");
        assert_eq!(Clock(0).to_string(), "00:00");
    }
}
