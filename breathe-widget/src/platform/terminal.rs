//! Terminal renderer
//!
//! Keeps the latest widget state and redraws it as a single status line.
//! The breathing indicator is a bar whose length follows the visual scale,
//! interpolated between render calls so inhale and exhale animate smoothly.

use std::io::{self, Write};

use breathe_core::config::{BreathRate, Field, SettingsView, Theme};
use breathe_core::traits::{Clock, Renderer, View};
use crossterm::cursor::MoveToColumn;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::queue;

/// Indicator width at the largest scale
pub const INDICATOR_WIDTH: usize = 18;

/// Largest visual scale the indicator is sized for
const MAX_SCALE: f32 = 1.5;

/// Terminal width assumed when it cannot be queried
pub const DEFAULT_COLUMNS: u16 = 80;

/// Marks a field the active preset does not let you adjust
const LOCKED_MARK: char = '*';

/// Scale transition between two render calls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleAnimation {
    from: f32,
    to: f32,
    start_ms: u64,
    duration_ms: u32,
}

impl ScaleAnimation {
    /// Resting indicator
    pub const fn rest() -> Self {
        Self {
            from: 1.0,
            to: 1.0,
            start_ms: 0,
            duration_ms: 0,
        }
    }

    /// Scale at `now_ms`
    pub fn at(&self, now_ms: u64) -> f32 {
        let elapsed = now_ms.saturating_sub(self.start_ms);
        if self.duration_ms == 0 || elapsed >= self.duration_ms as u64 {
            return self.to;
        }
        let t = elapsed as f32 / self.duration_ms as f32;
        self.from + (self.to - self.from) * ease(t)
    }

    /// Head for `to` from wherever the indicator is at `now_ms`
    pub fn retarget(&mut self, now_ms: u64, to: f32, duration_ms: u32) {
        self.from = self.at(now_ms);
        self.to = to;
        self.start_ms = now_ms;
        self.duration_ms = duration_ms;
    }
}

/// Smoothstep easing
fn ease(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Renders the widget on a terminal line
pub struct TerminalRenderer<W: Write> {
    out: W,
    now_ms: u64,
    scale: ScaleAnimation,
    label: String,
    phase_countdown: Option<u16>,
    cycles: u32,
    remaining: Clock,
    rate: Option<BreathRate>,
    control: String,
    view: View,
    settings: Option<SettingsView>,
    theme: Theme,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            now_ms: 0,
            scale: ScaleAnimation::rest(),
            label: String::from("Start"),
            phase_countdown: None,
            cycles: 0,
            remaining: Clock(0),
            rate: None,
            control: String::new(),
            view: View::Idle,
            settings: None,
            theme: Theme::default(),
        }
    }

    /// Set the time that subsequent render calls happen at
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
    }

    /// Indicator bar at `now_ms`
    pub fn indicator(&self, now_ms: u64) -> String {
        let scale = self.scale.at(now_ms).clamp(0.0, MAX_SCALE);
        let filled = ((scale / MAX_SCALE) * INDICATOR_WIDTH as f32).round() as usize;
        format!("[{:<width$}]", "=".repeat(filled), width = INDICATOR_WIDTH)
    }

    /// Status line text at `now_ms`
    pub fn frame(&self, now_ms: u64) -> String {
        match self.view {
            View::Idle => self.idle_frame(),
            View::Active | View::Stopping | View::Completed => {
                let countdown = self
                    .phase_countdown
                    .map(|s| s.to_string())
                    .unwrap_or_default();
                let rate = self
                    .rate
                    .map(|r| format!(" | {} bpm", r))
                    .unwrap_or_default();
                format!(
                    "{} {:<9}{:>3} | cycles {} | {}{} | {}",
                    self.indicator(now_ms),
                    self.label,
                    countdown,
                    self.cycles,
                    self.remaining,
                    rate,
                    self.control
                )
            }
        }
    }

    fn idle_frame(&self) -> String {
        let Some(settings) = &self.settings else {
            return self.label.clone();
        };
        let phases: Vec<String> = Field::PHASES
            .iter()
            .map(|&field| {
                let value = settings.phases.get(field).unwrap_or(0);
                let mark = if settings.is_adjustable(field) {
                    String::new()
                } else {
                    LOCKED_MARK.to_string()
                };
                format!("{} {}{}", field_name(field), value, mark)
            })
            .collect();
        format!(
            "{} | {} | {} min | {} | {}",
            settings.preset.as_str(),
            phases.join(" "),
            settings.duration_min,
            settings.preset.description(),
            self.theme.as_str()
        )
    }

    /// Status line fitted to a terminal `columns` wide
    ///
    /// The last column stays empty so the cursor never wraps onto a new row.
    pub fn line(&self, now_ms: u64, columns: u16) -> String {
        fit(&self.frame(now_ms), (columns as usize).saturating_sub(1))
    }

    /// Redraw the status line
    pub fn draw(&mut self, now_ms: u64) -> io::Result<()> {
        let columns = terminal::size()
            .map(|(columns, _)| columns)
            .unwrap_or(DEFAULT_COLUMNS);
        let line = self.line(now_ms, columns);
        let (r, g, b) = self.theme.background();
        queue!(
            self.out,
            MoveToColumn(0),
            SetBackgroundColor(Color::Rgb { r, g, b }),
            SetForegroundColor(Color::White),
            Clear(ClearType::CurrentLine),
            Print(line),
            ResetColor
        )?;
        self.out.flush()
    }

    /// Leave the status line and restore colours
    pub fn finish(&mut self) -> io::Result<()> {
        queue!(self.out, ResetColor, Print("\n"))?;
        self.out.flush()
    }
}

/// Short name of a phase field, as typed in commands
fn field_name(field: Field) -> &'static str {
    match field {
        Field::Inhale => "in",
        Field::Hold1 => "hold",
        Field::Exhale => "out",
        Field::Hold2 => "hold2",
        Field::Duration => "duration",
    }
}

/// First `width` characters of `text`
fn fit(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn set_visual_scale(&mut self, factor: f32, transition_ms: u32) {
        self.scale.retarget(self.now_ms, factor, transition_ms);
    }

    fn set_label(&mut self, text: &str) {
        self.label.clear();
        self.label.push_str(text);
    }

    fn set_phase_countdown(&mut self, seconds: Option<u16>) {
        self.phase_countdown = seconds;
    }

    fn set_cycle_count(&mut self, cycles: u32) {
        self.cycles = cycles;
    }

    fn set_remaining(&mut self, clock: Clock) {
        self.remaining = clock;
    }

    fn set_breath_rate(&mut self, rate: BreathRate) {
        self.rate = Some(rate);
    }

    fn set_control(&mut self, caption: &str) {
        self.control.clear();
        self.control.push_str(caption);
    }

    fn set_view(&mut self, view: View) {
        self.view = view;
    }

    fn show_settings(&mut self, settings: &SettingsView) {
        self.settings = Some(*settings);
    }

    fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }
}
