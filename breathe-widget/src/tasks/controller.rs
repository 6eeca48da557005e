//! Main controller loop
//!
//! Owns the widget. Receives commands and tick signals, forwards them to
//! the widget, logs what happens and redraws the terminal.

use breathe_core::session::{Resource, SessionEvent};
use breathe_core::{Command, Notice};
use breathe_hal::ResourceError;
use embassy_futures::select::{select, Either};
use tracing::{debug, info, warn};

use crate::channels::{INPUT_CHANNEL, TICK_SIGNAL};
use crate::command::Input;
use crate::tasks::tick::now_ms;
use crate::HostWidget;

/// Startup behaviour
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Start a session immediately
    pub autostart: bool,
    /// Exit once a session finishes
    pub exit_on_finish: bool,
}

/// Controller loop - runs until quit, or the first finished session with
/// `exit_on_finish`
pub async fn controller_loop(widget: &mut HostWidget, options: RunOptions) {
    info!("controller started");
    let mut finished = false;

    if options.autostart {
        let now = now_ms();
        widget.renderer_mut().set_now(now);
        widget.handle(Command::Start, now, &mut |n| observe(n, &mut finished));
    }
    redraw(widget, now_ms());

    loop {
        match select(INPUT_CHANNEL.receive(), TICK_SIGNAL.wait()).await {
            Either::First(Input::Command(command)) => {
                let now = now_ms();
                widget.renderer_mut().set_now(now);
                if !widget.handle(command, now, &mut |n| observe(n, &mut finished)) {
                    debug!(?command, status = ?widget.status(), "command ignored");
                }
                redraw(widget, now);
            }
            Either::First(Input::Help) => {}
            Either::First(Input::Quit) => {
                let now = now_ms();
                widget.renderer_mut().set_now(now);
                widget.handle(Command::Stop, now, &mut |n| observe(n, &mut finished));
                info!("quit");
                return;
            }
            Either::Second(now) => {
                widget.renderer_mut().set_now(now);
                widget.poll(now, &mut |n| observe(n, &mut finished));
                redraw(widget, now);
            }
        }

        if finished && options.exit_on_finish {
            info!("session finished, exiting");
            return;
        }
    }
}

fn redraw(widget: &mut HostWidget, now: u64) {
    if let Err(e) = widget.renderer_mut().draw(now) {
        warn!(error = %e, "terminal write failed");
    }
}

/// Log a widget notice
fn observe(notice: Notice, finished: &mut bool) {
    match notice {
        Notice::Event(SessionEvent::Finished(summary)) => {
            *finished = true;
            info!(
                completed = summary.completed,
                cycles = summary.cycles,
                elapsed_s = summary.elapsed_s,
                "session finished"
            );
        }
        Notice::Event(SessionEvent::ResourceUnavailable { resource, error }) => {
            log_resource(resource, error);
        }
        Notice::Event(event) => debug!(?event, "session event"),
        Notice::CueFailed(cue, error) => warn!(?cue, %error, "cue failed"),
        Notice::Storage(error) => warn!(%error, "settings not saved"),
    }
}

fn log_resource(resource: Resource, error: ResourceError) {
    match error {
        // Switched off in the config
        ResourceError::Unsupported => debug!(?resource, %error, "resource not available"),
        _ => warn!(?resource, %error, "resource not available"),
    }
}
