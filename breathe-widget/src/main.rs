//! Breathe - guided breathing timer for the terminal
//!
//! Paces inhale, hold, exhale and hold with a pulsing indicator, bell cues
//! and a session countdown. Commands are read from stdin one per line; the
//! status line is redrawn on stdout and logs go to stderr.
//!
//! Runs on the embassy std executor: the tick task and the controller loop
//! share the executor thread, a reader thread feeds stdin commands in.

use std::io::{self, Stdout};
use std::path::PathBuf;

use breathe_core::config::{PresetName, Settings};
use breathe_core::Widget;
use breathe_hal::MemoryStore;
use clap::Parser;
use embassy_executor::Spawner;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod channels;
mod command;
mod config;
mod platform;
mod tasks;

use crate::config::{load_config, WidgetConfig, DEFAULT_CONFIG_FILE};
use crate::platform::{
    BellCuePlayer, FileStore, HostAudioUnlock, HostStore, HostWakeLock, TerminalRenderer,
};
use crate::tasks::RunOptions;

/// The widget as assembled on the host
pub type HostWidget = Widget<
    HostStore,
    HostWakeLock,
    HostAudioUnlock,
    TerminalRenderer<Stdout>,
    BellCuePlayer<Stdout>,
>;

#[derive(Parser, Debug)]
#[command(name = "breathe", version, about = "Guided breathing timer")]
struct Args {
    /// Config file [default: ./breathe.toml if present]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Settings directory, overrides `[storage] dir`
    #[arg(long)]
    store: Option<PathBuf>,

    /// Keep settings in memory only
    #[arg(long, conflicts_with = "store")]
    ephemeral: bool,

    /// Preset to select: box, 478 or personal
    #[arg(long, value_parser = parse_preset)]
    preset: Option<PresetName>,

    /// Session length in minutes
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=60))]
    duration: Option<u8>,

    /// Start a session right away
    #[arg(long)]
    start: bool,

    /// Exit when the session ends
    #[arg(long)]
    exit_on_finish: bool,

    /// Log filter such as `debug` [default: RUST_LOG, else info]
    #[arg(long)]
    log: Option<String>,
}

fn parse_preset(name: &str) -> Result<PresetName, String> {
    PresetName::from_name(name)
        .ok_or_else(|| format!("unknown preset `{}` (box, 478, personal)", name))
}

fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(filter) => EnvFilter::new(filter),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    // stdout carries the status line
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let args = Args::parse();
    init_tracing(args.log.as_deref());

    let code = match run(args, spawner).await {
        Ok(()) => 0,
        Err(e) => {
            error!(error = %e, "breathe failed");
            1
        }
    };
    // The executor never returns on its own
    std::process::exit(code);
}

async fn run(args: Args, spawner: Spawner) -> io::Result<()> {
    info!("Breathe starting...");

    let config = read_config(&args);
    let settings = load_settings(&args, &config);

    let renderer = TerminalRenderer::new(io::stdout());
    let cues = BellCuePlayer::new(io::stdout(), config.audio.enabled, config.audio.bell);
    let wake = HostWakeLock::new(config.wake_lock.enabled);
    let audio = HostAudioUnlock::new(config.audio.enabled);
    let mut widget: HostWidget = Widget::new(settings, wake, audio, renderer, cues);

    tasks::spawn_input_reader()?;
    eprintln!("{}", command::HELP);

    let options = RunOptions {
        autostart: args.start || config.session.autostart,
        exit_on_finish: args.exit_on_finish,
    };
    spawner
        .spawn(tasks::tick_task(config.timing.tick_ms))
        .map_err(|e| io::Error::other(format!("tick task: {:?}", e)))?;

    // Borrowed rather than spawned: the widget is handed back for teardown
    tasks::controller_loop(&mut widget, options).await;

    widget.renderer_mut().finish()
}

/// Load the config file, falling back to defaults on any problem
fn read_config(args: &Args) -> WidgetConfig {
    let path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    match load_config(&path, args.config.is_some()) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring config, using defaults");
            WidgetConfig::default()
        }
    }
}

/// Open storage, load settings and apply startup overrides
fn load_settings(args: &Args, config: &WidgetConfig) -> Settings<HostStore> {
    let store = if args.ephemeral {
        info!("settings kept in memory only");
        HostStore::Memory(MemoryStore::new())
    } else {
        let dir = args.store.clone().unwrap_or_else(|| config.storage.dir.clone());
        info!(dir = %dir.display(), "settings directory");
        HostStore::File(FileStore::new(dir))
    };

    let mut settings = Settings::load(store);
    for (key, error) in settings.take_load_issues() {
        warn!(key = key.as_str(), %error, "stored setting ignored");
    }

    if let Some(preset) = args.preset.or(config.session.preset) {
        if let Err(e) = settings.select_preset(preset) {
            warn!(error = %e, "preset selection not saved");
        }
    }
    if let Some(minutes) = args.duration.or(config.session.duration_min) {
        settings.set_duration(minutes);
    }

    info!(
        preset = settings.active_preset().as_str(),
        duration_min = settings.duration_min(),
        theme = settings.theme().as_str(),
        "settings loaded"
    );
    settings
}
