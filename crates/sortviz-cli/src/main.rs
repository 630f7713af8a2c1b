//! Terminal front end for the Sortviz sorting visualizer.
//!
//! Wires a [`Session`] to a bar-chart renderer and line-based keyboard
//! controls, runs one sort, and reports the counters.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `sortviz-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing) to stderr
//! 3. Load the saved mute preference
//! 4. Load `SORTVIZ_INPUT` or generate a random array
//! 5. Start the run with a terminal sink
//! 6. Spawn keyboard controls and the Ctrl-C handler
//! 7. Wait for the run and log the result
//!
//! [`Session`]: sortviz_core::session::Session

mod error;
mod keys;
mod prefs;
mod terminal;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sortviz_core::config::{CONFIG_FILE_NAME, VisualizerConfig};
use sortviz_core::control::RunControl;
use sortviz_core::input::parse_sequence;
use sortviz_core::session::Session;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;
use crate::keys::Controls;
use crate::prefs::{PREFS_FILE_NAME, Preferences};
use crate::terminal::TerminalSink;

/// Environment variable holding a sequence to sort instead of a random one.
const INPUT_ENV: &str = "SORTVIZ_INPUT";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, preferences, or input are invalid,
/// or if the run task fails. A cancelled run is a normal exit.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet; errors surface from main.
    let config = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        array_size = config.array.size,
        algorithm = %config.playback.algorithm,
        speed = config.playback.speed,
        paced = config.clock.paced,
        "sortviz starting"
    );

    // 3. Saved preferences win over the configured default.
    let prefs_path = PathBuf::from(PREFS_FILE_NAME);
    let mut session = Session::new(config);
    match Preferences::load(&prefs_path) {
        Ok(Some(prefs)) => session.set_muted(prefs.muted),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "ignoring unreadable preferences"),
    }

    // 4. Input sequence.
    load_input(&mut session)?;

    // 5. Start the run.
    let algorithm = session.algorithm();
    let sink = TerminalSink::new(std::io::stdout(), session.tone_mapper(), algorithm.label());
    let handle = session.start(Box::new(sink))?;
    info!(run_id = %handle.run_id(), %algorithm, "Run started; p pause, q cancel, +/- speed, m mute");

    // 6. Controls.
    let control = session.control();
    let keyboard = keys::spawn_keyboard(Controls {
        control: Arc::clone(&control),
        muted: session.mute_flag(),
        prefs_path,
    });
    let interrupt = spawn_interrupt(control);

    // 7. Wait for the run.
    let report = session.finish(handle).await?;
    keyboard.abort();
    interrupt.abort();

    info!(
        outcome = ?report.outcome,
        comparisons = report.counters.comparisons,
        swaps = report.counters.mutations,
        "sortviz shutdown complete"
    );
    Ok(())
}

/// Load `sortviz-config.yaml` from the working directory, or defaults if
/// the file does not exist.
fn load_config() -> Result<VisualizerConfig, CliError> {
    let config = VisualizerConfig::load_or_default(Path::new(CONFIG_FILE_NAME))?;
    Ok(config)
}

/// Fill the session from `SORTVIZ_INPUT`, or generate a random array.
fn load_input(session: &mut Session) -> Result<(), CliError> {
    if let Ok(text) = std::env::var(INPUT_ENV) {
        let values = parse_sequence(&text)?;
        let loaded = session.load(values)?;
        info!(len = loaded.len(), "Sequence loaded from {INPUT_ENV}");
        return Ok(());
    }
    let generated = session.generate(&mut rand::rng())?;
    info!(len = generated.len(), "Random sequence generated");
    Ok(())
}

/// Cancel the run on Ctrl-C.
fn spawn_interrupt(control: Arc<RunControl>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, cancelling run");
            control.request_cancel();
        }
    })
}
