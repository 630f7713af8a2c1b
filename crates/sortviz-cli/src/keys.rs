//! Line-based keyboard controls.
//!
//! A plain thread reads stdin one line at a time and forwards parsed
//! commands over a channel; an async task applies them to the shared run
//! control. Reading stdin on its own thread keeps a pending read from
//! holding the runtime open at shutdown.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sortviz_core::control::RunControl;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::prefs::Preferences;

/// Speed change per `+` or `-`.
pub const SPEED_STEP: i16 = 10;

/// Buffered commands between the reader thread and the apply task.
const COMMAND_BUFFER: usize = 16;

/// A keyboard command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `p`: pause or resume.
    TogglePause,
    /// `q`: cancel the run.
    Cancel,
    /// `+`: speed up by [`SPEED_STEP`].
    Faster,
    /// `-`: slow down by [`SPEED_STEP`].
    Slower,
    /// `m`: mute or unmute tone cues.
    ToggleMute,
}

/// Parse one input line. Unknown input yields `None`.
pub fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "p" | "P" => Some(Command::TogglePause),
        "q" | "Q" => Some(Command::Cancel),
        "+" | "=" => Some(Command::Faster),
        "-" | "_" => Some(Command::Slower),
        "m" | "M" => Some(Command::ToggleMute),
        _ => None,
    }
}

/// What the controls act on.
#[derive(Debug, Clone)]
pub struct Controls {
    /// Shared run control.
    pub control: Arc<RunControl>,
    /// Shared mute flag.
    pub muted: Arc<AtomicBool>,
    /// Where the mute preference is saved.
    pub prefs_path: PathBuf,
}

impl Controls {
    /// Apply one command.
    pub fn apply(&self, command: Command) {
        match command {
            Command::TogglePause => {
                let paused = self.control.toggle_pause();
                info!(paused, "Playback toggled");
            }
            Command::Cancel => {
                info!("Cancel requested from keyboard");
                self.control.request_cancel();
            }
            Command::Faster => {
                let speed = self.control.adjust_speed(SPEED_STEP);
                info!(speed, "Speed changed");
            }
            Command::Slower => {
                let speed = self.control.adjust_speed(SPEED_STEP.saturating_neg());
                info!(speed, "Speed changed");
            }
            Command::ToggleMute => {
                let muted = !self.muted.fetch_xor(true, Ordering::AcqRel);
                info!(muted, "Mute toggled");
                if let Err(e) = (Preferences { muted }).save(&self.prefs_path) {
                    warn!(error = %e, path = %self.prefs_path.display(), "failed to save preferences");
                }
            }
        }
    }
}

/// Start reading stdin and applying commands until stdin closes or the
/// returned task is aborted.
pub fn spawn_keyboard(controls: Controls) -> tokio::task::JoinHandle<()> {
    let (tx, mut rx) = mpsc::channel(COMMAND_BUFFER);

    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Some(command) => {
                    if tx.blocking_send(command).is_err() {
                        break;
                    }
                }
                None => debug!(input = line.trim(), "ignored keyboard input"),
            }
        }
    });

    tokio::spawn(async move {
        while let Some(command) = rx.recv().await {
            controls.apply(command);
        }
    })
}
