//! Session controller: owns the sequence between runs and starts runs.
//!
//! A run takes the sequence by value for its whole duration and hands it
//! back through [`Session::finish`]. While a run holds it, the session has
//! no sequence at all, so generating, loading, or starting another run is
//! rejected with [`SessionError::RunActive`] rather than racing the run.
//!
//! The session, not the [`RunHandle`], owns the run task. Dropping or
//! misrouting a handle never detaches a run: [`Session::abandon`] cancels
//! whatever run is active and takes the sequence back.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;
use sortviz_types::{Algorithm, RunCounters, RunId, Value};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::clock::StepClock;
use crate::config::VisualizerConfig;
use crate::control::RunControl;
use crate::input::{InputError, check_len};
use crate::runner::{RunReport, log_run_end, run_sort};
use crate::sink::{StepSink, ToneMapper};

/// Errors from session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A run is in progress; the sequence is unavailable until it ends.
    #[error("a run is already active")]
    RunActive,

    /// The operation needs an active run and there is none, or the handle
    /// belongs to a different run.
    #[error("no matching run is active")]
    NoRunActive,

    /// The supplied sequence was rejected.
    #[error("invalid input: {source}")]
    InvalidInput {
        /// Why the input was rejected.
        #[from]
        source: InputError,
    },

    /// The run task panicked or was aborted.
    #[error("run task failed: {source}")]
    Join {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },
}

/// Handle to a run in flight.
///
/// Controls act on the session's shared [`RunControl`], so they reach the
/// run at its next step.
#[derive(Debug)]
pub struct RunHandle {
    run_id: RunId,
    control: Arc<RunControl>,
    done: Arc<AtomicBool>,
}

impl RunHandle {
    /// Identifier of the run.
    pub const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Hold the run at its next step.
    pub fn pause(&self) {
        self.control.pause();
    }

    /// Continue a paused run.
    pub fn resume(&self) {
        self.control.resume();
    }

    /// Ask the run to stop at its next checkpoint.
    pub fn cancel(&self) {
        self.control.request_cancel();
    }

    /// Change the speed for subsequent steps. Returns the previous speed,
    /// or `None` if `speed` is outside `1..=100`.
    pub fn set_speed(&self, speed: u8) -> Option<u8> {
        self.control.set_speed(speed)
    }

    /// Whether the run task has ended.
    pub fn is_finished(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }
}

/// The run a session is waiting on.
#[derive(Debug)]
struct ActiveRun {
    run_id: RunId,
    /// Input of the run, restored if the run task fails.
    input: Vec<Value>,
    task: JoinHandle<RunReport>,
}

/// One visualizer session: a sequence, a selected algorithm, and controls.
#[derive(Debug)]
pub struct Session {
    config: VisualizerConfig,
    algorithm: Algorithm,
    /// `None` while a run owns the sequence.
    sequence: Option<Vec<Value>>,
    active: Option<ActiveRun>,
    counters: RunCounters,
    control: Arc<RunControl>,
    muted: Arc<AtomicBool>,
}

impl Session {
    /// Create a session with an empty sequence.
    pub fn new(config: VisualizerConfig) -> Self {
        let control = Arc::new(RunControl::new(config.playback.speed));
        let muted = Arc::new(AtomicBool::new(config.audio.muted));
        Self {
            algorithm: config.playback.algorithm,
            config,
            sequence: Some(Vec::new()),
            active: None,
            counters: RunCounters::default(),
            control,
            muted,
        }
    }

    /// Configuration the session was built with.
    pub const fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    /// The current sequence, or `None` while a run holds it.
    pub fn sequence(&self) -> Option<&[Value]> {
        self.sequence.as_deref()
    }

    /// Counters of the last finished run (zero after generate or load).
    pub const fn counters(&self) -> RunCounters {
        self.counters
    }

    /// Whether a run is in progress.
    pub const fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Shared controls, for wiring up keyboard or UI handlers.
    pub fn control(&self) -> Arc<RunControl> {
        Arc::clone(&self.control)
    }

    // -----------------------------------------------------------------------
    // Sequence
    // -----------------------------------------------------------------------

    /// Replace the sequence with `array.size` random values in
    /// `array.min_value..=array.max_value`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::RunActive`] while a run holds the sequence.
    pub fn generate<R: Rng>(&mut self, rng: &mut R) -> Result<&[Value], SessionError> {
        self.ensure_idle()?;
        let array = self.config.array;
        let (low, high) = (
            array.min_value.min(array.max_value),
            array.min_value.max(array.max_value),
        );
        let values: Vec<Value> = (0..array.size)
            .map(|_| rng.random_range(low..=high))
            .collect();
        debug!(len = values.len(), "sequence generated");
        Ok(self.replace_sequence(values))
    }

    /// Replace the sequence with caller-supplied values.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::RunActive`] while a run holds the sequence,
    /// or [`SessionError::InvalidInput`] if the values are rejected.
    pub fn load(&mut self, values: Vec<Value>) -> Result<&[Value], SessionError> {
        self.ensure_idle()?;
        check_len(&values)?;
        debug!(len = values.len(), "sequence loaded");
        Ok(self.replace_sequence(values))
    }

    fn replace_sequence(&mut self, values: Vec<Value>) -> &[Value] {
        self.counters = RunCounters::default();
        self.sequence.insert(values)
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        if self.active.is_some() {
            return Err(SessionError::RunActive);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Algorithm, speed, audio
    // -----------------------------------------------------------------------

    /// Algorithm the next run will use.
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Choose the algorithm for the next run. An active run is unaffected.
    pub fn select_algorithm(&mut self, algorithm: Algorithm) {
        debug!(%algorithm, "algorithm selected");
        self.algorithm = algorithm;
    }

    /// Set the playback speed. Returns the previous speed, or `None` if
    /// `speed` is outside `1..=100`.
    pub fn set_speed(&self, speed: u8) -> Option<u8> {
        self.control.set_speed(speed)
    }

    /// Whether tone cues are muted.
    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Acquire)
    }

    /// Set the mute flag. Applies to an active run immediately.
    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::Release);
        debug!(muted, "mute changed");
    }

    /// Flip the mute flag. Returns the new state.
    pub fn toggle_mute(&self) -> bool {
        let muted = !self.muted.fetch_xor(true, Ordering::AcqRel);
        debug!(muted, "mute toggled");
        muted
    }

    /// The shared mute flag, for handlers that outlive a borrow of the
    /// session.
    pub fn mute_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.muted)
    }

    /// A tone mapper sharing this session's mute flag.
    pub fn tone_mapper(&self) -> ToneMapper {
        ToneMapper::new(&self.config.audio, Arc::clone(&self.muted))
    }

    // -----------------------------------------------------------------------
    // Runs
    // -----------------------------------------------------------------------

    /// Start a run of the selected algorithm over the current sequence.
    ///
    /// The sequence moves into a spawned task; take it back with
    /// [`finish`](Self::finish). Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::RunActive`] if a run is already in progress.
    pub fn start(&mut self, mut sink: Box<dyn StepSink>) -> Result<RunHandle, SessionError> {
        self.ensure_idle()?;
        let Some(sequence) = self.sequence.take() else {
            return Err(SessionError::RunActive);
        };

        let run_id = RunId::new();
        let algorithm = self.algorithm;
        let clock = if self.config.clock.paced {
            StepClock::paced()
        } else {
            StepClock::unpaced()
        };

        self.control.reset_for_run();
        self.counters = RunCounters::default();
        let input = sequence.clone();

        info!(%run_id, %algorithm, len = sequence.len(), "Starting run");
        let steps = sortviz_engine::stepper(algorithm, sequence);
        let control = Arc::clone(&self.control);
        let done = Arc::new(AtomicBool::new(false));
        let task_done = Arc::clone(&done);
        let task = tokio::spawn(async move {
            let report = run_sort(run_id, steps, &control, clock, sink.as_mut()).await;
            task_done.store(true, Ordering::Release);
            report
        });

        self.active = Some(ActiveRun {
            run_id,
            input,
            task,
        });
        Ok(RunHandle {
            run_id,
            control: Arc::clone(&self.control),
            done,
        })
    }

    /// Wait for a run to end and take its sequence back.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoRunActive`] if `handle` is not this
    /// session's active run, or [`SessionError::Join`] if the run task
    /// failed. In the latter case the sequence reverts to the run's input.
    /// A rejected handle leaves this session's own run untouched.
    pub async fn finish(&mut self, handle: RunHandle) -> Result<RunReport, SessionError> {
        let Some(active) = self
            .active
            .take_if(|active| active.run_id == handle.run_id)
        else {
            return Err(SessionError::NoRunActive);
        };
        self.join(active).await
    }

    /// Cancel the active run, whoever holds its handle, and take the
    /// sequence back.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoRunActive`] if no run is active, or
    /// [`SessionError::Join`] if the run task failed.
    pub async fn abandon(&mut self) -> Result<RunReport, SessionError> {
        let Some(active) = self.active.take() else {
            return Err(SessionError::NoRunActive);
        };
        info!(run_id = %active.run_id, "Abandoning run");
        self.control.request_cancel();
        self.join(active).await
    }

    async fn join(&mut self, active: ActiveRun) -> Result<RunReport, SessionError> {
        let ActiveRun {
            run_id,
            input,
            task,
        } = active;
        match task.await {
            Ok(report) => {
                log_run_end(&report);
                self.counters = report.counters;
                self.sequence = Some(report.sequence.clone());
                Ok(report)
            }
            Err(source) => {
                warn!(%run_id, error = %source, "Run task failed");
                self.sequence = Some(input);
                Err(SessionError::Join { source })
            }
        }
    }
}
