//! Instrumentation sinks: where step reports go.
//!
//! The run driver calls a [`StepSink`] once per comparison and once per
//! mutation, in exactly the order the engine emits them, and once more when
//! the run terminates. Every report carries the [`RunId`] and the counters
//! of the run that produced it, so nothing can be attributed to the wrong
//! run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sortviz_types::{
    RunCounters, RunFinished, RunId, RunUpdate, StepEvent, StepUpdate, ToneCue, Value,
};
use tokio::sync::broadcast;
use tracing::trace;

use crate::config::AudioConfig;

/// Capacity of the renderer broadcast channel.
///
/// A subscriber that falls further behind than this receives
/// [`broadcast::error::RecvError::Lagged`] and skips ahead.
pub const BROADCAST_CAPACITY: usize = 1024;

/// One step as seen by a sink.
#[derive(Debug, Clone, Copy)]
pub struct StepReport<'a> {
    /// Run that produced the step.
    pub run_id: RunId,
    /// The step itself.
    pub event: StepEvent,
    /// Counters after this step was accounted for.
    pub counters: RunCounters,
    /// Sequence after the step was applied.
    pub sequence: &'a [Value],
}

impl StepReport<'_> {
    /// The value just written, for mutation reports.
    pub fn written_value(&self) -> Option<Value> {
        let index = self.event.written_index()?;
        self.sequence.get(index).copied()
    }
}

/// Receiver of step reports for a run.
pub trait StepSink: Send {
    /// Called after each comparison.
    fn on_comparison(&mut self, report: &StepReport<'_>);

    /// Called after each mutation has been applied, before the step clock
    /// waits.
    fn on_mutation(&mut self, report: &StepReport<'_>);

    /// Called once when the algorithm finished.
    fn on_completed(&mut self, _summary: &RunFinished) {}

    /// Called once when the run stopped because cancellation was requested.
    fn on_cancelled(&mut self, _summary: &RunFinished) {}
}

/// A sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

impl StepSink for NoOpSink {
    fn on_comparison(&mut self, _report: &StepReport<'_>) {}

    fn on_mutation(&mut self, _report: &StepReport<'_>) {}
}

// ---------------------------------------------------------------------------
// Recording
// ---------------------------------------------------------------------------

/// Keeps every report in order. Useful for replay and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    /// Events in emission order.
    pub events: Vec<StepEvent>,
    /// Counters carried by each report, parallel to `events`.
    pub counters: Vec<RunCounters>,
    /// Runs that produced the reports, parallel to `events`.
    pub run_ids: Vec<RunId>,
    /// Terminal summary, once the run has ended.
    pub finished: Option<RunFinished>,
}

impl RecordingSink {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, report: &StepReport<'_>) {
        self.events.push(report.event);
        self.counters.push(report.counters);
        self.run_ids.push(report.run_id);
    }
}

impl StepSink for RecordingSink {
    fn on_comparison(&mut self, report: &StepReport<'_>) {
        self.record(report);
    }

    fn on_mutation(&mut self, report: &StepReport<'_>) {
        self.record(report);
    }

    fn on_completed(&mut self, summary: &RunFinished) {
        self.finished = Some(summary.clone());
    }

    fn on_cancelled(&mut self, summary: &RunFinished) {
        self.finished = Some(summary.clone());
    }
}

/// Forwards to a shared recorder, so the recording outlives a run task.
#[derive(Debug, Clone, Default)]
pub struct SharedRecordingSink {
    inner: Arc<std::sync::Mutex<RecordingSink>>,
}

impl SharedRecordingSink {
    /// Create an empty shared recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy out what has been recorded so far.
    pub fn snapshot(&self) -> RecordingSink {
        self.inner
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn with(&self, f: impl FnOnce(&mut RecordingSink)) {
        if let Ok(mut guard) = self.inner.lock() {
            f(&mut guard);
        }
    }
}

impl StepSink for SharedRecordingSink {
    fn on_comparison(&mut self, report: &StepReport<'_>) {
        self.with(|rec| rec.on_comparison(report));
    }

    fn on_mutation(&mut self, report: &StepReport<'_>) {
        self.with(|rec| rec.on_mutation(report));
    }

    fn on_completed(&mut self, summary: &RunFinished) {
        self.with(|rec| rec.on_completed(summary));
    }

    fn on_cancelled(&mut self, summary: &RunFinished) {
        self.with(|rec| rec.on_cancelled(summary));
    }
}

// ---------------------------------------------------------------------------
// Audio cues
// ---------------------------------------------------------------------------

/// Maps written values to tone cues: `base_hz + value * scale_hz`.
///
/// The mute flag is shared so it can be flipped while a run is in flight.
#[derive(Debug, Clone)]
pub struct ToneMapper {
    base_hz: f64,
    scale_hz: f64,
    duration_ms: u64,
    muted: Arc<AtomicBool>,
}

impl ToneMapper {
    /// Build a mapper from audio settings and a shared mute flag.
    pub fn new(config: &AudioConfig, muted: Arc<AtomicBool>) -> Self {
        Self {
            base_hz: config.base_hz,
            scale_hz: config.scale_hz,
            duration_ms: config.duration_ms,
            muted,
        }
    }

    /// Whether cues are currently suppressed.
    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Acquire)
    }

    /// Frequency for a value, regardless of mute.
    pub fn frequency_for(&self, value: Value) -> f64 {
        // Element values are small; precision loss is not a concern.
        #[allow(clippy::cast_precision_loss)]
        let value = value as f64;
        value.mul_add(self.scale_hz, self.base_hz)
    }

    /// Cue for a value, or `None` while muted.
    pub fn cue_for(&self, value: Value) -> Option<ToneCue> {
        if self.is_muted() {
            return None;
        }
        Some(ToneCue {
            frequency_hz: self.frequency_for(value),
            duration_ms: self.duration_ms,
        })
    }

    /// Cue for the value written by a mutation report.
    pub fn cue_for_report(&self, report: &StepReport<'_>) -> Option<ToneCue> {
        self.cue_for(report.written_value()?)
    }
}

// ---------------------------------------------------------------------------
// Broadcast
// ---------------------------------------------------------------------------

/// Publishes [`RunUpdate`]s to any number of renderers.
///
/// Sending never blocks the run; with no subscribers the update is dropped.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<RunUpdate>,
    tones: Option<ToneMapper>,
}

impl BroadcastSink {
    /// Create a sink and its channel. Subscribe with [`subscribe`](Self::subscribe).
    pub fn new(tones: Option<ToneMapper>) -> Self {
        let (tx, _rx) = broadcast::channel(BROADCAST_CAPACITY);
        Self { tx, tones }
    }

    /// Subscribe a renderer to subsequent updates.
    pub fn subscribe(&self) -> broadcast::Receiver<RunUpdate> {
        self.tx.subscribe()
    }

    fn send(&self, update: RunUpdate) {
        let receivers = self.tx.send(update).unwrap_or(0);
        trace!(receivers, "run update broadcast");
    }

    fn step(&self, report: &StepReport<'_>, snapshot: Option<Vec<Value>>) -> RunUpdate {
        let tone = if snapshot.is_some() {
            self.tones.as_ref().and_then(|t| t.cue_for_report(report))
        } else {
            None
        };
        RunUpdate::Step(StepUpdate {
            run_id: report.run_id,
            event: report.event,
            counters: report.counters,
            snapshot,
            tone,
        })
    }
}

impl StepSink for BroadcastSink {
    fn on_comparison(&mut self, report: &StepReport<'_>) {
        self.send(self.step(report, None));
    }

    fn on_mutation(&mut self, report: &StepReport<'_>) {
        self.send(self.step(report, Some(report.sequence.to_vec())));
    }

    fn on_completed(&mut self, summary: &RunFinished) {
        self.send(RunUpdate::Finished(summary.clone()));
    }

    fn on_cancelled(&mut self, summary: &RunFinished) {
        self.send(RunUpdate::Finished(summary.clone()));
    }
}
