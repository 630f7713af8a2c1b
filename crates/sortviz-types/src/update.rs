//! Renderer-facing projections of a run.
//!
//! These are the JSON payloads a renderer consumes: one [`StepUpdate`] per
//! reported step, and one [`RunFinished`] when the run terminates. They are
//! self-contained so a subscriber never needs access to engine state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Algorithm, RunOutcome};
use crate::ids::RunId;
use crate::step::{RunCounters, StepEvent, Value};

/// An audio cue keyed to the value just written.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ToneCue {
    /// Oscillator frequency in hertz.
    pub frequency_hz: f64,
    /// How long the tone should sound.
    pub duration_ms: u64,
}

/// One reported step together with the state it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StepUpdate {
    /// Run that emitted the step.
    pub run_id: RunId,
    /// The step itself.
    pub event: StepEvent,
    /// Counters after this step was accounted for.
    pub counters: RunCounters,
    /// Full sequence after the step. `None` for comparisons, which never
    /// change the sequence.
    pub snapshot: Option<Vec<Value>>,
    /// Tone for the value just written, when audio is enabled.
    pub tone: Option<ToneCue>,
}

/// Terminal notification for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RunFinished {
    /// Run that terminated.
    pub run_id: RunId,
    /// Algorithm the run executed.
    pub algorithm: Algorithm,
    /// Completed or cancelled.
    pub outcome: RunOutcome,
    /// Final counters.
    pub counters: RunCounters,
    /// Sequence as the run left it.
    pub sequence: Vec<Value>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run terminated.
    pub finished_at: DateTime<Utc>,
}

/// Message published to renderers while a run is in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum RunUpdate {
    /// A step was reported.
    Step(StepUpdate),
    /// The run terminated.
    Finished(RunFinished),
}

impl RunUpdate {
    /// Run the update belongs to.
    pub const fn run_id(&self) -> RunId {
        match self {
            Self::Step(step) => step.run_id,
            Self::Finished(done) => done.run_id,
        }
    }
}
