//! Terminal renderer: a bar chart redrawn after every mutation.
//!
//! Each element is one column; its height is proportional to its value.
//! The indices touched by the latest step are drawn in a lighter shade.
//! Tone cues are computed for every mutation and logged at trace level;
//! there is no audio backend.

use std::fmt::Write as _;
use std::io::Write;

use sortviz_core::sink::{StepReport, StepSink, ToneMapper};
use sortviz_types::{RunCounters, RunFinished, RunOutcome, Value};
use tracing::{trace, warn};

/// Rows used for the tallest bar.
pub const CHART_HEIGHT: usize = 16;

/// Move the cursor home and clear the screen.
const CLEAR: &str = "\x1b[H\x1b[2J";

const BAR: char = '█';
const BAR_ACTIVE: char = '▒';

/// Height in rows of a bar for `value`, where `scale` maps to `height`.
fn bar_height(value: Value, scale: u64, height: usize) -> usize {
    let Ok(value) = u64::try_from(value) else {
        return 0;
    };
    let rows = u64::try_from(height).unwrap_or(u64::MAX);
    let scaled = value
        .saturating_mul(rows)
        .div_ceil(scale.max(1))
        .min(rows);
    usize::try_from(scaled).unwrap_or(height)
}

/// Render one frame: title, counters, then the chart from the top row down.
pub fn render_frame(
    title: &str,
    sequence: &[Value],
    highlight: &[usize],
    counters: RunCounters,
    height: usize,
) -> String {
    let scale = sequence
        .iter()
        .filter_map(|v| u64::try_from(*v).ok())
        .max()
        .unwrap_or(1);
    let heights: Vec<usize> = sequence
        .iter()
        .map(|v| bar_height(*v, scale, height))
        .collect();

    let mut frame = String::new();
    let _ = writeln!(frame, "{title}");
    let _ = writeln!(
        frame,
        "Comparisons: {}  Swaps: {}",
        counters.comparisons, counters.mutations
    );
    for row in (1..=height).rev() {
        for (index, bar) in heights.iter().enumerate() {
            let cell = if *bar < row {
                ' '
            } else if highlight.contains(&index) {
                BAR_ACTIVE
            } else {
                BAR
            };
            frame.push(cell);
        }
        frame.push('\n');
    }
    frame
}

/// A [`StepSink`] that draws to a terminal.
pub struct TerminalSink<W: Write + Send> {
    out: W,
    tones: ToneMapper,
    title: String,
    height: usize,
    /// Set after the first failed write; rendering stops but the run goes on.
    broken: bool,
}

impl<W: Write + Send> TerminalSink<W> {
    /// Draw to `out` under `title`.
    pub fn new(out: W, tones: ToneMapper, title: impl Into<String>) -> Self {
        Self {
            out,
            tones,
            title: title.into(),
            height: CHART_HEIGHT,
            broken: false,
        }
    }

    /// Use a different chart height.
    #[must_use]
    pub fn with_height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }

    /// Take the writer back.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, sequence: &[Value], highlight: &[usize], counters: RunCounters) {
        if self.broken {
            return;
        }
        let frame = render_frame(&self.title, sequence, highlight, counters, self.height);
        let written = self
            .out
            .write_all(CLEAR.as_bytes())
            .and_then(|()| self.out.write_all(frame.as_bytes()))
            .and_then(|()| self.out.flush());
        if let Err(e) = written {
            warn!(error = %e, "terminal write failed, rendering disabled");
            self.broken = true;
        }
    }

    fn finish(&mut self, summary: &RunFinished) {
        self.draw(&summary.sequence, &[], summary.counters);
        if self.broken {
            return;
        }
        let line = match summary.outcome {
            RunOutcome::Completed => "Sorted.",
            RunOutcome::Cancelled => "Cancelled.",
        };
        if let Err(e) = writeln!(self.out, "{line}") {
            warn!(error = %e, "terminal write failed");
        }
    }
}

impl<W: Write + Send> StepSink for TerminalSink<W> {
    fn on_comparison(&mut self, _report: &StepReport<'_>) {}

    fn on_mutation(&mut self, report: &StepReport<'_>) {
        if let Some(cue) = self.tones.cue_for_report(report) {
            trace!(
                frequency_hz = cue.frequency_hz,
                duration_ms = cue.duration_ms,
                "tone"
            );
        }
        self.draw(report.sequence, &report.event.indices(), report.counters);
    }

    fn on_completed(&mut self, summary: &RunFinished) {
        self.finish(summary);
    }

    fn on_cancelled(&mut self, summary: &RunFinished) {
        self.finish(summary);
    }
}
