//! Run driver: pulls steps from a sorting engine and paces them.
//!
//! [`run_sort`] is the loop around a [`SortStepper`]. It adds:
//!
//! - **Counting**: comparisons and mutations attributed to one [`RunId`]
//! - **Instrumentation**: every step forwarded to a [`StepSink`] in order
//! - **Pacing**: a [`StepClock`] wait after each mutation
//! - **Pause/resume and cancel**: through the shared [`RunControl`]
//!
//! The engine itself never sleeps and never sees the control state.

use chrono::{DateTime, Utc};
use sortviz_engine::SortStepper;
use sortviz_types::{Algorithm, RunCounters, RunFinished, RunId, RunOutcome, Value};
use tracing::{info, trace};

use crate::clock::{StepClock, WaitOutcome};
use crate::control::RunControl;
use crate::sink::{StepReport, StepSink};

/// Everything known about a run once it has ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Run identifier.
    pub run_id: RunId,
    /// Algorithm that ran.
    pub algorithm: Algorithm,
    /// Whether the algorithm finished or was cancelled.
    pub outcome: RunOutcome,
    /// Final counters.
    pub counters: RunCounters,
    /// The sequence as the run left it. Sorted when completed, a
    /// permutation of the input when cancelled.
    pub sequence: Vec<Value>,
    /// When the driver started pulling steps.
    pub started_at: DateTime<Utc>,
    /// When the driver stopped.
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Terminal summary in the shape renderers receive.
    pub fn summary(&self) -> RunFinished {
        RunFinished {
            run_id: self.run_id,
            algorithm: self.algorithm,
            outcome: self.outcome,
            counters: self.counters,
            sequence: self.sequence.clone(),
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }
}

/// Drive `stepper` to completion or cancellation.
///
/// Cancellation is checked before every pull and ends any clock wait
/// early. Once cancellation is observed no further step callbacks fire;
/// [`StepSink::on_cancelled`] is called exactly once instead.
pub async fn run_sort(
    run_id: RunId,
    mut stepper: Box<dyn SortStepper>,
    control: &RunControl,
    clock: StepClock,
    sink: &mut dyn StepSink,
) -> RunReport {
    let algorithm = stepper.algorithm();
    let started_at = Utc::now();
    let mut counters = RunCounters::default();

    info!(
        %run_id,
        %algorithm,
        len = stepper.sequence().len(),
        speed = control.speed(),
        paced = clock.is_paced(),
        "Run starting"
    );

    let outcome = loop {
        if control.is_cancelled() {
            break RunOutcome::Cancelled;
        }

        let Some(event) = stepper.next() else {
            break RunOutcome::Completed;
        };
        counters.record(&event);
        trace!(%run_id, ?event, "step");

        let report = StepReport {
            run_id,
            event,
            counters,
            sequence: stepper.sequence(),
        };

        if !event.is_mutation() {
            sink.on_comparison(&report);
            continue;
        }

        sink.on_mutation(&report);
        if clock.wait(control).await == WaitOutcome::Cancelled {
            break RunOutcome::Cancelled;
        }
    };

    let report = RunReport {
        run_id,
        algorithm,
        outcome,
        counters,
        sequence: stepper.into_sequence(),
        started_at,
        finished_at: Utc::now(),
    };

    let summary = report.summary();
    match outcome {
        RunOutcome::Completed => sink.on_completed(&summary),
        RunOutcome::Cancelled => sink.on_cancelled(&summary),
    }
    report
}

/// Log the end of a run.
pub fn log_run_end(report: &RunReport) {
    let elapsed_ms = report
        .finished_at
        .signed_duration_since(report.started_at)
        .num_milliseconds();
    info!(
        run_id = %report.run_id,
        algorithm = %report.algorithm,
        outcome = ?report.outcome,
        comparisons = report.counters.comparisons,
        mutations = report.counters.mutations,
        elapsed_ms,
        "Run ended"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use sortviz_engine::stepper;
    use sortviz_types::StepEvent;

    use super::*;
    use crate::sink::{NoOpSink, RecordingSink, SharedRecordingSink};

    /// Cancels the run from inside the sink after a set number of steps.
    struct CancelAfter {
        control: Arc<RunControl>,
        remaining: usize,
        seen: usize,
    }

    impl CancelAfter {
        fn tick(&mut self) {
            self.seen = self.seen.saturating_add(1);
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.control.request_cancel();
            }
        }
    }

    impl StepSink for CancelAfter {
        fn on_comparison(&mut self, _report: &StepReport<'_>) {
            self.tick();
        }

        fn on_mutation(&mut self, _report: &StepReport<'_>) {
            self.tick();
        }
    }

    #[tokio::test]
    async fn bubble_scenario_completes() {
        let control = RunControl::default();
        let mut sink = RecordingSink::new();
        let report = run_sort(
            RunId::new(),
            stepper(Algorithm::BubbleSort, vec![5, 3, 8, 1]),
            &control,
            StepClock::unpaced(),
            &mut sink,
        )
        .await;

        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.sequence, vec![1, 3, 5, 8]);
        assert_eq!(report.counters.comparisons, 6);
        assert_eq!(report.counters.mutations, 4);
        assert_eq!(sink.events.len(), 10);
        assert_eq!(
            sink.finished.map(|f| f.outcome),
            Some(RunOutcome::Completed)
        );
    }

    #[tokio::test]
    async fn counters_in_reports_never_decrease() {
        let control = RunControl::default();
        let mut sink = RecordingSink::new();
        let id = RunId::new();
        let _ = run_sort(
            id,
            stepper(Algorithm::QuickSort, vec![9, 4, 7, 1, 8, 2]),
            &control,
            StepClock::unpaced(),
            &mut sink,
        )
        .await;

        assert!(sink.run_ids.iter().all(|r| *r == id));
        for pair in sink.counters.windows(2) {
            let (a, b) = (pair.first().unwrap(), pair.get(1).unwrap());
            assert!(b.comparisons >= a.comparisons);
            assert!(b.mutations >= a.mutations);
        }
    }

    #[tokio::test]
    async fn trivial_inputs_complete_with_zero_counts() {
        for input in [Vec::new(), vec![7]] {
            let control = RunControl::default();
            let mut sink = RecordingSink::new();
            let report = run_sort(
                RunId::new(),
                stepper(Algorithm::MergeSort, input.clone()),
                &control,
                StepClock::paced(),
                &mut sink,
            )
            .await;
            assert_eq!(report.outcome, RunOutcome::Completed);
            assert_eq!(report.sequence, input);
            assert_eq!(report.counters, RunCounters::default());
            assert!(sink.events.is_empty());
        }
    }

    #[tokio::test]
    async fn cancel_before_start_runs_nothing() {
        let control = RunControl::default();
        control.request_cancel();
        let mut sink = RecordingSink::new();
        let report = run_sort(
            RunId::new(),
            stepper(Algorithm::SelectionSort, vec![3, 2, 1]),
            &control,
            StepClock::unpaced(),
            &mut sink,
        )
        .await;
        assert_eq!(report.outcome, RunOutcome::Cancelled);
        assert_eq!(report.sequence, vec![3, 2, 1]);
        assert!(sink.events.is_empty());
    }

    #[tokio::test]
    async fn cancel_mid_run_stops_callbacks_and_keeps_a_permutation() {
        let input = vec![9, 3, 7, 1, 8, 2, 6, 4, 5];
        for algorithm in Algorithm::ALL {
            let control = Arc::new(RunControl::default());
            let mut sink = CancelAfter {
                control: Arc::clone(&control),
                remaining: 5,
                seen: 0,
            };
            let report = run_sort(
                RunId::new(),
                stepper(algorithm, input.clone()),
                &control,
                StepClock::unpaced(),
                &mut sink,
            )
            .await;

            assert_eq!(report.outcome, RunOutcome::Cancelled, "{algorithm}");
            assert_eq!(sink.seen, 5, "{algorithm}");
            let mut sorted = report.sequence.clone();
            sorted.sort_unstable();
            let mut expected = input.clone();
            expected.sort_unstable();
            assert_eq!(sorted, expected, "{algorithm}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn pause_and_resume_do_not_change_the_result() {
        let input = vec![6, 2, 9, 4, 1, 7];
        let baseline = run_sort(
            RunId::new(),
            stepper(Algorithm::InsertionSort, input.clone()),
            &RunControl::new(100),
            StepClock::unpaced(),
            &mut NoOpSink,
        )
        .await;

        let control = Arc::new(RunControl::new(100));
        let run = {
            let control = Arc::clone(&control);
            let input = input.clone();
            tokio::spawn(async move {
                let mut sink = RecordingSink::new();
                run_sort(
                    RunId::new(),
                    stepper(Algorithm::InsertionSort, input),
                    &control,
                    StepClock::paced(),
                    &mut sink,
                )
                .await
            })
        };

        tokio::time::sleep(Duration::from_millis(2)).await;
        control.pause();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!run.is_finished());
        control.resume();

        let paused = run.await.unwrap();
        assert_eq!(paused.outcome, RunOutcome::Completed);
        assert_eq!(paused.sequence, baseline.sequence);
        assert_eq!(paused.counters, baseline.counters);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_holds_at_the_next_write() {
        // Selection on [2, 3, 1, 4]: the first scan is three comparisons,
        // then 1 is exchanged into slot 0.
        let control = Arc::new(RunControl::new(100));
        control.pause();
        let recorder = SharedRecordingSink::new();
        let run = {
            let control = Arc::clone(&control);
            let mut sink = recorder.clone();
            tokio::spawn(async move {
                run_sort(
                    RunId::new(),
                    stepper(Algorithm::SelectionSort, vec![2, 3, 1, 4]),
                    &control,
                    StepClock::unpaced(),
                    &mut sink,
                )
                .await
            })
        };

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!run.is_finished());
        assert_eq!(
            recorder.snapshot().events,
            vec![
                StepEvent::Compare { left: 1, right: 0 },
                StepEvent::Compare { left: 2, right: 0 },
                StepEvent::Compare { left: 3, right: 2 },
                StepEvent::Swap { left: 0, right: 2 },
            ]
        );

        control.request_cancel();
        let report = run.await.unwrap();
        assert_eq!(report.outcome, RunOutcome::Cancelled);
        assert_eq!(recorder.snapshot().events.len(), 4);
    }

    #[tokio::test]
    async fn comparisons_are_not_paced() {
        // Sorted input only compares, so a paused clock is never consulted.
        let control = RunControl::default();
        control.pause();
        let report = run_sort(
            RunId::new(),
            stepper(Algorithm::BubbleSort, vec![1, 2, 3, 4]),
            &control,
            StepClock::paced(),
            &mut NoOpSink,
        )
        .await;
        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.counters.mutations, 0);
    }

    #[tokio::test]
    async fn summary_mirrors_the_report() {
        let control = RunControl::default();
        let report = run_sort(
            RunId::new(),
            stepper(Algorithm::QuickSort, vec![2, 1]),
            &control,
            StepClock::unpaced(),
            &mut NoOpSink,
        )
        .await;
        let summary = report.summary();
        assert_eq!(summary.run_id, report.run_id);
        assert_eq!(summary.sequence, vec![1, 2]);
        assert_eq!(summary.counters, report.counters);
        assert!(report.finished_at >= report.started_at);
    }
}
