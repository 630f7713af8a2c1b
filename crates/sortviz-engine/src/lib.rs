//! Step-yielding sorting algorithms for the Sortviz visualizer.
//!
//! Each algorithm is an explicit state machine that owns a working copy of
//! the sequence and implements [`Iterator`] over [`StepEvent`]s. Every call
//! to `next()` performs exactly one comparison or one mutation, applies it,
//! and returns the event that describes it. Nothing here sleeps, polls, or
//! knows about pausing: throttling belongs to whoever pulls the events.
//!
//! Stopping early is always safe. Between any two events the working
//! sequence is a permutation of the input, so a consumer that abandons the
//! iterator keeps a valid partial result.
//!
//! # Modules
//!
//! - [`bubble`] -- Adjacent exchange with a shrinking unsorted prefix
//! - [`selection`] -- Minimum selection into the sorted prefix
//! - [`insertion`] -- Key insertion by adjacent exchange
//! - [`merge`] -- Top-down merge with in-place rotation placements
//! - [`quick`] -- Lomuto partition quicksort

pub mod bubble;
pub mod insertion;
pub mod merge;
pub mod quick;
pub mod selection;

use sortviz_types::{Algorithm, RunCounters, StepEvent, Value};
use tracing::debug;

pub use bubble::BubbleSort;
pub use insertion::InsertionSort;
pub use merge::MergeSort;
pub use quick::QuickSort;
pub use selection::SelectionSort;

/// A sorting algorithm exposed as a lazy stream of step events.
///
/// The stepper owns the working sequence for its whole lifetime. Callers
/// observe intermediate states through [`sequence`](SortStepper::sequence)
/// and take the array back with [`into_sequence`](SortStepper::into_sequence).
pub trait SortStepper: Iterator<Item = StepEvent> + Send {
    /// Which algorithm this stepper runs.
    fn algorithm(&self) -> Algorithm;

    /// The working sequence as of the last returned event.
    fn sequence(&self) -> &[Value];

    /// Give up the working sequence, in whatever state it was left.
    fn into_sequence(self: Box<Self>) -> Vec<Value>;
}

/// Build the stepper for `algorithm` over `sequence`.
pub fn stepper(algorithm: Algorithm, sequence: Vec<Value>) -> Box<dyn SortStepper> {
    debug!(%algorithm, len = sequence.len(), "building sort stepper");
    match algorithm {
        Algorithm::BubbleSort => Box::new(BubbleSort::new(sequence)),
        Algorithm::QuickSort => Box::new(QuickSort::new(sequence)),
        Algorithm::MergeSort => Box::new(MergeSort::new(sequence)),
        Algorithm::SelectionSort => Box::new(SelectionSort::new(sequence)),
        Algorithm::InsertionSort => Box::new(InsertionSort::new(sequence)),
    }
}

/// Run `algorithm` to completion without any pacing.
///
/// Returns the sorted sequence and the counters an instrumented run of the
/// same input reports. Used for reference counts and headless checks.
pub fn sort_to_end(algorithm: Algorithm, sequence: Vec<Value>) -> (Vec<Value>, RunCounters) {
    let mut steps = stepper(algorithm, sequence);
    let mut counters = RunCounters::default();
    for event in steps.by_ref() {
        counters.record(&event);
    }
    (steps.into_sequence(), counters)
}

/// Read two elements at once, `None` if either index is out of range.
fn pair(data: &[Value], a: usize, b: usize) -> Option<(Value, Value)> {
    Some((*data.get(a)?, *data.get(b)?))
}
