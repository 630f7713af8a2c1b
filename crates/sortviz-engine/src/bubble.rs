//! Bubble sort.
//!
//! `n - 1` passes over a shrinking unsorted prefix. Each pass compares
//! adjacent pairs left to right and exchanges them when the left element is
//! strictly greater. There is no early exit on a pass without exchanges.

use sortviz_types::{Algorithm, StepEvent, Value};

use crate::{SortStepper, pair};

/// Step-yielding bubble sort.
#[derive(Debug, Clone)]
pub struct BubbleSort {
    data: Vec<Value>,
    /// Completed passes.
    pass: usize,
    /// Left index of the next adjacent pair.
    index: usize,
    /// The last comparison found an inversion at `index`.
    swap_pending: bool,
}

impl BubbleSort {
    /// Take ownership of `data` and prepare to sort it.
    pub const fn new(data: Vec<Value>) -> Self {
        Self {
            data,
            pass: 0,
            index: 0,
            swap_pending: false,
        }
    }
}

impl Iterator for BubbleSort {
    type Item = StepEvent;

    fn next(&mut self) -> Option<StepEvent> {
        if self.swap_pending {
            self.swap_pending = false;
            let left = self.index;
            let right = left.checked_add(1)?;
            self.data.swap(left, right);
            self.index = right;
            return Some(StepEvent::Swap { left, right });
        }

        let passes = self.data.len().saturating_sub(1);
        loop {
            if self.pass >= passes {
                return None;
            }
            // Pairs in this pass: indices 0..passes - pass.
            let end = passes.saturating_sub(self.pass);
            if self.index >= end {
                self.pass = self.pass.saturating_add(1);
                self.index = 0;
                continue;
            }

            let left = self.index;
            let right = left.checked_add(1)?;
            let (a, b) = pair(&self.data, left, right)?;
            if a > b {
                self.swap_pending = true;
            } else {
                self.index = right;
            }
            return Some(StepEvent::Compare { left, right });
        }
    }
}

impl SortStepper for BubbleSort {
    fn algorithm(&self) -> Algorithm {
        Algorithm::BubbleSort
    }

    fn sequence(&self) -> &[Value] {
        &self.data
    }

    fn into_sequence(self: Box<Self>) -> Vec<Value> {
        self.data
    }
}
