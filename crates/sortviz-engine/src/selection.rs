//! Selection sort.
//!
//! For each position `i` in `0..n-1`, scan `i+1..n` for the strict minimum
//! and exchange it into `i`. When the minimum already sits at `i` nothing
//! is written and nothing is reported.

use sortviz_types::{Algorithm, StepEvent, Value};

use crate::{SortStepper, pair};

/// Step-yielding selection sort.
#[derive(Debug, Clone)]
pub struct SelectionSort {
    data: Vec<Value>,
    /// Slot being filled.
    position: usize,
    /// Index of the smallest element seen in the current scan.
    min_index: usize,
    /// Next candidate of the current scan.
    scan: usize,
}

impl SelectionSort {
    /// Take ownership of `data` and prepare to sort it.
    pub const fn new(data: Vec<Value>) -> Self {
        Self {
            data,
            position: 0,
            min_index: 0,
            scan: 1,
        }
    }
}

impl Iterator for SelectionSort {
    type Item = StepEvent;

    fn next(&mut self) -> Option<StepEvent> {
        let len = self.data.len();
        loop {
            if self.position >= len.saturating_sub(1) {
                return None;
            }

            if self.scan < len {
                let candidate = self.scan;
                let current = self.min_index;
                let (a, b) = pair(&self.data, candidate, current)?;
                if a < b {
                    self.min_index = candidate;
                }
                self.scan = candidate.saturating_add(1);
                return Some(StepEvent::Compare {
                    left: candidate,
                    right: current,
                });
            }

            // Scan finished: place the minimum and move to the next slot.
            let position = self.position;
            let min_index = self.min_index;
            self.position = position.saturating_add(1);
            self.min_index = self.position;
            self.scan = self.position.saturating_add(1);

            if min_index != position {
                self.data.swap(position, min_index);
                return Some(StepEvent::Swap {
                    left: position,
                    right: min_index,
                });
            }
        }
    }
}

impl SortStepper for SelectionSort {
    fn algorithm(&self) -> Algorithm {
        Algorithm::SelectionSort
    }

    fn sequence(&self) -> &[Value] {
        &self.data
    }

    fn into_sequence(self: Box<Self>) -> Vec<Value> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(data: Vec<Value>) -> (Vec<StepEvent>, Vec<Value>) {
        let mut steps = SelectionSort::new(data);
        let events: Vec<StepEvent> = steps.by_ref().collect();
        (events, steps.data)
    }

    #[test]
    fn sorts_and_counts() {
        let (events, data) = drain(vec![5, 3, 8, 1]);
        assert_eq!(data, vec![1, 3, 5, 8]);
        let comparisons = events.iter().filter(|e| !e.is_mutation()).count();
        // (n - 1) + (n - 2) + ... + 1
        assert_eq!(comparisons, 6);
        // 1 <-> 5 at slot 0, then 5 <-> 8 at slot 2; slot 1 already holds 3.
        let swaps: Vec<&StepEvent> = events.iter().filter(|e| e.is_mutation()).collect();
        assert_eq!(
            swaps,
            vec![
                &StepEvent::Swap { left: 0, right: 3 },
                &StepEvent::Swap { left: 2, right: 3 },
            ]
        );
    }

    #[test]
    fn minimum_in_place_is_not_reported() {
        let (events, data) = drain(vec![1, 2, 3, 4]);
        assert_eq!(data, vec![1, 2, 3, 4]);
        assert_eq!(events.len(), 6);
        assert!(events.iter().all(|e| !e.is_mutation()));
    }

    #[test]
    fn first_minimum_wins_on_ties() {
        let (events, data) = drain(vec![2, 1, 1]);
        assert_eq!(data, vec![1, 1, 2]);
        assert_eq!(events.get(2), Some(&StepEvent::Swap { left: 0, right: 1 }));
    }

    #[test]
    fn trivial_inputs_emit_nothing() {
        assert!(drain(Vec::new()).0.is_empty());
        assert!(drain(vec![7]).0.is_empty());
    }
}
