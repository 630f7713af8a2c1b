//! Insertion sort.
//!
//! For each `i` in `1..n` the key walks left. Each step compares the key
//! with its left neighbour; while the neighbour is strictly greater the two
//! are exchanged, which shifts the neighbour one slot right. The comparison
//! that stops the walk is reported too. Reaching slot 0 stops the walk
//! without a comparison.
//!
//! Shifting by adjacent exchange, rather than copying the neighbour over the
//! key and writing the key at the end, keeps the sequence a permutation of
//! the input after every step.

use sortviz_types::{Algorithm, StepEvent, Value};

use crate::{SortStepper, pair};

/// Step-yielding insertion sort.
#[derive(Debug, Clone)]
pub struct InsertionSort {
    data: Vec<Value>,
    /// Index of the key being inserted (its starting slot).
    outer: usize,
    /// Current slot of the key.
    key: usize,
    /// The last comparison found a larger left neighbour.
    shift_pending: bool,
}

impl InsertionSort {
    /// Take ownership of `data` and prepare to sort it.
    pub const fn new(data: Vec<Value>) -> Self {
        Self {
            data,
            outer: 1,
            key: 1,
            shift_pending: false,
        }
    }

    const fn next_key(&mut self) {
        self.outer = self.outer.saturating_add(1);
        self.key = self.outer;
    }
}

impl Iterator for InsertionSort {
    type Item = StepEvent;

    fn next(&mut self) -> Option<StepEvent> {
        if self.shift_pending {
            self.shift_pending = false;
            let right = self.key;
            let left = right.checked_sub(1)?;
            self.data.swap(left, right);
            self.key = left;
            return Some(StepEvent::Swap { left, right });
        }

        loop {
            if self.outer >= self.data.len() {
                return None;
            }
            let Some(left) = self.key.checked_sub(1) else {
                self.next_key();
                continue;
            };

            let right = self.key;
            let (neighbour, key) = pair(&self.data, left, right)?;
            if neighbour > key {
                self.shift_pending = true;
            } else {
                self.next_key();
            }
            return Some(StepEvent::Compare { left, right });
        }
    }
}

impl SortStepper for InsertionSort {
    fn algorithm(&self) -> Algorithm {
        Algorithm::InsertionSort
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
        let mut steps = InsertionSort::new(data);
        let events: Vec<StepEvent> = steps.by_ref().collect();
        (events, steps.data)
    }

    #[test]
    fn each_shift_is_a_comparison_and_a_write() {
        let (events, data) = drain(vec![3, 1, 2]);
        assert_eq!(data, vec![1, 2, 3]);
        assert_eq!(
            events,
            vec![
                // key 1 walks to slot 0
                StepEvent::Compare { left: 0, right: 1 },
                StepEvent::Swap { left: 0, right: 1 },
                // key 2 passes 3, stops at 1
                StepEvent::Compare { left: 1, right: 2 },
                StepEvent::Swap { left: 1, right: 2 },
                StepEvent::Compare { left: 0, right: 1 },
            ]
        );
    }

    #[test]
    fn sorted_input_writes_nothing() {
        let (events, data) = drain(vec![1, 2, 3, 4]);
        assert_eq!(data, vec![1, 2, 3, 4]);
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| !e.is_mutation()));
    }

    #[test]
    fn reverse_input_shifts_every_pair() {
        let (events, data) = drain(vec![4, 3, 2, 1]);
        assert_eq!(data, vec![1, 2, 3, 4]);
        let swaps = events.iter().filter(|e| e.is_mutation()).count();
        assert_eq!(swaps, 6);
    }

    #[test]
    fn equal_keys_keep_their_order() {
        let (events, data) = drain(vec![2, 2, 1]);
        assert_eq!(data, vec![1, 2, 2]);
        assert_eq!(events.first(), Some(&StepEvent::Compare { left: 0, right: 1 }));
        assert_eq!(events.get(1), Some(&StepEvent::Compare { left: 1, right: 2 }));
    }

    #[test]
    fn trivial_inputs_emit_nothing() {
        assert!(drain(Vec::new()).0.is_empty());
        assert!(drain(vec![7]).0.is_empty());
    }
}
