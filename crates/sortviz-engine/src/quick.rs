//! Quicksort with the Lomuto partition scheme.
//!
//! The last element of the range is the pivot. Elements strictly less than
//! the pivot are exchanged into a growing "less" region at the front, then
//! the pivot is exchanged into the slot after that region. The left side is
//! sorted before the right side; the pivot is excluded from both.
//!
//! An exchange that would leave the array unchanged (a slot with itself,
//! or a pivot equal to the value already in its slot) is skipped and not
//! reported.

use sortviz_types::{Algorithm, StepEvent, Value};

use crate::{SortStepper, pair};

/// An in-progress partition of `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Partition {
    low: usize,
    high: usize,
    /// First slot after the "less than pivot" region.
    store: usize,
    /// Next element to compare against the pivot.
    scan: usize,
    /// Element found less than the pivot, waiting to move into `store`.
    pending: Option<usize>,
}

/// Step-yielding quicksort.
#[derive(Debug, Clone)]
pub struct QuickSort {
    data: Vec<Value>,
    /// Inclusive ranges still to sort, processed last-in first-out.
    ranges: Vec<(usize, usize)>,
    partition: Option<Partition>,
}

impl QuickSort {
    /// Take ownership of `data` and prepare to sort it.
    pub fn new(data: Vec<Value>) -> Self {
        let mut ranges = Vec::new();
        if let Some(high) = data.len().checked_sub(1) {
            ranges.push((0, high));
        }
        Self {
            data,
            ranges,
            partition: None,
        }
    }

    /// Queue the two sides of a finished partition around `pivot`.
    fn split(&mut self, low: usize, pivot: usize, high: usize) {
        // Right side first so the left side is sorted first.
        if let Some(start) = pivot.checked_add(1).filter(|start| *start < high) {
            self.ranges.push((start, high));
        }
        if let Some(end) = pivot.checked_sub(1).filter(|end| low < *end) {
            self.ranges.push((low, end));
        }
    }

    /// Advance the active partition by one step.
    fn step_partition(&mut self, p: &mut Partition) -> Progress {
        // `store` holds a value not less than the pivot and `from` one that
        // is less, so this exchange always changes the array.
        if let Some(from) = p.pending.take() {
            let store = p.store;
            self.data.swap(store, from);
            p.store = store.saturating_add(1);
            return Progress::Step(StepEvent::Swap {
                left: store,
                right: from,
            });
        }

        if p.scan < p.high {
            let scan = p.scan;
            p.scan = scan.saturating_add(1);
            let Some((element, pivot)) = pair(&self.data, scan, p.high) else {
                return Progress::Finished(None);
            };
            if element < pivot {
                if scan == p.store {
                    p.store = p.store.saturating_add(1);
                } else {
                    p.pending = Some(scan);
                }
            }
            return Progress::Step(StepEvent::Compare {
                left: scan,
                right: p.high,
            });
        }

        // Scan finished: move the pivot into its final slot.
        let (low, store, high) = (p.low, p.store, p.high);
        self.split(low, store, high);
        let in_place = store == high
            || pair(&self.data, store, high).is_none_or(|(current, pivot)| current == pivot);
        if in_place {
            return Progress::Finished(None);
        }
        self.data.swap(store, high);
        Progress::Finished(Some(StepEvent::Swap {
            left: store,
            right: high,
        }))
    }
}

/// Result of advancing a partition.
enum Progress {
    /// The partition reported a step and has more work.
    Step(StepEvent),
    /// The partition is done, with the pivot exchange if one was needed.
    Finished(Option<StepEvent>),
}

impl Iterator for QuickSort {
    type Item = StepEvent;

    fn next(&mut self) -> Option<StepEvent> {
        loop {
            if let Some(mut p) = self.partition.take() {
                match self.step_partition(&mut p) {
                    Progress::Step(event) => {
                        self.partition = Some(p);
                        return Some(event);
                    }
                    Progress::Finished(Some(event)) => return Some(event),
                    Progress::Finished(None) => continue,
                }
            }

            let (low, high) = self.ranges.pop()?;
            if low < high {
                self.partition = Some(Partition {
                    low,
                    high,
                    store: low,
                    scan: low,
                    pending: None,
                });
            }
        }
    }
}

impl SortStepper for QuickSort {
    fn algorithm(&self) -> Algorithm {
        Algorithm::QuickSort
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
        let mut steps = QuickSort::new(data);
        let events: Vec<StepEvent> = steps.by_ref().collect();
        (events, steps.data)
    }

    #[test]
    fn partitions_around_last_element() {
        let (events, data) = drain(vec![3, 1, 2]);
        assert_eq!(data, vec![1, 2, 3]);
        assert_eq!(
            events,
            vec![
                // pivot 2: 3 stays, 1 moves into the "less" region
                StepEvent::Compare { left: 0, right: 2 },
                StepEvent::Compare { left: 1, right: 2 },
                StepEvent::Swap { left: 0, right: 1 },
                // pivot into slot 1
                StepEvent::Swap { left: 1, right: 2 },
            ]
        );
    }

    #[test]
    fn sorted_input_never_writes() {
        let (events, data) = drain(vec![1, 2, 3, 4, 5]);
        assert_eq!(data, vec![1, 2, 3, 4, 5]);
        // Worst case for a last-element pivot: 4 + 3 + 2 + 1 comparisons.
        assert_eq!(events.len(), 10);
        assert!(events.iter().all(|e| !e.is_mutation()));
    }

    #[test]
    fn equal_elements_are_not_less_than_pivot() {
        let (events, data) = drain(vec![2, 2, 2]);
        assert_eq!(data, vec![2, 2, 2]);
        // Nothing is strictly less, but the pivot already matches its slot.
        assert_eq!(
            events,
            vec![
                StepEvent::Compare { left: 0, right: 2 },
                StepEvent::Compare { left: 1, right: 2 },
                StepEvent::Compare { left: 1, right: 2 },
            ]
        );
    }

    #[test]
    fn pivot_equal_to_its_slot_is_not_exchanged() {
        let (events, data) = drain(vec![1, 2, 2]);
        assert_eq!(data, vec![1, 2, 2]);
        assert_eq!(
            events,
            vec![
                StepEvent::Compare { left: 0, right: 2 },
                StepEvent::Compare { left: 1, right: 2 },
            ]
        );

        let (events, data) = drain(vec![2, 2]);
        assert_eq!(data, vec![2, 2]);
        assert_eq!(events, vec![StepEvent::Compare { left: 0, right: 1 }]);
    }

    #[test]
    fn unequal_pivot_still_moves() {
        let (events, data) = drain(vec![2, 3, 2]);
        assert_eq!(data, vec![2, 2, 3]);
        assert_eq!(
            events.iter().filter(|e| e.is_mutation()).count(),
            1,
            "{events:?}"
        );
    }

    #[test]
    fn reverse_input_sorts() {
        let (_, data) = drain(vec![9, 7, 5, 3, 1, 0]);
        assert_eq!(data, vec![0, 1, 3, 5, 7, 9]);
    }

    #[test]
    fn trivial_inputs_emit_nothing() {
        assert!(drain(Vec::new()).0.is_empty());
        assert!(drain(vec![7]).0.is_empty());
    }
}
