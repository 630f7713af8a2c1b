//! Top-down merge sort.
//!
//! The range `[left, right]` is split at `mid = floor((left + right) / 2)`;
//! the left half is sorted, then the right half, then the two runs are
//! merged. The merge compares run heads with `<=`, so ties keep the element
//! from the left run.
//!
//! Every element placed into the merged output is reported as a mutation,
//! including the elements drained after one run is exhausted (those come
//! without a comparison). Placement is an in-place rotation: taking the
//! right head moves it down to the output slot and shifts the rest of the
//! left run up by one. Taking the left head leaves it where it already is.
//! Either way the sequence stays a permutation of the input between steps,
//! and the comparison and placement counts match the textbook buffered merge.

use sortviz_types::{Algorithm, StepEvent, Value};

use crate::{SortStepper, pair};

/// Pending work, processed last-in first-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// Sort the inclusive range.
    Sort { left: usize, right: usize },
    /// Merge the sorted runs `[left, mid]` and `[mid + 1, right]`.
    Merge { left: usize, mid: usize, right: usize },
}

/// An in-progress merge of two adjacent sorted runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Merging {
    /// Next output slot; also the head of the remaining left run.
    out: usize,
    /// Head of the remaining right run.
    right_head: usize,
    /// Last slot of the left run, which moves up as right heads are taken.
    left_end: usize,
    /// Last slot of the merged range.
    right_end: usize,
    /// Placement decided by the last comparison, not yet applied.
    pending: Option<usize>,
}

impl Merging {
    const fn new(left: usize, mid: usize, right: usize) -> Self {
        Self {
            out: left,
            right_head: mid.saturating_add(1),
            left_end: mid,
            right_end: right,
            pending: None,
        }
    }
}

/// Step-yielding merge sort.
#[derive(Debug, Clone)]
pub struct MergeSort {
    data: Vec<Value>,
    stack: Vec<Frame>,
    merging: Option<Merging>,
}

impl MergeSort {
    /// Take ownership of `data` and prepare to sort it.
    pub fn new(data: Vec<Value>) -> Self {
        let mut stack = Vec::new();
        if let Some(right) = data.len().checked_sub(1) {
            stack.push(Frame::Sort { left: 0, right });
        }
        Self {
            data,
            stack,
            merging: None,
        }
    }

    /// Apply the placement of the element at `from` into `m.out`.
    fn place(&mut self, m: &mut Merging, from: usize) -> Option<StepEvent> {
        let to = m.out;
        if from != to {
            self.data.get_mut(to..=from)?.rotate_right(1);
            m.left_end = m.left_end.saturating_add(1);
            m.right_head = m.right_head.saturating_add(1);
        }
        m.out = to.saturating_add(1);
        Some(StepEvent::Move { from, to })
    }

    /// Advance the active merge by one step. `None` when it has finished.
    fn step_merge(&mut self, m: &mut Merging) -> Option<StepEvent> {
        if let Some(from) = m.pending.take() {
            return self.place(m, from);
        }

        if m.out > m.right_end {
            return None;
        }

        let left_remaining = m.out <= m.left_end;
        let right_remaining = m.right_head <= m.right_end;
        if left_remaining && right_remaining {
            let (left_head, right_head) = pair(&self.data, m.out, m.right_head)?;
            m.pending = Some(if left_head <= right_head {
                m.out
            } else {
                m.right_head
            });
            return Some(StepEvent::Compare {
                left: m.out,
                right: m.right_head,
            });
        }

        // One run is exhausted; the remainder is already in its final slots.
        let from = m.out;
        self.place(m, from)
    }
}

impl Iterator for MergeSort {
    type Item = StepEvent;

    fn next(&mut self) -> Option<StepEvent> {
        loop {
            if let Some(mut m) = self.merging.take() {
                if let Some(event) = self.step_merge(&mut m) {
                    self.merging = Some(m);
                    return Some(event);
                }
                continue;
            }

            match self.stack.pop()? {
                Frame::Sort { left, right } => {
                    if left >= right {
                        continue;
                    }
                    let mid = left.saturating_add(right.saturating_sub(left) / 2);
                    // Last pushed runs first: left half, right half, merge.
                    self.stack.push(Frame::Merge { left, mid, right });
                    self.stack.push(Frame::Sort {
                        left: mid.saturating_add(1),
                        right,
                    });
                    self.stack.push(Frame::Sort { left, right: mid });
                }
                Frame::Merge { left, mid, right } => {
                    self.merging = Some(Merging::new(left, mid, right));
                }
            }
        }
    }
}

impl SortStepper for MergeSort {
    fn algorithm(&self) -> Algorithm {
        Algorithm::MergeSort
    }

    fn sequence(&self) -> &[Value] {
        &self.data
    }

    fn into_sequence(self: Box<Self>) -> Vec<Value> {
        self.data
    }
}
