//! Step events and per-run counters.
//!
//! A [`StepEvent`] describes exactly one unit of observable work performed
//! by a sorting algorithm: one comparison or one mutation. Mutations are
//! always applied to the working sequence before the event describing them
//! is handed out.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Element type of every sequence the engine sorts.
///
/// Integers give a total order, so every comparison is well defined.
pub type Value = i64;

/// Whether an event is a comparison or a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum StepKind {
    /// Two elements were compared; the sequence is unchanged.
    Comparison,
    /// The sequence was changed (or, for merge placements, rewritten).
    Mutation,
}

/// One observable step of a sorting algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum StepEvent {
    /// The elements at `left` and `right` were compared.
    Compare {
        /// Index of the first operand.
        left: usize,
        /// Index of the second operand.
        right: usize,
    },
    /// The elements at `left` and `right` were exchanged.
    Swap {
        /// Lower slot; receives the value reported as "written".
        left: usize,
        /// Other slot of the exchange.
        right: usize,
    },
    /// The element at `from` was placed at `to`, shifting `to..from` one
    /// slot right. `from == to` is an in-place placement.
    Move {
        /// Slot the element was taken from.
        from: usize,
        /// Slot the element now occupies.
        to: usize,
    },
}

impl StepEvent {
    /// Classify the event.
    pub const fn kind(&self) -> StepKind {
        match self {
            Self::Compare { .. } => StepKind::Comparison,
            Self::Swap { .. } | Self::Move { .. } => StepKind::Mutation,
        }
    }

    /// Whether the event changed (or rewrote) the sequence.
    pub const fn is_mutation(&self) -> bool {
        matches!(self.kind(), StepKind::Mutation)
    }

    /// Indices a renderer should highlight for this step.
    pub const fn indices(&self) -> [usize; 2] {
        match *self {
            Self::Compare { left, right } | Self::Swap { left, right } => [left, right],
            Self::Move { from, to } => [to, from],
        }
    }

    /// Slot holding the value just written, for mutation events.
    pub const fn written_index(&self) -> Option<usize> {
        match *self {
            Self::Compare { .. } => None,
            Self::Swap { left, .. } => Some(left),
            Self::Move { to, .. } => Some(to),
        }
    }
}

/// Running counters for a single run.
///
/// Both counters start at zero when a run is created and only grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RunCounters {
    /// Number of element-pair comparisons reported so far.
    pub comparisons: u64,
    /// Number of mutations (swaps, shifts, placements) reported so far.
    pub mutations: u64,
}

impl RunCounters {
    /// Account for one event. Saturates instead of overflowing.
    pub const fn record(&mut self, event: &StepEvent) {
        match event.kind() {
            StepKind::Comparison => self.comparisons = self.comparisons.saturating_add(1),
            StepKind::Mutation => self.mutations = self.mutations.saturating_add(1),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn counters_track_each_kind() {
        let mut counters = RunCounters::default();
        counters.record(&StepEvent::Compare { left: 0, right: 1 });
        counters.record(&StepEvent::Compare { left: 1, right: 2 });
        counters.record(&StepEvent::Swap { left: 1, right: 2 });
        counters.record(&StepEvent::Move { from: 3, to: 0 });
        assert_eq!(counters.comparisons, 2);
        assert_eq!(counters.mutations, 2);
    }

    #[test]
    fn written_index_follows_the_receiving_slot() {
        assert_eq!(StepEvent::Compare { left: 0, right: 1 }.written_index(), None);
        assert_eq!(StepEvent::Swap { left: 2, right: 5 }.written_index(), Some(2));
        assert_eq!(StepEvent::Move { from: 7, to: 4 }.written_index(), Some(4));
    }

    #[test]
    fn events_serialize_with_kind_tag() {
        let json = serde_json::to_value(StepEvent::Swap { left: 1, right: 3 }).unwrap();
        assert_eq!(json["kind"], "swap");
        assert_eq!(json["left"], 1);
        assert_eq!(json["right"], 3);
    }
}
