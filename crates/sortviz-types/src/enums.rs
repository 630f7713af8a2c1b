//! Enumeration types shared by the engine, the run driver, and renderers.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Algorithm selector
// ---------------------------------------------------------------------------

/// One of the five instrumented sorting algorithms.
///
/// Serializes as the camelCase selector identifiers used by the web
/// front end (`bubbleSort`, `quickSort`, ...).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum Algorithm {
    /// Adjacent-pair exchange over a shrinking unsorted prefix.
    #[default]
    BubbleSort,
    /// Lomuto-partition quicksort with the last element as pivot.
    QuickSort,
    /// Top-down merge sort, stable on ties.
    MergeSort,
    /// Repeated minimum selection into the sorted prefix.
    SelectionSort,
    /// Key insertion by shifting larger neighbours right.
    InsertionSort,
}

impl Algorithm {
    /// All algorithms, in selector order.
    pub const ALL: [Self; 5] = [
        Self::BubbleSort,
        Self::QuickSort,
        Self::MergeSort,
        Self::SelectionSort,
        Self::InsertionSort,
    ];

    /// The selector identifier (`bubbleSort`, `quickSort`, ...).
    pub const fn id(self) -> &'static str {
        match self {
            Self::BubbleSort => "bubbleSort",
            Self::QuickSort => "quickSort",
            Self::MergeSort => "mergeSort",
            Self::SelectionSort => "selectionSort",
            Self::InsertionSort => "insertionSort",
        }
    }

    /// Human-readable label for menus and headers.
    pub const fn label(self) -> &'static str {
        match self {
            Self::BubbleSort => "Bubble Sort",
            Self::QuickSort => "Quick Sort",
            Self::MergeSort => "Merge Sort",
            Self::SelectionSort => "Selection Sort",
            Self::InsertionSort => "Insertion Sort",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when a string names no known algorithm.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sorting algorithm: {name}")]
pub struct ParseAlgorithmError {
    /// The rejected input.
    pub name: String,
}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bubblesort" | "bubble" => Ok(Self::BubbleSort),
            "quicksort" | "quick" => Ok(Self::QuickSort),
            "mergesort" | "merge" => Ok(Self::MergeSort),
            "selectionsort" | "selection" => Ok(Self::SelectionSort),
            "insertionsort" | "insertion" => Ok(Self::InsertionSort),
            _ => Err(ParseAlgorithmError { name: s.to_owned() }),
        }
    }
}

// ---------------------------------------------------------------------------
// Run outcome
// ---------------------------------------------------------------------------

/// How a run terminated.
///
/// Cancellation is a normal way for a run to end, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum RunOutcome {
    /// The algorithm body ran to the end; the sequence is sorted.
    Completed,
    /// Cancellation was observed at a checkpoint; the sequence holds a
    /// partially sorted permutation of the input.
    Cancelled,
}
