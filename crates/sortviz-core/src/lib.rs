//! Run orchestration for the Sortviz sorting visualizer.
//!
//! This crate wraps the step-yielding engine in everything a live
//! visualization needs: pacing, pause and cancellation, instrumentation,
//! and ownership of the sequence between runs.
//!
//! # Modules
//!
//! - [`clock`] -- Step clock mapping playback speed to a per-step delay.
//! - [`config`] -- Configuration loading from `sortviz-config.yaml` into
//!   strongly-typed structs.
//! - [`control`] -- Shared pause, cancel, and speed state.
//! - [`input`] -- Parsing and validation of user-supplied sequences.
//! - [`runner`] -- [`run_sort`], the loop that drives one run.
//! - [`session`] -- [`Session`], which owns the sequence and starts runs.
//! - [`sink`] -- [`StepSink`] and the stock sinks.
//!
//! [`run_sort`]: runner::run_sort
//! [`Session`]: session::Session
//! [`StepSink`]: sink::StepSink

pub mod clock;
pub mod config;
pub mod control;
pub mod input;
pub mod runner;
pub mod session;
pub mod sink;
