//! Shared type definitions for the Sortviz sorting visualizer.
//!
//! This crate is the single source of truth for the types that cross crate
//! boundaries: the engine emits [`StepEvent`]s, the run driver accumulates
//! [`RunCounters`], and renderers consume [`RunUpdate`]s. Types flow to
//! `TypeScript` via `ts-rs` for the web renderer.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for run identifiers
//! - [`enums`] -- Algorithm selector and run outcome
//! - [`step`] -- Step events and per-run counters
//! - [`update`] -- Renderer-facing step and completion payloads

pub mod enums;
pub mod ids;
pub mod step;
pub mod update;

// Re-export all public types at crate root for convenience.
pub use enums::{Algorithm, ParseAlgorithmError, RunOutcome};
pub use ids::RunId;
pub use step::{RunCounters, StepEvent, StepKind, Value};
pub use update::{RunFinished, RunUpdate, StepUpdate, ToneCue};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for the renderer.

    #[test]
    fn export_bindings() {
        // ts-rs writes the bindings to `bindings/` relative to the crate
        // root when `export_all` runs.
        use ts_rs::TS;

        let _ = crate::ids::RunId::export_all();
        let _ = crate::enums::Algorithm::export_all();
        let _ = crate::enums::RunOutcome::export_all();
        let _ = crate::step::StepKind::export_all();
        let _ = crate::step::StepEvent::export_all();
        let _ = crate::step::RunCounters::export_all();
        let _ = crate::update::ToneCue::export_all();
        let _ = crate::update::StepUpdate::export_all();
        let _ = crate::update::RunFinished::export_all();
        let _ = crate::update::RunUpdate::export_all();
    }
}
