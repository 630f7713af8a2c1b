//! Error types for the Sortviz terminal binary.
//!
//! [`CliError`] wraps the failure modes of startup, so
//! `main` can propagate with `?`. Cancelling a run is not an error.

/// Top-level error for the Sortviz binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: sortviz_core::config::ConfigError,
    },

    /// `SORTVIZ_INPUT` did not hold a usable sequence.
    #[error("input error: {source}")]
    Input {
        /// The underlying input error.
        #[from]
        source: sortviz_core::input::InputError,
    },

    /// Starting or finishing a run failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: sortviz_core::session::SessionError,
    },
}
