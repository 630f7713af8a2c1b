//! Configuration loading and typed config structures for Sortviz.
//!
//! The configuration lives in `sortviz-config.yaml` next to the binary's
//! working directory. Every field has a default matching the stock
//! visualizer (50 bars valued 5 to 100, bubble sort, speed 50), so an empty
//! or missing file is a valid configuration.

use std::path::Path;

use serde::Deserialize;
use sortviz_types::{Algorithm, Value};

use crate::control::{DEFAULT_SPEED, MAX_SPEED, MIN_SPEED};
use crate::input::MAX_SEQUENCE_LEN;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "sortviz-config.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes something unusable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What was wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level visualizer configuration.
///
/// Mirrors the structure of `sortviz-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VisualizerConfig {
    /// Random array generation.
    #[serde(default)]
    pub array: ArrayConfig,

    /// Initial algorithm and speed.
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Step pacing.
    #[serde(default)]
    pub clock: ClockConfig,

    /// Tone cues.
    #[serde(default)]
    pub audio: AudioConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl VisualizerConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `SORTVIZ_ALGORITHM` overrides `playback.algorithm`
    /// - `SORTVIZ_SPEED` overrides `playback.speed`
    /// - `SORTVIZ_MUTED` overrides `audio.muted`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if an override or the result fails
    /// validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`from_file`](Self::from_file), but a missing file yields the
    /// defaults (still subject to environment overrides).
    ///
    /// # Errors
    ///
    /// Same as [`from_file`](Self::from_file), except that a missing file
    /// is not an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string. No environment
    /// overrides are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SORTVIZ_*` environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set to something
    /// that cannot be parsed.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a value cannot be parsed.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(raw) = lookup("SORTVIZ_ALGORITHM") {
            self.playback.algorithm = raw.parse().map_err(|e| ConfigError::Invalid {
                reason: format!("SORTVIZ_ALGORITHM: {e}"),
            })?;
        }
        if let Some(raw) = lookup("SORTVIZ_SPEED") {
            self.playback.speed = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                reason: format!("SORTVIZ_SPEED: not a speed: {raw}: {e}"),
            })?;
        }
        if let Some(raw) = lookup("SORTVIZ_MUTED") {
            self.audio.muted = parse_flag(&raw).ok_or_else(|| ConfigError::Invalid {
                reason: format!("SORTVIZ_MUTED: not a boolean: {raw}"),
            })?;
        }
        Ok(())
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| Err(ConfigError::Invalid { reason });

        if self.array.size == 0 {
            return invalid("array.size must be at least 1".to_owned());
        }
        if self.array.size > MAX_SEQUENCE_LEN {
            return invalid(format!(
                "array.size {} exceeds the maximum of {MAX_SEQUENCE_LEN}",
                self.array.size
            ));
        }
        if self.array.min_value > self.array.max_value {
            return invalid(format!(
                "array.min_value {} is greater than array.max_value {}",
                self.array.min_value, self.array.max_value
            ));
        }
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.playback.speed) {
            return invalid(format!(
                "playback.speed {} is outside {MIN_SPEED}..={MAX_SPEED}",
                self.playback.speed
            ));
        }
        if !self.audio.base_hz.is_finite() || !self.audio.scale_hz.is_finite() {
            return invalid("audio frequencies must be finite".to_owned());
        }
        Ok(())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Random array generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ArrayConfig {
    /// Number of elements in a generated array.
    #[serde(default = "default_array_size")]
    pub size: usize,

    /// Smallest generated value, inclusive.
    #[serde(default = "default_min_value")]
    pub min_value: Value,

    /// Largest generated value, inclusive.
    #[serde(default = "default_max_value")]
    pub max_value: Value,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            size: default_array_size(),
            min_value: default_min_value(),
            max_value: default_max_value(),
        }
    }
}

/// Initial playback settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PlaybackConfig {
    /// Algorithm selected at startup.
    #[serde(default)]
    pub algorithm: Algorithm,

    /// Speed at startup, `1..=100`.
    #[serde(default = "default_speed")]
    pub speed: u8,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            speed: default_speed(),
        }
    }
}

/// Step pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ClockConfig {
    /// Sleep `101 - speed` ms after each mutation. Off for headless runs.
    #[serde(default = "default_true")]
    pub paced: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self { paced: true }
    }
}

/// Tone cue settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AudioConfig {
    /// Start muted (the saved preference wins when present).
    #[serde(default)]
    pub muted: bool,

    /// Frequency for value zero.
    #[serde(default = "default_base_hz")]
    pub base_hz: f64,

    /// Hertz added per unit of value.
    #[serde(default = "default_scale_hz")]
    pub scale_hz: f64,

    /// Length of each cue.
    #[serde(default = "default_tone_duration_ms")]
    pub duration_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            muted: false,
            base_hz: default_base_hz(),
            scale_hz: default_scale_hz(),
            duration_ms: default_tone_duration_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_array_size() -> usize {
    50
}

const fn default_min_value() -> Value {
    5
}

const fn default_max_value() -> Value {
    100
}

const fn default_speed() -> u8 {
    DEFAULT_SPEED
}

const fn default_base_hz() -> f64 {
    200.0
}

const fn default_scale_hz() -> f64 {
    8.0
}

const fn default_tone_duration_ms() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}
