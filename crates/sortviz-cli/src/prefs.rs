//! Persisted user preferences.
//!
//! Only the mute toggle survives between launches. It is stored as a small
//! JSON object next to the configuration file and rewritten on every
//! toggle.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default preferences file name.
pub const PREFS_FILE_NAME: &str = "sortviz-prefs.json";

/// Errors reading or writing preferences.
#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    /// The file could not be read or written.
    #[error("preferences I/O failed: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The file holds something other than a preferences object.
    #[error("preferences JSON is invalid: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// Preferences saved between launches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Whether tone cues are muted.
    #[serde(default)]
    pub muted: bool,
}

impl Preferences {
    /// Read preferences from `path`. A missing file yields `None`.
    pub fn load(path: &Path) -> Result<Option<Self>, PrefsError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Write preferences to `path`, replacing any previous file.
    pub fn save(self, path: &Path) -> Result<(), PrefsError> {
        let json = serde_json::to_string_pretty(&self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Preferences::load(&dir.path().join(PREFS_FILE_NAME)).unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn saved_preferences_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFS_FILE_NAME);
        Preferences { muted: true }.save(&path).unwrap();
        assert_eq!(
            Preferences::load(&path).unwrap(),
            Some(Preferences { muted: true })
        );

        Preferences { muted: false }.save(&path).unwrap();
        assert_eq!(
            Preferences::load(&path).unwrap(),
            Some(Preferences { muted: false })
        );
    }

    #[test]
    fn unknown_fields_and_empty_objects_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFS_FILE_NAME);
        std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();
        assert_eq!(Preferences::load(&path).unwrap(), Some(Preferences::default()));
    }

    #[test]
    fn garbage_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFS_FILE_NAME);
        std::fs::write(&path, "muted = yes").unwrap();
        assert!(matches!(
            Preferences::load(&path),
            Err(PrefsError::Json { .. })
        ));
    }
}
