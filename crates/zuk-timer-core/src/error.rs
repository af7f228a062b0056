//! Core error types for zuk-timer-core.
//!
//! Timer and scheduler operations are infallible; errors only arise from
//! preference persistence and from user-supplied preference edits.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for zuk-timer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Preference storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid preference edits
    #[error("Preference error: {0}")]
    Preference(#[from] PreferenceError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Preference-file errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No usable configuration directory
    #[error("Failed to resolve data directory: {0}")]
    DataDir(String),

    /// Failed to write the preference file
    #[error("Failed to save preferences to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },
}

/// Errors raised when editing preferences by name.
#[derive(Error, Debug)]
pub enum PreferenceError {
    /// Name is not one of the known preferences
    #[error("Unknown preference: {0}")]
    UnknownKey(String),

    /// Value cannot be parsed for the preference
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preference_error_wraps_into_core_error() {
        let err: CoreError = PreferenceError::UnknownKey("volume".into()).into();
        assert_eq!(err.to_string(), "Preference error: Unknown preference: volume");
    }

    #[test]
    fn storage_error_mentions_path() {
        let err = StorageError::SaveFailed {
            path: PathBuf::from("/tmp/preferences.toml"),
            message: "read-only".into(),
        };
        assert!(err.to_string().contains("/tmp/preferences.toml"));
    }

    #[test]
    fn json_error_wraps_into_core_error() {
        let json_err = serde_json::from_str::<bool>("not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Json(_)));
        assert!(err.to_string().starts_with("JSON error: "));
    }
}
