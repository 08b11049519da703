use std::path::PathBuf;

use thiserror::Error;

use crate::fertiscan::metadata::store::{Fragment, StoreError};

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Error type covering the failures of the import and export paths as well as
/// the file orchestration around them.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Raised when the analysis form lacks required keys. Lists every absent key.
    #[error("The analysis form is missing keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    /// Raised when a form entry or a stored fragment does not match the document model.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Raised when an NPK code has a non-numeric or missing component.
    #[error("NPK values must be numeric. Issue with: '{segment}' in the NPK string: '{npk}'")]
    Npk { npk: String, segment: String },

    /// A storage collaborator could not find its part of the record.
    #[error("{fragment} not found: {key}")]
    NotFound { fragment: Fragment, key: String },

    /// Generic storage failure while reading fragments.
    #[error("Error fetching data: {0}")]
    Fetch(String),

    /// Catch-all wrapper that keeps the underlying message.
    #[error("Unexpected error: {0}")]
    Unexpected(String),

    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization of a file fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl MetadataError {
    /// Builds a validation error prefixed with the location of the offending value.
    pub fn invalid(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        MetadataError::Validation(format!("{path}: {reason}"))
    }
}

impl From<StoreError> for MetadataError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { fragment, key } => MetadataError::NotFound { fragment, key },
            StoreError::Query(message) => MetadataError::Fetch(message),
            StoreError::Other(message) => MetadataError::Unexpected(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_lists_every_key() {
        let err = MetadataError::MissingKeys(vec!["npk".into(), "warranty".into()]);
        let message = err.to_string();
        assert!(message.contains("The analysis form is missing keys"));
        assert!(message.contains("npk, warranty"));
    }

    #[test]
    fn store_not_found_keeps_its_fragment() {
        let err: MetadataError = StoreError::NotFound {
            fragment: Fragment::Micronutrient,
            key: "label-1".into(),
        }
        .into();
        assert!(matches!(
            err,
            MetadataError::NotFound {
                fragment: Fragment::Micronutrient,
                ..
            }
        ));
    }

    #[test]
    fn query_failures_are_rewrapped() {
        let err: MetadataError = StoreError::Query("connection reset".into()).into();
        let message = err.to_string();
        assert!(message.contains("Error fetching data"));
        assert!(message.contains("connection reset"));

        let err: MetadataError = StoreError::Other("boom".into()).into();
        assert_eq!(err.to_string(), "Unexpected error: boom");
    }
}
