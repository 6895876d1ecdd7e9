//! Error types for rubricheck
//!
//! Two layers:
//! - [`RubricheckError`]: crate-wide operational errors (bad rubric, config I/O,
//!   submissions unfit for assessment).
//! - [`crate::assessment::ValidationError`]: the exhaustive rejection taxonomy for
//!   untrusted assessment payloads, wrapped here via `#[from]` so callers can use
//!   one `Result` throughout while still matching on the validation discriminant.

use thiserror::Error;

use crate::assessment::ValidationError;

/// Errors that can occur during rubricheck operations
#[derive(Error, Debug)]
pub enum RubricheckError {
    /// Rejected assessment payload; carries the full validation discriminant.
    #[error("assessment validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("rubric has no criteria")]
    EmptyRubric,

    #[error("invalid rubric: {reason}")]
    InvalidRubric { reason: String },

    #[error("submission too short: {words} words (minimum {minimum})")]
    SubmissionTooShort { words: usize, minimum: usize },

    #[error("generator produced no usable output: {reason}")]
    Generator { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    #[error("{0}")]
    Other(String),
}

impl RubricheckError {
    /// Create an error for an invalid rubric
    pub fn invalid_rubric(reason: impl Into<String>) -> Self {
        RubricheckError::InvalidRubric {
            reason: reason.into(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        RubricheckError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a generator failure
    pub fn generator(reason: impl Into<String>) -> Self {
        RubricheckError::Generator {
            reason: reason.into(),
        }
    }

    /// Get the stable error type identifier for structured output
    pub fn error_type(&self) -> &'static str {
        match self {
            RubricheckError::Validation(_) => "validation",
            RubricheckError::EmptyRubric => "empty_rubric",
            RubricheckError::InvalidRubric { .. } => "invalid_rubric",
            RubricheckError::SubmissionTooShort { .. } => "submission_too_short",
            RubricheckError::Generator { .. } => "generator",
            RubricheckError::Io(_) => "io_error",
            RubricheckError::Toml(_) => "toml_error",
            RubricheckError::Json(_) => "json_error",
            RubricheckError::InvalidValue { .. } => "invalid_value",
            RubricheckError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for rubricheck operations
pub type Result<T> = std::result::Result<T, RubricheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_type_identifiers() {
        assert_eq!(RubricheckError::EmptyRubric.error_type(), "empty_rubric");
        assert_eq!(
            RubricheckError::SubmissionTooShort {
                words: 10,
                minimum: 150
            }
            .error_type(),
            "submission_too_short"
        );
        assert_eq!(
            RubricheckError::invalid_rubric("duplicate id").error_type(),
            "invalid_rubric"
        );
    }

    #[test]
    fn test_to_json_shape() {
        let err = RubricheckError::SubmissionTooShort {
            words: 12,
            minimum: 150,
        };
        let json = err.to_json();
        assert_eq!(json["error"]["type"], "submission_too_short");
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("12 words"));
    }

    #[test]
    fn test_validation_error_wraps() {
        let verr = ValidationError::EmptyInput;
        let err: RubricheckError = verr.into();
        assert_eq!(err.error_type(), "validation");
        assert!(matches!(
            err,
            RubricheckError::Validation(ValidationError::EmptyInput)
        ));
    }
}
