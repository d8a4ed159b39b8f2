//! Error types for manifest-yml
//!
//! One enum covers every failure a conversion or a batch run can produce.
//! A conversion aborts on the first error and never returns partial output.

use thiserror::Error;

/// Result type alias for manifest-yml operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Error type for manifest conversion
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The input is not a well-formed `<manifest>` document
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A field the derivation depends on is absent
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// A numeric field holds text that is not a finite decimal number
    #[error("Invalid numeric field '{field}': {value:?} ({reason})")]
    InvalidNumericField {
        field: String,
        value: String,
        reason: String,
    },

    /// A value would break the line structure of the output (strict mode only)
    #[error("Unsafe value in field '{field}': contains a line break")]
    UnsafeValue { field: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl ConvertError {
    /// Whether this error was caused by the content of a single input document.
    ///
    /// Batch runs record these per file and keep going; anything else
    /// (I/O on the output side aside) points at the environment.
    pub fn is_document_error(&self) -> bool {
        matches!(
            self,
            ConvertError::MalformedInput(_)
                | ConvertError::MissingRequiredField(_)
                | ConvertError::InvalidNumericField { .. }
                | ConvertError::UnsafeValue { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_numeric_message() {
        let err = ConvertError::InvalidNumericField {
            field: "price".to_string(),
            value: "abc".to_string(),
            reason: "abc".parse::<f64>().unwrap_err().to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("price"));
        assert!(msg.contains("\"abc\""));
    }

    #[test]
    fn test_document_errors() {
        assert!(ConvertError::MissingRequiredField("name".into()).is_document_error());
        assert!(ConvertError::MalformedInput("eof".into()).is_document_error());
        assert!(!ConvertError::Config("bad".into()).is_document_error());
        assert!(!ConvertError::Other("x".into()).is_document_error());
    }
}
