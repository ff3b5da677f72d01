//! Error types for nb-clean
//!
//! All fallible operations return `Result<T, Error>`.
//! The checker and cleaner fail before touching a document, never halfway through.

use thiserror::Error;

/// nb-clean error types
#[derive(Debug, Error)]
pub enum Error {
    /// Mutually exclusive or otherwise unusable configuration
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Input does not have the top-level shape of a notebook
    #[error("malformed notebook: {0}")]
    MalformedDocument(String),

    /// Input is not valid JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure reading or writing notebook bytes
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for nb-clean operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_argument() {
        let err = Error::InvalidArgument("both flags set".into());
        assert_eq!(err.to_string(), "invalid argument: both flags set");
    }

    #[test]
    fn test_json_error_converts() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().starts_with("invalid JSON"));
    }
}
