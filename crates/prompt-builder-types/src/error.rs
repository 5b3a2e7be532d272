use thiserror::Error;

/// Errors from decoding a share payload or a persisted store.
///
/// Every decode entry point returns these as values; none of them is ever
/// surfaced as a panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("payload is empty or could not be decompressed")]
    Empty,

    #[error("payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("envelope version {0} has no data object")]
    MissingData(u32),

    #[error("unsupported envelope version {0}")]
    UnsupportedVersion(u64),

    #[error("invalid envelope version field")]
    InvalidVersion,
}

/// Errors from the lossless text compressor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompressionError {
    #[error("input is not URL-safe base64: {0}")]
    InvalidEncoding(String),

    #[error("inflate failed: {0}")]
    Inflate(String),

    #[error("decompressed bytes are not valid UTF-8")]
    InvalidUtf8,
}

/// Errors from a local key-value storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,

    #[error("storage quota exceeded")]
    QuotaExceeded,

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from validating a draft before it is shared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task intent is required")]
    EmptyTaskIntent,

    #[error("draft has not been edited")]
    Untouched,

    #[error("{field} is too long ({actual} characters, max {max})")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

/// Errors from repository operations (used by trait definitions in prompt-builder-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from saving or looking up shared prompts.
#[derive(Debug, Error)]
pub enum ShareError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("could not allocate a unique slug for '{0}'")]
    SlugExhausted(String),
}

/// Errors from prompt analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("analyzer failed: {0}")]
    Analyzer(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::UnsupportedVersion(9);
        assert_eq!(err.to_string(), "unsupported envelope version 9");
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::FieldTooLong {
            field: "context",
            max: 10,
            actual: 12,
        };
        assert_eq!(err.to_string(), "context is too long (12 characters, max 10)");
    }

    #[test]
    fn test_share_error_wraps_validation() {
        let err: ShareError = ValidationError::EmptyTaskIntent.into();
        assert_eq!(err.to_string(), "task intent is required");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
