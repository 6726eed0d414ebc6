use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the sealing pipeline
#[derive(Error, Debug)]
pub enum SealError {
    // ============================================================================
    // Input Errors
    // ============================================================================
    #[error("Input file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Validation failed: {0}")]
    Validation(String),

    // ============================================================================
    // Cryptographic Errors
    // ============================================================================
    #[error("Failed to sign manifest: {0}")]
    SigningFailed(String),

    #[error("Signature verification failed: {0}")]
    VerificationFailed(String),

    #[error("Failed to handle signing key: {0}")]
    KeyFailed(String),

    #[error("Timestamp proof failed: {0}")]
    TimestampFailed(String),

    // ============================================================================
    // Persistence Errors
    // ============================================================================
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Integrity check failed: {0}")]
    IntegrityFailed(String),

    // ============================================================================
    // Generic/System Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SealError {
    /// Name of the pipeline stage an error belongs to, for operator-facing
    /// messages ("validate", "hash", "sign", "timestamp", "persist", "verify").
    pub fn stage(&self) -> &'static str {
        match self {
            SealError::FileNotFound(_) | SealError::Validation(_) => "validate",
            SealError::ReadFailed { .. } => "hash",
            SealError::SigningFailed(_) | SealError::KeyFailed(_) => "sign",
            SealError::VerificationFailed(_) => "verify",
            SealError::TimestampFailed(_) => "timestamp",
            SealError::WriteFailed { .. }
            | SealError::IntegrityFailed(_)
            | SealError::Io(_)
            | SealError::Json(_) => "persist",
        }
    }
}

// Automatic conversion from base64::DecodeError
impl From<base64::DecodeError> for SealError {
    fn from(err: base64::DecodeError) -> Self {
        SealError::VerificationFailed(format!("Base64 decode error: {}", err))
    }
}

// Helper type alias for Results
pub type SealResult<T> = Result<T, SealError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SealError::Validation("operator is required".to_string());
        assert_eq!(err.to_string(), "Validation failed: operator is required");
    }

    #[test]
    fn test_file_not_found_names_path() {
        let err = SealError::FileNotFound(PathBuf::from("/tmp/missing.bin"));
        assert!(err.to_string().contains("/tmp/missing.bin"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SealError = io_err.into();
        assert!(matches!(err, SealError::Io(_)));
    }

    #[test]
    fn test_stage_mapping() {
        assert_eq!(SealError::Validation("x".to_string()).stage(), "validate");
        assert_eq!(SealError::SigningFailed("x".to_string()).stage(), "sign");
        assert_eq!(
            SealError::TimestampFailed("x".to_string()).stage(),
            "timestamp"
        );
        assert_eq!(
            SealError::IntegrityFailed("x".to_string()).stage(),
            "persist"
        );
    }
}
