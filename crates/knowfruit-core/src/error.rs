//! Error types for the Know Your Fruit classification pipeline.
//!
//! Errors are split by who can fix them: configuration problems are fatal at
//! startup, pipeline problems are per-request and surface to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Know Your Fruit operations.
#[derive(Error, Debug)]
pub enum KnowFruitError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
///
/// These should stop the service from starting rather than fail a request.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The fruit info table could not be loaded
    #[error("Invalid fruit info file {path}: {message}")]
    InvalidFruitInfo { path: PathBuf, message: String },

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// The classifier returned a vector that does not line up with the class table
    #[error("Class table has {expected} names but the model returned {actual} scores")]
    ClassCountMismatch { expected: usize, actual: usize },
}

/// Per-request pipeline errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The uploaded bytes are not a decodable image
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// The remote classifier was unreachable or reported an error
    #[error("Inference error: {message}")]
    Inference {
        message: String,
        /// HTTP status code, when the failure came from an HTTP response.
        status_code: Option<u16>,
    },

    /// Operation timed out
    #[error("Timeout in {stage} stage after {timeout_ms}ms")]
    Timeout { stage: String, timeout_ms: u64 },

    /// Upload exceeds size limit
    #[error("Upload too large ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge { size_mb: u64, max_mb: u64 },

    /// Image dimensions exceed limit
    #[error("Image too large ({width}x{height} > {max_dim})")]
    ImageTooLarge { width: u32, height: u32, max_dim: u32 },
}

impl PipelineError {
    /// Whether the error was caused by the uploaded image itself.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            PipelineError::Decode { .. }
                | PipelineError::FileTooLarge { .. }
                | PipelineError::ImageTooLarge { .. }
        )
    }
}

/// Convenience type alias for Know Your Fruit results.
pub type Result<T> = std::result::Result<T, KnowFruitError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors() {
        let err = PipelineError::Decode {
            message: "bad header".to_string(),
        };
        assert!(err.is_user_error());

        let err = PipelineError::Inference {
            message: "HTTP 503".to_string(),
            status_code: Some(503),
        };
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_class_count_mismatch_message() {
        let err = ConfigError::ClassCountMismatch {
            expected: 34,
            actual: 33,
        };
        let msg = err.to_string();
        assert!(msg.contains("34"));
        assert!(msg.contains("33"));
    }
}
