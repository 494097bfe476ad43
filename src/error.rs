//! Error handling for Sigweave
//!
//! Two fatal categories exist: configuration errors (a required input is
//! missing before processing) and validation errors (an input is present but
//! out of range or inconsistent). Not-yet-processed outputs are a warning,
//! not an error: accessors return `None` and log via the `log` crate.

use thiserror::Error;

/// Result type alias for Sigweave operations
pub type Result<T> = std::result::Result<T, SigweaveError>;

/// Main error type for Sigweave operations
#[derive(Error, Debug)]
pub enum SigweaveError {
    // Configuration errors (required input missing)
    #[error("Track '{track}' has no source assigned")]
    MissingSource { track: String },

    #[error("Filter has no coefficients: {reason}")]
    MissingCoefficients { reason: String },

    // Validation errors
    #[error("Invalid parameter {param}: {value} (expected {expected})")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    #[error("Sampling rate mismatch: expected {expected_hz} Hz, got {actual_hz} Hz")]
    SampleRateMismatch { expected_hz: f64, actual_hz: f64 },

    #[error("Frequency response needs at least 2 points, got {points}")]
    CurveTooShort { points: usize },

    #[error("Malformed FRF file {path}: {reason}")]
    FrfFormat { path: String, reason: String },

    #[error("Unknown source type tag: {tag}")]
    UnknownSourceType { tag: u32 },

    // Audio file errors
    #[error("Audio read error for {path}")]
    AudioReadError {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("Audio write error for {path}")]
    AudioWriteError {
        path: String,
        #[source]
        source: hound::Error,
    },

    // Project errors
    #[error("Project file not found: {path}")]
    ProjectNotFound { path: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SigweaveError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            SigweaveError::MissingSource { .. } => "MISSING_SOURCE",
            SigweaveError::MissingCoefficients { .. } => "MISSING_COEFFICIENTS",
            SigweaveError::InvalidParameter { .. } => "INVALID_PARAMETER",
            SigweaveError::SampleRateMismatch { .. } => "SAMPLE_RATE_MISMATCH",
            SigweaveError::CurveTooShort { .. } => "CURVE_TOO_SHORT",
            SigweaveError::FrfFormat { .. } => "FRF_FORMAT",
            SigweaveError::UnknownSourceType { .. } => "UNKNOWN_SOURCE_TYPE",
            SigweaveError::AudioReadError { .. } => "AUDIO_READ_ERROR",
            SigweaveError::AudioWriteError { .. } => "AUDIO_WRITE_ERROR",
            SigweaveError::ProjectNotFound { .. } => "PROJECT_NOT_FOUND",
            SigweaveError::Io(_) => "IO_ERROR",
            SigweaveError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is a configuration error (required input missing)
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SigweaveError::MissingSource { .. } | SigweaveError::MissingCoefficients { .. }
        )
    }

    /// Check if this error is a validation error (input present but invalid)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SigweaveError::InvalidParameter { .. }
                | SigweaveError::SampleRateMismatch { .. }
                | SigweaveError::CurveTooShort { .. }
                | SigweaveError::FrfFormat { .. }
                | SigweaveError::UnknownSourceType { .. }
        )
    }
}
