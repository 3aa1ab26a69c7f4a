//! Error types for white background masking operations

use std::path::Path;
use thiserror::Error;

/// Result type alias for masking operations
pub type Result<T> = std::result::Result<T, MaskError>;

/// Error taxonomy for masking operations
#[derive(Error, Debug)]
pub enum MaskError {
    /// Input could not be read or parsed (missing file, corrupt data, unsupported format)
    #[error("Decode error: {0}")]
    Decode(String),

    /// Output could not be encoded or written (bad path, permission denied, disk full)
    #[error("Encode error: {0}")]
    Encode(String),

    /// Anything else that went wrong while transforming pixels
    #[error("Processing error: {0}")]
    Processing(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MaskError {
    /// Create a new decode error
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a new encode error
    pub fn encode<S: Into<String>>(msg: S) -> Self {
        Self::Encode(msg.into())
    }

    /// Create a new processing error
    pub fn processing<S: Into<String>>(msg: S) -> Self {
        Self::Processing(msg.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create decode error with input path context
    pub fn decode_error<P: AsRef<Path>, E: std::fmt::Display>(path: P, error: E) -> Self {
        let path_ref = path.as_ref();
        let extension = path_ref
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown");

        Self::Decode(format!(
            "Failed to load image '{}' (format: {}): {}",
            path_ref.display(),
            extension,
            error
        ))
    }

    /// Create encode error with operation and output path context
    pub fn encode_error<P: AsRef<Path>, E: std::fmt::Display>(
        operation: &str,
        path: P,
        error: E,
    ) -> Self {
        Self::Encode(format!(
            "Failed to {} '{}': {}",
            operation,
            path.as_ref().display(),
            error
        ))
    }

    /// Create configuration error with valid ranges
    pub fn config_value_error<T: std::fmt::Display>(
        parameter: &str,
        value: T,
        valid_range: &str,
        recommended: Option<T>,
    ) -> Self {
        let recommendation = match recommended {
            Some(rec) => format!(" Recommended: {}", rec),
            None => String::new(),
        };

        Self::InvalidConfig(format!(
            "Invalid {}: {} (valid range: {}).{}",
            parameter, value, valid_range, recommendation
        ))
    }

    /// Create processing error with stage context
    pub fn processing_stage_error(stage: &str, details: &str, input_info: Option<&str>) -> Self {
        let input_context = match input_info {
            Some(info) => format!(" (input: {})", info),
            None => String::new(),
        };

        Self::Processing(format!(
            "Processing failed at stage '{}'{}: {}",
            stage, input_context, details
        ))
    }

    /// Whether this error happened while reading the input
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Whether this error happened while producing the output
    #[must_use]
    pub fn is_encode(&self) -> bool {
        matches!(self, Self::Encode(_))
    }
}
