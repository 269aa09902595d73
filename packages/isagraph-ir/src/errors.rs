//! Error types for isagraph-ir
//!
//! Only failures that abort a whole call live here. Per-line, per-row and
//! per-kernel problems are collected as diagnostics instead.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for isagraph-ir operations
#[derive(Debug, Error)]
pub enum IsaGraphError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON export error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Two files produced a result for the same device and kernel
    #[error("Duplicate analysis result for device '{device}', kernel '{kernel}'")]
    DuplicateResult { device: String, kernel: String },

    /// Worker pool could not be created
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

impl IsaGraphError {
    pub fn duplicate(device: impl Into<String>, kernel: impl Into<String>) -> Self {
        IsaGraphError::DuplicateResult {
            device: device.into(),
            kernel: kernel.into(),
        }
    }

    pub fn pipeline(msg: impl Into<String>) -> Self {
        IsaGraphError::Pipeline(msg.into())
    }
}

/// Result type alias for isagraph operations
pub type Result<T> = std::result::Result<T, IsaGraphError>;
