// SPDX-License-Identifier: MIT

//! Typed error handling for vellum-rs
//!
//! The graph engine itself is total and never returns an error; this type
//! covers the file/parse boundary used by the loader and the CLI.

use thiserror::Error;

/// Top-level error type for vellum-rs
#[derive(Debug, Error)]
pub enum VellumError {
    /// Definition or step file missing on disk
    #[error("Workflow file not found: {0}")]
    FileNotFound(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON parsing errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error wrapper for compatibility
    #[error("{0}")]
    Other(String),
}

impl VellumError {
    /// Create from a generic message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

impl From<String> for VellumError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}
