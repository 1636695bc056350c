//! Error types for export operations.
//!
//! This module defines the main error type [`ExportError`] which represents
//! everything that can go wrong while talking to Readeck, rendering Markdown
//! or writing notes. Problems found in the annotated HTML itself are never
//! fatal; they are reported as [`crate::ExtractIssue`] values instead.
//!
//! # Example
//!
//! ```rust
//! use readeck_export_core::{ExportError, Result};
//!
//! fn require_id(id: &str) -> Result<&str> {
//!     if id.is_empty() {
//!         return Err(ExportError::ConfigError("bookmark id is empty".to_string()));
//!     }
//!     Ok(id)
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other HTTP-related problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided or built from the configured base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No API token was configured.
    #[error("Readeck API token not set (use READECK_AUTH_TOKEN or --token)")]
    MissingToken,

    /// Readeck answered with a non-success status.
    #[error("Readeck API returned {status} for {url}")]
    Api { status: u16, url: String },

    /// JSON (de)serialization errors.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// HTML to Markdown conversion failed.
    #[error("Failed to convert HTML to Markdown: {0}")]
    MarkdownError(String),

    /// A date in bookmark metadata could not be parsed.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read/write errors.
    #[error("Failed to write to file: {0}")]
    WriteError(#[from] std::io::Error),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for ExportError.
pub type Result<T> = std::result::Result<T, ExportError>;
