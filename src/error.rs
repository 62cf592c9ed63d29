//! Custom error types for rustbibfetch.
//!
//! This module defines all error types used throughout the application.
//! All functions return `Result<T, BibfetchError>` instead of using `unwrap()`.

use thiserror::Error;

/// Main error type for rustbibfetch operations.
///
/// Uses `thiserror` for ergonomic error handling and automatic `Display` implementation.
#[derive(Debug, Error)]
pub enum BibfetchError {
    /// Network/HTTP request error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// HTML parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Remote server returned a non-success status
    #[error("HTTP error: {code} - {message}")]
    Api {
        /// Status code from the server
        code: i32,
        /// Error message
        message: String,
    },

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias using `BibfetchError`
pub type Result<T> = std::result::Result<T, BibfetchError>;
