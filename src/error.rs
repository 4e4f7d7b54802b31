//! Error types for actstat
//!
//! This module defines the error types used throughout the actstat library.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! Loading is all-or-nothing: a single schema violation fails the whole
//! load, and no partial report is ever produced.
//!
//! # Example
//!
//! ```
//! use actstat::error::{ActstatError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to ActstatError
//!     let _file = std::fs::read_to_string("nonexistent.txt")?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for actstat operations
#[derive(Error, Debug)]
pub enum ActstatError {
    /// Selected report path does not resolve to a readable file
    #[error("Usage report not found: {0}")]
    SourceNotFound(PathBuf),

    /// No directory to search for usage reports
    #[error("No usage report directory found, pass a report path with --file")]
    NoReportDirectory,

    /// Required column missing, or an unparsable value in a required field
    #[error("Schema error in {file}: {message}")]
    Schema {
        /// The report file that violated the schema
        file: PathBuf,
        /// What was wrong, with a 1-based CSV line number where applicable
        message: String,
    },

    /// Resolved billing window is invalid
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid date argument
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Low-level CSV read error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ActstatError {
    /// Build a schema error for a report file
    pub fn schema(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Schema {
            file: file.into(),
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results in actstat
///
/// # Example
///
/// ```
/// use actstat::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, ActstatError>;
