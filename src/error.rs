//! Error types for the harf library.
//!
//! All fallible operations return [`HarfError`] through the crate-wide
//! [`Result`] alias. Finding no match is never an error; the only failure a
//! matching call can report is a pattern that the regex engine refuses to
//! compile.
//!
//! # Examples
//!
//! ```
//! use harf::error::{HarfError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(HarfError::query("Query must contain at least 2 characters"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for harf operations.
#[derive(Error, Debug)]
pub enum HarfError {
    /// The tolerant pattern built from a query could not be compiled.
    ///
    /// Callers should treat this as a per-query failure and show the text
    /// without highlighting.
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Search input was rejected before any matching took place.
    #[error("Query error: {0}")]
    Query(String),

    /// Lookup entries were malformed.
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// I/O errors (reading input files or stdin)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),

    /// Generic anyhow error
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with HarfError.
pub type Result<T> = std::result::Result<T, HarfError>;

impl HarfError {
    /// Create a new pattern error.
    pub fn pattern<S: Into<String>>(msg: S) -> Self {
        HarfError::Pattern(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        HarfError::Query(msg.into())
    }

    /// Create a new lookup error.
    pub fn lookup<S: Into<String>>(msg: S) -> Self {
        HarfError::Lookup(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        HarfError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        HarfError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Whether the caller can recover by showing the text unhighlighted.
    pub fn is_pattern_error(&self) -> bool {
        matches!(self, HarfError::Pattern(_))
    }
}
