//! Error module
//!
//! Defines custom error types using `thiserror` for the epoch expander.
//! This module provides a unified error type that wraps all possible error sources
//! and implements the `From` trait for automatic conversion from underlying error types.
//!
//! Only file-level failures surface through [`ExpanderError`]. Field-level problems
//! inside a conversion (an unparseable timestamp, malformed embedded JSON) are
//! absorbed by the pipeline and reported through the event sink instead.

use thiserror::Error;

/// The main error type for the epoch expander.
///
/// # Error Categories
///
/// - **Input errors**: empty input, values that are not timestamps
/// - **Structure errors**: embedded JSON nested beyond the configured depth
/// - **File I/O errors**: reading the input or writing the output failed
/// - **Configuration errors**: invalid CLI argument combinations
///
/// # Example
///
/// ```rust,ignore
/// use epoch_expander::error::ExpanderError;
///
/// fn example() -> Result<(), ExpanderError> {
///     // Errors from underlying types are automatically converted
///     let text = std::fs::read_to_string("nonexistent.csv")?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum ExpanderError {
    /// The input contained no non-blank lines.
    ///
    /// This is the only failure that aborts a whole CSV conversion.
    #[error("Empty input: no non-blank lines found")]
    EmptyInput,

    /// A standalone timestamp value could not be interpreted.
    ///
    /// Raised by the inspector when the value is not a number or does not
    /// map to a representable date.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Invalid command-line argument error.
    ///
    /// This error occurs when CLI arguments are invalid or have incompatible
    /// combinations (e.g., `--value` outside inspect mode).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A JSON document nests deeper than the rewriter allows.
    #[error("JSON nesting exceeds maximum depth of {max_depth}")]
    DepthExceeded {
        /// The configured maximum depth.
        max_depth: usize,
    },

    /// General I/O error.
    ///
    /// This error occurs for file system operations like opening, reading,
    /// or writing files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    ///
    /// Only surfaced by the standalone JSON document mode. Inside a CSV
    /// conversion invalid JSON is left unchanged instead.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reader error from structure analysis.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
