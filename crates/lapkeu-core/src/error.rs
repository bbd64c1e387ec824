//! Error types for pipeline operations.
//!
//! This module defines [`LapkeuError`] which covers all error cases that can
//! occur while scanning, reshaping, merging, or cross-referencing financial
//! statement workbooks.

use thiserror::Error;

/// Errors that can occur during pipeline operations.
#[derive(Error, Debug)]
pub enum LapkeuError {
    /// A workbook could not be opened or read.
    #[error("Failed to open workbook {file}: {reason}")]
    WorkbookOpen {
        /// File name of the workbook.
        file: String,
        /// Underlying reader error.
        reason: String,
    },

    /// A named sheet was not present in a workbook.
    #[error("Sheet {sheet:?} not found in {file}")]
    SheetNotFound {
        /// File name of the workbook.
        file: String,
        /// The sheet that was requested.
        sheet: String,
    },

    /// A sheet did not match the expected structural template.
    #[error("Unexpected sheet shape in {context}: {reason}")]
    Shape {
        /// File and sheet the error refers to.
        context: String,
        /// What the template check found.
        reason: String,
    },

    /// A workbook file name does not follow the IDX naming convention.
    #[error("Workbook file name does not follow the IDX naming convention: {0}")]
    InvalidFileName(String),

    /// An entity code is not 4 ASCII alphanumeric characters.
    #[error("Invalid entity code: {0}")]
    InvalidEntityCode(String),

    /// Network-related errors (connection failures, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Error parsing data from an external response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The source directory contained no readable workbooks.
    #[error("No workbooks found in {0}")]
    NoWorkbooks(String),

    /// A merge was requested but no fragments exist for the statement kind.
    ///
    /// Distinct from an empty but valid merged table: here there is nothing
    /// to concatenate at all.
    #[error("Nothing to merge: no usable {0} fragments were produced")]
    NoFragments(String),

    /// The pipeline was cancelled by the caller.
    #[error("Pipeline cancelled")]
    Cancelled,

    /// Error from a DataFrame operation.
    #[error("Frame error: {0}")]
    Frame(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl From<polars::error::PolarsError> for LapkeuError {
    fn from(e: polars::error::PolarsError) -> Self {
        Self::Frame(e.to_string())
    }
}

/// Result type alias using [`LapkeuError`].
pub type Result<T> = std::result::Result<T, LapkeuError>;
