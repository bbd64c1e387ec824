#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/lapkeu/lapkeu/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for consolidating IDX financial statement
//! workbooks:
//!
//! - [`LapkeuError`](error::LapkeuError) - Error type for all pipeline operations
//! - [`EntityCode`](types::EntityCode) - 4-character IDX listing code
//! - [`StatementKind`](types::StatementKind) - The three consolidated statement kinds
//! - [`QuoteProvider`](provider::QuoteProvider) - Narrow interface for price lookups
//! - [`CancelToken`](progress::CancelToken) - Caller-initiated pipeline abort

/// Error types for pipeline operations.
pub mod error;
/// Progress reporting and cancellation primitives.
pub mod progress;
/// Quote provider trait for per-entity price lookups.
pub mod provider;
/// Core data types (EntityCode, StatementKind, Classification, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{LapkeuError, Result};
pub use progress::{CancelToken, Stage, StageReport};
pub use provider::QuoteProvider;
pub use types::{
    Classification, EntityCode, Period, Quote, StatementKind, CLOSE_COLUMN, DATE_COLUMN,
    ENTITY_COLUMN, PERIOD_COLUMN, WORKBOOK_EXTENSION,
};
