#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/lapkeu/lapkeu/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Consolidation of reshaped statement fragments.
//!
//! - [`merge_fragments`] - one table per statement kind, entity column
//!   leading, missing values filled with zero
//! - [`split_periods`] - current and prior period tables, partitioned by
//!   the explicit period tag
//! - [`staging`] - optional parquet spill area between reshape and merge
//! - [`write_workbook`] - the consolidated multi-sheet xlsx output

/// Fragment merging per statement kind.
pub mod merge;
/// Period splitting by explicit tag.
pub mod split;
/// Parquet staging spill for large batches.
pub mod staging;
/// Consolidated output workbook writer.
pub mod workbook;

pub use merge::merge_fragments;
pub use split::split_periods;
pub use workbook::{GEN_INFO_SHEET, STOCK_INFO_SHEET, write_workbook};
