#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/lapkeu/lapkeu/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! IDX XBRL workbook ingestion.
//!
//! The three entry points mirror the pipeline's first stages:
//!
//! - [`scan_directory`] - classify every workbook sheet by statement kind
//! - [`reshape_statement`] - one classified sheet into a tidy two-row fragment
//! - [`entity_info`] - de-duplicated entity metadata across all workbooks
//!
//! All fixed template offsets are named constants with explicit shape
//! checks, so drift in the upstream IDX template fails loudly instead of
//! silently corrupting data.

/// Sheet classification by statement marker phrases.
pub mod classify;
mod grid;
/// Entity metadata extraction from the fixed `1000000` sheet.
pub mod info;
/// Statement sheet reshaping into tidy fragments.
pub mod reshape;

pub use classify::{DirectoryScan, HEADER_SCAN_ROWS, scan_directory};
pub use info::{INFO_ARTIFACT_ROW, INFO_LEAD_COLUMNS, INFO_SHEET, entity_info};
pub use reshape::{DATE_HEADER, DATE_HEADER_COL, ENGLISH_LABEL_ROW, reshape_statement};

#[cfg(test)]
pub(crate) mod testutil;
