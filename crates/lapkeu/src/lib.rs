#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/lapkeu/lapkeu/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Unified interface for consolidating IDX financial statement workbooks.
//!
//! The central type is [`Pipeline`], which sequences the ingestion,
//! consolidation, and cross-referencing stages over a source directory and
//! writes the consolidated output workbook.
//!
//! # Example
//!
//! ```rust,ignore
//! use lapkeu::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> lapkeu::Result<()> {
//!     let summary = Pipeline::new("downloads/XBRL_2023_Q3", "Data_Laporan_2023_Q3.xlsx")
//!         .run()
//!         .await?;
//!     println!("wrote {}", summary.output_path.display());
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use lapkeu_core::*;

// Ingestion
pub use lapkeu_xbrl::{DirectoryScan, entity_info, reshape_statement, scan_directory};

// Consolidation and export
pub use lapkeu_report::{
    GEN_INFO_SHEET, STOCK_INFO_SHEET, merge_fragments, split_periods, staging, write_workbook,
};

// Providers
pub use lapkeu_idx::{DownloadSummary, IdxDownloader, Quarter, statement_file_name};
pub use lapkeu_quote::GoogleFinanceProvider;

mod pipeline;
mod summary;

pub use pipeline::{Pipeline, ProgressFn, output_file_name, output_path};
pub use summary::{KindSummary, RunSummary};
