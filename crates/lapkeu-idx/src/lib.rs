#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/lapkeu/lapkeu/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! IDX financial statement workbook downloader.
//!
//! The exchange publishes one workbook per (company, year, quarter) under
//! a static-data URL scheme. Downloads are per-company tolerant: one
//! failing company never aborts the batch.
//!
//! # Example
//!
//! ```no_run
//! use lapkeu_idx::{IdxDownloader, Quarter};
//! use lapkeu_core::CancelToken;
//! use std::path::Path;
//!
//! # async fn example() -> lapkeu_core::Result<()> {
//! let downloader = IdxDownloader::new();
//! let codes = vec!["BBCA".parse()?, "TLKM".parse()?];
//! let summary = downloader
//!     .download_all(&codes, 2023, Quarter::Q3, Path::new("downloads"), &CancelToken::new())
//!     .await?;
//! println!("saved {} workbooks", summary.saved.len());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use lapkeu_core::{CancelToken, EntityCode, LapkeuError, Result};

/// IDX static-data base URL for soft-copy financial statements.
const IDX_BASE: &str = "https://www.idx.co.id/Portals/0/StaticData/ListedCompanies/Corporate_Actions/New_Info_JSX/Jenis_Informasi/01_Laporan_Keuangan/02_Soft_Copy_Laporan_Keuangan";

/// Portal root fetched once per batch so the session carries the cookies
/// the static-data endpoint expects.
const PORTAL_URL: &str = "https://www.idx.co.id/";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Browser-like user agent; the endpoint rejects bare clients.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Reporting quarter of an IDX filing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quarter {
    /// First quarter filing.
    Q1,
    /// Second quarter filing.
    Q2,
    /// Third quarter filing.
    Q3,
    /// Audited full-year filing.
    Q4,
}

impl Quarter {
    /// All quarters in filing order.
    pub const ALL: [Self; 4] = [Self::Q1, Self::Q2, Self::Q3, Self::Q4];

    /// URL path segment used by the IDX endpoint.
    #[must_use]
    pub const fn path_segment(&self) -> &'static str {
        match self {
            Self::Q1 => "TW1",
            Self::Q2 => "TW2",
            Self::Q3 => "TW3",
            Self::Q4 => "Audit",
        }
    }

    /// Roman-numeral marker embedded in workbook file names.
    #[must_use]
    pub const fn roman(&self) -> &'static str {
        match self {
            Self::Q1 => "I",
            Self::Q2 => "II",
            Self::Q3 => "III",
            Self::Q4 => "Tahunan",
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
        };
        f.write_str(label)
    }
}

impl FromStr for Quarter {
    type Err = LapkeuError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "Q1" => Ok(Self::Q1),
            "Q2" => Ok(Self::Q2),
            "Q3" => Ok(Self::Q3),
            "Q4" => Ok(Self::Q4),
            other => Err(LapkeuError::Parse(format!("unknown quarter: {other:?}"))),
        }
    }
}

/// Workbook file name for one (entity, year, quarter) filing.
#[must_use]
pub fn statement_file_name(entity: &EntityCode, year: u16, quarter: Quarter) -> String {
    format!(
        "FinancialStatement-{year}-{}-{entity}.xlsx",
        quarter.roman()
    )
}

/// Outcome of a batch download.
#[derive(Clone, Debug, Default)]
pub struct DownloadSummary {
    /// Paths of workbooks written, in request order.
    pub saved: Vec<PathBuf>,
    /// Entities whose download failed, with the failure reason.
    pub failed: Vec<(EntityCode, String)>,
}

impl DownloadSummary {
    /// True when every requested workbook was saved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Downloader for IDX quarterly financial statement workbooks.
#[derive(Debug)]
pub struct IdxDownloader {
    client: reqwest::Client,
    base_url: String,
    portal_url: String,
}

impl IdxDownloader {
    /// Create a new downloader with default settings.
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: IDX_BASE.to_string(),
            portal_url: PORTAL_URL.to_string(),
        }
    }

    /// Override the static-data base URL (used to point tests at a local
    /// server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the portal root used for the session warm-up request.
    #[must_use]
    pub fn with_portal_url(mut self, portal_url: impl Into<String>) -> Self {
        self.portal_url = portal_url.into();
        self
    }

    /// Download URL for one (entity, year, quarter) filing.
    #[must_use]
    pub fn build_download_url(&self, entity: &EntityCode, year: u16, quarter: Quarter) -> String {
        format!(
            "{}/Laporan%20Keuangan%20Tahun%20{year}/{}/{entity}/{}",
            self.base_url,
            quarter.path_segment(),
            statement_file_name(entity, year, quarter)
        )
    }

    /// Establish a session against the portal root.
    pub async fn warm_up(&self) -> Result<()> {
        self.client
            .get(&self.portal_url)
            .send()
            .await
            .map_err(|e| LapkeuError::Network(e.to_string()))?;
        Ok(())
    }

    /// Download one workbook into `dest_dir`, returning the written path.
    pub async fn download(
        &self,
        entity: &EntityCode,
        year: u16,
        quarter: Quarter,
        dest_dir: &Path,
    ) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dest_dir).await?;

        let url = self.build_download_url(entity, year, quarter);
        debug!("Downloading workbook: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LapkeuError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LapkeuError::Network(format!(
                "HTTP {} for {}",
                response.status(),
                entity
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LapkeuError::Network(e.to_string()))?;

        let path = dest_dir.join(statement_file_name(entity, year, quarter));
        tokio::fs::write(&path, &bytes).await?;
        Ok(path)
    }

    /// Download the filings of many entities into a per-(year, quarter)
    /// subdirectory of `dest_dir`.
    ///
    /// One failing entity never aborts the batch; failures are collected
    /// in the summary. Cancellation is honored between entities.
    pub async fn download_all(
        &self,
        entities: &[EntityCode],
        year: u16,
        quarter: Quarter,
        dest_dir: &Path,
        cancel: &CancelToken,
    ) -> Result<DownloadSummary> {
        let target = dest_dir.join(format!("XBRL_{year}_{quarter}"));

        if let Err(e) = self.warm_up().await {
            warn!(error = %e, "Portal warm-up failed, continuing without session");
        }

        let mut summary = DownloadSummary::default();
        for entity in entities {
            cancel.checkpoint()?;
            match self.download(entity, year, quarter, &target).await {
                Ok(path) => summary.saved.push(path),
                Err(e) => {
                    warn!(entity = %entity, error = %e, "Workbook download failed");
                    summary.failed.push((entity.clone(), e.to_string()));
                }
            }
        }
        Ok(summary)
    }
}

impl Default for IdxDownloader {
    fn default() -> Self {
        Self::new()
    }
}
