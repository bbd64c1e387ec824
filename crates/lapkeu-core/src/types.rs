//! Core data types for financial statement consolidation.
//!
//! This module defines the fundamental data structures:
//!
//! - [`EntityCode`] - 4-character IDX listing code
//! - [`StatementKind`] - The three consolidated financial statement kinds
//! - [`Period`] - Reporting period tag (current or prior)
//! - [`Classification`] - Per-workbook sheet classification record
//! - [`Quote`] - Latest-price lookup result for one entity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{LapkeuError, Result};

/// Name of the entity identifier column carried through every table.
pub const ENTITY_COLUMN: &str = "kode entitas";

/// Name of the normalized reporting date column written by the reshaper.
pub const DATE_COLUMN: &str = "tanggal";

/// Name of the period tag column written by the reshaper and consumed by
/// the period splitter.
pub const PERIOD_COLUMN: &str = "periode";

/// Name of the closing price column in the stock quote table.
pub const CLOSE_COLUMN: &str = "penutupan";

/// Spreadsheet extension recognized by the directory scanner.
pub const WORKBOOK_EXTENSION: &str = "xlsx";

/// A 4-character IDX listing code (e.g. `BBCA`, `TLKM`).
///
/// Codes are validated on creation: exactly 4 ASCII alphanumeric
/// characters, stored uppercased.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityCode(String);

impl EntityCode {
    /// Creates a new entity code, validating and uppercasing it.
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s: String = s.into();
        if s.len() == 4 && s.chars().all(|c| c.is_ascii_alphanumeric()) {
            Ok(Self(s.to_uppercase()))
        } else {
            Err(LapkeuError::InvalidEntityCode(s))
        }
    }

    /// Extracts the entity code from an IDX workbook file name.
    ///
    /// IDX financial statement downloads are named
    /// `FinancialStatement-{year}-{quarter}-{CODE}.xlsx`; the code is the
    /// 4 characters immediately preceding the extension. Names that do not
    /// carry a valid code in that position are rejected rather than
    /// silently mis-sliced.
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let stem = file_name
            .strip_suffix(".xlsx")
            .or_else(|| file_name.strip_suffix(".XLSX"))
            .ok_or_else(|| LapkeuError::InvalidFileName(file_name.to_string()))?;
        if stem.len() < 4 {
            return Err(LapkeuError::InvalidFileName(file_name.to_string()));
        }
        let code: String = stem.chars().skip(stem.chars().count() - 4).collect();
        Self::new(code).map_err(|_| LapkeuError::InvalidFileName(file_name.to_string()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityCode {
    type Err = LapkeuError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// The three financial statement kinds consolidated by the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    /// Statement of financial position (laporan posisi keuangan, "PK").
    FinancialPosition,
    /// Statement of profit or loss and other comprehensive income
    /// (laporan laba rugi, "LR").
    ProfitLoss,
    /// Statement of cash flows (laporan arus kas, "AK").
    CashFlows,
}

impl StatementKind {
    /// All statement kinds in classification order.
    ///
    /// The order matters: marker checks run in this sequence without
    /// short-circuiting, so a sheet containing several markers is recorded
    /// for every kind it matches.
    pub const ALL: [Self; 3] = [Self::FinancialPosition, Self::ProfitLoss, Self::CashFlows];

    /// The header phrase that identifies a sheet of this kind.
    #[must_use]
    pub const fn marker(&self) -> &'static str {
        match self {
            Self::FinancialPosition => "Statement of financial position",
            Self::ProfitLoss => "Statement of profit or loss and other comprehensive income",
            Self::CashFlows => "Statement of cash flows",
        }
    }

    /// Short lowercase code used in file and sheet names.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::FinancialPosition => "pk",
            Self::ProfitLoss => "lr",
            Self::CashFlows => "ak",
        }
    }

    /// Output sheet name for the current-period table of this kind.
    #[must_use]
    pub const fn current_sheet(&self) -> &'static str {
        match self {
            Self::FinancialPosition => "pk_now",
            Self::ProfitLoss => "lr_now",
            Self::CashFlows => "ak_now",
        }
    }

    /// Output sheet name for the prior-period table of this kind.
    #[must_use]
    pub const fn prior_sheet(&self) -> &'static str {
        match self {
            Self::FinancialPosition => "pk_prev",
            Self::ProfitLoss => "lr_prev",
            Self::CashFlows => "ak_prev",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Reporting period tag attached to every reshaped row.
///
/// Each source sheet yields exactly one current-period and one
/// prior-period row; tagging them explicitly at reshape time lets the
/// splitter partition by label instead of relying on row parity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    /// The reporting period the workbook was filed for.
    Current,
    /// The comparative prior period carried in the same sheet.
    Prior,
}

impl Period {
    /// Both periods in source-sheet order (current first).
    pub const ALL: [Self; 2] = [Self::Current, Self::Prior];

    /// The tag value stored in the [`PERIOD_COLUMN`] column.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Prior => "prior",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-workbook sheet classification record.
///
/// One record per successfully opened workbook. A statement kind with no
/// matching sheet is `None` and must be skippable downstream without
/// failing the run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Workbook file name within the source directory.
    pub file_name: String,
    /// Entity code extracted from the file name.
    pub entity: EntityCode,
    /// Sheet matched to the statement of financial position, if any.
    pub pk_sheet: Option<String>,
    /// Sheet matched to the profit or loss statement, if any.
    pub lr_sheet: Option<String>,
    /// Sheet matched to the statement of cash flows, if any.
    pub ak_sheet: Option<String>,
}

impl Classification {
    /// Returns the matched sheet name for a statement kind, if any.
    #[must_use]
    pub fn sheet_for(&self, kind: StatementKind) -> Option<&str> {
        match kind {
            StatementKind::FinancialPosition => self.pk_sheet.as_deref(),
            StatementKind::ProfitLoss => self.lr_sheet.as_deref(),
            StatementKind::CashFlows => self.ak_sheet.as_deref(),
        }
    }
}

/// Latest-price lookup result for one entity.
///
/// A failed lookup is recorded with `close: None`; the quote table always
/// has one row per requested entity, in request order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// The entity the quote was requested for.
    pub entity: EntityCode,
    /// Latest closing price in rupiah, or `None` when the lookup failed.
    pub close: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_code_uppercases() {
        let code = EntityCode::new("bbca").unwrap();
        assert_eq!(code.as_str(), "BBCA");
        assert_eq!(code.to_string(), "BBCA");
    }

    #[test]
    fn entity_code_rejects_bad_length() {
        assert!(EntityCode::new("BBC").is_err());
        assert!(EntityCode::new("BBCAX").is_err());
        assert!(EntityCode::new("").is_err());
    }

    #[test]
    fn entity_code_rejects_non_alphanumeric() {
        assert!(EntityCode::new("BB-A").is_err());
        assert!(EntityCode::new("BB A").is_err());
    }

    #[test]
    fn entity_code_from_conforming_file_name() {
        let code = EntityCode::from_file_name("FinancialStatement-2023-I-BBCA.xlsx").unwrap();
        assert_eq!(code.as_str(), "BBCA");
    }

    #[test]
    fn entity_code_from_file_name_rejects_other_extensions() {
        assert!(EntityCode::from_file_name("FinancialStatement-2023-I-BBCA.xls").is_err());
        assert!(EntityCode::from_file_name("FinancialStatement-2023-I-BBCA").is_err());
    }

    #[test]
    fn entity_code_from_file_name_rejects_short_or_invalid_stems() {
        assert!(EntityCode::from_file_name("AB.xlsx").is_err());
        assert!(EntityCode::from_file_name("report-20-3.xlsx").is_err());
    }

    #[test]
    fn statement_kind_order_is_pk_lr_ak() {
        assert_eq!(
            StatementKind::ALL,
            [
                StatementKind::FinancialPosition,
                StatementKind::ProfitLoss,
                StatementKind::CashFlows
            ]
        );
    }

    #[test]
    fn statement_kind_sheet_names() {
        assert_eq!(StatementKind::FinancialPosition.current_sheet(), "pk_now");
        assert_eq!(StatementKind::ProfitLoss.prior_sheet(), "lr_prev");
        assert_eq!(StatementKind::CashFlows.code(), "ak");
    }

    #[test]
    fn classification_sheet_lookup() {
        let c = Classification {
            file_name: "FinancialStatement-2023-I-BBCA.xlsx".to_string(),
            entity: EntityCode::new("BBCA").unwrap(),
            pk_sheet: Some("1210000".to_string()),
            lr_sheet: None,
            ak_sheet: Some("1510000".to_string()),
        };
        assert_eq!(
            c.sheet_for(StatementKind::FinancialPosition),
            Some("1210000")
        );
        assert_eq!(c.sheet_for(StatementKind::ProfitLoss), None);
        assert_eq!(c.sheet_for(StatementKind::CashFlows), Some("1510000"));
    }
}
