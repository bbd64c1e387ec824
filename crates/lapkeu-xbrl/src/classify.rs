//! Sheet classification by statement marker phrases.
//!
//! IDX workbooks carry no stable sheet names; the sheet for each statement
//! kind is found by scanning a small header region of every sheet for the
//! English statement title.

use std::fs;
use std::path::Path;

use calamine::{Reader, open_workbook_auto};
use tracing::{debug, warn};

use lapkeu_core::{
    Classification, EntityCode, LapkeuError, Result, StatementKind, types::WORKBOOK_EXTENSION,
};

use crate::grid::cell_text;

/// Number of leading rows of each sheet scanned for marker phrases.
pub const HEADER_SCAN_ROWS: usize = 10;

/// Outcome of scanning a source directory.
#[derive(Clone, Debug)]
pub struct DirectoryScan {
    /// One record per successfully opened workbook, in file-name order.
    pub classifications: Vec<Classification>,
    /// Workbooks skipped because they could not be opened or their file
    /// name does not carry a valid entity code.
    pub skipped: usize,
}

/// Scan a directory of IDX workbooks and classify every sheet.
///
/// Files are visited in sorted name order so downstream row order is
/// stable across runs. A workbook that cannot be opened is skipped with a
/// diagnostic and excluded from the result entirely; an unreadable
/// directory escalates.
pub fn scan_directory(dir: &Path) -> Result<DirectoryScan> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| {
            Path::new(name)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(WORKBOOK_EXTENSION))
        })
        .collect();
    names.sort();

    let mut classifications = Vec::with_capacity(names.len());
    let mut skipped = 0;
    for name in &names {
        match classify_workbook(dir, name) {
            Ok(classification) => classifications.push(classification),
            Err(e) => {
                warn!(file = %name, error = %e, "Skipping workbook");
                skipped += 1;
            }
        }
    }

    Ok(DirectoryScan {
        classifications,
        skipped,
    })
}

/// Classify the sheets of a single workbook.
fn classify_workbook(dir: &Path, file_name: &str) -> Result<Classification> {
    let entity = EntityCode::from_file_name(file_name)?;

    let path = dir.join(file_name);
    let mut workbook = open_workbook_auto(&path).map_err(|e| LapkeuError::WorkbookOpen {
        file: file_name.to_string(),
        reason: e.to_string(),
    })?;

    let mut pk_sheet = None;
    let mut lr_sheet = None;
    let mut ak_sheet = None;

    let sheet_names = workbook.sheet_names().to_vec();
    for sheet in sheet_names {
        let Ok(range) = workbook.worksheet_range(&sheet) else {
            continue;
        };
        let text = range
            .rows()
            .take(HEADER_SCAN_ROWS)
            .flat_map(|row| row.iter().map(cell_text))
            .collect::<Vec<_>>()
            .join(" ");

        // Each kind is tested independently, in PK, LR, AK order, with no
        // short-circuit: the last matching sheet wins per kind, and one
        // sheet may be recorded for several kinds.
        if text.contains(StatementKind::FinancialPosition.marker()) {
            pk_sheet = Some(sheet.clone());
        }
        if text.contains(StatementKind::ProfitLoss.marker()) {
            lr_sheet = Some(sheet.clone());
        }
        if text.contains(StatementKind::CashFlows.marker()) {
            ak_sheet = Some(sheet.clone());
        }
    }

    debug!(
        file = %file_name,
        entity = %entity,
        pk = ?pk_sheet,
        lr = ?lr_sheet,
        ak = ?ak_sheet,
        "Classified workbook"
    );

    Ok(Classification {
        file_name: file_name.to_string(),
        entity,
        pk_sheet,
        lr_sheet,
        ak_sheet,
    })
}
