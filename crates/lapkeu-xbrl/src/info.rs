//! Entity metadata extraction from the fixed `1000000` sheet.
//!
//! Every IDX workbook carries a general-information sheet under the same
//! numeric code. One entity filing across several quarters produces
//! byte-identical metadata rows, so exact de-duplication yields one row
//! per entity.

use std::collections::HashSet;
use std::path::Path;

use calamine::{Reader, open_workbook_auto};
use polars::prelude::*;
use tracing::{debug, warn};

use lapkeu_core::{Classification, LapkeuError, Result};

use crate::grid;

/// Fixed sheet name of the general-information metadata sheet.
pub const INFO_SHEET: &str = "1000000";

/// Transposed metadata row dropped as a template artifact (the English
/// label column of the source sheet).
pub const INFO_ARTIFACT_ROW: usize = 2;

/// Leading metadata columns dropped from the final table (internal
/// identifiers with no analytical value).
pub const INFO_LEAD_COLUMNS: usize = 2;

/// Extract the de-duplicated entity info table across all classified
/// workbooks.
///
/// Workbooks whose metadata sheet is missing or malformed are skipped with
/// a diagnostic; producing no metadata at all is an error.
pub fn entity_info(source_dir: &Path, classifications: &[Classification]) -> Result<DataFrame> {
    let mut collected: Vec<Vec<String>> = Vec::new();
    for classification in classifications {
        match info_rows(source_dir, &classification.file_name) {
            Ok(rows) => collected.extend(rows),
            Err(e) => {
                warn!(
                    file = %classification.file_name,
                    entity = %classification.entity,
                    error = %e,
                    "Skipping entity metadata"
                );
            }
        }
    }

    if collected.is_empty() {
        return Err(LapkeuError::Other(
            "no readable entity metadata sheets in source directory".to_string(),
        ));
    }

    // Align widths before de-duplication so padding cannot split
    // otherwise identical rows.
    let width = collected.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut collected {
        row.resize(width, String::new());
    }

    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for row in collected {
        if seen.insert(row.clone()) {
            rows.push(row);
        }
    }

    if width <= INFO_LEAD_COLUMNS || rows.len() < 2 {
        return Err(LapkeuError::Shape {
            context: INFO_SHEET.to_string(),
            reason: format!(
                "expected a header row, data rows, and more than {INFO_LEAD_COLUMNS} fields; \
                 found {} rows of {width} fields",
                rows.len()
            ),
        });
    }

    let headers = grid::unique_headers(rows[0].iter().map(|h| h.to_lowercase()).collect());
    let data = &rows[1..];

    let mut columns: Vec<Column> = Vec::with_capacity(width - INFO_LEAD_COLUMNS);
    for (ci, header) in headers.iter().enumerate().skip(INFO_LEAD_COLUMNS) {
        let values: Vec<Option<String>> = data
            .iter()
            .map(|row| {
                if row[ci].is_empty() {
                    None
                } else {
                    Some(row[ci].clone())
                }
            })
            .collect();
        columns.push(Column::new(header.as_str().into(), values));
    }

    let df = DataFrame::new(columns)?;
    debug!(entities = df.height(), fields = df.width(), "Extracted entity info");
    Ok(df)
}

/// Transposed, artifact-free metadata rows of one workbook, header row
/// included.
fn info_rows(source_dir: &Path, file_name: &str) -> Result<Vec<Vec<String>>> {
    let path = source_dir.join(file_name);
    let mut workbook = open_workbook_auto(&path).map_err(|e| LapkeuError::WorkbookOpen {
        file: file_name.to_string(),
        reason: e.to_string(),
    })?;
    let range = workbook
        .worksheet_range(INFO_SHEET)
        .map_err(|_| LapkeuError::SheetNotFound {
            file: file_name.to_string(),
            sheet: INFO_SHEET.to_string(),
        })?;

    let mut rows = grid::drop_empty_rows(grid::transpose(&grid::read_grid(&range)));
    if rows.len() <= INFO_ARTIFACT_ROW {
        return Err(LapkeuError::Shape {
            context: format!("{file_name}/{INFO_SHEET}"),
            reason: format!(
                "expected more than {INFO_ARTIFACT_ROW} metadata rows, found {}",
                rows.len()
            ),
        });
    }
    rows.remove(INFO_ARTIFACT_ROW);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::scan_directory;
    use crate::testutil;

    #[test]
    fn extracts_metadata_and_drops_lead_columns() {
        let dir = tempfile::tempdir().unwrap();
        testutil::write_workbook(&dir.path().join("FinancialStatement-2023-I-AAAA.xlsx"), "AAAA");

        let scan = scan_directory(dir.path()).unwrap();
        let info = entity_info(dir.path(), &scan.classifications).unwrap();

        let names: Vec<String> = info
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, ["kode entitas", "nama entitas", "sektor"]);
        assert_eq!(info.height(), 1);

        let nama = info.column("nama entitas").unwrap().str().unwrap();
        assert_eq!(nama.get(0), Some("PT AAAA Tbk"));
    }

    #[test]
    fn identical_metadata_across_quarters_dedupes_to_one_row() {
        let dir = tempfile::tempdir().unwrap();
        // Same entity filing twice: metadata rows are byte-identical.
        testutil::write_workbook(&dir.path().join("FinancialStatement-2023-I-AAAA.xlsx"), "AAAA");
        testutil::write_workbook(&dir.path().join("FinancialStatement-2023-II-AAAA.xlsx"), "AAAA");

        let scan = scan_directory(dir.path()).unwrap();
        let info = entity_info(dir.path(), &scan.classifications).unwrap();
        assert_eq!(info.height(), 1);
    }

    #[test]
    fn distinct_entities_keep_distinct_rows() {
        let dir = tempfile::tempdir().unwrap();
        testutil::write_workbook(&dir.path().join("FinancialStatement-2023-I-AAAA.xlsx"), "AAAA");
        testutil::write_workbook(&dir.path().join("FinancialStatement-2023-I-BBBB.xlsx"), "BBBB");

        let scan = scan_directory(dir.path()).unwrap();
        let info = entity_info(dir.path(), &scan.classifications).unwrap();
        assert_eq!(info.height(), 2);

        let kode = info.column("kode entitas").unwrap().str().unwrap();
        assert_eq!(kode.get(0), Some("AAAA"));
        assert_eq!(kode.get(1), Some("BBBB"));
    }

    #[test]
    fn workbook_without_metadata_sheet_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        testutil::write_workbook(&dir.path().join("FinancialStatement-2023-I-AAAA.xlsx"), "AAAA");

        let mut book = umya_spreadsheet::new_file_empty_worksheet();
        let sheet = book.new_sheet("catatan").unwrap();
        sheet.get_cell_mut((1, 1)).set_value("Notes");
        umya_spreadsheet::writer::xlsx::write(
            &book,
            dir.path().join("FinancialStatement-2023-I-BBBB.xlsx"),
        )
        .unwrap();

        let scan = scan_directory(dir.path()).unwrap();
        let info = entity_info(dir.path(), &scan.classifications).unwrap();
        assert_eq!(info.height(), 1);
    }

    #[test]
    fn no_metadata_at_all_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = entity_info(dir.path(), &[]).unwrap_err();
        assert!(matches!(err, LapkeuError::Other(_)), "got {err:?}");
    }
}
