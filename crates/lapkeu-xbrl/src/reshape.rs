//! Statement sheet reshaping into tidy fragments.
//!
//! IDX statement sheets store periods as columns and line items as rows;
//! the tidy form needs the opposite. Reshaping transposes the sheet, drops
//! the template's artifact row and column at their fixed positions,
//! normalizes the variably-labeled date header, and tags the two resulting
//! rows with explicit period labels.

use std::path::Path;

use calamine::{Reader, open_workbook_auto};
use polars::prelude::*;
use tracing::debug;

use lapkeu_core::{ENTITY_COLUMN, EntityCode, LapkeuError, PERIOD_COLUMN, Period, Result};

use crate::grid;

/// Transposed row holding the source sheet's trailing English label
/// column; a fixed artifact of the IDX template, dropped from every
/// statement sheet.
pub const ENGLISH_LABEL_ROW: usize = 3;

/// Position of the variably-labeled date header within the promoted
/// header row.
pub const DATE_HEADER_COL: usize = 2;

/// Literal written over the date header cell before promotion, so every
/// fragment carries the same lower-cased `tanggal` column.
pub const DATE_HEADER: &str = "Tanggal";

/// Reshape one classified statement sheet into a tidy two-row fragment.
///
/// The fragment has one column per line item (lower-cased), a normalized
/// `tanggal` date column, a constant entity-code column, and an explicit
/// period tag per row (current first, prior second). Any deviation from
/// the template shape is a [`LapkeuError::Shape`] the caller can skip
/// per-company.
pub fn reshape_statement(
    source_dir: &Path,
    file_name: &str,
    sheet_name: &str,
    entity: &EntityCode,
) -> Result<DataFrame> {
    let path = source_dir.join(file_name);
    let mut workbook = open_workbook_auto(&path).map_err(|e| LapkeuError::WorkbookOpen {
        file: file_name.to_string(),
        reason: e.to_string(),
    })?;
    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|_| LapkeuError::SheetNotFound {
            file: file_name.to_string(),
            sheet: sheet_name.to_string(),
        })?;

    let grid = grid::drop_empty_rows(grid::read_grid(&range));
    let context = format!("{file_name}/{sheet_name}");
    let fragment = reshape_grid(&grid, &context, entity)?;

    debug!(
        file = %file_name,
        sheet = %sheet_name,
        entity = %entity,
        columns = fragment.width(),
        "Reshaped statement sheet"
    );

    Ok(fragment)
}

/// Reshape a cleaned cell grid; shape preconditions are checked before
/// every positional operation.
fn reshape_grid(grid: &[Vec<String>], context: &str, entity: &EntityCode) -> Result<DataFrame> {
    let shape_err = |reason: String| LapkeuError::Shape {
        context: context.to_string(),
        reason,
    };

    let transposed = grid::transpose(grid);
    if transposed.len() <= ENGLISH_LABEL_ROW {
        return Err(shape_err(format!(
            "expected more than {ENGLISH_LABEL_ROW} source columns, found {}",
            transposed.len()
        )));
    }

    // Drop the first transposed column (the source title row), then the
    // English label row at its fixed position.
    let mut rows: Vec<Vec<String>> = transposed
        .into_iter()
        .map(|row| row.into_iter().skip(1).collect())
        .collect();
    rows.remove(ENGLISH_LABEL_ROW);

    if rows[0].len() <= DATE_HEADER_COL {
        return Err(shape_err(format!(
            "expected at least {} source rows, found {}",
            DATE_HEADER_COL + 2,
            rows[0].len() + 1
        )));
    }
    rows[0][DATE_HEADER_COL] = DATE_HEADER.to_string();

    let headers = grid::unique_headers(rows[0].iter().map(|h| h.to_lowercase()).collect());
    let data = &rows[1..];
    if data.len() != Period::ALL.len() {
        return Err(shape_err(format!(
            "expected exactly {} period columns, found {}",
            Period::ALL.len(),
            data.len()
        )));
    }

    let mut columns: Vec<Column> = Vec::with_capacity(headers.len() + 2);
    for (ci, header) in headers.iter().enumerate() {
        let cells: Vec<&str> = data.iter().map(|row| row[ci].as_str()).collect();
        if cells.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        columns.push(build_column(header, &cells));
    }
    columns.push(Column::new(
        ENTITY_COLUMN.into(),
        vec![entity.as_str(); data.len()],
    ));
    columns.push(Column::new(
        PERIOD_COLUMN.into(),
        Period::ALL.iter().map(Period::label).collect::<Vec<_>>(),
    ));

    Ok(DataFrame::new(columns)?)
}

/// Build a typed column: numeric when every non-empty cell parses as a
/// number, text otherwise. Empty cells become nulls either way.
fn build_column(name: &str, cells: &[&str]) -> Column {
    let numeric: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(|cell| {
            if cell.is_empty() {
                Some(None)
            } else {
                cell.parse::<f64>().ok().map(Some)
            }
        })
        .collect();

    match numeric {
        Some(values) => Column::new(name.into(), values),
        None => Column::new(
            name.into(),
            cells
                .iter()
                .map(|cell| {
                    if cell.is_empty() {
                        None
                    } else {
                        Some((*cell).to_string())
                    }
                })
                .collect::<Vec<Option<String>>>(),
        ),
    }
}
