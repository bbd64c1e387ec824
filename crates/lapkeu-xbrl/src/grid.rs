//! Cell and grid helpers shared by the ingestion modules.
//!
//! Sheets are handled as rectangular grids of cell text before any frame
//! is built; the reshaping convention (transpose, positional drops) is much
//! easier to state on a plain grid than on a typed DataFrame.

use calamine::{Data, Range};
use std::collections::HashMap;

/// Convert one cell to text. Missing cells are empty strings.
pub(crate) fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            // Format without unnecessary decimals
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                format!("{f}")
            }
        }
        Data::Int(i) => format!("{i}"),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => format!("#ERROR: {e:?}"),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.date().to_string())
            .unwrap_or_else(|| dt.to_string()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Read a full worksheet range into a grid of cell text.
pub(crate) fn read_grid(range: &Range<Data>) -> Vec<Vec<String>> {
    range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect()
}

/// Drop rows whose cells are all empty.
pub(crate) fn drop_empty_rows(grid: Vec<Vec<String>>) -> Vec<Vec<String>> {
    grid.into_iter()
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect()
}

/// Transpose a grid, padding ragged rows with empty cells.
pub(crate) fn transpose(grid: &[Vec<String>]) -> Vec<Vec<String>> {
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    (0..width)
        .map(|col| {
            grid.iter()
                .map(|row| row.get(col).cloned().unwrap_or_default())
                .collect()
        })
        .collect()
}

/// Disambiguate duplicate header names with a numeric suffix.
///
/// Pandas-style frames tolerate duplicate column labels; polars does not,
/// so repeated line-item labels get `_2`, `_3`, ... appended in order.
pub(crate) fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .map(|header| {
            let count = seen.entry(header.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                header
            } else {
                format!("{}_{}", header, count)
            }
        })
        .collect()
}
