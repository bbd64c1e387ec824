//! Consolidated output workbook writer.
//!
//! The pipeline's final output is one xlsx workbook with a fixed set of
//! sheets: the entity info table, current and prior tables for each
//! statement kind, and the stock quote table. Each sheet carries a header
//! row followed by the table rows; missing cells are left blank.

use std::path::Path;

use polars::prelude::*;
use tracing::debug;
use umya_spreadsheet::Worksheet;

use lapkeu_core::{LapkeuError, Result};

/// Output sheet name for the entity info table.
pub const GEN_INFO_SHEET: &str = "gen_info";

/// Output sheet name for the stock quote table.
pub const STOCK_INFO_SHEET: &str = "stock_info";

/// Write the named tables as sheets of one xlsx workbook, in order.
pub fn write_workbook(path: &Path, sheets: &[(&str, &DataFrame)]) -> Result<()> {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();

    for (name, df) in sheets {
        let sheet = book
            .new_sheet(name)
            .map_err(|e| LapkeuError::Other(format!("Cannot add sheet {name:?}: {e}")))?;
        write_sheet(sheet, df)?;
    }

    umya_spreadsheet::writer::xlsx::write(&book, path)
        .map_err(|e| LapkeuError::Other(format!("Failed to write workbook: {e:?}")))?;

    debug!(path = %path.display(), sheets = sheets.len(), "Wrote consolidated workbook");
    Ok(())
}

fn write_sheet(sheet: &mut Worksheet, df: &DataFrame) -> Result<()> {
    for (ci, column) in df.get_columns().iter().enumerate() {
        let col = (ci + 1) as u32;
        sheet
            .get_cell_mut((col, 1))
            .set_value(column.name().to_string());
        for ri in 0..df.height() {
            write_cell(sheet, col, (ri + 2) as u32, column.get(ri)?);
        }
    }
    Ok(())
}

fn write_cell(sheet: &mut Worksheet, col: u32, row: u32, value: AnyValue<'_>) {
    match value {
        AnyValue::Null => {}
        AnyValue::Float64(v) => {
            sheet.get_cell_mut((col, row)).set_value_number(v);
        }
        AnyValue::Float32(v) => {
            sheet.get_cell_mut((col, row)).set_value_number(f64::from(v));
        }
        AnyValue::Int64(v) => {
            sheet.get_cell_mut((col, row)).set_value_number(v as f64);
        }
        AnyValue::Int32(v) => {
            sheet.get_cell_mut((col, row)).set_value_number(f64::from(v));
        }
        AnyValue::UInt64(v) => {
            sheet.get_cell_mut((col, row)).set_value_number(v as f64);
        }
        AnyValue::UInt32(v) => {
            sheet.get_cell_mut((col, row)).set_value_number(f64::from(v));
        }
        AnyValue::Boolean(v) => {
            sheet.get_cell_mut((col, row)).set_value_bool(v);
        }
        AnyValue::String(s) => {
            sheet.get_cell_mut((col, row)).set_value(s);
        }
        AnyValue::StringOwned(s) => {
            sheet.get_cell_mut((col, row)).set_value(s.to_string());
        }
        other => {
            sheet.get_cell_mut((col, row)).set_value(other.to_string());
        }
    }
}
