//! Helpers for building synthetic IDX workbooks in tests.

use std::path::Path;

use umya_spreadsheet::Worksheet;

use lapkeu_core::StatementKind;

/// Write a grid of cell text into a sheet, 1-based, skipping empty cells.
pub(crate) fn set_rows(sheet: &mut Worksheet, rows: &[Vec<String>]) {
    for (ri, row) in rows.iter().enumerate() {
        for (ci, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet
                    .get_cell_mut(((ci + 1) as u32, (ri + 1) as u32))
                    .set_value(value.clone());
            }
        }
    }
}

/// Rows for a statement sheet in the IDX template layout: a title row with
/// the marker phrase, a label column, current and prior value columns, and
/// a trailing English label column.
pub(crate) fn statement_rows(marker: &str, code: &str, items: &[(&str, &str, &str)]) -> Vec<Vec<String>> {
    let mut rows = vec![
        vec![marker.to_string(), String::new(), String::new(), String::new()],
        vec![
            "keterangan".to_string(),
            "idr".to_string(),
            "idr".to_string(),
            "description".to_string(),
        ],
        vec![
            "entitas".to_string(),
            code.to_string(),
            code.to_string(),
            "entity".to_string(),
        ],
        vec![
            "periode berakhir".to_string(),
            "2023-09-30".to_string(),
            "2022-09-30".to_string(),
            "period end".to_string(),
        ],
    ];
    for (label, current, prior) in items {
        rows.push(vec![
            (*label).to_string(),
            (*current).to_string(),
            (*prior).to_string(),
            format!("{label} (en)"),
        ]);
    }
    rows
}

/// Rows for the fixed `1000000` metadata sheet: field names in the first
/// column, values in the second, English labels in the third.
pub(crate) fn metadata_rows(code: &str) -> Vec<Vec<String>> {
    vec![
        vec!["id".to_string(), "1000000".to_string(), "ID".to_string()],
        vec!["versi".to_string(), "1.0".to_string(), "Version".to_string()],
        vec![
            "kode entitas".to_string(),
            code.to_string(),
            "Entity code".to_string(),
        ],
        vec![
            "nama entitas".to_string(),
            format!("PT {code} Tbk"),
            "Entity name".to_string(),
        ],
        vec![
            "sektor".to_string(),
            "Perbankan".to_string(),
            "Sector".to_string(),
        ],
    ]
}

/// Write a complete synthetic workbook with PK, LR, AK, and metadata
/// sheets for one entity.
pub(crate) fn write_workbook(path: &Path, code: &str) {
    write_workbook_with_pk_items(
        path,
        code,
        &[
            ("total aset", "1000", "900"),
            ("total liabilitas", "600", "500"),
        ],
    );
}

/// Like [`write_workbook`] but with caller-provided balance sheet items.
pub(crate) fn write_workbook_with_pk_items(path: &Path, code: &str, pk_items: &[(&str, &str, &str)]) {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();

    let info = book.new_sheet("1000000").unwrap();
    set_rows(info, &metadata_rows(code));

    let pk = book.new_sheet("1210000").unwrap();
    set_rows(
        pk,
        &statement_rows(StatementKind::FinancialPosition.marker(), code, pk_items),
    );

    let lr = book.new_sheet("1311000").unwrap();
    set_rows(
        lr,
        &statement_rows(
            StatementKind::ProfitLoss.marker(),
            code,
            &[("pendapatan", "200", "180"), ("laba bersih", "50", "40")],
        ),
    );

    let ak = book.new_sheet("1510000").unwrap();
    set_rows(
        ak,
        &statement_rows(
            StatementKind::CashFlows.marker(),
            code,
            &[("arus kas operasi", "70", "60")],
        ),
    );

    umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
}
