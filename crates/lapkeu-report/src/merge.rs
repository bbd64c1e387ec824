//! Fragment merging per statement kind.
//!
//! All fragments of one statement kind are concatenated row-wise in input
//! order. Line-item columns differ between companies, so the merge takes
//! the union of all columns in first-seen order and fills the holes with
//! zero: a line item a company does not report is a zero amount, not an
//! unknown.

use polars::prelude::*;
use tracing::debug;

use lapkeu_core::{ENTITY_COLUMN, LapkeuError, Result, StatementKind};

/// Merge reshaped fragments of one statement kind into a single table.
///
/// The entity-code column leads; remaining columns follow in first-seen
/// order. Returns [`LapkeuError::NoFragments`] when there is nothing to
/// concatenate, which is distinct from a merge that produces an empty but
/// valid table.
pub fn merge_fragments(kind: StatementKind, fragments: &[DataFrame]) -> Result<DataFrame> {
    if fragments.is_empty() {
        return Err(LapkeuError::NoFragments(kind.to_string()));
    }

    let merged = concat(
        fragments
            .iter()
            .map(|df| df.clone().lazy())
            .collect::<Vec<_>>(),
        UnionArgs {
            diagonal: true,
            to_supertypes: true,
            ..Default::default()
        },
    )?
    .collect()?;

    let merged = lead_with_entity(&merged)?;
    let merged = fill_missing_with_zero(merged)?;

    debug!(
        kind = %kind,
        fragments = fragments.len(),
        rows = merged.height(),
        columns = merged.width(),
        "Merged statement fragments"
    );

    Ok(merged)
}

/// Reorder columns so the entity code leads, preserving the relative
/// order of everything else.
fn lead_with_entity(df: &DataFrame) -> Result<DataFrame> {
    let mut order: Vec<String> = vec![ENTITY_COLUMN.to_string()];
    order.extend(
        df.get_column_names()
            .iter()
            .filter(|name| name.as_str() != ENTITY_COLUMN)
            .map(|name| name.to_string()),
    );
    Ok(df.select(order)?)
}

/// Fill every remaining missing cell with zero (numeric columns) or `"0"`
/// (text columns).
fn fill_missing_with_zero(df: DataFrame) -> Result<DataFrame> {
    let exprs: Vec<Expr> = df
        .get_columns()
        .iter()
        .map(|column| {
            let name = column.name().clone();
            match column.dtype() {
                DataType::String => col(name).fill_null(lit("0")),
                _ => col(name).fill_null(lit(0)),
            }
        })
        .collect();
    Ok(df.lazy().with_columns(exprs).collect()?)
}
