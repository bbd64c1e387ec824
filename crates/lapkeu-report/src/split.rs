//! Period splitting by explicit tag.
//!
//! Every merged row carries the period tag written at reshape time, so the
//! split partitions by label. The historical convention (current and prior
//! rows strictly alternating) still holds, but the output no longer
//! depends on it.

use polars::prelude::*;

use lapkeu_core::{LapkeuError, PERIOD_COLUMN, Period, Result};

/// Split a merged statement table into (current, prior) period tables.
///
/// Both outputs are contiguously indexed and no longer carry the tag
/// column. A missing tag column or an unknown tag value is a structural
/// error.
pub fn split_periods(merged: &DataFrame) -> Result<(DataFrame, DataFrame)> {
    let tags = merged
        .column(PERIOD_COLUMN)
        .map_err(|_| shape_error(format!("missing {PERIOD_COLUMN:?} tag column")))?
        .str()?;

    if tags.null_count() > 0 {
        return Err(shape_error(format!("{PERIOD_COLUMN:?} column contains empty tags")));
    }
    for tag in tags.into_iter().flatten() {
        if tag != Period::Current.label() && tag != Period::Prior.label() {
            return Err(shape_error(format!("unknown period tag {tag:?}")));
        }
    }

    let current = partition(merged, Period::Current)?;
    let prior = partition(merged, Period::Prior)?;
    Ok((current, prior))
}

fn partition(merged: &DataFrame, period: Period) -> Result<DataFrame> {
    Ok(merged
        .clone()
        .lazy()
        .filter(col(PERIOD_COLUMN).eq(lit(period.label())))
        .collect()?
        .drop(PERIOD_COLUMN)?)
}

fn shape_error(reason: String) -> LapkeuError {
    LapkeuError::Shape {
        context: "merged statement table".to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lapkeu_core::ENTITY_COLUMN;

    fn merged(rows: &[(&str, f64, &str)]) -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                ENTITY_COLUMN.into(),
                rows.iter().map(|r| r.0).collect::<Vec<_>>(),
            ),
            Column::new(
                "total aset".into(),
                rows.iter().map(|r| r.1).collect::<Vec<_>>(),
            ),
            Column::new(
                PERIOD_COLUMN.into(),
                rows.iter().map(|r| r.2).collect::<Vec<_>>(),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn partitions_interleaved_rows_by_tag() {
        let table = merged(&[
            ("AAAA", 1000.0, "current"),
            ("AAAA", 900.0, "prior"),
            ("BBBB", 2000.0, "current"),
            ("BBBB", 1800.0, "prior"),
        ]);

        let (current, prior) = split_periods(&table).unwrap();

        // Even-indexed rows land in the current table, odd-indexed in the
        // prior table, both reindexed from zero.
        assert_eq!(current.height(), 2);
        assert_eq!(prior.height(), 2);

        let current_values = current.column("total aset").unwrap().f64().unwrap();
        assert_eq!(current_values.get(0), Some(1000.0));
        assert_eq!(current_values.get(1), Some(2000.0));

        let prior_values = prior.column("total aset").unwrap().f64().unwrap();
        assert_eq!(prior_values.get(0), Some(900.0));
        assert_eq!(prior_values.get(1), Some(1800.0));
    }

    #[test]
    fn tag_column_is_dropped_from_both_outputs() {
        let table = merged(&[("AAAA", 1000.0, "current"), ("AAAA", 900.0, "prior")]);
        let (current, prior) = split_periods(&table).unwrap();
        assert!(current.column(PERIOD_COLUMN).is_err());
        assert!(prior.column(PERIOD_COLUMN).is_err());
    }

    #[test]
    fn unknown_tag_is_a_structural_error() {
        let table = merged(&[("AAAA", 1000.0, "current"), ("AAAA", 900.0, "restated")]);
        let err = split_periods(&table).unwrap_err();
        assert!(matches!(err, LapkeuError::Shape { .. }), "got {err:?}");
    }

    #[test]
    fn missing_tag_column_is_a_structural_error() {
        let table = DataFrame::new(vec![Column::new(ENTITY_COLUMN.into(), vec!["AAAA"])]).unwrap();
        let err = split_periods(&table).unwrap_err();
        assert!(matches!(err, LapkeuError::Shape { .. }), "got {err:?}");
    }
}
