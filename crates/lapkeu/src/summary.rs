//! Run summaries distinguishing partial success from clean runs.

use serde::Serialize;
use std::path::PathBuf;

use lapkeu_core::StatementKind;

/// Per-statement-kind reshape outcome.
#[derive(Clone, Debug, Serialize)]
pub struct KindSummary {
    /// The statement kind.
    pub kind: StatementKind,
    /// Fragments reshaped and merged.
    pub fragments: usize,
    /// Workbooks skipped for this kind (unmatched sheet or shape failure).
    pub skipped: usize,
}

/// Outcome of one pipeline run.
///
/// A summary is only produced by a run that wrote its output workbook;
/// an aborted pipeline surfaces an error instead. `is_partial` tells the
/// caller whether any tolerated per-item failures occurred along the way.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    /// Path of the consolidated output workbook.
    pub output_path: PathBuf,
    /// Workbooks successfully classified.
    pub workbooks: usize,
    /// Workbooks skipped during classification.
    pub workbooks_skipped: usize,
    /// Reshape outcome per statement kind.
    pub statements: Vec<KindSummary>,
    /// Quote lookups that returned a price.
    pub quotes: usize,
    /// Quote lookups recorded with an absent price.
    pub quotes_failed: usize,
}

impl RunSummary {
    /// True when any item was skipped anywhere in the run.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.workbooks_skipped > 0
            || self.quotes_failed > 0
            || self.statements.iter().any(|s| s.skipped > 0)
    }
}
