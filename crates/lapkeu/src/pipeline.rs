//! The consolidation pipeline orchestrator.
//!
//! Stages run strictly in sequence, each handing its tables to the next in
//! memory: classify, reshape per statement kind, merge, split, entity
//! info, quotes, write. Per-item failures inside a stage are tolerated and
//! tallied; structural failures (no workbooks at all, nothing to merge for
//! a kind) abort the run before anything is persisted.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use polars::prelude::*;
use tracing::{info, warn};

use lapkeu_core::{
    CLOSE_COLUMN, CancelToken, Classification, ENTITY_COLUMN, LapkeuError, Quote, QuoteProvider,
    Result, Stage, StageReport, StatementKind,
};
use lapkeu_quote::GoogleFinanceProvider;
use lapkeu_report::{
    GEN_INFO_SHEET, STOCK_INFO_SHEET, merge_fragments, split_periods, staging, write_workbook,
};
use lapkeu_xbrl::{entity_info, reshape_statement, scan_directory};

use crate::summary::{KindSummary, RunSummary};

/// Progress callback invoked after each completed stage.
pub type ProgressFn = dyn Fn(&StageReport) + Send + Sync;

/// The consolidation pipeline.
///
/// Configure with the builder-style `with_*` methods, then call
/// [`run`](Self::run).
pub struct Pipeline {
    source_dir: PathBuf,
    output_path: PathBuf,
    quotes: Arc<dyn QuoteProvider>,
    staging_dir: Option<PathBuf>,
    cancel: CancelToken,
    progress: Option<Arc<ProgressFn>>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("source_dir", &self.source_dir)
            .field("output_path", &self.output_path)
            .field("quotes", &self.quotes.name())
            .field("staging_dir", &self.staging_dir)
            .field("progress", &self.progress.as_ref().map(|_| "configured"))
            .finish()
    }
}

impl Pipeline {
    /// Create a pipeline reading workbooks from `source_dir` and writing
    /// the consolidated workbook to `output_path`.
    ///
    /// Quotes come from [`GoogleFinanceProvider`] unless overridden.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_path: output_path.into(),
            quotes: Arc::new(GoogleFinanceProvider::new()),
            staging_dir: None,
            cancel: CancelToken::new(),
            progress: None,
        }
    }

    /// Use a custom quote provider.
    #[must_use]
    pub fn with_quote_provider(mut self, provider: Arc<dyn QuoteProvider>) -> Self {
        self.quotes = provider;
        self
    }

    /// Additionally spill every reshaped fragment to a parquet staging
    /// directory.
    #[must_use]
    pub fn with_staging_dir(mut self, staging_dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(staging_dir.into());
        self
    }

    /// Share a cancellation token with the caller; cancellation is checked
    /// between workbooks and between stages.
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Receive a [`StageReport`] after each completed stage.
    #[must_use]
    pub fn with_progress(
        mut self,
        progress: impl Fn(&StageReport) + Send + Sync + 'static,
    ) -> Self {
        self.progress = Some(Arc::new(progress));
        self
    }

    /// Run the pipeline to completion.
    ///
    /// Returns the run summary once the output workbook has been written;
    /// any error means nothing was persisted.
    pub async fn run(&self) -> Result<RunSummary> {
        let scan = scan_directory(&self.source_dir)?;
        if scan.classifications.is_empty() {
            return Err(LapkeuError::NoWorkbooks(
                self.source_dir.display().to_string(),
            ));
        }
        self.report(Stage::Classify, scan.classifications.len(), scan.skipped);
        self.cancel.checkpoint()?;

        let mut tables: Vec<(StatementKind, DataFrame, DataFrame)> = Vec::new();
        let mut statements: Vec<KindSummary> = Vec::new();
        for kind in StatementKind::ALL {
            let (fragments, skipped) = self.reshape_kind(kind, &scan.classifications)?;
            self.report(Stage::Reshape, fragments.len(), skipped);

            let merged = merge_fragments(kind, &fragments)?;
            self.report(Stage::Merge, merged.height(), 0);

            let (current, prior) = split_periods(&merged)?;
            self.report(Stage::Split, current.height() + prior.height(), 0);

            statements.push(KindSummary {
                kind,
                fragments: fragments.len(),
                skipped,
            });
            tables.push((kind, current, prior));
            self.cancel.checkpoint()?;
        }

        let gen_info = entity_info(&self.source_dir, &scan.classifications)?;
        self.report(Stage::EntityInfo, gen_info.height(), 0);
        self.cancel.checkpoint()?;

        let (stock_info, quotes, quotes_failed) =
            self.fetch_quotes(&scan.classifications).await?;
        self.report(Stage::Quotes, quotes, quotes_failed);

        let mut sheets: Vec<(&str, &DataFrame)> = vec![(GEN_INFO_SHEET, &gen_info)];
        for (kind, current, _) in &tables {
            sheets.push((kind.current_sheet(), current));
        }
        for (kind, _, prior) in &tables {
            sheets.push((kind.prior_sheet(), prior));
        }
        sheets.push((STOCK_INFO_SHEET, &stock_info));

        write_workbook(&self.output_path, &sheets)?;
        self.report(Stage::Write, sheets.len(), 0);

        let summary = RunSummary {
            output_path: self.output_path.clone(),
            workbooks: scan.classifications.len(),
            workbooks_skipped: scan.skipped,
            statements,
            quotes,
            quotes_failed,
        };
        info!(
            output = %summary.output_path.display(),
            partial = summary.is_partial(),
            "Pipeline complete"
        );
        Ok(summary)
    }

    /// Reshape every classified sheet of one kind, tolerating per-company
    /// failures.
    fn reshape_kind(
        &self,
        kind: StatementKind,
        classifications: &[Classification],
    ) -> Result<(Vec<DataFrame>, usize)> {
        let mut fragments = Vec::with_capacity(classifications.len());
        let mut skipped = 0;

        for classification in classifications {
            self.cancel.checkpoint()?;

            let Some(sheet) = classification.sheet_for(kind) else {
                skipped += 1;
                continue;
            };

            match reshape_statement(
                &self.source_dir,
                &classification.file_name,
                sheet,
                &classification.entity,
            ) {
                Ok(fragment) => {
                    if let Some(staging_dir) = &self.staging_dir {
                        if let Err(e) = staging::spill_fragment(
                            staging_dir,
                            kind,
                            &classification.entity,
                            &fragment,
                        ) {
                            warn!(
                                file = %classification.file_name,
                                error = %e,
                                "Failed to spill fragment"
                            );
                        }
                    }
                    fragments.push(fragment);
                }
                Err(e) => {
                    warn!(
                        file = %classification.file_name,
                        entity = %classification.entity,
                        kind = %kind,
                        error = %e,
                        "Skipping statement fragment"
                    );
                    skipped += 1;
                }
            }
        }

        Ok((fragments, skipped))
    }

    /// Look up a quote for every unique entity, in first-seen order.
    ///
    /// Failures are per-entity: the quote table always has one row per
    /// entity, with an absent price where the lookup failed.
    async fn fetch_quotes(
        &self,
        classifications: &[Classification],
    ) -> Result<(DataFrame, usize, usize)> {
        let mut seen = HashSet::new();
        let mut entities = Vec::new();
        for classification in classifications {
            if seen.insert(classification.entity.clone()) {
                entities.push(classification.entity.clone());
            }
        }

        let mut quotes: Vec<Quote> = Vec::with_capacity(entities.len());
        let mut failed = 0;
        for entity in entities {
            self.cancel.checkpoint()?;
            match self.quotes.fetch_quote(&entity).await {
                Ok(price) => quotes.push(Quote {
                    entity,
                    close: Some(price),
                }),
                Err(e) => {
                    warn!(entity = %entity, error = %e, "Quote lookup failed");
                    failed += 1;
                    quotes.push(Quote {
                        entity,
                        close: None,
                    });
                }
            }
        }

        let table = DataFrame::new(vec![
            Column::new(
                ENTITY_COLUMN.into(),
                quotes
                    .iter()
                    .map(|q| q.entity.as_str().to_string())
                    .collect::<Vec<_>>(),
            ),
            Column::new(
                CLOSE_COLUMN.into(),
                quotes.iter().map(|q| q.close).collect::<Vec<Option<i64>>>(),
            ),
        ])?;

        let fetched = table.height() - failed;
        Ok((table, fetched, failed))
    }

    fn report(&self, stage: Stage, processed: usize, skipped: usize) {
        let report = StageReport {
            stage,
            processed,
            skipped,
        };
        info!(stage = %report.stage, processed, skipped, "Stage complete");
        if let Some(progress) = &self.progress {
            progress(&report);
        }
    }
}

/// Build the conventional output file name for one reporting period, e.g.
/// `Data_Laporan_2023_Q3.xlsx`.
#[must_use]
pub fn output_file_name(year: u16, quarter: &str) -> String {
    format!("Data_Laporan_{year}_{quarter}.xlsx")
}

/// Convenience: `output_file_name` joined onto an output directory.
#[must_use]
pub fn output_path(output_dir: &Path, year: u16, quarter: &str) -> PathBuf {
    output_dir.join(output_file_name(year, quarter))
}
