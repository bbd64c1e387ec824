//! Progress reporting and cancellation primitives.
//!
//! The pipeline reports coarse-grained [`StageReport`]s to its caller after
//! each stage and checks a shared [`CancelToken`] between company
//! iterations and between stages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{LapkeuError, Result};

/// The pipeline stages, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Scanning the source directory and classifying sheets.
    Classify,
    /// Reshaping classified sheets into tidy fragments.
    Reshape,
    /// Merging fragments into one table per statement kind.
    Merge,
    /// Splitting merged tables into current and prior periods.
    Split,
    /// Extracting the de-duplicated entity info table.
    EntityInfo,
    /// Looking up latest stock quotes.
    Quotes,
    /// Writing the consolidated output workbook.
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Classify => "classify",
            Self::Reshape => "reshape",
            Self::Merge => "merge",
            Self::Split => "split",
            Self::EntityInfo => "entity info",
            Self::Quotes => "quotes",
            Self::Write => "write",
        };
        f.write_str(name)
    }
}

/// A coarse progress report emitted after a stage completes.
///
/// `skipped` counts per-item failures that were tolerated (partial
/// success); a report never represents an aborted pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    /// The stage the report refers to.
    pub stage: Stage,
    /// Items processed successfully.
    pub processed: usize,
    /// Items skipped due to tolerated per-item failures.
    pub skipped: usize,
}

impl fmt::Display for StageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.skipped == 0 {
            write!(f, "{}: {} items", self.stage, self.processed)
        } else {
            write!(
                f,
                "{}: skipped {} of {} items",
                self.stage,
                self.skipped,
                self.processed + self.skipped
            )
        }
    }
}

/// Shared flag for caller-initiated pipeline cancellation.
///
/// Cloning the token shares the underlying flag, so a caller can hold one
/// clone and hand another to the pipeline.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a new, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Returns [`LapkeuError::Cancelled`] once cancellation has been
    /// requested; call between iterations and between stages.
    pub fn checkpoint(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(LapkeuError::Cancelled)
        } else {
            Ok(())
        }
    }
}
