//! Parquet staging spill for large batches.
//!
//! Fragments normally travel in memory from reshape to merge; for large
//! batches the pipeline can additionally spill each fragment to an
//! ephemeral staging directory. The staged files can be loaded back for a
//! later merge, and the directory is safe to delete after a successful
//! run.

use std::fs;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::debug;

use lapkeu_core::{EntityCode, Result, StatementKind};

/// Write one fragment to the staging directory as
/// `{kind}-{entity}.parquet`, creating the directory if needed.
pub fn spill_fragment(
    staging_dir: &Path,
    kind: StatementKind,
    entity: &EntityCode,
    fragment: &DataFrame,
) -> Result<PathBuf> {
    fs::create_dir_all(staging_dir)?;
    let path = staging_dir.join(format!("{}-{}.parquet", kind.code(), entity));
    let file = fs::File::create(&path)?;
    let mut df = fragment.clone();
    ParquetWriter::new(file).finish(&mut df)?;
    debug!(path = %path.display(), "Spilled fragment");
    Ok(path)
}

/// Load every staged fragment of one statement kind, in entity-code
/// order.
pub fn load_fragments(staging_dir: &Path, kind: StatementKind) -> Result<Vec<DataFrame>> {
    let prefix = format!("{}-", kind.code());
    let mut paths: Vec<PathBuf> = fs::read_dir(staging_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().is_some_and(|ext| ext == "parquet")
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
        })
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let file = fs::File::open(&path)?;
            Ok(ParquetReader::new(file).finish()?)
        })
        .collect()
}
