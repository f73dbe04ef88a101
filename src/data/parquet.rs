//! Parquet file handling for graph data

use crate::graph::{GraphBuilder, LabeledGraph};
use anyhow::{anyhow, Result};
use polars::prelude::*;

/// Load an edge list from two columns of a Parquet file.
///
/// Both columns are cast to strings, so integer ids work as well.
pub fn load_edge_list(
    path: &str,
    source_column: &str,
    target_column: &str,
    directed: bool,
) -> Result<LabeledGraph<String>> {
    log::info!("Reading parquet file: {}", path);

    if !std::path::Path::new(path).exists() {
        return Err(anyhow!("File not found: {}", path));
    }

    let df = LazyFrame::scan_parquet(path, Default::default())?
        .select([
            col(source_column).cast(DataType::String),
            col(target_column).cast(DataType::String),
        ])
        .collect()?;

    log::info!("Loaded {} edges", df.height());

    let sources = df.column(source_column)?.str()?;
    let targets = df.column(target_column)?.str()?;

    let mut builder = GraphBuilder::with_capacity(directed, df.height());
    let mut skipped = 0usize;
    for i in 0..df.height() {
        match (sources.get(i), targets.get(i)) {
            (Some(src), Some(dst)) => builder.add_edge(src, dst),
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        log::warn!("Skipped {} rows with a missing endpoint", skipped);
    }

    Ok(builder.build())
}
