//! Plain-text edge lists

use crate::graph::{GraphBuilder, LabeledGraph};
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};

/// Load `source target` pairs, one per line.
///
/// Blank lines and lines starting with `#` are ignored; a line with a single
/// token adds an isolated vertex.
pub fn load_text_edge_list(path: &str, directed: bool) -> Result<LabeledGraph<String>> {
    log::info!("Reading edge list: {}", path);

    let file = File::open(path).with_context(|| format!("opening {}", path))?;
    let mut builder = GraphBuilder::with_capacity(directed, 1024);

    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(v), None, None) => builder.add_vertex(v),
            (Some(src), Some(dst), None) => builder.add_edge(src, dst),
            _ => bail!("{}:{}: expected `source target`", path, line_no + 1),
        }
    }

    Ok(builder.build())
}
