//! Results persistence module

use crate::cluster::metrics::{summarize, ClusterSummary};
use crate::cluster::VertexClusterSet;
use crate::graph::VertexLabel;
use anyhow::Result;
use serde::Serialize;
use serde_json::{json, to_string_pretty};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Save clustering results to the specified directory
pub fn save_results<K: VertexLabel + Serialize>(
    clusters: &VertexClusterSet<'_, K>,
    algorithm: &str,
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving {} clusters to {}", clusters.len(), output_dir);

    // Ensure output directory exists
    fs::create_dir_all(output_dir)?;

    let summaries = summarize(clusters);
    save_summary(clusters, &summaries, algorithm, output_dir)?;
    save_clusters(&summaries, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Save graph and cluster statistics
fn save_summary<K: VertexLabel + Serialize>(
    clusters: &VertexClusterSet<'_, K>,
    summaries: &[ClusterSummary<K>],
    algorithm: &str,
    output_dir: &str,
) -> Result<()> {
    let graph = clusters.graph();
    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;

    let sizes: Vec<usize> = summaries.iter().map(|c| c.size).collect();
    let count = summaries.len().max(1) as f64;

    let summary = json!({
        "algorithm": algorithm,
        "graph_stats": {
            "vertex_count": graph.vertex_count(),
            "edge_count": graph.edge_count(),
            "directed": graph.is_directed(),
        },
        "cluster_stats": {
            "cluster_count": summaries.len(),
            "total_clustered_vertices": sizes.iter().sum::<usize>(),
            "largest_cluster_size": sizes.iter().max().copied().unwrap_or(0),
            "smallest_cluster_size": sizes.iter().min().copied().unwrap_or(0),
            "avg_cluster_size": sizes.iter().sum::<usize>() as f64 / count,
            "avg_density": summaries.iter().map(|c| c.density).sum::<f64>() / count,
        }
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Save per-cluster details
fn save_clusters<K: Serialize>(summaries: &[ClusterSummary<K>], output_dir: &str) -> Result<()> {
    let path = Path::new(output_dir).join("clusters.json");
    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(&json!({ "clusters": summaries }))?.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::WeakComponentClusterer;
    use crate::graph::LabeledGraph;

    #[test]
    fn test_writes_summary_and_clusters() {
        let mut g = LabeledGraph::new_undirected();
        g.connect("a".to_string(), "b".to_string());
        g.add_vertex("c".to_string());
        let clusters = WeakComponentClusterer::new().components(&g).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report");
        save_results(&clusters, "weak", out.to_str().unwrap()).unwrap();

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("summary.json")).unwrap()).unwrap();
        assert_eq!(summary["algorithm"], "weak");
        assert_eq!(summary["cluster_stats"]["cluster_count"], 2);
        assert_eq!(summary["cluster_stats"]["largest_cluster_size"], 2);

        let details: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("clusters.json")).unwrap()).unwrap();
        assert_eq!(details["clusters"][0]["members"], json!(["a", "b"]));
    }
}
