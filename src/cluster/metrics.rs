//! Cluster statistics and metrics

use crate::cluster::{Cluster, VertexClusterSet};
use crate::graph::{LabeledGraph, VertexId, VertexLabel};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Number of central vertices reported per cluster
const CENTRAL_VERTEX_COUNT: usize = 5;

/// Serializable description of one vertex cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary<K> {
    /// Position of the cluster in its set
    pub id: usize,

    /// Number of member vertices
    pub size: usize,

    /// Density: actual edges / potential edges
    pub density: f64,

    /// Highest-degree members, most connected first
    pub central_vertices: Vec<K>,

    /// Member labels in vertex order
    pub members: Vec<K>,
}

/// Calculate density (actual edges / potential edges)
pub fn density<K: VertexLabel>(graph: &LabeledGraph<K>, members: &Cluster<VertexId>) -> f64 {
    let n = members.len();
    if n <= 1 {
        return 1.0; // By convention, singleton clusters have density 1
    }

    let potential_edges = if graph.is_directed() {
        n * (n - 1)
    } else {
        n * (n - 1) / 2
    };

    // Count each internal edge once, from its id
    let actual_edges = graph
        .edges()
        .filter_map(|e| graph.endpoints(e))
        .filter(|(a, b)| a != b && members.contains(a) && members.contains(b))
        .count();

    actual_edges as f64 / potential_edges as f64
}

/// Members ordered by degree inside the cluster, highest first; ties by vertex id
pub fn central_vertices<K: VertexLabel>(
    graph: &LabeledGraph<K>,
    members: &Cluster<VertexId>,
    top_n: usize,
) -> Vec<VertexId> {
    members
        .iter()
        .map(|&v| {
            let internal = graph
                .incident(v)
                .iter()
                .filter(|(_, w)| *w != v && members.contains(w))
                .count();
            (v, internal)
        })
        .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
        .take(top_n)
        .map(|(v, _)| v)
        .collect()
}

/// Summaries for every cluster in a set, in set order
pub fn summarize<K: VertexLabel>(clusters: &VertexClusterSet<'_, K>) -> Vec<ClusterSummary<K>> {
    let graph = clusters.graph();
    clusters
        .iter()
        .enumerate()
        .map(|(id, members)| ClusterSummary {
            id,
            size: members.len(),
            density: density(graph, members),
            central_vertices: labels_of(
                graph,
                central_vertices(graph, members, CENTRAL_VERTEX_COUNT),
            ),
            members: labels_of(graph, members.iter().copied()),
        })
        .collect()
}

fn labels_of<K: VertexLabel>(
    graph: &LabeledGraph<K>,
    vertices: impl IntoIterator<Item = VertexId>,
) -> Vec<K> {
    vertices
        .into_iter()
        .filter_map(|v| graph.label(v).cloned())
        .collect()
}
