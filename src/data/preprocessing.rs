//! Data preprocessing module for graph analysis

use crate::graph::{LabeledGraph, VertexId, VertexLabel};
use std::collections::BTreeSet;

/// Filter a graph to only include vertices with a minimum degree
pub fn filter_by_degree<K: VertexLabel>(
    graph: &LabeledGraph<K>,
    min_degree: usize,
) -> LabeledGraph<K> {
    let keep: BTreeSet<VertexId> = graph
        .vertices()
        .filter(|&v| graph.degree(v) >= min_degree)
        .collect();

    log::info!(
        "Kept {} of {} vertices with degree >= {}",
        keep.len(),
        graph.vertex_count(),
        min_degree
    );

    graph.induced_subgraph(&keep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_drops_leaves() {
        let mut g = LabeledGraph::new_undirected();
        g.connect(1, 2);
        g.connect(2, 3);
        g.connect(3, 1);
        g.connect(3, 4);

        let filtered = filter_by_degree(&g, 2);
        assert_eq!(filtered.vertex_count(), 3);
        assert_eq!(filtered.edge_count(), 3);
        assert!(filtered.vertex_by_label(&4).is_none());
    }
}
