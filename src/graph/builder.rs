//! Graph construction module

use crate::graph::LabeledGraph;
use std::collections::HashSet;

/// Builder for incrementally constructing a string-labelled graph
pub struct GraphBuilder {
    /// Graph under construction
    graph: LabeledGraph<String>,

    /// Edges seen so far, keyed by vertex index pairs
    seen: HashSet<(usize, usize)>,

    /// Self-loops dropped while building
    self_loops: usize,

    /// Repeated edges dropped while building
    duplicates: usize,
}

impl GraphBuilder {
    /// Create a new graph builder with the given capacity
    pub fn with_capacity(directed: bool, capacity: usize) -> Self {
        Self {
            graph: LabeledGraph::with_capacity(directed, capacity, capacity),
            seen: HashSet::with_capacity(capacity),
            self_loops: 0,
            duplicates: 0,
        }
    }

    /// Add an edge from one labelled vertex to another
    pub fn add_edge(&mut self, src_id: &str, dst_id: &str) {
        if src_id == dst_id {
            self.graph.add_vertex(src_id.to_string());
            self.self_loops += 1;
            return;
        }

        let src = self.graph.add_vertex(src_id.to_string()).index();
        let dst = self.graph.add_vertex(dst_id.to_string()).index();

        // Undirected graphs treat (a, b) and (b, a) as the same edge
        let key = if self.graph.is_directed() || src < dst {
            (src, dst)
        } else {
            (dst, src)
        };
        if !self.seen.insert(key) {
            self.duplicates += 1;
            return;
        }

        self.graph.connect(src_id.to_string(), dst_id.to_string());
    }

    /// Add an isolated vertex
    pub fn add_vertex(&mut self, id: &str) {
        self.graph.add_vertex(id.to_string());
    }

    /// Build the labelled graph
    pub fn build(self) -> LabeledGraph<String> {
        if self.self_loops > 0 || self.duplicates > 0 {
            log::debug!(
                "Dropped {} self-loops and {} duplicate edges",
                self.self_loops,
                self.duplicates
            );
        }
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_skips_loops_and_duplicates() {
        let mut builder = GraphBuilder::with_capacity(false, 8);
        builder.add_edge("a", "b");
        builder.add_edge("b", "a");
        builder.add_edge("c", "c");
        builder.add_edge("b", "c");

        let graph = builder.build();
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_directed_builder_keeps_reverse_edges() {
        let mut builder = GraphBuilder::with_capacity(true, 4);
        builder.add_edge("a", "b");
        builder.add_edge("b", "a");

        let graph = builder.build();
        assert_eq!(graph.edge_count(), 2);
    }
}
