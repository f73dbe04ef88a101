//! Weakly connected components

use crate::cluster::{VertexClusterSet, VertexClusterer};
use crate::error::Result;
use crate::graph::{LabeledGraph, VertexId, VertexLabel};
use std::collections::{BTreeSet, VecDeque};

/// Finds maximal vertex sets that are connected when edge direction is ignored.
///
/// Runs a breadth-first search from the lowest unvisited vertex until every
/// vertex has been claimed, so each vertex is visited exactly once.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeakComponentClusterer;

impl WeakComponentClusterer {
    pub fn new() -> Self {
        Self
    }

    /// Components of `graph`, one cluster each, in order of their lowest vertex
    pub fn components<'g, K: VertexLabel>(
        &self,
        graph: &'g LabeledGraph<K>,
    ) -> Result<VertexClusterSet<'g, K>> {
        log::debug!(
            "Finding weak components of a graph with {} vertices",
            graph.vertex_count()
        );

        let mut clusters = VertexClusterSet::new(graph);
        let mut unvisited: BTreeSet<VertexId> = graph.vertices().collect();
        let mut queue = VecDeque::new();

        while let Some(root) = unvisited.pop_first() {
            let mut component = vec![root];
            queue.push_back(root);

            while let Some(v) = queue.pop_front() {
                for w in graph.neighbors(v) {
                    if unvisited.remove(&w) {
                        component.push(w);
                        queue.push_back(w);
                    }
                }
            }

            clusters.add_cluster(component)?;
        }

        log::debug!("Found {} weak components", clusters.len());
        Ok(clusters)
    }
}

impl VertexClusterer for WeakComponentClusterer {
    fn extract<'g, K: VertexLabel>(
        &mut self,
        graph: &'g LabeledGraph<K>,
    ) -> Result<VertexClusterSet<'g, K>> {
        self.components(graph)
    }
}
