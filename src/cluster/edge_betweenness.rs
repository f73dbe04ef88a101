//! Community structure by repeated removal of the most central edge
//!
//! Girvan–Newman style: delete the edge with the highest betweenness,
//! recompute, repeat a fixed number of times, then report the weak
//! components of what is left. Removal happens on a private copy of the
//! graph, so the caller's graph is never touched.

use crate::cluster::{VertexClusterSet, VertexClusterer, WeakComponentClusterer};
use crate::config::ClusteringConfig;
use crate::error::{Error, Result};
use crate::graph::{BetweennessOracle, BrandesBetweenness, EdgeId, LabeledGraph, VertexLabel};

/// Removes `num_edges_to_remove` highest-betweenness edges, then takes weak components.
#[derive(Debug, Clone)]
pub struct EdgeBetweennessClusterer<B = BrandesBetweenness> {
    /// Edges to delete per run
    num_edges_to_remove: usize,

    /// Ranks edges on the shrinking graph
    oracle: B,

    /// Edges deleted by the last run, in removal order
    edges_removed: Vec<EdgeId>,
}

impl EdgeBetweennessClusterer<BrandesBetweenness> {
    pub fn new(num_edges_to_remove: usize) -> Self {
        Self::with_oracle(num_edges_to_remove, BrandesBetweenness::new())
    }

    pub fn from_config(config: &ClusteringConfig) -> Self {
        Self::new(config.num_edges_to_remove)
    }
}

impl<B: BetweennessOracle> EdgeBetweennessClusterer<B> {
    /// Use a custom betweenness ranking
    pub fn with_oracle(num_edges_to_remove: usize, oracle: B) -> Self {
        Self {
            num_edges_to_remove,
            oracle,
            edges_removed: Vec::new(),
        }
    }

    pub fn num_edges_to_remove(&self) -> usize {
        self.num_edges_to_remove
    }

    /// Edges removed by the last run, in order; ids are valid in the caller's graph
    pub fn edges_removed(&self) -> &[EdgeId] {
        &self.edges_removed
    }

    /// Cluster `graph` into the weak components left after edge removal
    pub fn cluster<'g, K: VertexLabel>(
        &mut self,
        graph: &'g LabeledGraph<K>,
    ) -> Result<VertexClusterSet<'g, K>> {
        if self.num_edges_to_remove > graph.edge_count() {
            return Err(Error::invalid_parameter(
                "num_edges_to_remove",
                format!(
                    "{} exceeds the graph's {} edges",
                    self.num_edges_to_remove,
                    graph.edge_count()
                ),
            ));
        }

        log::info!(
            "Removing {} of {} edges by betweenness",
            self.num_edges_to_remove,
            graph.edge_count()
        );

        // Cloning a stable graph preserves ids, so removed ids stay meaningful
        let mut working = graph.clone();
        let mut removed = Vec::with_capacity(self.num_edges_to_remove);
        for _ in 0..self.num_edges_to_remove {
            let Some(top) = self.oracle.top_edge(&working) else {
                break;
            };
            log::debug!("Removing edge {:?} {:?}", top, working.endpoints(top));
            working.remove_edge(top);
            removed.push(top);
        }
        self.edges_removed = removed;

        let components = WeakComponentClusterer::new().components(&working)?;
        let mut clusters = VertexClusterSet::new(graph);
        for component in &components {
            clusters.add_cluster(component.iter().copied())?;
        }

        log::info!("Edge removal left {} clusters", clusters.len());
        Ok(clusters)
    }
}

impl<B: BetweennessOracle> VertexClusterer for EdgeBetweennessClusterer<B> {
    fn extract<'g, K: VertexLabel>(
        &mut self,
        graph: &'g LabeledGraph<K>,
    ) -> Result<VertexClusterSet<'g, K>> {
        self.cluster(graph)
    }
}
