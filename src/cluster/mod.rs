//! Cluster analysis module
//!
//! A [`ClusterSet`] stores the output of every graph clusterer: an ordered
//! list of element sets plus a reverse index from element to the clusters
//! that contain it. Vertex and edge clusters share the same container and
//! differ only in how [`ClusterSet::to_new_subgraph`] materialises a cluster.

pub mod bicomponent;
pub mod edge_betweenness;
pub mod kmeans;
pub mod metrics;
pub mod voltage;
pub mod weak;

pub use bicomponent::BicomponentClusterer;
pub use edge_betweenness::EdgeBetweennessClusterer;
pub use kmeans::{Centroid, KMeansClusterer, KMeansRun};
pub use voltage::VoltageClusterer;
pub use weak::WeakComponentClusterer;

use crate::error::{Error, Result};
use crate::graph::{EdgeId, LabeledGraph, VertexId, VertexLabel};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::Hash;

/// A set of graph elements belonging to one graph
pub type Cluster<T> = BTreeSet<T>;

/// Vertex clusters, as produced by the component clusterers
pub type VertexClusterSet<'g, K> = ClusterSet<'g, K, VertexId>;

/// Edge clusters
pub type EdgeClusterSet<'g, K> = ClusterSet<'g, K, EdgeId>;

/// Something a cluster can hold: a vertex or an edge.
pub trait GraphElement: Copy + Eq + Hash + Ord + fmt::Debug {
    /// Whether the element is live in `graph`
    fn belongs_to<K: VertexLabel>(self, graph: &LabeledGraph<K>) -> bool;

    /// The corresponding element of `to`, given that `self` lives in `from`
    fn equivalent_in<K: VertexLabel>(
        self,
        from: &LabeledGraph<K>,
        to: &LabeledGraph<K>,
    ) -> Option<Self>;

    /// A new graph holding exactly the cluster's elements
    fn subgraph<K: VertexLabel>(
        graph: &LabeledGraph<K>,
        cluster: &Cluster<Self>,
    ) -> LabeledGraph<K>;
}

impl GraphElement for VertexId {
    fn belongs_to<K: VertexLabel>(self, graph: &LabeledGraph<K>) -> bool {
        graph.contains_vertex(self)
    }

    fn equivalent_in<K: VertexLabel>(
        self,
        from: &LabeledGraph<K>,
        to: &LabeledGraph<K>,
    ) -> Option<Self> {
        to.equivalent_vertex(from, self)
    }

    fn subgraph<K: VertexLabel>(
        graph: &LabeledGraph<K>,
        cluster: &Cluster<Self>,
    ) -> LabeledGraph<K> {
        graph.induced_subgraph(cluster)
    }
}

impl GraphElement for EdgeId {
    fn belongs_to<K: VertexLabel>(self, graph: &LabeledGraph<K>) -> bool {
        graph.contains_edge(self)
    }

    fn equivalent_in<K: VertexLabel>(
        self,
        from: &LabeledGraph<K>,
        to: &LabeledGraph<K>,
    ) -> Option<Self> {
        to.equivalent_edge(from, self)
    }

    fn subgraph<K: VertexLabel>(
        graph: &LabeledGraph<K>,
        cluster: &Cluster<Self>,
    ) -> LabeledGraph<K> {
        graph.edge_subgraph(cluster)
    }
}

/// Ordered clusters over one graph with element-to-cluster lookup
#[derive(Debug, Clone)]
pub struct ClusterSet<'g, K, T> {
    /// Graph every element belongs to
    graph: &'g LabeledGraph<K>,

    /// Clusters in insertion (or sorted) order
    clusters: Vec<Cluster<T>>,

    /// Positions in `clusters` of every cluster holding an element
    membership: HashMap<T, Vec<usize>>,
}

impl<'g, K: VertexLabel, T: GraphElement> ClusterSet<'g, K, T> {
    /// Create an empty cluster set over `graph`
    pub fn new(graph: &'g LabeledGraph<K>) -> Self {
        Self {
            graph,
            clusters: Vec::new(),
            membership: HashMap::new(),
        }
    }

    /// The graph this set's elements belong to
    pub fn graph(&self) -> &'g LabeledGraph<K> {
        self.graph
    }

    /// Append a cluster.
    ///
    /// All-or-nothing: an empty cluster or one holding a foreign element
    /// leaves the set untouched.
    pub fn add_cluster(&mut self, elements: impl IntoIterator<Item = T>) -> Result<()> {
        let cluster: Cluster<T> = elements.into_iter().collect();
        if cluster.is_empty() {
            return Err(Error::invalid_parameter(
                "elements",
                "a cluster must hold at least one element",
            ));
        }
        if let Some(foreign) = cluster.iter().find(|e| !e.belongs_to(self.graph)) {
            return Err(Error::InvalidElement(format!("{:?}", foreign)));
        }

        let position = self.clusters.len();
        for &element in &cluster {
            self.membership.entry(element).or_default().push(position);
        }
        self.clusters.push(cluster);
        Ok(())
    }

    pub fn cluster_at(&self, index: usize) -> Option<&Cluster<T>> {
        self.clusters.get(index)
    }

    /// Every cluster containing `element`, in set order
    pub fn clusters_of(&self, element: T) -> Option<Vec<&Cluster<T>>> {
        self.membership
            .get(&element)
            .map(|positions| positions.iter().map(|&i| &self.clusters[i]).collect())
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cluster<T>> {
        self.clusters.iter()
    }

    /// Largest clusters first; equal sizes keep their relative order
    pub fn sort_by_size_descending(&mut self) {
        self.clusters.sort_by(|a, b| b.len().cmp(&a.len()));
        self.rebuild_membership();
    }

    fn rebuild_membership(&mut self) {
        self.membership.clear();
        for (position, cluster) in self.clusters.iter().enumerate() {
            for &element in cluster {
                self.membership.entry(element).or_default().push(position);
            }
        }
    }

    /// Materialise one cluster as a standalone graph
    pub fn to_new_subgraph(&self, index: usize) -> Result<LabeledGraph<K>> {
        let cluster = self.clusters.get(index).ok_or_else(|| {
            Error::invalid_parameter(
                "index",
                format!("{index} out of range for {} clusters", self.clusters.len()),
            )
        })?;
        Ok(T::subgraph(self.graph, cluster))
    }

    /// Copy of this set with every element replaced by its counterpart in `other`
    pub fn retarget<'h>(&self, other: &'h LabeledGraph<K>) -> Result<ClusterSet<'h, K, T>> {
        let mut retargeted = ClusterSet::new(other);
        for cluster in &self.clusters {
            let mapped = cluster
                .iter()
                .map(|&e| {
                    e.equivalent_in(self.graph, other)
                        .ok_or_else(|| Error::NoEquivalentElement(format!("{:?}", e)))
                })
                .collect::<Result<Cluster<T>>>()?;
            retargeted.add_cluster(mapped)?;
        }
        Ok(retargeted)
    }
}

impl<'a, 'g, K, T> IntoIterator for &'a ClusterSet<'g, K, T> {
    type Item = &'a Cluster<T>;
    type IntoIter = std::slice::Iter<'a, Cluster<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.iter()
    }
}

/// Partitions (or covers) the vertices of a graph.
pub trait VertexClusterer {
    fn extract<'g, K: VertexLabel>(
        &mut self,
        graph: &'g LabeledGraph<K>,
    ) -> Result<VertexClusterSet<'g, K>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LabeledGraph<&'static str> {
        let mut g = LabeledGraph::new_undirected();
        g.connect("a", "b");
        g.connect("b", "c");
        g.connect("c", "d");
        g.add_vertex("e");
        g
    }

    fn ids(g: &LabeledGraph<&'static str>, labels: &[&'static str]) -> Vec<VertexId> {
        labels.iter().map(|l| g.vertex_by_label(l).unwrap()).collect()
    }

    #[test]
    fn test_add_and_lookup() {
        let g = sample();
        let mut set = VertexClusterSet::new(&g);
        set.add_cluster(ids(&g, &["a", "b"])).unwrap();
        set.add_cluster(ids(&g, &["b", "c", "d"])).unwrap();

        assert_eq!(set.len(), 2);
        let b = g.vertex_by_label(&"b").unwrap();
        assert_eq!(set.clusters_of(b).unwrap().len(), 2);
        let e = g.vertex_by_label(&"e").unwrap();
        assert!(set.clusters_of(e).is_none());
        assert_eq!(set.cluster_at(1).unwrap().len(), 3);
        assert!(set.cluster_at(2).is_none());
    }

    #[test]
    fn test_add_cluster_is_all_or_nothing() {
        let g = sample();
        let mut other = LabeledGraph::new_undirected();
        for label in ["x", "y", "z", "w", "v", "u"] {
            other.add_vertex(label);
        }
        let foreign = other.vertex_by_label(&"u").unwrap();

        let mut set = VertexClusterSet::new(&g);
        let mut cluster = ids(&g, &["a"]);
        cluster.push(foreign);
        assert!(matches!(
            set.add_cluster(cluster),
            Err(Error::InvalidElement(_))
        ));
        assert!(set.is_empty());
        assert!(set.clusters_of(g.vertex_by_label(&"a").unwrap()).is_none());

        assert!(set.add_cluster(Vec::new()).is_err());
    }

    #[test]
    fn test_sort_by_size_is_stable() {
        let g = sample();
        let mut set = VertexClusterSet::new(&g);
        set.add_cluster(ids(&g, &["a"])).unwrap();
        set.add_cluster(ids(&g, &["b", "c"])).unwrap();
        set.add_cluster(ids(&g, &["e"])).unwrap();
        set.sort_by_size_descending();

        let sizes: Vec<usize> = set.iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![2, 1, 1]);
        let a = g.vertex_by_label(&"a").unwrap();
        assert!(set.cluster_at(1).unwrap().contains(&a));
        assert_eq!(set.clusters_of(a).unwrap()[0], set.cluster_at(1).unwrap());
    }

    #[test]
    fn test_vertex_subgraph_is_induced() {
        let g = sample();
        let mut set = VertexClusterSet::new(&g);
        set.add_cluster(ids(&g, &["a", "b", "c"])).unwrap();
        let sub = set.to_new_subgraph(0).unwrap();
        assert_eq!(sub.vertex_count(), 3);
        assert_eq!(sub.edge_count(), 2);
        assert!(set.to_new_subgraph(1).is_err());
    }

    #[test]
    fn test_edge_subgraph_keeps_only_cluster_edges() {
        let g = sample();
        let ab = g.find_edge(ids(&g, &["a"])[0], ids(&g, &["b"])[0]).unwrap();
        let mut set = EdgeClusterSet::new(&g);
        set.add_cluster([ab]).unwrap();
        let sub = set.to_new_subgraph(0).unwrap();
        assert_eq!(sub.vertex_count(), 2);
        assert_eq!(sub.edge_count(), 1);
    }

    #[test]
    fn test_retarget_maps_by_label() {
        let g = sample();
        let mut copy = LabeledGraph::new_undirected();
        copy.add_vertex("e");
        copy.connect("d", "c");
        copy.connect("c", "b");
        copy.connect("b", "a");

        let mut set = VertexClusterSet::new(&g);
        set.add_cluster(ids(&g, &["a", "e"])).unwrap();
        let moved = set.retarget(&copy).unwrap();
        let expected: Cluster<VertexId> = ids(&copy, &["a", "e"]).into_iter().collect();
        assert_eq!(moved.cluster_at(0), Some(&expected));
        assert!(std::ptr::eq(moved.graph(), &copy));
    }

    #[test]
    fn test_retarget_fails_without_counterpart() {
        let g = sample();
        let mut partial = LabeledGraph::new_undirected();
        partial.connect("a", "b");

        let mut set = VertexClusterSet::new(&g);
        set.add_cluster(ids(&g, &["a"])).unwrap();
        set.add_cluster(ids(&g, &["e"])).unwrap();
        assert!(matches!(
            set.retarget(&partial),
            Err(Error::NoEquivalentElement(_))
        ));
    }
}
