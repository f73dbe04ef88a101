//! Labelled graph representation shared by every clusterer

use crate::error::{Error, Result};
use petgraph::stable_graph::StableGraph;
use petgraph::visit::{EdgeRef, NodeIndexable};
use petgraph::{Directed, Direction};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::Hash;

/// Vertex identity inside a [`LabeledGraph`].
pub type VertexId = petgraph::graph::NodeIndex;

/// Edge identity inside a [`LabeledGraph`].
pub type EdgeId = petgraph::graph::EdgeIndex;

/// Bounds a vertex label must satisfy.
///
/// Labels are unique within a graph and are what ties a vertex to its
/// counterpart in another graph instance.
pub trait VertexLabel: Clone + Eq + Hash + Ord + fmt::Debug + Send + Sync {}

impl<T> VertexLabel for T where T: Clone + Eq + Hash + Ord + fmt::Debug + Send + Sync {}

/// Graph with uniquely labelled vertices and unlabelled edges.
///
/// Backed by a [`StableGraph`], so vertex and edge ids survive edge removal
/// and cloning. Undirected graphs are stored with an arbitrary orientation and
/// every query ignores it.
#[derive(Debug, Clone)]
pub struct LabeledGraph<K> {
    /// Underlying storage
    inner: StableGraph<K, (), Directed>,

    /// Label to vertex lookup
    index: HashMap<K, VertexId>,

    /// Directed/undirected discriminator
    directed: bool,
}

impl<K: VertexLabel> LabeledGraph<K> {
    /// Create an empty undirected graph
    pub fn new_undirected() -> Self {
        Self::with_capacity(false, 0, 0)
    }

    /// Create an empty directed graph
    pub fn new_directed() -> Self {
        Self::with_capacity(true, 0, 0)
    }

    /// Create an empty graph with pre-allocated capacity
    pub fn with_capacity(directed: bool, vertex_count: usize, edge_count: usize) -> Self {
        Self {
            inner: StableGraph::with_capacity(vertex_count, edge_count),
            index: HashMap::with_capacity(vertex_count),
            directed,
        }
    }

    /// Whether edges have a direction
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Add a vertex, returning the existing one if the label is already present
    pub fn add_vertex(&mut self, label: K) -> VertexId {
        if let Some(&v) = self.index.get(&label) {
            return v;
        }
        let v = self.inner.add_node(label.clone());
        self.index.insert(label, v);
        v
    }

    /// Add an edge between two existing vertices
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> Result<EdgeId> {
        for v in [a, b] {
            if !self.contains_vertex(v) {
                return Err(Error::InvalidElement(format!("{:?}", v)));
            }
        }
        Ok(self.inner.add_edge(a, b, ()))
    }

    /// Add an edge between two labels, creating the vertices as needed
    pub fn connect(&mut self, a: K, b: K) -> EdgeId {
        let a = self.add_vertex(a);
        let b = self.add_vertex(b);
        self.inner.add_edge(a, b, ())
    }

    /// Remove an edge, returning its endpoints if it existed
    pub fn remove_edge(&mut self, e: EdgeId) -> Option<(VertexId, VertexId)> {
        let endpoints = self.inner.edge_endpoints(e)?;
        self.inner.remove_edge(e);
        Some(endpoints)
    }

    /// Vertex ids in ascending order
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.inner.node_indices()
    }

    /// Edge ids in ascending order
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.inner.edge_indices()
    }

    pub fn vertex_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Upper bound on `VertexId::index()` for flat per-vertex arrays
    pub fn vertex_bound(&self) -> usize {
        self.inner.node_bound()
    }

    /// Upper bound on `EdgeId::index()` for flat per-edge arrays
    pub fn edge_bound(&self) -> usize {
        self.inner
            .edge_indices()
            .map(|e| e.index() + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn contains_vertex(&self, v: VertexId) -> bool {
        self.inner.contains_node(v)
    }

    pub fn contains_edge(&self, e: EdgeId) -> bool {
        self.inner.edge_weight(e).is_some()
    }

    /// Neighbour set of `v` ignoring direction, sorted and without duplicates
    pub fn neighbors(&self, v: VertexId) -> Vec<VertexId> {
        let mut out: Vec<VertexId> = self.inner.neighbors_undirected(v).collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Edges that can be traversed out of `v`, paired with the far endpoint.
    ///
    /// For undirected graphs every incident edge is traversable; a self-loop
    /// is listed once.
    pub fn incident(&self, v: VertexId) -> Vec<(EdgeId, VertexId)> {
        let mut out: Vec<(EdgeId, VertexId)> = self
            .inner
            .edges_directed(v, Direction::Outgoing)
            .map(|e| (e.id(), e.target()))
            .collect();
        if !self.directed {
            out.extend(
                self.inner
                    .edges_directed(v, Direction::Incoming)
                    .filter(|e| e.source() != e.target())
                    .map(|e| (e.id(), e.source())),
            );
        }
        out
    }

    /// Number of incident edges (in + out for directed graphs)
    pub fn degree(&self, v: VertexId) -> usize {
        self.inner.edges_directed(v, Direction::Outgoing).count()
            + self.inner.edges_directed(v, Direction::Incoming).count()
    }

    /// Look up an edge from `a` to `b` (either orientation when undirected)
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        if self.directed {
            self.inner.find_edge(a, b)
        } else {
            self.inner.find_edge_undirected(a, b).map(|(e, _)| e)
        }
    }

    pub fn endpoints(&self, e: EdgeId) -> Option<(VertexId, VertexId)> {
        self.inner.edge_endpoints(e)
    }

    pub fn label(&self, v: VertexId) -> Option<&K> {
        self.inner.node_weight(v)
    }

    pub fn vertex_by_label(&self, label: &K) -> Option<VertexId> {
        self.index.get(label).copied()
    }

    /// The vertex of `self` that corresponds to `v` in `other`
    pub fn equivalent_vertex(&self, other: &LabeledGraph<K>, v: VertexId) -> Option<VertexId> {
        other.label(v).and_then(|label| self.vertex_by_label(label))
    }

    /// The edge of `self` joining the counterparts of `e`'s endpoints in `other`
    pub fn equivalent_edge(&self, other: &LabeledGraph<K>, e: EdgeId) -> Option<EdgeId> {
        let (a, b) = other.endpoints(e)?;
        let a = self.equivalent_vertex(other, a)?;
        let b = self.equivalent_vertex(other, b)?;
        self.find_edge(a, b)
    }

    /// New graph with the given vertices and every edge between them
    pub fn induced_subgraph(&self, vertices: &BTreeSet<VertexId>) -> LabeledGraph<K> {
        let mut sub = LabeledGraph::with_capacity(self.directed, vertices.len(), 0);
        for &v in vertices {
            if let Some(label) = self.label(v) {
                sub.add_vertex(label.clone());
            }
        }
        for e in self.edges() {
            if let Some((a, b)) = self.endpoints(e) {
                if vertices.contains(&a) && vertices.contains(&b) {
                    self.copy_edge_into(&mut sub, a, b);
                }
            }
        }
        sub
    }

    /// New graph with the given edges and their endpoints
    pub fn edge_subgraph(&self, edges: &BTreeSet<EdgeId>) -> LabeledGraph<K> {
        let mut sub = LabeledGraph::with_capacity(self.directed, edges.len() * 2, edges.len());
        for &e in edges {
            if let Some((a, b)) = self.endpoints(e) {
                self.copy_edge_into(&mut sub, a, b);
            }
        }
        sub
    }

    fn copy_edge_into(&self, sub: &mut LabeledGraph<K>, a: VertexId, b: VertexId) {
        if let (Some(la), Some(lb)) = (self.label(a), self.label(b)) {
            sub.connect(la.clone(), lb.clone());
        }
    }

    /// Edge endpoint labels, useful for comparing edge sets across instances
    pub fn edge_labels(&self) -> Vec<(K, K)> {
        self.edges()
            .filter_map(|e| {
                let (a, b) = self.endpoints(e)?;
                let (la, lb) = (self.label(a)?.clone(), self.label(b)?.clone());
                if !self.directed && lb < la {
                    Some((lb, la))
                } else {
                    Some((la, lb))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_vertex_is_idempotent_per_label() {
        let mut g = LabeledGraph::new_undirected();
        let a = g.add_vertex("a");
        let again = g.add_vertex("a");
        assert_eq!(a, again);
        assert_eq!(g.vertex_count(), 1);
    }

    #[test]
    fn test_undirected_queries_ignore_orientation() {
        let mut g = LabeledGraph::new_undirected();
        let e = g.connect("a", "b");
        let a = g.vertex_by_label(&"a").unwrap();
        let b = g.vertex_by_label(&"b").unwrap();

        assert_eq!(g.find_edge(b, a), Some(e));
        assert_eq!(g.neighbors(b), vec![a]);
        assert_eq!(g.incident(b), vec![(e, a)]);
    }

    #[test]
    fn test_undirected_self_loop_listed_once() {
        let mut g = LabeledGraph::new_undirected();
        let ab = g.connect("a", "b");
        let aa = g.connect("a", "a");
        let a = g.vertex_by_label(&"a").unwrap();
        let b = g.vertex_by_label(&"b").unwrap();

        let mut incident = g.incident(a);
        incident.sort();
        assert_eq!(incident, vec![(ab, b), (aa, a)]);
    }

    #[test]
    fn test_vertex_bound_covers_all_ids() {
        let mut g = LabeledGraph::new_undirected();
        g.connect(1u32, 2);
        g.add_vertex(3);
        assert_eq!(g.vertex_bound(), 3);
        assert!(g.vertices().all(|v| v.index() < g.vertex_bound()));
    }

    #[test]
    fn test_directed_find_edge_respects_direction() {
        let mut g = LabeledGraph::new_directed();
        let e = g.connect("a", "b");
        let a = g.vertex_by_label(&"a").unwrap();
        let b = g.vertex_by_label(&"b").unwrap();

        assert_eq!(g.find_edge(a, b), Some(e));
        assert_eq!(g.find_edge(b, a), None);
        assert!(g.incident(b).is_empty());
        assert_eq!(g.neighbors(b), vec![a]);
    }

    #[test]
    fn test_add_edge_rejects_foreign_vertex() {
        let mut g: LabeledGraph<&str> = LabeledGraph::new_undirected();
        let a = g.add_vertex("a");
        let result = g.add_edge(a, VertexId::new(7));
        assert!(matches!(result, Err(Error::InvalidElement(_))));
    }

    #[test]
    fn test_remove_edge_keeps_ids_stable() {
        let mut g = LabeledGraph::new_undirected();
        let ab = g.connect("a", "b");
        let bc = g.connect("b", "c");

        assert!(g.remove_edge(ab).is_some());
        assert!(g.remove_edge(ab).is_none());
        assert!(g.contains_edge(bc));
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.vertex_count(), 3);
    }

    #[test]
    fn test_equivalent_elements_match_by_label() {
        let mut g = LabeledGraph::new_undirected();
        g.add_vertex("z");
        let e = g.connect("a", "b");

        let mut h = LabeledGraph::new_undirected();
        let he = h.connect("b", "a");

        let a = g.vertex_by_label(&"a").unwrap();
        assert_eq!(h.equivalent_vertex(&g, a), h.vertex_by_label(&"a"));
        assert_eq!(h.equivalent_edge(&g, e), Some(he));
        let z = g.vertex_by_label(&"z").unwrap();
        assert_eq!(h.equivalent_vertex(&g, z), None);
    }

    #[test]
    fn test_induced_subgraph_keeps_internal_edges_only() {
        let mut g = LabeledGraph::new_undirected();
        g.connect(1, 2);
        g.connect(2, 3);
        g.connect(3, 4);
        let keep: BTreeSet<_> = [1, 2, 3]
            .iter()
            .map(|l| g.vertex_by_label(l).unwrap())
            .collect();

        let sub = g.induced_subgraph(&keep);
        assert_eq!(sub.vertex_count(), 3);
        assert_eq!(sub.edge_count(), 2);
        assert!(sub.vertex_by_label(&4).is_none());
    }
}
