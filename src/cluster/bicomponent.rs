//! Biconnected components and articulation points
//!
//! A single depth-first pass per connected component, tracking for every
//! vertex its discovery number and `high`: the earliest-discovered vertex its
//! subtree reaches through one non-tree edge. Discovery numbers count *down*
//! from the vertex count, so "earlier" means "larger" and a child `w` of `v`
//! that cannot reach above `v` satisfies `high[w] <= dfs_num[v]`. When that
//! holds, the tree edges pushed since `(v, w)` form one biconnected component.
//!
//! The search keeps its own frame stack instead of recursing, so depth is
//! limited by heap rather than call-stack size.

use crate::cluster::{VertexClusterSet, VertexClusterer};
use crate::error::{Error, Result};
use crate::graph::{LabeledGraph, VertexId, VertexLabel};
use std::collections::BTreeSet;

/// Splits an undirected graph into biconnected components.
///
/// Each component is reported as its vertex set. Isolated vertices become
/// singleton components and a bridge becomes a two-vertex component.
#[derive(Debug, Clone, Copy, Default)]
pub struct BicomponentClusterer;

/// One suspended visit: the vertex and how far through its neighbours we are
struct Frame {
    vertex: VertexId,
    neighbors: Vec<VertexId>,
    next: usize,
}

/// Per-call search state, indexed by `VertexId::index()`
struct DfsState {
    dfs_num: Vec<usize>,
    high: Vec<usize>,
    parent: Vec<Option<VertexId>>,
}

impl BicomponentClusterer {
    pub fn new() -> Self {
        Self
    }

    /// Biconnected components of an undirected graph
    pub fn components<'g, K: VertexLabel>(
        &self,
        graph: &'g LabeledGraph<K>,
    ) -> Result<VertexClusterSet<'g, K>> {
        if graph.is_directed() {
            return Err(Error::UnsupportedGraphKind(
                "biconnected components require an undirected graph",
            ));
        }

        let bound = graph.vertex_bound();
        let mut state = DfsState {
            dfs_num: vec![0; bound],
            high: vec![0; bound],
            parent: vec![None; bound],
        };
        let mut clusters = VertexClusterSet::new(graph);

        let roots: Vec<VertexId> = graph.vertices().collect();
        for root in roots {
            if state.dfs_num[root.index()] != 0 {
                continue;
            }
            let visited = search_from(graph, root, &mut state, &mut clusters)?;
            if visited == 1 {
                clusters.add_cluster([root])?;
            }
        }

        log::debug!(
            "Found {} biconnected components in {} vertices",
            clusters.len(),
            graph.vertex_count()
        );
        Ok(clusters)
    }

    /// Vertices whose removal disconnects their component
    pub fn articulation_points<K: VertexLabel>(
        &self,
        graph: &LabeledGraph<K>,
    ) -> Result<BTreeSet<VertexId>> {
        let components = self.components(graph)?;
        Ok(graph
            .vertices()
            .filter(|&v| {
                components
                    .clusters_of(v)
                    .is_some_and(|clusters| clusters.len() > 1)
            })
            .collect())
    }
}

/// Depth-first search from `root`; returns the number of vertices visited
fn search_from<K: VertexLabel>(
    graph: &LabeledGraph<K>,
    root: VertexId,
    state: &mut DfsState,
    clusters: &mut VertexClusterSet<'_, K>,
) -> Result<usize> {
    let mut counter = graph.vertex_count();
    let mut visited = 0;
    let mut edge_stack: Vec<(VertexId, VertexId)> = Vec::new();
    let mut frames: Vec<Frame> = Vec::new();

    let mut discover = |v: VertexId, state: &mut DfsState, frames: &mut Vec<Frame>| {
        state.dfs_num[v.index()] = counter;
        state.high[v.index()] = counter;
        counter -= 1;
        visited += 1;
        frames.push(Frame {
            vertex: v,
            neighbors: graph.neighbors(v),
            next: 0,
        });
    };

    discover(root, &mut *state, &mut frames);

    while let Some(frame) = frames.last_mut() {
        let v = frame.vertex;

        if frame.next < frame.neighbors.len() {
            let w = frame.neighbors[frame.next];
            frame.next += 1;

            if state.dfs_num[w.index()] == 0 {
                state.parent[w.index()] = Some(v);
                edge_stack.push((v, w));
                discover(w, &mut *state, &mut frames);
            } else if state.parent[v.index()] != Some(w) {
                // Back edge: never pushed, never descended
                let reach = state.dfs_num[w.index()];
                state.high[v.index()] = state.high[v.index()].max(reach);
            }
            continue;
        }

        // All neighbours done: fold this vertex back into its parent
        frames.pop();
        let w = v;
        let Some(v) = state.parent[w.index()] else {
            continue;
        };
        let w_high = state.high[w.index()];

        if w_high <= state.dfs_num[v.index()] {
            let mut component = BTreeSet::new();
            while let Some((a, b)) = edge_stack.pop() {
                component.insert(a);
                component.insert(b);
                if (a, b) == (v, w) {
                    break;
                }
            }
            clusters.add_cluster(component)?;
        }
        state.high[v.index()] = state.high[v.index()].max(w_high);
    }

    Ok(visited)
}

impl VertexClusterer for BicomponentClusterer {
    fn extract<'g, K: VertexLabel>(
        &mut self,
        graph: &'g LabeledGraph<K>,
    ) -> Result<VertexClusterSet<'g, K>> {
        self.components(graph)
    }
}
