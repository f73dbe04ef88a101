//! Ranking oracles consumed by the clusterers

use crate::error::{Error, Result};
use crate::graph::{EdgeId, LabeledGraph, VertexId, VertexLabel};
use rayon::prelude::*;
use std::collections::{BTreeMap, VecDeque};

/// Graphs with at least this many vertices accumulate sources in parallel
const PARALLEL_VERTEX_THRESHOLD: usize = 1000;

/// Ranks edges by how many shortest paths run through them.
pub trait BetweennessOracle {
    /// Edges with their scores, highest first; ties by ascending edge id.
    fn rank_edges<K: VertexLabel>(&self, graph: &LabeledGraph<K>) -> Vec<(EdgeId, f64)>;

    /// The single highest-ranked edge, if the graph has any edges.
    fn top_edge<K: VertexLabel>(&self, graph: &LabeledGraph<K>) -> Option<EdgeId> {
        self.rank_edges(graph).first().map(|&(e, _)| e)
    }
}

/// Scores every vertex by its potential between a source and a target.
pub trait VoltageOracle {
    /// Potential of every vertex with `source` held high and `target` low.
    fn potentials<K: VertexLabel>(
        &mut self,
        graph: &LabeledGraph<K>,
        source: VertexId,
        target: VertexId,
    ) -> Result<BTreeMap<VertexId, f64>>;

    /// Drop any state cached from earlier calls.
    fn clear(&mut self);
}

/// Unweighted edge betweenness via Brandes' dependency accumulation
#[derive(Debug, Clone, Copy, Default)]
pub struct BrandesBetweenness;

impl BrandesBetweenness {
    pub fn new() -> Self {
        Self
    }

    /// Raw edge scores indexed by `EdgeId::index()`
    pub fn edge_scores<K: VertexLabel>(&self, graph: &LabeledGraph<K>) -> Vec<f64> {
        let vertex_bound = graph.vertex_bound();
        let edge_bound = graph.edge_bound();

        // Adjacency snapshot so each source walks flat vectors
        let mut adjacency: Vec<Vec<(EdgeId, VertexId)>> = vec![Vec::new(); vertex_bound];
        for v in graph.vertices() {
            adjacency[v.index()] = graph.incident(v);
        }
        let sources: Vec<VertexId> = graph.vertices().collect();

        let mut scores = if sources.len() < PARALLEL_VERTEX_THRESHOLD {
            let mut scores = vec![0.0; edge_bound];
            for &s in &sources {
                accumulate_source(s, &adjacency, &mut scores);
            }
            scores
        } else {
            log::debug!("Accumulating betweenness over {} sources in parallel", sources.len());
            sources
                .par_iter()
                .fold(
                    || vec![0.0; edge_bound],
                    |mut acc, &s| {
                        accumulate_source(s, &adjacency, &mut acc);
                        acc
                    },
                )
                .reduce(
                    || vec![0.0; edge_bound],
                    |mut a, b| {
                        for (x, y) in a.iter_mut().zip(b) {
                            *x += y;
                        }
                        a
                    },
                )
        };

        // Each unordered pair was walked from both ends
        if !graph.is_directed() {
            for score in &mut scores {
                *score /= 2.0;
            }
        }
        scores
    }
}

/// Add the dependencies of every edge on shortest paths starting at `source`
fn accumulate_source(
    source: VertexId,
    adjacency: &[Vec<(EdgeId, VertexId)>],
    scores: &mut [f64],
) {
    let n = adjacency.len();
    let mut dist = vec![-1i64; n];
    let mut sigma = vec![0.0f64; n];
    let mut preds: Vec<Vec<(VertexId, EdgeId)>> = vec![Vec::new(); n];
    let mut order = Vec::with_capacity(n);
    let mut queue = VecDeque::new();

    dist[source.index()] = 0;
    sigma[source.index()] = 1.0;
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        order.push(v);
        let dv = dist[v.index()];
        for &(e, w) in &adjacency[v.index()] {
            if dist[w.index()] < 0 {
                dist[w.index()] = dv + 1;
                queue.push_back(w);
            }
            if dist[w.index()] == dv + 1 {
                sigma[w.index()] += sigma[v.index()];
                preds[w.index()].push((v, e));
            }
        }
    }

    let mut delta = vec![0.0f64; n];
    while let Some(w) = order.pop() {
        let coeff = (1.0 + delta[w.index()]) / sigma[w.index()];
        for &(v, e) in &preds[w.index()] {
            let c = sigma[v.index()] * coeff;
            scores[e.index()] += c;
            delta[v.index()] += c;
        }
    }
}

impl BetweennessOracle for BrandesBetweenness {
    fn rank_edges<K: VertexLabel>(&self, graph: &LabeledGraph<K>) -> Vec<(EdgeId, f64)> {
        let scores = self.edge_scores(graph);
        let mut ranked: Vec<(EdgeId, f64)> =
            graph.edges().map(|e| (e, scores[e.index()])).collect();
        // Stable sort keeps ascending edge ids among equal scores
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

/// Random-walk potentials between a source at 1.0 and a target at 0.0
#[derive(Debug, Clone)]
pub struct VoltageRanker {
    /// Maximum relaxation sweeps
    max_iterations: usize,

    /// Stop once no potential changes by more than this
    tolerance: f64,

    /// Potentials from the most recent call
    last: Option<BTreeMap<VertexId, f64>>,
}

impl Default for VoltageRanker {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 0.001,
            last: None,
        }
    }
}

impl VoltageRanker {
    pub fn new(max_iterations: usize, tolerance: f64) -> Result<Self> {
        if !(tolerance > 0.0) {
            return Err(Error::invalid_parameter(
                "tolerance",
                format!("must be positive, got {tolerance}"),
            ));
        }
        Ok(Self {
            max_iterations,
            tolerance,
            last: None,
        })
    }

    /// Potentials cached by the last call to `potentials`
    pub fn last_potentials(&self) -> Option<&BTreeMap<VertexId, f64>> {
        self.last.as_ref()
    }
}

impl VoltageOracle for VoltageRanker {
    fn potentials<K: VertexLabel>(
        &mut self,
        graph: &LabeledGraph<K>,
        source: VertexId,
        target: VertexId,
    ) -> Result<BTreeMap<VertexId, f64>> {
        for v in [source, target] {
            if !graph.contains_vertex(v) {
                return Err(Error::InvalidElement(format!("{:?}", v)));
            }
        }
        if source == target {
            return Err(Error::invalid_parameter(
                "target",
                "source and target must differ",
            ));
        }

        let bound = graph.vertex_bound();
        let vertices: Vec<VertexId> = graph.vertices().collect();
        let mut neighbors: Vec<Vec<VertexId>> = vec![Vec::new(); bound];
        for &v in &vertices {
            neighbors[v.index()] = graph.neighbors(v);
        }

        let mut current = vec![0.0f64; bound];
        current[source.index()] = 1.0;
        let mut next = current.clone();

        for sweep in 0..self.max_iterations {
            let mut max_change: f64 = 0.0;
            for &v in &vertices {
                if v == source || v == target {
                    continue;
                }
                let adj = &neighbors[v.index()];
                if adj.is_empty() {
                    continue;
                }
                let mean = adj.iter().map(|w| current[w.index()]).sum::<f64>() / adj.len() as f64;
                max_change = max_change.max((mean - current[v.index()]).abs());
                next[v.index()] = mean;
            }
            std::mem::swap(&mut current, &mut next);
            if max_change < self.tolerance {
                log::debug!("Voltage potentials settled after {} sweeps", sweep + 1);
                break;
            }
        }

        let potentials: BTreeMap<VertexId, f64> =
            vertices.iter().map(|&v| (v, current[v.index()])).collect();
        self.last = Some(potentials.clone());
        Ok(potentials)
    }

    fn clear(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: u32) -> LabeledGraph<u32> {
        let mut g = LabeledGraph::new_undirected();
        for i in 1..n {
            g.connect(i - 1, i);
        }
        g
    }

    #[test]
    fn test_path_middle_edges_rank_highest() {
        // 0-1-2-3: the middle edge carries 4 of the 6 pairs
        let g = path(4);
        let ranked = BrandesBetweenness::new().rank_edges(&g);
        let (top, score) = ranked[0];
        let (a, b) = g.endpoints(top).unwrap();
        let mut labels = [*g.label(a).unwrap(), *g.label(b).unwrap()];
        labels.sort();
        assert_eq!(labels, [1, 2]);
        assert!((score - 4.0).abs() < 1e-9);
        assert!((ranked[1].1 - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_self_loop_does_not_change_scores() {
        let mut g = path(4);
        let scores_before = BrandesBetweenness::new().edge_scores(&g);
        let looped = g.connect(1, 1);

        let scores = BrandesBetweenness::new().edge_scores(&g);
        assert_eq!(scores[looped.index()], 0.0);
        for (after, before) in scores.iter().zip(&scores_before) {
            assert!((after - before).abs() < 1e-9);
        }
    }

    #[test]
    fn test_ties_break_by_edge_id() {
        // Every edge of a triangle carries exactly one pair
        let mut g = LabeledGraph::new_undirected();
        let first = g.connect('a', 'b');
        g.connect('b', 'c');
        g.connect('c', 'a');
        let ranked = BrandesBetweenness::new().rank_edges(&g);
        assert_eq!(ranked[0].0, first);
        assert!(ranked.iter().all(|&(_, s)| (s - 1.0).abs() < 1e-9));
    }

    #[test]
    fn test_top_edge_of_edgeless_graph() {
        let mut g: LabeledGraph<u32> = LabeledGraph::new_undirected();
        g.add_vertex(1);
        assert_eq!(BrandesBetweenness::new().top_edge(&g), None);
    }

    #[test]
    fn test_voltage_decreases_along_path() {
        let g = path(5);
        let source = g.vertex_by_label(&0).unwrap();
        let target = g.vertex_by_label(&4).unwrap();
        let mut ranker = VoltageRanker::new(1000, 1e-9).unwrap();
        let potentials = ranker.potentials(&g, source, target).unwrap();

        assert_eq!(potentials[&source], 1.0);
        assert_eq!(potentials[&target], 0.0);
        let middle = g.vertex_by_label(&2).unwrap();
        assert!((potentials[&middle] - 0.5).abs() < 1e-3);
        assert!(ranker.last_potentials().is_some());

        ranker.clear();
        assert!(ranker.last_potentials().is_none());
    }

    #[test]
    fn test_voltage_rejects_same_endpoints() {
        let g = path(3);
        let v = g.vertex_by_label(&1).unwrap();
        let mut ranker = VoltageRanker::default();
        assert!(matches!(
            ranker.potentials(&g, v, v),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_voltage_rejects_bad_tolerance() {
        assert!(VoltageRanker::new(10, 0.0).is_err());
    }
}
