//! Voltage-based community detection
//!
//! Wu & Huberman style: pick random source/target pairs, compute the
//! potential of every vertex with the source held high and the target low,
//! and split each potential profile in two with k-means. Vertices that keep
//! landing on the same side as a seed vertex form that seed's community.
//! No global betweenness computation is needed.

use crate::cluster::{Centroid, KMeansClusterer, VertexClusterSet, VertexClusterer};
use crate::config::ClusteringConfig;
use crate::error::{Error, Result};
use crate::graph::{LabeledGraph, VertexId, VertexLabel, VoltageOracle, VoltageRanker};
use rand::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Finds up to `num_clusters` communities from voltage candidate splits.
#[derive(Debug, Clone)]
pub struct VoltageClusterer<V = VoltageRanker> {
    /// Random source/target pairs tried per call
    num_candidates: usize,

    /// Groups requested when used through [`VertexClusterer`]
    num_clusters: usize,

    /// Potential calculation between a source and a target
    oracle: V,

    /// Two-way splitter for potentials and co-occurrence counts
    kmeans: KMeansClusterer,

    /// Source/target sampling
    rng: StdRng,
}

impl VoltageClusterer<VoltageRanker> {
    /// Default voltage ranker and k-means parameters
    pub fn new(num_candidates: usize) -> Result<Self> {
        Self::with_parts(
            num_candidates,
            VoltageRanker::default(),
            KMeansClusterer::default(),
        )
    }

    pub fn from_config(config: &ClusteringConfig) -> Result<Self> {
        let oracle = VoltageRanker::new(config.voltage_max_iterations, config.voltage_tolerance)?;
        let kmeans = KMeansClusterer::new(config.max_iterations, config.convergence_threshold)?;
        let mut clusterer = Self::with_parts(config.num_candidates, oracle, kmeans)?;
        clusterer.num_clusters = config.num_clusters;
        if let Some(seed) = config.seed {
            clusterer.set_seed(seed);
        }
        Ok(clusterer)
    }
}

impl<V: VoltageOracle> VoltageClusterer<V> {
    /// Build from an explicit oracle and k-means clusterer
    pub fn with_parts(num_candidates: usize, oracle: V, kmeans: KMeansClusterer) -> Result<Self> {
        if num_candidates < 1 {
            return Err(Error::invalid_parameter(
                "num_candidates",
                "at least one candidate is required",
            ));
        }
        Ok(Self {
            num_candidates,
            num_clusters: 2,
            oracle,
            kmeans,
            rng: StdRng::from_os_rng(),
        })
    }

    /// Number of groups `extract` asks for
    pub fn with_num_clusters(mut self, num_clusters: usize) -> Self {
        self.num_clusters = num_clusters;
        self
    }

    /// Reseed source/target sampling and the inner k-means
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.kmeans.set_seed(seed.wrapping_add(1));
    }

    /// Drop potentials cached by the oracle
    pub fn clear(&mut self) {
        self.oracle.clear();
    }

    /// The community `vertex` belongs to when the graph is split in two
    pub fn community_of<K: VertexLabel>(
        &mut self,
        graph: &LabeledGraph<K>,
        vertex: VertexId,
    ) -> Result<BTreeSet<VertexId>> {
        let groups = self.cluster_internal(graph, Some(vertex), 2)?;
        Ok(groups
            .into_iter()
            .find(|group| group.contains(&vertex))
            .unwrap_or_default())
    }

    /// At most `num_clusters` disjoint groups covering every vertex
    pub fn cluster<K: VertexLabel>(
        &mut self,
        graph: &LabeledGraph<K>,
        num_clusters: usize,
    ) -> Result<Vec<BTreeSet<VertexId>>> {
        self.cluster_internal(graph, None, num_clusters)
    }

    fn cluster_internal<K: VertexLabel>(
        &mut self,
        graph: &LabeledGraph<K>,
        origin: Option<VertexId>,
        num_clusters: usize,
    ) -> Result<Vec<BTreeSet<VertexId>>> {
        if num_clusters < 1 {
            return Err(Error::invalid_parameter(
                "num_clusters",
                "at least one cluster is required",
            ));
        }
        if let Some(v) = origin {
            if !graph.contains_vertex(v) {
                return Err(Error::InvalidElement(format!("{:?}", v)));
            }
        }

        log::info!(
            "Voltage clustering {} vertices into at most {} groups",
            graph.vertex_count(),
            num_clusters
        );

        let vertices: Vec<VertexId> = graph.vertices().collect();
        let mut candidates = self.candidate_splits(graph, origin, &vertices)?;

        // Most frequent vertex comes off the back first
        let mut seeds = seed_ranking(&vertices, &candidates).into_iter().rev();

        let mut remaining: BTreeSet<VertexId> = vertices.iter().copied().collect();
        let mut clusters: Vec<BTreeSet<VertexId>> = Vec::new();

        for round in 0..num_clusters - 1 {
            if remaining.len() < 2 {
                break;
            }
            let seed = match origin {
                Some(v) if round == 0 => Some(v),
                _ => seeds.find(|v| remaining.contains(v)),
            };
            let Some(seed) = seed else {
                break;
            };

            let counts = co_occurrence(&candidates, &remaining, seed);
            let split = match self.kmeans.cluster(&counts, 2) {
                Ok(split) => split,
                Err(Error::NotEnoughDistinctPoints { .. }) => {
                    log::debug!("Remaining vertices are indistinguishable from seed {:?}", seed);
                    break;
                }
                Err(e) => return Err(e),
            };

            let new_cluster = highest_group(split);
            if new_cluster.is_empty() {
                break;
            }
            for candidate in &mut candidates {
                candidate.retain(|v| !new_cluster.contains(v));
            }
            remaining.retain(|v| !new_cluster.contains(v));
            clusters.push(new_cluster);
        }

        if !remaining.is_empty() {
            clusters.push(remaining);
        }

        log::info!("Voltage clustering produced {} groups", clusters.len());
        Ok(clusters)
    }

    /// Two candidate sets per successful voltage split
    fn candidate_splits<K: VertexLabel>(
        &mut self,
        graph: &LabeledGraph<K>,
        origin: Option<VertexId>,
        vertices: &[VertexId],
    ) -> Result<Vec<BTreeSet<VertexId>>> {
        let n = vertices.len();
        let mut candidates = Vec::with_capacity(self.num_candidates * 2);
        if n < 2 {
            return Ok(candidates);
        }

        for _ in 0..self.num_candidates {
            let source = match origin {
                Some(v) => v,
                None => vertices[self.rng.random_range(0..n)],
            };
            let target = loop {
                let t = vertices[self.rng.random_range(0..n)];
                if t != source {
                    break t;
                }
            };

            let points: BTreeMap<VertexId, Vec<f64>> = self
                .oracle
                .potentials(graph, source, target)?
                .into_iter()
                .map(|(v, potential)| (v, vec![potential]))
                .collect();

            match self.kmeans.cluster(&points, 2) {
                Ok(split) => {
                    candidates.extend(
                        split
                            .into_iter()
                            .map(|c| c.members.into_keys().collect::<BTreeSet<_>>())
                            .filter(|set| !set.is_empty()),
                    );
                }
                Err(Error::NotEnoughDistinctPoints { .. }) => {
                    log::debug!(
                        "Discarding candidate {:?} -> {:?}: potentials do not split",
                        source,
                        target
                    );
                }
                Err(e) => return Err(e),
            }
        }

        log::debug!("Generated {} candidate sets", candidates.len());
        Ok(candidates)
    }
}

/// Vertices ordered by how many candidate sets contain them, ascending
fn seed_ranking(vertices: &[VertexId], candidates: &[BTreeSet<VertexId>]) -> Vec<VertexId> {
    let mut occurrences: BTreeMap<VertexId, usize> = vertices.iter().map(|&v| (v, 0)).collect();
    for candidate in candidates {
        for v in candidate {
            if let Some(count) = occurrences.get_mut(v) {
                *count += 1;
            }
        }
    }
    let mut ranking = vertices.to_vec();
    ranking.sort_by_key(|v| occurrences.get(v).copied().unwrap_or(0));
    ranking
}

/// How often each remaining vertex shares a candidate set with `seed`
fn co_occurrence(
    candidates: &[BTreeSet<VertexId>],
    remaining: &BTreeSet<VertexId>,
    seed: VertexId,
) -> BTreeMap<VertexId, Vec<f64>> {
    let mut counts: BTreeMap<VertexId, Vec<f64>> =
        remaining.iter().map(|&v| (v, vec![0.0])).collect();
    for candidate in candidates.iter().filter(|c| c.contains(&seed)) {
        for v in candidate {
            if let Some(count) = counts.get_mut(v) {
                count[0] += 1.0;
            }
        }
    }
    counts
}

/// Members of the group with the larger mean count; the first group wins ties
fn highest_group(split: Vec<Centroid<VertexId>>) -> BTreeSet<VertexId> {
    let mean_of = |c: &Centroid<VertexId>| {
        if c.members.is_empty() {
            f64::NEG_INFINITY
        } else {
            c.members.values().map(|p| p[0]).sum::<f64>() / c.members.len() as f64
        }
    };

    let mut best: Option<(f64, Centroid<VertexId>)> = None;
    for group in split {
        let m = mean_of(&group);
        if best.as_ref().map_or(true, |(best_mean, _)| m > *best_mean) {
            best = Some((m, group));
        }
    }
    best.map(|(_, group)| group.members.into_keys().collect())
        .unwrap_or_default()
}

impl<V: VoltageOracle> VertexClusterer for VoltageClusterer<V> {
    fn extract<'g, K: VertexLabel>(
        &mut self,
        graph: &'g LabeledGraph<K>,
    ) -> Result<VertexClusterSet<'g, K>> {
        let groups = self.cluster(graph, self.num_clusters)?;
        let mut clusters = VertexClusterSet::new(graph);
        for group in groups {
            clusters.add_cluster(group)?;
        }
        Ok(clusters)
    }
}
