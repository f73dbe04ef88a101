//! K-means clustering over labelled points.
//!
//! Lloyd's algorithm: seed `k` centroids from distinct input vectors, assign
//! every point to its nearest centroid, move each centroid to the mean of its
//! points, and repeat until no centroid moves further than the convergence
//! threshold or the iteration budget runs out.
//!
//! # Seeding
//!
//! Candidate centroids are drawn uniformly at random without replacement.
//! A candidate equal (component-wise) to an already chosen centroid is
//! skipped. If every point has been tried before `k` distinct vectors turn
//! up, the run fails with [`Error::NotEnoughDistinctPoints`]; callers that
//! split data repeatedly treat this as "nothing left to split".
//!
//! # Ties
//!
//! A point equidistant from several centroids goes to the one that comes
//! first in centroid order, which is the order the seeds were drawn in.

use crate::config::ClusteringConfig;
use crate::error::{Error, Result};
use rand::prelude::*;
use std::collections::BTreeMap;

/// One output cluster: its final centroid and the points assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Centroid<K> {
    /// Component-wise mean of the members (or the seed if none were assigned)
    pub centroid: Vec<f64>,
    /// Points assigned to this centroid
    pub members: BTreeMap<K, Vec<f64>>,
}

/// Result of one k-means run with convergence diagnostics.
#[derive(Debug, Clone)]
pub struct KMeansRun<K> {
    /// Exactly `k` clusters, in seed order
    pub clusters: Vec<Centroid<K>>,
    /// Update steps performed
    pub iterations: usize,
    /// Largest centroid displacement in the last update step
    /// (infinite when no update step ran)
    pub max_movement: f64,
}

/// Lloyd's k-means over points keyed by `K`.
#[derive(Debug, Clone)]
pub struct KMeansClusterer {
    /// Maximum update steps
    max_iterations: usize,
    /// Stop once no centroid moves further than this
    convergence_threshold: f64,
    /// Random source for seeding
    rng: StdRng,
}

impl Default for KMeansClusterer {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            convergence_threshold: 0.001,
            rng: StdRng::from_os_rng(),
        }
    }
}

impl KMeansClusterer {
    /// Create a clusterer; the threshold must be positive.
    pub fn new(max_iterations: usize, convergence_threshold: f64) -> Result<Self> {
        if !(convergence_threshold > 0.0) {
            return Err(Error::invalid_parameter(
                "convergence_threshold",
                format!("must be positive, got {convergence_threshold}"),
            ));
        }
        Ok(Self {
            max_iterations,
            convergence_threshold,
            rng: StdRng::from_os_rng(),
        })
    }

    /// Create a clusterer from the k-means section of a config
    pub fn from_config(config: &ClusteringConfig) -> Result<Self> {
        let mut clusterer = Self::new(config.max_iterations, config.convergence_threshold)?;
        if let Some(seed) = config.seed {
            clusterer.set_seed(seed);
        }
        Ok(clusterer)
    }

    /// Reseed the random source for reproducible runs
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn convergence_threshold(&self) -> f64 {
        self.convergence_threshold
    }

    /// Partition `points` into `k` clusters.
    pub fn cluster<K: Ord + Clone>(
        &mut self,
        points: &BTreeMap<K, Vec<f64>>,
        k: usize,
    ) -> Result<Vec<Centroid<K>>> {
        self.cluster_with_stats(points, k).map(|run| run.clusters)
    }

    /// Partition `points` into `k` clusters, reporting how the run converged.
    pub fn cluster_with_stats<K: Ord + Clone>(
        &mut self,
        points: &BTreeMap<K, Vec<f64>>,
        k: usize,
    ) -> Result<KMeansRun<K>> {
        if k < 2 || k > points.len() {
            return Err(Error::invalid_parameter(
                "k",
                format!("must be in 2..={}, got {k}", points.len()),
            ));
        }
        let dimension = points.values().next().map_or(0, Vec::len);
        if points.values().any(|p| p.len() != dimension) {
            return Err(Error::invalid_parameter(
                "points",
                "all points must have the same dimension",
            ));
        }

        let mut centroids = self.seed_centroids(points, k)?;
        let mut assignment = assign(points, &centroids);
        let mut iterations = 0;
        let mut max_movement = f64::INFINITY;

        while iterations < self.max_iterations && max_movement > self.convergence_threshold {
            let updated: Vec<Vec<f64>> = centroids
                .iter()
                .zip(&assignment)
                .map(|(old, members)| mean(members, dimension).unwrap_or_else(|| old.clone()))
                .collect();

            max_movement = centroids
                .iter()
                .zip(&updated)
                .map(|(a, b)| squared_distance(a, b).sqrt())
                .fold(0.0, f64::max);
            centroids = updated;
            assignment = assign(points, &centroids);
            iterations += 1;

            log::debug!(
                "k-means iteration {}: max centroid movement {:.6}",
                iterations,
                max_movement
            );
        }

        let clusters = centroids
            .into_iter()
            .zip(assignment)
            .map(|(centroid, members)| Centroid { centroid, members })
            .collect();

        Ok(KMeansRun {
            clusters,
            iterations,
            max_movement,
        })
    }

    /// Draw `k` distinct point vectors as initial centroids
    fn seed_centroids<K>(
        &mut self,
        points: &BTreeMap<K, Vec<f64>>,
        k: usize,
    ) -> Result<Vec<Vec<f64>>> {
        let mut candidates: Vec<&Vec<f64>> = points.values().collect();
        candidates.shuffle(&mut self.rng);

        let mut seeds: Vec<Vec<f64>> = Vec::with_capacity(k);
        for candidate in candidates {
            if seeds.iter().any(|s| s == candidate) {
                continue;
            }
            seeds.push(candidate.clone());
            if seeds.len() == k {
                return Ok(seeds);
            }
        }

        Err(Error::NotEnoughDistinctPoints {
            requested: k,
            distinct: seeds.len(),
        })
    }
}

/// Squared Euclidean distance
fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Component-wise mean, or `None` for an empty cluster
fn mean<K>(members: &BTreeMap<K, Vec<f64>>, dimension: usize) -> Option<Vec<f64>> {
    if members.is_empty() {
        return None;
    }
    let mut sum = vec![0.0; dimension];
    for point in members.values() {
        for (s, x) in sum.iter_mut().zip(point) {
            *s += x;
        }
    }
    let n = members.len() as f64;
    Some(sum.into_iter().map(|s| s / n).collect())
}

/// Assign every point to its nearest centroid; ties go to the earlier centroid
fn assign<K: Ord + Clone>(
    points: &BTreeMap<K, Vec<f64>>,
    centroids: &[Vec<f64>],
) -> Vec<BTreeMap<K, Vec<f64>>> {
    let mut clusters: Vec<BTreeMap<K, Vec<f64>>> = vec![BTreeMap::new(); centroids.len()];
    for (key, point) in points {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, centroid) in centroids.iter().enumerate() {
            let dist = squared_distance(point, centroid);
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        clusters[best].insert(key.clone(), point.clone());
    }
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(raw: &[(&'static str, &[f64])]) -> BTreeMap<&'static str, Vec<f64>> {
        raw.iter().map(|&(k, v)| (k, v.to_vec())).collect()
    }

    fn seeded(max_iterations: usize, threshold: f64, seed: u64) -> KMeansClusterer {
        let mut kmeans = KMeansClusterer::new(max_iterations, threshold).unwrap();
        kmeans.set_seed(seed);
        kmeans
    }

    fn two_blobs() -> BTreeMap<&'static str, Vec<f64>> {
        points(&[
            ("a", &[0.0, 0.0]),
            ("b", &[0.2, 0.0]),
            ("c", &[10.0, 10.0]),
            ("d", &[10.2, 10.0]),
        ])
    }

    #[test]
    fn test_separates_two_blobs() {
        let clusters = seeded(100, 1e-6, 42).cluster(&two_blobs(), 2).unwrap();
        assert_eq!(clusters.len(), 2);

        let with_a = clusters.iter().find(|c| c.members.contains_key("a")).unwrap();
        assert!(with_a.members.contains_key("b"));
        assert!(!with_a.members.contains_key("c"));
        assert!((with_a.centroid[0] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_converged_run_stops_with_zero_movement() {
        let run = seeded(100, 1e-9, 7).cluster_with_stats(&two_blobs(), 2).unwrap();
        assert!(run.iterations < 100);
        assert_eq!(run.max_movement, 0.0);

        // Same seed, same answer
        let again = seeded(100, 1e-9, 7).cluster_with_stats(&two_blobs(), 2).unwrap();
        assert_eq!(run.clusters, again.clusters);
    }

    #[test]
    fn test_zero_iterations_keeps_seed_centroids() {
        let data = two_blobs();
        let run = seeded(0, 0.5, 3).cluster_with_stats(&data, 2).unwrap();
        assert_eq!(run.iterations, 0);
        for c in &run.clusters {
            assert!(data.values().any(|p| *p == c.centroid));
        }
        let assigned: usize = run.clusters.iter().map(|c| c.members.len()).sum();
        assert_eq!(assigned, data.len());
    }

    #[test]
    fn test_not_enough_distinct_points() {
        let data = points(&[("a", &[1.0]), ("b", &[1.0]), ("c", &[2.0])]);
        let result = seeded(10, 0.1, 1).cluster(&data, 3);
        assert_eq!(
            result,
            Err(Error::NotEnoughDistinctPoints {
                requested: 3,
                distinct: 2
            })
        );
    }

    #[test]
    fn test_k_out_of_range() {
        let data = points(&[("a", &[1.0]), ("b", &[2.0])]);
        let mut kmeans = seeded(10, 0.1, 1);
        assert!(matches!(
            kmeans.cluster(&data, 3),
            Err(Error::InvalidParameter { name: "k", .. })
        ));
        assert!(matches!(
            kmeans.cluster(&data, 1),
            Err(Error::InvalidParameter { name: "k", .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_threshold() {
        assert!(KMeansClusterer::new(10, 0.0).is_err());
        assert!(KMeansClusterer::new(10, -1.0).is_err());
        assert!(KMeansClusterer::new(10, f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_mixed_dimensions() {
        let data = points(&[("a", &[1.0]), ("b", &[2.0, 3.0])]);
        assert!(seeded(10, 0.1, 1).cluster(&data, 2).is_err());
    }

    #[test]
    fn test_tie_goes_to_first_centroid() {
        let centroids = vec![vec![0.0], vec![2.0]];
        let data = points(&[("mid", &[1.0])]);
        let clusters = assign(&data, &centroids);
        assert!(clusters[0].contains_key("mid"));
        assert!(clusters[1].is_empty());
    }
}
