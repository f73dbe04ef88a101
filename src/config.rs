//! Configuration management for the clustering engine

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable parameters shared by the clusterers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Maximum k-means update steps
    pub max_iterations: usize,

    /// K-means stops once no centroid moves further than this
    pub convergence_threshold: f64,

    /// Voltage clusterer: number of random source/target candidate splits
    pub num_candidates: usize,

    /// Voltage ranker: maximum relaxation sweeps
    pub voltage_max_iterations: usize,

    /// Voltage ranker: stop once no potential changes by more than this
    pub voltage_tolerance: f64,

    /// Edge-betweenness clusterer: edges to delete before taking components
    pub num_edges_to_remove: usize,

    /// Voltage clusterer: maximum number of groups to return
    pub num_clusters: usize,

    /// Seed for every randomised step; `None` draws from the OS
    pub seed: Option<u64>,

    /// Drop vertices with fewer incident edges before clustering
    pub min_degree: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            convergence_threshold: 0.001,
            num_candidates: 10,
            voltage_max_iterations: 100,
            voltage_tolerance: 0.001,
            num_edges_to_remove: 1,
            num_clusters: 2,
            seed: None,
            min_degree: 0,
        }
    }
}

impl ClusteringConfig {
    /// Load a configuration from a JSON file; absent fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }
}
