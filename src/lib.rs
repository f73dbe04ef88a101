//! Core library functions for the graph clustering engine
//!
//! Partitions the vertices of a [`LabeledGraph`] by connectivity
//! ([`WeakComponentClusterer`]), biconnectivity ([`BicomponentClusterer`]),
//! edge betweenness ([`EdgeBetweennessClusterer`]) or voltage diffusion
//! ([`VoltageClusterer`]). [`KMeansClusterer`] works on plain labelled points
//! and doubles as a building block for the voltage clusterer.

pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod storage;

pub use cluster::{
    BicomponentClusterer, Cluster, ClusterSet, EdgeBetweennessClusterer, EdgeClusterSet,
    KMeansClusterer, VertexClusterSet, VertexClusterer, VoltageClusterer,
    WeakComponentClusterer,
};
pub use config::ClusteringConfig;
pub use error::{Error, Result};
pub use graph::{EdgeId, LabeledGraph, VertexId};
