//! Graph representation and algorithms module

pub mod algorithms;
pub mod builder;
pub mod labeled;

pub use algorithms::{BetweennessOracle, BrandesBetweenness, VoltageOracle, VoltageRanker};
pub use builder::GraphBuilder;
pub use labeled::{EdgeId, LabeledGraph, VertexId, VertexLabel};
