//! Error types for the clustering engine

use thiserror::Error;

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by graph, cluster-set and clustering operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Malformed constructor or call argument.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// The algorithm does not support this kind of graph.
    #[error("unsupported graph kind: {0}")]
    UnsupportedGraphKind(&'static str),

    /// An element does not belong to the graph it is used with.
    #[error("element {0} does not belong to the underlying graph")]
    InvalidElement(String),

    /// An element has no counterpart in another graph instance.
    #[error("element {0} has no equivalent in the target graph")]
    NoEquivalentElement(String),

    /// K-means could not seed `requested` distinct centroids.
    #[error("cannot form {requested} clusters from {distinct} distinct points")]
    NotEnoughDistinctPoints {
        /// Number of clusters requested.
        requested: usize,
        /// Number of distinct point vectors found.
        distinct: usize,
    },
}

impl Error {
    pub(crate) fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}
