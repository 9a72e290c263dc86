//! Error types for spinney.

use thiserror::Error;

/// Errors that can occur during indexing/search operations.
///
/// Every rejected call leaves the index exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RetrieveError {
    /// Metric name is not one of the supported kinds.
    #[error("invalid metric {0:?}, expected \"euclidean\" or \"angular\"")]
    InvalidMetric(String),

    /// Invalid parameter value (dimension, tree count, `n`, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Vector length does not match the index dimension.
    #[error("dimension mismatch: index has {expected} dimensions, vector has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// An item with this id is already stored.
    #[error("item {0} already exists")]
    DuplicateId(u32),

    /// No item with this id is stored.
    #[error("item {0} not found")]
    NotFound(u32),

    /// Zero-magnitude vector under the angular metric.
    #[error("zero-magnitude vector has no direction under the angular metric")]
    ZeroVector,

    /// Mutation attempted after `build`.
    #[error("index is already built")]
    AlreadyBuilt,

    /// Query attempted before `build`.
    #[error("index is not built")]
    NotBuilt,
}

pub type Result<T> = std::result::Result<T, RetrieveError>;
