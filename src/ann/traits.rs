//! Unified traits for ANN indexes.

use crate::rp_forest::{RpForestIndex, TreeCount};
use crate::RetrieveError;

/// Unified trait for ANN index implementations.
pub trait ANNIndex {
    /// Add a vector to the index.
    fn add(&mut self, doc_id: u32, vector: Vec<f32>) -> Result<(), RetrieveError>;

    /// Add a vector to the index from a borrowed slice.
    ///
    /// Default implementation allocates a `Vec<f32>` and calls [`ANNIndex::add`].
    fn add_slice(&mut self, doc_id: u32, vector: &[f32]) -> Result<(), RetrieveError> {
        self.add(doc_id, vector.to_vec())
    }

    /// Build the index (required before search).
    fn build(&mut self) -> Result<(), RetrieveError>;

    /// Search for k nearest neighbors.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<(u32, f32)>, RetrieveError>;

    /// Get index size in bytes (approximate).
    fn size_bytes(&self) -> usize;

    /// Get index statistics.
    fn stats(&self) -> ANNStats;

    /// Get vector dimension.
    fn dimension(&self) -> usize;

    /// Get number of vectors.
    fn num_vectors(&self) -> usize;
}

/// Statistics about an ANN index.
#[derive(Debug, Clone)]
pub struct ANNStats {
    pub num_vectors: usize,
    pub dimension: usize,
    pub size_bytes: usize,
    pub algorithm: String,
}

impl ANNIndex for RpForestIndex {
    fn add(&mut self, doc_id: u32, vector: Vec<f32>) -> Result<(), RetrieveError> {
        RpForestIndex::add(self, doc_id, vector)
    }

    fn add_slice(&mut self, doc_id: u32, vector: &[f32]) -> Result<(), RetrieveError> {
        RpForestIndex::add_slice(self, doc_id, vector)
    }

    /// Builds with [`TreeCount::Auto`].
    fn build(&mut self) -> Result<(), RetrieveError> {
        RpForestIndex::build(self, TreeCount::Auto)
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<(u32, f32)>, RetrieveError> {
        RpForestIndex::search(self, query, k)
    }

    fn size_bytes(&self) -> usize {
        RpForestIndex::size_bytes(self)
    }

    fn stats(&self) -> ANNStats {
        ANNStats {
            num_vectors: self.len(),
            dimension: RpForestIndex::dimension(self),
            size_bytes: RpForestIndex::size_bytes(self),
            algorithm: format!("RPForest({}, trees={})", self.metric(), self.n_trees()),
        }
    }

    fn dimension(&self) -> usize {
        RpForestIndex::dimension(self)
    }

    fn num_vectors(&self) -> usize {
        self.len()
    }
}
