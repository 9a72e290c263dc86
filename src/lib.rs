//! spinney: random projection forest approximate nearest neighbor search.
//!
//! An in-memory index over fixed-dimension `f32` vectors in the style of
//! Annoy: a forest of randomized hyperplane trees, searched best-first across
//! all trees at once, with exact re-ranking of the candidates.
//!
//! - [`rp_forest`]: the index ([`RpForestIndex`]) and its parts
//! - [`distance`]: Euclidean and angular metrics, splitting hyperplanes
//! - [`ann`]: the index-agnostic [`ANNIndex`] trait
//! - [`benchmark`]: recall metrics, synthetic datasets, ground truth
//!
//! ```rust
//! use spinney::{DistanceMetric, RpForestIndex, TreeCount};
//!
//! # fn main() -> Result<(), spinney::RetrieveError> {
//! let mut index = RpForestIndex::new(2, DistanceMetric::Euclidean)?;
//! index.add(0, vec![0.0, 0.0])?;
//! index.add(1, vec![10.0, 0.0])?;
//! index.add(2, vec![0.0, 10.0])?;
//! index.build(TreeCount::from_raw(-1)?)?;
//!
//! let nearest = index.search(&[1.0, 0.0], 1)?;
//! assert_eq!(nearest[0].0, 0);
//! # Ok(())
//! # }
//! ```
//!
//! # Critical Nuances
//!
//! ## Trees vs. search budget
//!
//! The tree count is fixed at build time and trades memory for recall. The
//! per-query `search_k` budget trades latency for recall and can be raised
//! per query. When recall is too low, raising `search_k` is the cheaper
//! first step; adding trees only helps once every tree is already explored
//! deeply.
//!
//! ## Angular metric
//!
//! Angular distance is reported as $\sqrt{2 - 2\cos\theta}$. Zero vectors
//! have no direction and are rejected with [`RetrieveError::ZeroVector`].
//!
//! ## When Exact Search Beats Approximate
//!
//! Below a few thousand vectors [`RpForestIndex::brute_force`] is usually as
//! fast as the forest, and always exact.

pub mod ann;
pub mod benchmark;
pub mod distance;
pub mod error;
pub mod rp_forest;
pub mod simd;

// Re-exports
pub use ann::traits::ANNIndex;
pub use distance::DistanceMetric;
pub use error::{Result, RetrieveError};
pub use rp_forest::{RpForestIndex, RpForestParams, SearchOptions, TreeCount};
