//! Random Projection Forest (Annoy-style) approximate nearest neighbor search.
//!
//! **Technical Name**: Random Projection Forest (RP forest)
//!
//! # Algorithm
//!
//! - **Build**: each tree recursively cuts the item set with a random
//!   hyperplane equidistant between two sampled items, until a subset fits in
//!   a leaf. Trees are built independently (in parallel with the `parallel`
//!   feature) from per-tree seeds.
//! - **Search**: one priority queue spans all trees. Nodes are expanded in
//!   order of how far the query sits on their side of every hyperplane on
//!   the path, collecting leaf items until `search_k` unique candidates are
//!   found; the candidates are then ranked by exact distance.
//!
//! More trees raise recall at the cost of memory and build time; a larger
//! `search_k` raises recall at the cost of query time. The two are
//! independent knobs.
//!
//! # Usage
//!
//! ```rust
//! use spinney::rp_forest::{RpForestIndex, TreeCount};
//! use spinney::DistanceMetric;
//!
//! # fn main() -> Result<(), spinney::RetrieveError> {
//! let mut index = RpForestIndex::new(3, DistanceMetric::Angular)?.with_seed(42);
//! index.add(0, vec![1.0, 0.0, 0.0])?;
//! index.add(1, vec![0.0, 1.0, 0.0])?;
//! index.add(2, vec![0.0, 0.0, 1.0])?;
//! index.build(TreeCount::Auto)?;
//!
//! let results = index.search_by_item(0, 3)?;
//! assert_eq!(results[0], (0, 0.0));
//! # Ok(())
//! # }
//! ```
//!
//! # References
//!
//! - Dasgupta & Freund (2008): "Random projection trees and low dimensional manifolds"
//! - Bernhardsson (2013): Annoy, <https://github.com/spotify/annoy>

mod forest;
mod index;
mod params;
mod search;
mod split;
mod store;
mod tree;

pub use forest::{Forest, ForestStats};
pub use index::RpForestIndex;
pub use params::{RpForestParams, SearchOptions, TreeCount};
pub use store::VectorStore;
pub use tree::{Node, NodeId, Tree, TreeStats};
