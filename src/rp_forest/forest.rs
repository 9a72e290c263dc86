//! Ensemble of independently built trees.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use super::params::RpForestParams;
use super::split::Splitter;
use super::store::VectorStore;
use super::tree::{Tree, TreeStats};
use crate::distance::DistanceMetric;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A built forest. Read-only once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Forest {
    trees: Vec<Tree>,
    leaf_capacity: usize,
}

/// Shape summary of a forest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForestStats {
    pub trees: usize,
    pub leaf_capacity: usize,
    pub total_nodes: usize,
    pub total_leaves: usize,
    pub forced_splits: usize,
    pub max_depth: usize,
    pub per_tree: Vec<TreeStats>,
}

impl Forest {
    /// Build `n_trees` trees over every item in `store`.
    ///
    /// Tree `i` is seeded from `(seed, i)` alone, so the result does not
    /// depend on whether trees were built serially or in parallel.
    pub(crate) fn build(
        store: &VectorStore,
        metric: DistanceMetric,
        params: &RpForestParams,
        n_trees: usize,
        seed: u64,
    ) -> Self {
        let leaf_capacity = params.leaf_capacity_for(store.dimension());
        let splitter = Splitter {
            store,
            metric,
            max_attempts: params.max_split_attempts,
            max_imbalance: params.max_split_imbalance,
            two_means_steps: params.two_means_steps,
        };

        let build_one = |i: usize| {
            let mut rng = StdRng::seed_from_u64(tree_seed(seed, i));
            let slots: Vec<u32> = (0..store.count() as u32).collect();
            let tree = Tree::build(splitter, leaf_capacity, slots, &mut rng);
            let stats = tree.stats();
            debug!(
                tree = i,
                nodes = stats.nodes,
                leaves = stats.leaves,
                depth = stats.depth,
                forced_splits = stats.forced_splits,
                "built tree"
            );
            tree
        };

        #[cfg(feature = "parallel")]
        let trees: Vec<Tree> = if params.parallel_build {
            (0..n_trees).into_par_iter().map(build_one).collect()
        } else {
            (0..n_trees).map(build_one).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let trees: Vec<Tree> = (0..n_trees).map(build_one).collect();

        Self {
            trees,
            leaf_capacity,
        }
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn leaf_capacity(&self) -> usize {
        self.leaf_capacity
    }

    pub fn stats(&self) -> ForestStats {
        let per_tree: Vec<TreeStats> = self.trees.iter().map(Tree::stats).collect();
        ForestStats {
            trees: self.trees.len(),
            leaf_capacity: self.leaf_capacity,
            total_nodes: per_tree.iter().map(|s| s.nodes).sum(),
            total_leaves: per_tree.iter().map(|s| s.leaves).sum(),
            forced_splits: per_tree.iter().map(|s| s.forced_splits).sum(),
            max_depth: per_tree.iter().map(|s| s.depth).max().unwrap_or(0),
            per_tree,
        }
    }

    pub(crate) fn size_bytes(&self) -> usize {
        self.trees.iter().map(Tree::size_bytes).sum()
    }
}

/// Per-tree seed: base seed offset by a Weyl step of the tree index.
fn tree_seed(seed: u64, tree: usize) -> u64 {
    seed.wrapping_add((tree as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}
