//! Build and search configuration.

use crate::RetrieveError;

/// Random projection forest parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RpForestParams {
    /// Maximum number of items in a leaf.
    ///
    /// `None` uses `dimension + 2`, roughly the point where a leaf's id list
    /// costs as much memory as a split node's hyperplane.
    pub leaf_capacity: Option<usize>,

    /// Trees per dimension when the tree count is [`TreeCount::Auto`].
    pub auto_trees_per_dimension: f32,

    /// Default search budget is `n * n_trees * search_k_multiplier` candidates.
    pub search_k_multiplier: f32,

    /// Random pivot pairs tried per split. Must be at least 1.
    pub max_split_attempts: usize,

    /// A cut whose larger side holds more than this fraction of the items is
    /// retried with a fresh pair. When every attempt is lopsided the most
    /// balanced two-sided cut is kept.
    pub max_split_imbalance: f32,

    /// Two-means refinement steps applied to the sampled pivot pair.
    /// Zero keeps the plain random-pair bisector.
    pub two_means_steps: usize,

    /// Seed for deterministic builds; `None` draws one from OS entropy.
    pub seed: Option<u64>,

    /// Build trees on the rayon pool (needs the `parallel` feature).
    pub parallel_build: bool,
}

impl Default for RpForestParams {
    fn default() -> Self {
        Self {
            leaf_capacity: None,
            auto_trees_per_dimension: 1.0,
            search_k_multiplier: 1.0,
            max_split_attempts: 3,
            max_split_imbalance: 0.95,
            two_means_steps: 0,
            seed: None,
            parallel_build: true,
        }
    }
}

impl RpForestParams {
    /// Leaf capacity for vectors of `dimension` components.
    #[must_use]
    pub fn leaf_capacity_for(&self, dimension: usize) -> usize {
        self.leaf_capacity.unwrap_or(dimension + 2).max(1)
    }

    /// Tree count selected by [`TreeCount::Auto`] for `dimension`.
    #[must_use]
    pub fn auto_tree_count(&self, dimension: usize) -> usize {
        ((dimension as f32 * self.auto_trees_per_dimension).ceil() as usize).max(1)
    }

    pub(crate) fn validate(&self) -> Result<(), RetrieveError> {
        if self.leaf_capacity == Some(0) {
            return Err(RetrieveError::InvalidParameter(
                "leaf_capacity must be greater than 0".to_string(),
            ));
        }
        if self.max_split_attempts == 0 {
            return Err(RetrieveError::InvalidParameter(
                "max_split_attempts must be greater than 0".to_string(),
            ));
        }
        if !(self.auto_trees_per_dimension > 0.0) {
            return Err(RetrieveError::InvalidParameter(format!(
                "auto_trees_per_dimension must be positive, got {}",
                self.auto_trees_per_dimension
            )));
        }
        if !(self.search_k_multiplier > 0.0) {
            return Err(RetrieveError::InvalidParameter(format!(
                "search_k_multiplier must be positive, got {}",
                self.search_k_multiplier
            )));
        }
        if !(self.max_split_imbalance >= 0.5 && self.max_split_imbalance <= 1.0) {
            return Err(RetrieveError::InvalidParameter(format!(
                "max_split_imbalance must be in [0.5, 1.0], got {}",
                self.max_split_imbalance
            )));
        }
        Ok(())
    }
}

/// Number of trees to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TreeCount {
    /// Derived from the dimension, see [`RpForestParams::auto_tree_count`].
    #[default]
    Auto,
    /// Exactly this many trees.
    Fixed(usize),
}

impl TreeCount {
    /// Decode the integer convention: `-1` is auto, positive is fixed.
    pub fn from_raw(n: i32) -> Result<Self, RetrieveError> {
        match n {
            -1 => Ok(TreeCount::Auto),
            n if n > 0 => Ok(TreeCount::Fixed(n as usize)),
            n => Err(RetrieveError::InvalidParameter(format!(
                "tree count must be positive or -1 (auto), got {n}"
            ))),
        }
    }

    pub(crate) fn resolve(self, params: &RpForestParams, dimension: usize) -> usize {
        match self {
            TreeCount::Auto => params.auto_tree_count(dimension),
            TreeCount::Fixed(n) => n,
        }
    }
}

/// Per-query options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Candidate budget; `None` uses `n * n_trees * search_k_multiplier`.
    pub search_k: Option<usize>,
    /// Drop the query item from by-item results.
    pub exclude_self: bool,
}

impl SearchOptions {
    #[must_use]
    pub fn with_search_k(mut self, search_k: usize) -> Self {
        self.search_k = Some(search_k);
        self
    }

    #[must_use]
    pub fn excluding_self(mut self) -> Self {
        self.exclude_self = true;
        self
    }
}
