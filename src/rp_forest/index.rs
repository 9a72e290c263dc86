//! Index façade: insert, build once, query.

use std::time::Instant;

use rand::Rng;
use tracing::{debug, info, warn};

use super::forest::{Forest, ForestStats};
use super::params::{RpForestParams, SearchOptions, TreeCount};
use super::search::QueryEngine;
use super::store::VectorStore;
use crate::distance::DistanceMetric;
use crate::simd;
use crate::RetrieveError;

/// Random projection forest index.
///
/// Accepts insertions until [`build`](Self::build); afterwards it is
/// read-only and `&self` queries may run from any number of threads.
#[derive(Debug, Clone)]
pub struct RpForestIndex {
    metric: DistanceMetric,
    params: RpForestParams,
    store: VectorStore,
    forest: Option<Forest>,
}

impl RpForestIndex {
    /// Create an empty index with default parameters.
    pub fn new(dimension: usize, metric: DistanceMetric) -> Result<Self, RetrieveError> {
        Self::with_params(dimension, metric, RpForestParams::default())
    }

    /// Create an empty index from a metric name (`"euclidean"` or `"angular"`).
    pub fn from_metric_name(dimension: usize, metric: &str) -> Result<Self, RetrieveError> {
        Self::new(dimension, metric.parse()?)
    }

    /// Create an empty index with explicit parameters.
    pub fn with_params(
        dimension: usize,
        metric: DistanceMetric,
        params: RpForestParams,
    ) -> Result<Self, RetrieveError> {
        if dimension == 0 {
            return Err(RetrieveError::InvalidParameter(
                "dimension must be greater than 0".to_string(),
            ));
        }
        params.validate()?;

        Ok(Self {
            metric,
            params,
            store: VectorStore::new(dimension),
            forest: None,
        })
    }

    /// Use a fixed seed so that builds are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.params.seed = Some(seed);
        self
    }

    /// Add a vector to the index.
    pub fn add(&mut self, id: u32, vector: Vec<f32>) -> Result<(), RetrieveError> {
        self.add_slice(id, &vector)
    }

    /// Add a vector from a borrowed slice.
    pub fn add_slice(&mut self, id: u32, vector: &[f32]) -> Result<(), RetrieveError> {
        if self.is_built() {
            return Err(RetrieveError::AlreadyBuilt);
        }
        self.check_vector(vector)?;
        self.store.insert(id, vector)
    }

    /// Build the forest. Fails with [`RetrieveError::AlreadyBuilt`] on a built
    /// index; call [`unbuild`](Self::unbuild) first to rebuild.
    pub fn build(&mut self, trees: TreeCount) -> Result<(), RetrieveError> {
        if self.is_built() {
            return Err(RetrieveError::AlreadyBuilt);
        }
        let n_trees = trees.resolve(&self.params, self.dimension());
        if n_trees == 0 {
            return Err(RetrieveError::InvalidParameter(
                "tree count must be greater than 0".to_string(),
            ));
        }
        if self.store.is_empty() {
            warn!("building an index with no items");
        }

        let seed = match self.params.seed {
            Some(seed) => seed,
            None => {
                let seed: u64 = rand::rng().random();
                debug!(seed, "no seed configured, drew one from entropy");
                seed
            }
        };

        let started = Instant::now();
        let forest = Forest::build(&self.store, self.metric, &self.params, n_trees, seed);
        info!(
            items = self.store.count(),
            trees = forest.len(),
            leaf_capacity = forest.leaf_capacity(),
            metric = %self.metric,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "built random projection forest"
        );

        self.forest = Some(forest);
        Ok(())
    }

    /// Drop the forest and accept insertions again. Items are kept.
    pub fn unbuild(&mut self) {
        if self.forest.take().is_some() {
            debug!(items = self.store.count(), "forest dropped");
        }
    }

    /// Approximate `n` nearest neighbors of `query`, ascending by distance.
    pub fn search(&self, query: &[f32], n: usize) -> Result<Vec<(u32, f32)>, RetrieveError> {
        self.search_with(query, n, &SearchOptions::default())
    }

    /// [`search`](Self::search) with an explicit candidate budget.
    /// `exclude_self` has no meaning for vector queries and is ignored.
    pub fn search_with(
        &self,
        query: &[f32],
        n: usize,
        options: &SearchOptions,
    ) -> Result<Vec<(u32, f32)>, RetrieveError> {
        let engine = self.engine()?;
        self.check_vector(query)?;
        check_n(n)?;

        let search_k = options.search_k.unwrap_or_else(|| self.default_search_k(n));
        let candidates = engine.candidates(query, search_k);
        Ok(engine.rank(query, &candidates, n, None))
    }

    /// Approximate `n` nearest neighbors of stored item `id`. The item itself
    /// is included (at distance 0) unless excluded through
    /// [`search_by_item_with`](Self::search_by_item_with).
    pub fn search_by_item(&self, id: u32, n: usize) -> Result<Vec<(u32, f32)>, RetrieveError> {
        self.search_by_item_with(id, n, &SearchOptions::default())
    }

    pub fn search_by_item_with(
        &self,
        id: u32,
        n: usize,
        options: &SearchOptions,
    ) -> Result<Vec<(u32, f32)>, RetrieveError> {
        let engine = self.engine()?;
        check_n(n)?;
        let slot = self.store.slot_of(id).ok_or(RetrieveError::NotFound(id))?;
        let query = self.store.vector(slot);

        // One extra candidate makes up for the dropped self-match.
        let (wanted, exclude) = if options.exclude_self {
            (n.saturating_add(1), Some(slot))
        } else {
            (n, None)
        };
        let search_k = options
            .search_k
            .unwrap_or_else(|| self.default_search_k(wanted));
        let candidates = engine.candidates(query, search_k);
        Ok(engine.rank(query, &candidates, n, exclude))
    }

    /// Exact `n` nearest neighbors by linear scan. Works before `build`.
    pub fn brute_force(&self, query: &[f32], n: usize) -> Result<Vec<(u32, f32)>, RetrieveError> {
        self.check_vector(query)?;
        check_n(n)?;

        let mut scored: Vec<(u32, f32)> = self
            .store
            .iter()
            .map(|(id, v)| (id, self.metric.distance(query, v)))
            .collect();
        scored.sort_unstable_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        scored.truncate(n);
        Ok(scored)
    }

    /// Stored vector of item `id`.
    pub fn item_vector(&self, id: u32) -> Result<&[f32], RetrieveError> {
        self.store.get(id)
    }

    /// Exact metric distance between two stored items.
    pub fn distance_between(&self, a: u32, b: u32) -> Result<f32, RetrieveError> {
        Ok(self
            .metric
            .distance(self.store.get(a)?, self.store.get(b)?))
    }

    pub fn len(&self) -> usize {
        self.store.count()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.store.dimension()
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn params(&self) -> &RpForestParams {
        &self.params
    }

    pub fn is_built(&self) -> bool {
        self.forest.is_some()
    }

    /// Number of trees, `0` before `build`.
    pub fn n_trees(&self) -> usize {
        self.forest.as_ref().map_or(0, Forest::len)
    }

    /// The built forest, `None` before `build`.
    pub fn forest(&self) -> Option<&Forest> {
        self.forest.as_ref()
    }

    /// Forest shape, `None` before `build`.
    pub fn forest_stats(&self) -> Option<ForestStats> {
        self.forest.as_ref().map(Forest::stats)
    }

    /// Approximate heap footprint in bytes.
    pub fn size_bytes(&self) -> usize {
        self.store.size_bytes() + self.forest.as_ref().map_or(0, Forest::size_bytes)
    }

    fn engine(&self) -> Result<QueryEngine<'_>, RetrieveError> {
        let forest = self.forest.as_ref().ok_or(RetrieveError::NotBuilt)?;
        Ok(QueryEngine {
            forest,
            store: &self.store,
            metric: self.metric,
        })
    }

    fn default_search_k(&self, n: usize) -> usize {
        let k = (n.saturating_mul(self.n_trees()) as f32 * self.params.search_k_multiplier).ceil();
        (k as usize).max(n)
    }

    fn check_vector(&self, vector: &[f32]) -> Result<(), RetrieveError> {
        if vector.len() != self.dimension() {
            return Err(RetrieveError::DimensionMismatch {
                expected: self.dimension(),
                actual: vector.len(),
            });
        }
        if vector.iter().any(|x| !x.is_finite()) {
            return Err(RetrieveError::InvalidParameter(
                "vector contains NaN or infinite components".to_string(),
            ));
        }
        if self.metric == DistanceMetric::Angular && simd::norm(vector) < simd::NORM_EPSILON {
            return Err(RetrieveError::ZeroVector);
        }
        Ok(())
    }
}

fn check_n(n: usize) -> Result<(), RetrieveError> {
    if n == 0 {
        return Err(RetrieveError::InvalidParameter(
            "n must be greater than 0".to_string(),
        ));
    }
    Ok(())
}
