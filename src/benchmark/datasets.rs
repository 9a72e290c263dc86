//! Seeded synthetic datasets and exact ground truth.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::distance::DistanceMetric;

/// A dataset for ANN benchmarking.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Training vectors (the database to index)
    pub train: Vec<Vec<f32>>,
    /// Test/query vectors
    pub test: Vec<Vec<f32>>,
    /// Vector dimensionality
    pub dimension: usize,
}

impl Dataset {
    pub fn n_train(&self) -> usize {
        self.train.len()
    }

    pub fn n_test(&self) -> usize {
        self.test.len()
    }
}

/// Uniform vectors in `[-1, 1]^d`.
///
/// Centered on the origin so the set is also a sensible angular dataset.
pub fn create_benchmark_dataset(
    n_train: usize,
    n_test: usize,
    dimension: usize,
    seed: u64,
) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sample = |n: usize| -> Vec<Vec<f32>> {
        (0..n)
            .map(|_| {
                (0..dimension)
                    .map(|_| rng.random_range(-1.0f32..1.0))
                    .collect()
            })
            .collect()
    };
    let train = sample(n_train);
    let test = sample(n_test);

    Dataset {
        train,
        test,
        dimension,
    }
}

/// Gaussian blobs around `n_clusters` uniform centers in `[-1, 1]^d`.
///
/// Clustered data is where tree splits pay off; uniform data is the worst case.
pub fn create_clustered_dataset(
    n_train: usize,
    n_test: usize,
    dimension: usize,
    n_clusters: usize,
    cluster_std: f32,
    seed: u64,
) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let n_clusters = n_clusters.max(1);

    let centers: Vec<Vec<f32>> = (0..n_clusters)
        .map(|_| {
            (0..dimension)
                .map(|_| rng.random_range(-1.0f32..1.0))
                .collect()
        })
        .collect();

    let mut sample = |n: usize| -> Vec<Vec<f32>> {
        (0..n)
            .map(|_| {
                let center = &centers[rng.random_range(0..n_clusters)];
                center
                    .iter()
                    .map(|&c| {
                        // Box-Muller
                        let u1: f32 = rng.random_range(f32::EPSILON..1.0);
                        let u2: f32 = rng.random();
                        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
                        c + z * cluster_std
                    })
                    .collect()
            })
            .collect()
    };
    let train = sample(n_train);
    let test = sample(n_test);

    Dataset {
        train,
        test,
        dimension,
    }
}

/// Exact `k` nearest database positions to `query` under `metric`.
pub fn compute_ground_truth(
    query: &[f32],
    database: &[Vec<f32>],
    k: usize,
    metric: DistanceMetric,
) -> Vec<u32> {
    let mut distances: Vec<(u32, f32)> = database
        .iter()
        .enumerate()
        .map(|(i, v)| (i as u32, metric.distance(query, v)))
        .collect();
    distances.sort_unstable_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    distances.into_iter().take(k).map(|(id, _)| id).collect()
}

/// Ground truth for every test query.
pub fn compute_all_ground_truth(
    dataset: &Dataset,
    k: usize,
    metric: DistanceMetric,
) -> Vec<Vec<u32>> {
    dataset
        .test
        .iter()
        .map(|query| compute_ground_truth(query, &dataset.train, k, metric))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datasets_have_requested_shape() {
        let dataset = create_benchmark_dataset(100, 10, 16, 42);
        assert_eq!(dataset.n_train(), 100);
        assert_eq!(dataset.n_test(), 10);
        assert!(dataset.train.iter().all(|v| v.len() == 16));

        let clustered = create_clustered_dataset(200, 20, 8, 5, 0.05, 42);
        assert_eq!(clustered.n_train(), 200);
        assert!(clustered.test.iter().flatten().all(|x| x.is_finite()));
    }

    #[test]
    fn same_seed_same_data() {
        let a = create_clustered_dataset(50, 5, 4, 3, 0.1, 7);
        let b = create_clustered_dataset(50, 5, 4, 3, 0.1, 7);
        assert_eq!(a.train, b.train);
        assert_eq!(a.test, b.test);
    }

    #[test]
    fn ground_truth_follows_metric() {
        let database = vec![vec![10.0, 0.0], vec![0.5, 0.5], vec![0.0, 1.0]];
        let query = [1.0, 0.0];

        let l2 = compute_ground_truth(&query, &database, 2, DistanceMetric::Euclidean);
        assert_eq!(l2, vec![1, 2]);

        // [10, 0] points exactly along the query direction.
        let angular = compute_ground_truth(&query, &database, 2, DistanceMetric::Angular);
        assert_eq!(angular, vec![0, 1]);
    }
}
