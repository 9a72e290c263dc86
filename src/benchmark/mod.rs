//! Benchmark utilities for ANN evaluation.
//!
//! Recall metrics, seeded synthetic datasets and brute-force ground truth,
//! shared by the integration tests and the criterion benches.
//!
//! Reference: <https://ann-benchmarks.com/>

pub mod datasets;
pub mod metrics;

pub use datasets::{
    compute_all_ground_truth, compute_ground_truth, create_benchmark_dataset,
    create_clustered_dataset, Dataset,
};
pub use metrics::{distance_ratio, mean_recall, precision_at_k, recall_at_k, recall_curve};
