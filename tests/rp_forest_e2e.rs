//! End-to-end tests for the random projection forest index.
//!
//! Covers the documented scenarios, recall against brute force, and
//! concurrent read access after build.

use spinney::benchmark::{
    compute_all_ground_truth, create_clustered_dataset, mean_recall, Dataset,
};
use spinney::{
    ANNIndex, DistanceMetric, RetrieveError, RpForestIndex, RpForestParams, SearchOptions,
    TreeCount,
};

fn index_dataset(
    dataset: &Dataset,
    metric: DistanceMetric,
    trees: usize,
    seed: u64,
) -> RpForestIndex {
    let mut index = RpForestIndex::new(dataset.dimension, metric)
        .expect("Failed to create")
        .with_seed(seed);
    for (i, v) in dataset.train.iter().enumerate() {
        index.add_slice(i as u32, v).expect("Failed to add");
    }
    index.build(TreeCount::Fixed(trees)).expect("Failed to build");
    index
}

fn ids(results: &[(u32, f32)]) -> Vec<u32> {
    results.iter().map(|r| r.0).collect()
}

// =============================================================================
// Documented scenarios
// =============================================================================

#[test]
fn angular_unit_basis() {
    for trees in [-1, 1, 5] {
        let mut index = RpForestIndex::from_metric_name(3, "angular").unwrap();
        index.add(0, vec![1.0, 0.0, 0.0]).unwrap();
        index.add(1, vec![0.0, 1.0, 0.0]).unwrap();
        index.add(2, vec![0.0, 0.0, 1.0]).unwrap();
        index.build(TreeCount::from_raw(trees).unwrap()).unwrap();

        let results = index.search_by_item(0, 3).unwrap();
        assert_eq!(ids(&results), vec![0, 1, 2]);
        assert_eq!(results[0].1, 0.0);
        // Orthogonal: cos = 0, distance sqrt(2 - 0).
        assert!((results[1].1 - std::f32::consts::SQRT_2).abs() < 1e-6);
        assert_eq!(results[1].1, results[2].1);
    }
}

#[test]
fn euclidean_nearest_of_three() {
    let mut index = RpForestIndex::from_metric_name(2, "euclidean").unwrap();
    index.add(0, vec![0.0, 0.0]).unwrap();
    index.add(1, vec![10.0, 0.0]).unwrap();
    index.add(2, vec![0.0, 10.0]).unwrap();
    index.build(TreeCount::Auto).unwrap();

    let results = index.search(&[1.0, 0.0], 1).unwrap();
    assert_eq!(results, vec![(0, 1.0)]);
}

#[test]
fn vector_query_example() {
    let mut index = RpForestIndex::new(3, DistanceMetric::Angular).unwrap();
    index.add(0, vec![1.0, 0.0, 0.0]).unwrap();
    index.add(1, vec![0.0, 1.0, 0.0]).unwrap();
    index.add(2, vec![0.0, 0.0, 1.0]).unwrap();
    index.build(TreeCount::Auto).unwrap();

    let results = index.search(&[1.0, 0.5, 0.5], 100).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].0, 0);
    // Items 1 and 2 are equally far up to rounding.
    assert!((results[1].1 - results[2].1).abs() < 1e-6);
}

#[test]
fn oversized_vector_is_rejected_without_side_effects() {
    let mut index = RpForestIndex::new(3, DistanceMetric::Euclidean).unwrap();
    index.add(0, vec![1.0, 2.0, 3.0]).unwrap();

    let err = index.add(1, vec![1.0, 2.0, 3.0, 4.0]).unwrap_err();
    assert_eq!(
        err,
        RetrieveError::DimensionMismatch {
            expected: 3,
            actual: 4
        }
    );
    assert_eq!(index.len(), 1);
    assert_eq!(index.item_vector(1), Err(RetrieveError::NotFound(1)));
}

#[test]
fn query_before_build_fails() {
    let mut index = RpForestIndex::new(2, DistanceMetric::Euclidean).unwrap();
    index.add(0, vec![0.0, 0.0]).unwrap();
    assert_eq!(index.search(&[0.0, 0.0], 1), Err(RetrieveError::NotBuilt));
    assert_eq!(index.search_by_item(0, 1), Err(RetrieveError::NotBuilt));
}

#[test]
fn invalid_metric_is_rejected() {
    assert_eq!(
        RpForestIndex::from_metric_name(3, "cosine").unwrap_err(),
        RetrieveError::InvalidMetric("cosine".to_string())
    );
}

// =============================================================================
// Recall
// =============================================================================

#[test]
fn full_budget_matches_brute_force() {
    let dataset = create_clustered_dataset(1500, 20, 12, 15, 0.1, 42);
    for metric in [DistanceMetric::Euclidean, DistanceMetric::Angular] {
        let index = index_dataset(&dataset, metric, 4, 7);
        let options = SearchOptions::default().with_search_k(index.len());
        for query in &dataset.test {
            let approx = index.search_with(query, 10, &options).unwrap();
            let exact = index.brute_force(query, 10).unwrap();
            assert_eq!(approx, exact, "{metric}");
        }
    }
}

#[test]
fn recall_on_clustered_data() {
    let k = 10;
    let dataset = create_clustered_dataset(2000, 50, 16, 20, 0.05, 123);

    for metric in [DistanceMetric::Euclidean, DistanceMetric::Angular] {
        let index = index_dataset(&dataset, metric, 20, 1);
        let truth = compute_all_ground_truth(&dataset, k, metric);
        let options = SearchOptions::default().with_search_k(600);
        let retrieved: Vec<Vec<u32>> = dataset
            .test
            .iter()
            .map(|q| ids(&index.search_with(q, k, &options).unwrap()))
            .collect();

        let recall = mean_recall(&truth, &retrieved, k);
        assert!(recall >= 0.9, "{metric}: recall@{k} = {recall:.3}");
    }
}

#[test]
fn recall_grows_with_budget() {
    let k = 10;
    let dataset = create_clustered_dataset(3000, 40, 24, 30, 0.1, 9);
    let index = index_dataset(&dataset, DistanceMetric::Euclidean, 10, 3);
    let truth = compute_all_ground_truth(&dataset, k, DistanceMetric::Euclidean);

    let recall_with = |search_k: usize| {
        let options = SearchOptions::default().with_search_k(search_k);
        let retrieved: Vec<Vec<u32>> = dataset
            .test
            .iter()
            .map(|q| ids(&index.search_with(q, k, &options).unwrap()))
            .collect();
        mean_recall(&truth, &retrieved, k)
    };

    let small = recall_with(k);
    let large = recall_with(1500);
    let full = recall_with(index.len());
    assert!(large >= small, "{large} < {small}");
    assert!((full - 1.0).abs() < 1e-6);
}

#[test]
fn every_item_finds_itself() {
    let dataset = create_clustered_dataset(800, 0, 8, 10, 0.2, 5);
    for metric in [DistanceMetric::Euclidean, DistanceMetric::Angular] {
        let index = index_dataset(&dataset, metric, 3, 11);
        for id in 0..dataset.n_train() as u32 {
            let results = index.search_by_item(id, 1).unwrap();
            assert_eq!(results[0].0, id, "{metric}");
            assert_eq!(results[0].1, 0.0);

            let by_vector = index.search(&dataset.train[id as usize], 1).unwrap();
            assert_eq!(by_vector[0].0, id, "{metric}");
        }
    }
}

// =============================================================================
// Determinism and concurrency
// =============================================================================

#[test]
fn seeded_builds_are_identical() {
    let dataset = create_clustered_dataset(600, 10, 10, 6, 0.1, 77);
    let a = index_dataset(&dataset, DistanceMetric::Angular, 5, 2024);
    let b = index_dataset(&dataset, DistanceMetric::Angular, 5, 2024);
    let c = index_dataset(&dataset, DistanceMetric::Angular, 5, 2025);

    assert_eq!(a.forest(), b.forest());
    assert_ne!(a.forest(), c.forest());
    for q in &dataset.test {
        assert_eq!(a.search(q, 5).unwrap(), b.search(q, 5).unwrap());
    }
}

#[test]
fn serial_build_matches_parallel_build() {
    let dataset = create_clustered_dataset(500, 0, 6, 4, 0.1, 1);
    let build = |parallel_build: bool| {
        let params = RpForestParams {
            parallel_build,
            seed: Some(99),
            ..Default::default()
        };
        let mut index = RpForestIndex::with_params(6, DistanceMetric::Euclidean, params).unwrap();
        for (i, v) in dataset.train.iter().enumerate() {
            index.add_slice(i as u32, v).unwrap();
        }
        index.build(TreeCount::Fixed(8)).unwrap();
        index
    };
    assert_eq!(build(true).forest(), build(false).forest());
}

#[test]
fn concurrent_queries_agree_with_serial_queries() {
    let dataset = create_clustered_dataset(1000, 40, 8, 8, 0.1, 31);
    let index = index_dataset(&dataset, DistanceMetric::Euclidean, 8, 4);
    let expected: Vec<Vec<(u32, f32)>> = dataset
        .test
        .iter()
        .map(|q| index.search(q, 5).unwrap())
        .collect();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let index = &index;
                let dataset = &dataset;
                s.spawn(move || {
                    dataset
                        .test
                        .iter()
                        .skip(t)
                        .step_by(4)
                        .map(|q| index.search(q, 5).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for (t, handle) in handles.into_iter().enumerate() {
            let got = handle.join().expect("query thread panicked");
            let want: Vec<_> = expected.iter().skip(t).step_by(4).cloned().collect();
            assert_eq!(got, want);
        }
    });
}

// =============================================================================
// Forest structure
// =============================================================================

#[test]
fn every_tree_holds_every_item() {
    let dataset = create_clustered_dataset(400, 0, 5, 4, 0.3, 8);
    let index = index_dataset(&dataset, DistanceMetric::Angular, 6, 0);
    let forest = index.forest().expect("built");
    assert_eq!(forest.len(), 6);
    for tree in forest.trees() {
        let mut items: Vec<u32> = tree.leaf_items().collect();
        items.sort_unstable();
        assert_eq!(items, (0..400).collect::<Vec<u32>>());
    }

    let stats = index.forest_stats().expect("built");
    assert_eq!(stats.trees, 6);
    assert_eq!(stats.leaf_capacity, 5 + 2);
    assert_eq!(stats.total_nodes, 2 * stats.total_leaves - 6);
}

#[test]
fn auto_tree_count_follows_dimension() {
    let dataset = create_clustered_dataset(50, 0, 7, 2, 0.1, 0);
    let mut index = RpForestIndex::new(7, DistanceMetric::Euclidean).unwrap();
    for (i, v) in dataset.train.iter().enumerate() {
        index.add_slice(i as u32, v).unwrap();
    }
    index.build(TreeCount::Auto).unwrap();
    assert_eq!(index.n_trees(), 7);
    assert_eq!(index.stats().num_vectors, 50);
}
