//! Evaluation metrics for ANN quality.
//!
//! - Recall@k: fraction of the true k nearest neighbors that were returned
//! - Precision@k: fraction of returned items that are true neighbors
//! - Distance ratio: how much farther the returned neighbors are than the
//!   true ones (1.0 is exact), which still credits a near miss

use std::collections::HashSet;

/// recall@k = |retrieved ∩ ground_truth| / k, over the first `k` of each list.
///
/// Returns `0.0` for `k == 0` or an empty ground truth.
pub fn recall_at_k(ground_truth: &[u32], retrieved: &[u32], k: usize) -> f32 {
    if k == 0 || ground_truth.is_empty() {
        return 0.0;
    }
    let truth: HashSet<u32> = ground_truth.iter().take(k).copied().collect();
    let found: HashSet<u32> = retrieved.iter().take(k).copied().collect();
    found.intersection(&truth).count() as f32 / truth.len() as f32
}

/// precision@k = |retrieved ∩ ground_truth| / |retrieved|, first `k` only.
pub fn precision_at_k(ground_truth: &[u32], retrieved: &[u32], k: usize) -> f32 {
    let retrieved = &retrieved[..retrieved.len().min(k)];
    if retrieved.is_empty() {
        return 0.0;
    }
    let truth: HashSet<u32> = ground_truth.iter().take(k).copied().collect();
    let hits = retrieved.iter().filter(|id| truth.contains(*id)).count();
    hits as f32 / retrieved.len() as f32
}

/// Mean recall@k over paired query results.
pub fn mean_recall(ground_truths: &[Vec<u32>], retrievals: &[Vec<u32>], k: usize) -> f32 {
    if ground_truths.is_empty() {
        return 0.0;
    }
    let total: f32 = ground_truths
        .iter()
        .zip(retrievals)
        .map(|(gt, ret)| recall_at_k(gt, ret, k))
        .sum();
    total / ground_truths.len() as f32
}

/// Recall at each of `k_values`.
pub fn recall_curve(
    ground_truth: &[u32],
    retrieved: &[u32],
    k_values: &[usize],
) -> Vec<(usize, f32)> {
    k_values
        .iter()
        .map(|&k| (k, recall_at_k(ground_truth, retrieved, k)))
        .collect()
}

/// Mean of `retrieved[i] / exact[i]` over positions where both exist and the
/// exact distance is non-zero. Inputs are distances sorted ascending.
pub fn distance_ratio(exact: &[f32], retrieved: &[f32]) -> f32 {
    let ratios: Vec<f32> = exact
        .iter()
        .zip(retrieved)
        .filter(|(e, _)| **e > 0.0)
        .map(|(e, r)| r / e)
        .collect();
    if ratios.is_empty() {
        return 1.0;
    }
    ratios.iter().sum::<f32>() / ratios.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recall_at_k() {
        let gt = vec![1, 2, 3, 4, 5];
        assert!((recall_at_k(&gt, &[1, 2, 3, 6, 7], 5) - 0.6).abs() < 0.001);
        assert!((recall_at_k(&gt, &[5, 4, 3, 2, 1], 5) - 1.0).abs() < 0.001);
        assert_eq!(recall_at_k(&gt, &[6, 7, 8, 9, 10], 5), 0.0);
        assert_eq!(recall_at_k(&gt, &[1], 0), 0.0);
    }

    #[test]
    fn recall_with_short_ground_truth() {
        // Only three items exist, so retrieving all three is perfect recall@10.
        assert!((recall_at_k(&[1, 2, 3], &[3, 2, 1], 10) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_precision_at_k() {
        let gt = vec![1, 2, 3, 4, 5];
        assert!((precision_at_k(&gt, &[1, 2, 6, 7, 8], 5) - 0.4).abs() < 0.001);
        assert_eq!(precision_at_k(&gt, &[], 5), 0.0);
    }

    #[test]
    fn test_mean_recall() {
        let gts = vec![vec![1, 2], vec![3, 4]];
        let rets = vec![vec![1, 2], vec![3, 9]];
        assert!((mean_recall(&gts, &rets, 2) - 0.75).abs() < 0.001);
        assert_eq!(mean_recall(&[], &[], 2), 0.0);
    }

    #[test]
    fn test_recall_curve() {
        let gt = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let retrieved = vec![1, 2, 3, 11, 12, 6, 7, 13, 14, 15];
        let curve = recall_curve(&gt, &retrieved, &[1, 5, 10]);
        assert_eq!(curve.len(), 3);
        assert!((curve[0].1 - 1.0).abs() < 0.001);
        assert!((curve[1].1 - 0.6).abs() < 0.001);
    }

    #[test]
    fn test_distance_ratio() {
        assert_eq!(distance_ratio(&[1.0, 2.0], &[1.0, 2.0]), 1.0);
        assert!((distance_ratio(&[0.0, 1.0, 2.0], &[0.0, 2.0, 2.0]) - 1.5).abs() < 1e-6);
        assert_eq!(distance_ratio(&[], &[]), 1.0);
    }
}
