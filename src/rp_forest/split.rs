//! Random hyperplane selection for a subset of items.
//!
//! A split samples two distinct items, optionally pulls them towards the two
//! cluster centres of the subset (two-means), and cuts with the hyperplane
//! equidistant between them. Lopsided cuts are retried with a fresh pair a
//! bounded number of times, keeping the most balanced two-sided cut seen.
//! When every sampled pair leaves one side empty, the subset is cut between
//! an item and the item farthest from it. Only a subset that no hyperplane
//! separates (identical vectors, or parallel ones under the angular metric)
//! is halved in slot order under a zero-normal plane, so recursion terminates.

use rand::Rng;
use tracing::trace;

use super::store::VectorStore;
use crate::distance::{normalize, DistanceMetric, Hyperplane, Side};

/// Result of splitting one subset.
#[derive(Debug)]
pub(crate) struct Split {
    pub(crate) plane: Hyperplane,
    pub(crate) left: Vec<u32>,
    pub(crate) right: Vec<u32>,
}

impl Split {
    /// Fraction of the items on the larger side, in `[0.5, 1.0]`.
    fn imbalance(&self) -> f32 {
        let (l, r) = (self.left.len(), self.right.len());
        l.max(r) as f32 / (l + r) as f32
    }
}

/// Splits subsets of a [`VectorStore`]. Read-only over the store.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Splitter<'a> {
    pub(crate) store: &'a VectorStore,
    pub(crate) metric: DistanceMetric,
    pub(crate) max_attempts: usize,
    pub(crate) max_imbalance: f32,
    pub(crate) two_means_steps: usize,
}

impl Splitter<'_> {
    /// Split `slots` (at least two) into two non-empty groups.
    pub(crate) fn split<R: Rng + ?Sized>(&self, slots: &[u32], rng: &mut R) -> Split {
        debug_assert!(slots.len() >= 2, "cannot split fewer than two items");

        let mut best: Option<Split> = None;
        for _ in 0..self.max_attempts {
            let (p, q) = self.pivots(slots, rng);
            let Some(split) = self.cut(&p, &q, slots) else {
                continue;
            };
            if split.imbalance() <= self.max_imbalance {
                return split;
            }
            let better = match &best {
                Some(b) => split.imbalance() < b.imbalance(),
                None => true,
            };
            if better {
                best = Some(split);
            }
        }
        if let Some(split) = best {
            return split;
        }

        let anchor = slots[rng.random_range(0..slots.len())];
        if let Some(split) = self.farthest_pair_cut(anchor, slots) {
            return split;
        }

        trace!(
            items = slots.len(),
            "all vectors coincide under the metric, forcing split"
        );
        let mid = slots.len() / 2;
        Split {
            plane: Hyperplane::degenerate(self.store.dimension()),
            left: slots[..mid].to_vec(),
            right: slots[mid..].to_vec(),
        }
    }

    /// Cut with the bisector of `p` and `q`; `None` if a side is empty.
    fn cut(&self, p: &[f32], q: &[f32], slots: &[u32]) -> Option<Split> {
        let plane = self.metric.bisector(p, q);
        let (left, right) = self.partition(&plane, slots);
        if left.is_empty() || right.is_empty() {
            return None;
        }
        Some(Split { plane, left, right })
    }

    /// Cut between `anchor` and the item farthest from it. `None` when every
    /// item is at distance zero from the anchor.
    fn farthest_pair_cut(&self, anchor: u32, slots: &[u32]) -> Option<Split> {
        let origin = self.store.vector(anchor);
        let (far, distance) = slots
            .iter()
            .map(|&slot| (slot, self.metric.distance(origin, self.store.vector(slot))))
            .max_by(|a, b| a.1.total_cmp(&b.1))?;
        if distance <= 0.0 {
            return None;
        }
        self.cut(&self.point(anchor), &self.point(far), slots)
    }

    fn partition(&self, plane: &Hyperplane, slots: &[u32]) -> (Vec<u32>, Vec<u32>) {
        let mut left = Vec::with_capacity(slots.len() / 2 + 1);
        let mut right = Vec::with_capacity(slots.len() / 2 + 1);
        for &slot in slots {
            match Side::of(self.metric.margin(plane, self.store.vector(slot))) {
                Side::Left => left.push(slot),
                Side::Right => right.push(slot),
            }
        }
        (left, right)
    }

    /// Two distinct sampled items, refined by two-means when configured.
    ///
    /// Angular pivots are projected onto the unit sphere.
    fn pivots<R: Rng + ?Sized>(&self, slots: &[u32], rng: &mut R) -> (Vec<f32>, Vec<f32>) {
        let n = slots.len();
        let i = rng.random_range(0..n);
        let mut j = rng.random_range(0..n - 1);
        if j >= i {
            j += 1;
        }

        let mut p = self.point(slots[i]);
        let mut q = self.point(slots[j]);
        if self.two_means_steps == 0 {
            return (p, q);
        }

        let (mut p_count, mut q_count) = (1.0_f32, 1.0_f32);
        for _ in 0..self.two_means_steps {
            let x = self.point(slots[rng.random_range(0..n)]);
            let dp = p_count * self.metric.distance(&p, &x);
            let dq = q_count * self.metric.distance(&q, &x);
            if dp < dq {
                absorb(&mut p, &x, p_count);
                p_count += 1.0;
            } else if dq < dp {
                absorb(&mut q, &x, q_count);
                q_count += 1.0;
            }
        }
        (p, q)
    }

    fn point(&self, slot: u32) -> Vec<f32> {
        let v = self.store.vector(slot);
        match self.metric {
            DistanceMetric::Euclidean => v.to_vec(),
            DistanceMetric::Angular => normalize(v),
        }
    }
}

/// Running-mean update of `centre` (weight `count`) with `x`.
fn absorb(centre: &mut [f32], x: &[f32], count: f32) {
    for (c, &v) in centre.iter_mut().zip(x) {
        *c = (*c * count + v) / (count + 1.0);
    }
}
