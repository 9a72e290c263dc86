//! Best-first search across the forest.
//!
//! Phase one walks every tree at once through a single max-heap of pending
//! nodes. A child's priority is the smaller of its parent's priority and the
//! query's signed margin towards that child, so the heap always expands the
//! branch whose path so far stays furthest on the query's side of every
//! hyperplane. Roots start at `+inf`; the preferred child of any node keeps a
//! non-negative priority while the other child goes negative, which makes the
//! walk depth-first down the query's side and backtracks into the branches
//! closest to their hyperplane first. Leaves are drained into a candidate set
//! until the budget is met.
//!
//! Phase two computes one exact distance per unique candidate and keeps the
//! `n` closest.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use tracing::trace;

use super::forest::Forest;
use super::store::VectorStore;
use super::tree::{Node, NodeId};
use crate::distance::{DistanceMetric, Side};

/// Node waiting to be expanded.
#[derive(Clone, Copy)]
struct Pending {
    priority: f32,
    /// On the query's side of its parent's hyperplane; wins priority ties.
    preferred: bool,
    tree: u32,
    node: NodeId,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap on priority (total_cmp is NaN-safe).
        self.priority
            .total_cmp(&other.priority)
            .then(self.preferred.cmp(&other.preferred))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Read-only view over a built index.
pub(crate) struct QueryEngine<'a> {
    pub(crate) forest: &'a Forest,
    pub(crate) store: &'a VectorStore,
    pub(crate) metric: DistanceMetric,
}

impl QueryEngine<'_> {
    /// Store slots of at least `search_k` unique candidates (fewer only if
    /// the forest runs out), in discovery order.
    pub(crate) fn candidates(&self, query: &[f32], search_k: usize) -> Vec<u32> {
        let search_k = search_k.min(self.store.count());
        let mut heap: BinaryHeap<Pending> = self
            .forest
            .trees()
            .iter()
            .enumerate()
            .map(|(i, tree)| Pending {
                priority: f32::INFINITY,
                preferred: true,
                tree: i as u32,
                node: tree.root(),
            })
            .collect();

        let mut seen: HashSet<u32> = HashSet::with_capacity(search_k * 2);
        let mut candidates: Vec<u32> = Vec::with_capacity(search_k);
        let mut expanded = 0usize;

        while candidates.len() < search_k {
            let Some(top) = heap.pop() else { break };
            expanded += 1;
            match self.forest.trees()[top.tree as usize].node(top.node) {
                Node::Leaf { items } => {
                    for &slot in items {
                        if seen.insert(slot) {
                            candidates.push(slot);
                        }
                    }
                }
                Node::Split { plane, left, right } => {
                    let margin = self.metric.margin(plane, query);
                    let side = Side::of(margin);
                    // `+ 0.0` folds -0.0 into 0.0 so a zero margin ties both children.
                    heap.push(Pending {
                        priority: top.priority.min(margin) + 0.0,
                        preferred: side == Side::Right,
                        tree: top.tree,
                        node: *right,
                    });
                    heap.push(Pending {
                        priority: top.priority.min(-margin) + 0.0,
                        preferred: side == Side::Left,
                        tree: top.tree,
                        node: *left,
                    });
                }
            }
        }

        trace!(
            candidates = candidates.len(),
            expanded,
            search_k,
            "forest walk finished"
        );
        candidates
    }

    /// Exact top-`n` among `candidates`, ascending by distance then id.
    /// `exclude` drops one slot from the ranking.
    pub(crate) fn rank(
        &self,
        query: &[f32],
        candidates: &[u32],
        n: usize,
        exclude: Option<u32>,
    ) -> Vec<(u32, f32)> {
        let mut scored: Vec<(u32, f32)> = candidates
            .iter()
            .filter(|&&slot| Some(slot) != exclude)
            .map(|&slot| {
                (
                    self.store.id(slot),
                    self.metric.distance(query, self.store.vector(slot)),
                )
            })
            .collect();

        let by_distance =
            |a: &(u32, f32), b: &(u32, f32)| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0));
        if scored.len() > n {
            scored.select_nth_unstable_by(n, by_distance);
            scored.truncate(n);
        }
        scored.sort_unstable_by(by_distance);
        scored
    }
}
