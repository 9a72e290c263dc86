//! One random projection tree.
//!
//! Nodes live in a per-tree arena and refer to their children by index, so a
//! tree owns everything it points to and can be built on any thread.

use rand::Rng;
use smallvec::SmallVec;

use super::split::Splitter;
use crate::distance::Hyperplane;

/// Index of a node inside its tree's arena.
pub type NodeId = u32;

/// Tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Internal node: hyperplane plus the two subtrees it separates.
    Split {
        plane: Hyperplane,
        left: NodeId,
        right: NodeId,
    },
    /// Leaf node: store slots of at most `leaf_capacity` items.
    Leaf { items: SmallVec<[u32; 8]> },
}

/// Immutable random projection tree over a set of store slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

/// Shape summary of one tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub nodes: usize,
    pub leaves: usize,
    /// Forced (non-geometric) splits.
    pub forced_splits: usize,
    /// Edges on the longest root-to-leaf path.
    pub depth: usize,
}

struct TreeBuilder<'s, 'r, R: Rng + ?Sized> {
    splitter: Splitter<'s>,
    leaf_capacity: usize,
    rng: &'r mut R,
    nodes: Vec<Node>,
}

impl<R: Rng + ?Sized> TreeBuilder<'_, '_, R> {
    fn build_node(&mut self, slots: Vec<u32>) -> NodeId {
        if slots.len() <= self.leaf_capacity {
            return self.push(Node::Leaf {
                items: SmallVec::from_vec(slots),
            });
        }

        let split = self.splitter.split(&slots, &mut *self.rng);
        drop(slots);
        let left = self.build_node(split.left);
        let right = self.build_node(split.right);
        self.push(Node::Split {
            plane: split.plane,
            left,
            right,
        })
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        (self.nodes.len() - 1) as NodeId
    }
}

impl Tree {
    /// Build a tree over `slots`. Children are materialized before their
    /// parent, so the root is the last node in the arena.
    pub(crate) fn build<R: Rng + ?Sized>(
        splitter: Splitter<'_>,
        leaf_capacity: usize,
        slots: Vec<u32>,
        rng: &mut R,
    ) -> Self {
        let mut builder = TreeBuilder {
            splitter,
            leaf_capacity: leaf_capacity.max(1),
            rng,
            nodes: Vec::new(),
        };
        let root = builder.build_node(slots);
        Self {
            nodes: builder.nodes,
            root,
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Every slot stored in a leaf, leaf by leaf.
    pub fn leaf_items(&self) -> impl Iterator<Item = u32> + '_ {
        self.nodes
            .iter()
            .flat_map(|node| match node {
                Node::Leaf { items } => items.as_slice(),
                Node::Split { .. } => &[][..],
            })
            .copied()
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            nodes: self.nodes.len(),
            ..Default::default()
        };
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            stats.depth = stats.depth.max(depth);
            match self.node(id) {
                Node::Leaf { .. } => stats.leaves += 1,
                Node::Split { plane, left, right } => {
                    if plane.is_degenerate() {
                        stats.forced_splits += 1;
                    }
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
            }
        }
        stats
    }

    pub(crate) fn size_bytes(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| {
                std::mem::size_of::<Node>()
                    + match node {
                        Node::Split { plane, .. } => {
                            plane.normal.len() * std::mem::size_of::<f32>()
                        }
                        Node::Leaf { items } if items.spilled() => {
                            items.len() * std::mem::size_of::<u32>()
                        }
                        Node::Leaf { .. } => 0,
                    }
            })
            .sum()
    }
}
