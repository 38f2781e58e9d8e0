//! # Collision Quadtree (2D)
//!
//! This module implements the **broad phase** of the collision pipeline: a
//! quadtree over body positions that limits narrow-phase tests to bodies
//! sharing a leaf. Testing every pair is `O(N²)`; testing only within small
//! leaves is close to `O(N log N)` for well-spread bodies.
//!
//! ## Core Concepts
//!
//! - The root rectangle covers the whole space.
//! - A node holding more than `k` bodies is split at its center into 4 equal
//!   quadrants, and its bodies are handed down to them.
//! - A node stops splitting once it holds `k` bodies or fewer, or once it sits
//!   at `max_depth` (many coincident bodies would otherwise split forever).
//! - A node too small to halve in `f64` also stays a leaf, so every node has
//!   `min < max` on both axes whatever the depth limit.
//! - Only leaves hold bodies. Internal nodes only hold their 4 children.
//!
//! The tree is rebuilt from scratch every step, so there is no insertion or
//! removal: [`QuadTree::build`] takes the whole body slice at once and
//! subdivides breadth-first using an explicit work queue. Nodes live in one
//! `Vec` and refer to each other by index, and the tree refers to bodies by
//! their index in the `Space` arena.
//!
//! ## Leaf membership
//!
//! Under [`IndexPolicy::Point`] a body is a point: it belongs to exactly one
//! leaf, the one whose half-open range contains its center. Two bodies on
//! opposite sides of a split line are never tested against each other, even
//! when their discs overlap. This is a known approximation.
//!
//! Under [`IndexPolicy::Padded`] a body belongs to every child whose rectangle
//! meets the body's bounding square, so such boundary contacts are found.
//! Children on the outer edge of the root reach outward without bound, which
//! keeps this exact for bodies that have left an open space. A
//! pair can then share several leaves, so [`QuadTree::leaf_pairs`]
//! de-duplicates. A node whose split would hand every body to every child is
//! kept as a leaf.

use std::collections::{HashSet, VecDeque};

use crate::configuration::config::IndexPolicy;
use crate::simulation::engine::Engine;
use crate::simulation::error::ConfigurationError;
use crate::simulation::states::{Body, NVec2, Rect};

/// Default number of bodies a leaf may hold before it is split.
pub const DEFAULT_LEAF_CAPACITY: usize = 4;

/// Default depth limit; nodes at this depth are always leaves.
pub const DEFAULT_MAX_DEPTH: usize = 12;

/// Largest accepted `max_depth`.
pub const MAX_DEPTH_LIMIT: usize = 48;

/// An unordered pair of body indices, stored as `(low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    a: usize,
    b: usize,
}

impl CollisionPair {
    /// Canonicalize `(i, j)`. The two indices must differ.
    pub fn new(i: usize, j: usize) -> Self {
        debug_assert_ne!(i, j, "a body cannot pair with itself");
        if i < j {
            Self { a: i, b: j }
        } else {
            Self { a: j, b: i }
        }
    }

    pub fn a(&self) -> usize {
        self.a
    }

    pub fn b(&self) -> usize {
        self.b
    }
}

/// What a node holds: bodies (leaf) or children (internal), never both.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Leaf { bodies: Vec<usize> },
    Internal { children: [usize; 4] }, // indices into QuadTree::nodes, by quadrant index
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuadNode {
    pub bounds: Rect,
    pub depth: usize,
    pub kind: NodeKind,
}

impl QuadNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }
}

/// A quadtree built over one snapshot of body positions.
///
/// `nodes` is in breadth-first order with the root at index 0.
#[derive(Debug, Clone)]
pub struct QuadTree {
    nodes: Vec<QuadNode>,
    indexing: IndexPolicy,
}

impl QuadTree {
    /// Build a quadtree over `bodies` covering `root_bounds`.
    ///
    /// - Checks that `root_bounds` is non-degenerate, that the engine's
    ///   leaf capacity is at least 1 and that `max_depth` is at most
    ///   [`MAX_DEPTH_LIMIT`]; otherwise nothing is built.
    /// - Starts with a root leaf holding every body.
    /// - Pops nodes from a FIFO queue; a leaf with more than `k` bodies below
    ///   `max_depth` is split and its 4 children are queued.
    ///
    /// # Returns
    /// The finished tree, or a [`ConfigurationError`] for invalid settings.
    pub fn build(bodies: &[Body], root_bounds: Rect, engine: &Engine) -> Result<Self, ConfigurationError> {
        root_bounds.validate()?;
        engine.validate()?;
        Ok(Self::build_validated(bodies, root_bounds, engine))
    }

    /// [`QuadTree::build`] without re-checking settings a `Space` already checked.
    pub(crate) fn build_validated(bodies: &[Body], root_bounds: Rect, engine: &Engine) -> Self {
        let mut nodes = vec![QuadNode {
            bounds: root_bounds,
            depth: 0,
            kind: NodeKind::Leaf { bodies: (0..bodies.len()).collect() },
        }];

        let mut queue = VecDeque::from([0usize]);

        while let Some(node_idx) = queue.pop_front() {
            let bounds = nodes[node_idx].bounds;
            let depth = nodes[node_idx].depth;

            let NodeKind::Leaf { bodies: members } = &nodes[node_idx].kind else {
                continue;
            };

            if members.len() <= engine.leaf_capacity || depth >= engine.max_depth || !bounds.can_split() {
                continue;
            }

            let count = members.len();
            let buckets = distribute(members, bodies, &bounds, engine.indexing);

            // Padded membership can copy every body into every child; splitting then separates nothing
            if engine.indexing == IndexPolicy::Padded && buckets.iter().all(|b| b.len() == count) {
                continue;
            }

            let mut children = [0usize; 4];
            for (quadrant, bucket) in buckets.into_iter().enumerate() {
                let child_idx = nodes.len();
                nodes.push(QuadNode {
                    bounds: bounds.quadrant(quadrant),
                    depth: depth + 1,
                    kind: NodeKind::Leaf { bodies: bucket },
                });
                children[quadrant] = child_idx;
                queue.push_back(child_idx);
            }

            nodes[node_idx].kind = NodeKind::Internal { children };
        }

        Self { nodes, indexing: engine.indexing }
    }

    /// Every unordered same-leaf pair, leaves visited breadth-first.
    ///
    /// A leaf with `n` bodies contributes `n * (n - 1) / 2` pairs. Under padded
    /// indexing a pair found in an earlier leaf is skipped. Callers must not
    /// depend on the order across leaves.
    pub fn leaf_pairs(&self) -> Vec<CollisionPair> {
        let mut pairs = Vec::new();
        let mut seen = HashSet::new();
        let dedup = self.indexing == IndexPolicy::Padded;

        for (_, members) in self.leaves() {
            for (n, &i) in members.iter().enumerate() {
                for &j in &members[n + 1..] {
                    let pair = CollisionPair::new(i, j);
                    if dedup && !seen.insert(pair) {
                        continue;
                    }
                    pairs.push(pair);
                }
            }
        }

        pairs
    }

    /// Leaves in breadth-first order with their rectangle and body indices.
    pub fn leaves(&self) -> impl Iterator<Item = (&Rect, &[usize])> {
        self.nodes.iter().filter_map(|node| match &node.kind {
            NodeKind::Leaf { bodies } => Some((&node.bounds, bodies.as_slice())),
            NodeKind::Internal { .. } => None,
        })
    }

    pub fn nodes(&self) -> &[QuadNode] {
        &self.nodes
    }

    pub fn root(&self) -> &QuadNode {
        &self.nodes[0]
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Deepest node depth; 0 for a lone root leaf.
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    pub fn indexing(&self) -> IndexPolicy {
        self.indexing
    }
}

// helpers ===========================================================================

/// Split a node's bodies between its 4 quadrants.
///
/// Point indexing routes each body by [`Rect::quadrant_index`]. Padded
/// indexing clamps the body's bounding square to the node and adds the body
/// to every quadrant the clamped square meets. An axis half is met when
/// `lo < center` (lower) or `hi >= center` (upper), matching the half-open
/// quadrant ranges. Parts of the square beyond the node's edge count as
/// lying on that edge, so a body outside the root still reaches the edge
/// leaves its disc faces.
fn distribute(members: &[usize], bodies: &[Body], bounds: &Rect, indexing: IndexPolicy) -> [Vec<usize>; 4] {
    let mut buckets: [Vec<usize>; 4] = Default::default();
    let center = bounds.center();

    for &i in members {
        let body = &bodies[i];
        match indexing {
            IndexPolicy::Point => buckets[bounds.quadrant_index(&body.x)].push(i),
            IndexPolicy::Padded => {
                let half = NVec2::repeat(body.radius());
                let lo = (body.x - half).sup(&bounds.min).inf(&bounds.max);
                let hi = (body.x + half).sup(&bounds.min).inf(&bounds.max);

                let x_halves = [lo.x < center.x, hi.x >= center.x];
                let y_halves = [lo.y < center.y, hi.y >= center.y];

                for (quadrant, bucket) in buckets.iter_mut().enumerate() {
                    if x_halves[quadrant & 1] && y_halves[(quadrant >> 1) & 1] {
                        bucket.push(i);
                    }
                }
            }
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(x: f64, y: f64) -> Body {
        Body::new(NVec2::new(x, y), NVec2::zeros(), 0.5, 1.0).unwrap()
    }

    fn square() -> Rect {
        Rect::from_corners(0.0, 0.0, 8.0, 8.0).unwrap()
    }

    #[test]
    fn quadrant_encoding_matches_geometry() {
        let r = square();
        for idx in 0..4 {
            let q = r.quadrant(idx);
            assert_eq!(r.quadrant_index(&q.center()), idx);
            assert!((q.area() - r.area() / 4.0).abs() < 1e-12);
        }
    }

    #[test]
    fn split_line_goes_to_upper_quadrant() {
        let r = square();
        assert_eq!(r.quadrant_index(&NVec2::new(4.0, 4.0)), 3);
        assert_eq!(r.quadrant_index(&NVec2::new(4.0, 1.0)), 1);
        assert_eq!(r.quadrant_index(&NVec2::new(1.0, 4.0)), 2);
    }

    #[test]
    fn nodes_are_breadth_first() {
        let bodies: Vec<Body> = (0..40)
            .map(|i| body_at(0.1 + (i as f64 * 0.37) % 7.8, 0.1 + (i as f64 * 0.61) % 7.8))
            .collect();
        let engine = Engine { leaf_capacity: 2, ..Engine::default() };
        let tree = QuadTree::build(&bodies, square(), &engine).unwrap();

        let depths: Vec<usize> = tree.nodes().iter().map(|n| n.depth).collect();
        assert!(depths.windows(2).all(|w| w[0] <= w[1]));
        assert!(tree.depth() >= 2);
    }

    #[test]
    fn children_refer_forward() {
        let bodies: Vec<Body> = (0..10).map(|i| body_at(1.0 + i as f64 * 0.5, 1.0)).collect();
        let engine = Engine { leaf_capacity: 1, ..Engine::default() };
        let tree = QuadTree::build(&bodies, square(), &engine).unwrap();

        for (idx, node) in tree.nodes().iter().enumerate() {
            if let NodeKind::Internal { children } = node.kind {
                for (quadrant, &child) in children.iter().enumerate() {
                    assert!(child > idx);
                    assert_eq!(tree.nodes()[child].bounds, node.bounds.quadrant(quadrant));
                    assert_eq!(tree.nodes()[child].depth, node.depth + 1);
                }
            }
        }
    }

    #[test]
    fn pair_is_canonical() {
        assert_eq!(CollisionPair::new(5, 2), CollisionPair::new(2, 5));
        let p = CollisionPair::new(9, 3);
        assert_eq!((p.a(), p.b()), (3, 9));
    }
}
