//! Fixed-step advance of a `Space`
//!
//! One step resolves collisions on the current positions first, then drifts
//! every body with its post-collision velocity, then applies the walls.

use tracing::trace;

use super::collision::{pair_mut, ResolveOutcome};
use super::quadtree::QuadTree;
use super::states::{Body, Rect, Space};

/// Per-step counters, mostly for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub candidate_pairs: usize, // same-leaf pairs handed to the response
    pub collisions: usize, // pairs that were actually in contact
    pub leaves: usize, // leaves in this step's tree
    pub depth: usize, // deepest node in this step's tree
}

/// Advance the space by one step of length `dt`
/// 1. build a quadtree over the current positions
/// 2. resolve every same-leaf pair once
/// 3. drift: x += dt * v
/// 4. reflect at the bounds when walls are enabled
pub fn step(space: &mut Space, dt: f64) -> StepStats {
    let tree = QuadTree::build_validated(&space.bodies, space.bounds, &space.engine);
    let pairs = tree.leaf_pairs();

    let mut collisions = 0;
    for pair in &pairs {
        let (a, b) = pair_mut(&mut space.bodies, *pair);
        if space.response.resolve(a, b) == ResolveOutcome::Resolved {
            collisions += 1;
        }
    }

    integrate(&mut space.bodies, dt);

    if space.engine.has_walls() {
        apply_walls(&mut space.bodies, &space.bounds);
    }

    space.t += dt;

    let stats = StepStats {
        candidate_pairs: pairs.len(),
        collisions,
        leaves: tree.leaf_count(),
        depth: tree.depth(),
    };
    trace!(t = space.t, ?stats, "step");
    stats
}

/// Drift every body by `dt`: x_n+1 = x_n + dt v_n
pub fn integrate(bodies: &mut [Body], dt: f64) {
    for b in bodies.iter_mut() {
        b.x += dt * b.v;
    }
}

/// Keep every disc inside `bounds`; a disc on a wall keeps its speed but
/// its normal velocity component is made to point inward. Static bodies are
/// left where they are.
pub fn apply_walls(bodies: &mut [Body], bounds: &Rect) {
    for b in bodies.iter_mut().filter(|b| !b.is_static()) {
        let r = b.radius();

        if b.x.y >= bounds.max.y - r {
            b.x.y = bounds.max.y - r;
            b.v.y = -b.v.y.abs();
        }
        if b.x.x <= bounds.min.x + r {
            b.x.x = bounds.min.x + r;
            b.v.x = b.v.x.abs();
        }
        if b.x.x >= bounds.max.x - r {
            b.x.x = bounds.max.x - r;
            b.v.x = -b.v.x.abs();
        }
        if b.x.y <= bounds.min.y + r {
            b.x.y = bounds.min.y + r;
            b.v.y = b.v.y.abs();
        }
    }
}
