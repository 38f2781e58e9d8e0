//! Narrow phase: exact overlap tests and elastic collision response
//!
//! Defines the [`CollisionResponse`] trait run on every candidate pair the
//! quadtree yields, and the default [`ElasticCollision`] response

use crate::simulation::quadtree::CollisionPair;
use crate::simulation::states::{Body, NVec2};

/// Result of handing a candidate pair to a [`CollisionResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    NoContact, // discs apart, bodies untouched
    Resolved, // discs touched or overlapped and were handled
}

/// Trait for collision responses operating on one candidate pair.
/// Implementations must leave non-overlapping pairs untouched.
pub trait CollisionResponse {
    fn resolve(&self, a: &mut Body, b: &mut Body) -> ResolveOutcome;
}

/// Discs overlap iff the distance between centers is at most the sum of
/// radii. Touching counts.
pub fn test_overlap(a: &Body, b: &Body) -> bool {
    let d = b.x - a.x;
    let reach = a.radius() + b.radius();
    d.norm_squared() <= reach * reach
}

/// Perfectly elastic response between two discs.
pub struct ElasticCollision;

impl CollisionResponse for ElasticCollision {
    /// Separate and exchange momentum along the line of centers.
    ///
    /// 1. Normal `n = (xb - xa) / |xb - xa|`, or `+x` for coincident centers.
    /// 2. Push the bodies apart along `n` until they just touch, splitting
    ///    the distance by inverse mass (a static body stays put).
    /// 3. Replace the normal velocity components with the 1D elastic result
    ///      v1' = ((m1 - m2) v1 + 2 m2 v2) / (m1 + m2)
    ///      v2' = ((m2 - m1) v2 + 2 m1 v1) / (m1 + m2)
    ///    written as v1' = v1 - 2 w1 (v1 - v2), v2' = v2 + 2 w2 (v1 - v2)
    ///    with w_i = (1/m_i) / (1/m1 + 1/m2), which stays exact for m = inf.
    /// 4. Tangential components are untouched.
    fn resolve(&self, a: &mut Body, b: &mut Body) -> ResolveOutcome {
        if !test_overlap(a, b) {
            return ResolveOutcome::NoContact;
        }

        let d = b.x - a.x;
        let dist = d.norm();
        let n = if dist > 0.0 { d / dist } else { NVec2::x() };

        let inv_a = a.inv_mass();
        let inv_b = b.inv_mass();
        let inv_sum = inv_a + inv_b;
        if inv_sum == 0.0 {
            return ResolveOutcome::Resolved; // two static bodies
        }
        let w_a = inv_a / inv_sum;
        let w_b = inv_b / inv_sum;

        // Positional correction
        let overlap = a.radius() + b.radius() - dist;
        a.x -= n * (overlap * w_a);
        b.x += n * (overlap * w_b);

        // Normal components before the exchange
        let va = a.v.dot(&n);
        let vb = b.v.dot(&n);
        let rel = va - vb;

        let va_new = va - 2.0 * w_a * rel;
        let vb_new = vb + 2.0 * w_b * rel;

        a.v += n * (va_new - va);
        b.v += n * (vb_new - vb);

        ResolveOutcome::Resolved
    }
}

/// Borrow both bodies of a pair mutably.
pub fn pair_mut(bodies: &mut [Body], pair: CollisionPair) -> (&mut Body, &mut Body) {
    let (low, high) = bodies.split_at_mut(pair.b());
    (&mut low[pair.a()], &mut high[0])
}
