use std::time::Instant;

use crate::simulation::collision::test_overlap;
use crate::simulation::engine::Engine;
use crate::simulation::quadtree::{CollisionPair, QuadTree};
use crate::simulation::states::{Body, NVec2, Rect};

const SIDE: f64 = 1000.0;

/// Every overlapping pair found by testing all `n * (n - 1) / 2` pairs.
/// Reference result for the quadtree broad phase.
pub fn brute_force_contacts(bodies: &[Body]) -> Vec<CollisionPair> {
    let mut pairs = Vec::new();
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            if test_overlap(&bodies[i], &bodies[j]) {
                pairs.push(CollisionPair::new(i, j));
            }
        }
    }
    pairs
}

/// Helper to build `n` deterministic bodies spread over the benchmark square
fn make_bodies(n: usize) -> Vec<Body> {
    let mut bodies = Vec::with_capacity(n);

    for i in 0..n {
        let i_f = i as f64;
        // deterministic positions, no rand needed
        let x = NVec2::new(
            (0.5 + 0.5 * (i_f * 0.37).sin()) * SIDE,
            (0.5 + 0.5 * (i_f * 0.13).cos()) * SIDE,
        );
        if let Ok(body) = Body::new(x, NVec2::zeros(), 2.0, 1.0) {
            bodies.push(body);
        }
    }

    bodies
}

/// Time contact detection by brute force against the quadtree broad phase
/// followed by the same exact test on its candidate pairs.
/// Paste output directly into a spreadsheet to graph
pub fn bench_broad_phase() {
    let Ok(bounds) = Rect::from_corners(0.0, 0.0, SIDE, SIDE) else {
        return;
    };
    let engine = Engine::default();

    println!("N,brute_ms,quadtree_ms,brute_contacts,quadtree_contacts,candidates");

    for n in [200, 400, 800, 1600, 3200, 6400, 12800] {
        let bodies = make_bodies(n);

        let t0 = Instant::now();
        let brute = brute_force_contacts(&bodies);
        let ms_brute = t0.elapsed().as_secs_f64() * 1000.0;

        let t1 = Instant::now();
        let tree = QuadTree::build_validated(&bodies, bounds, &engine);
        let candidates = tree.leaf_pairs();
        let found = candidates
            .iter()
            .filter(|p| test_overlap(&bodies[p.a()], &bodies[p.b()]))
            .count();
        let ms_tree = t1.elapsed().as_secs_f64() * 1000.0;

        println!("{},{:.6},{:.6},{},{},{}", n, ms_brute, ms_tree, brute.len(), found, candidates.len());
    }
}
