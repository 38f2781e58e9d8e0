//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime `Scenario`
//! containing:
//! - numerical parameters (`Parameters`)
//! - a validated `Space` with every body at t = 0 and its `Engine` settings
//!
//! With the `vis` feature the scenario is inserted into Bevy as a `Resource`
//! and stepped by the viewer; headless runs call [`Scenario::run`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::configuration::config::{BodyConfig, RandomConfig, ScenarioConfig};
use crate::simulation::engine::Engine;
use crate::simulation::error::ConfigurationError;
use crate::simulation::params::Parameters;
use crate::simulation::states::{fits_inside, Body, NVec2, Rect, Space};

/// Number of steps between progress events in [`Scenario::run`].
const LOG_EVERY: usize = 100;

/// Runtime bundle constructed from a [`ScenarioConfig`]: the run parameters
/// and the space they drive.
#[cfg_attr(feature = "vis", derive(bevy::prelude::Resource))]
pub struct Scenario {
    pub parameters: Parameters,
    pub space: Space,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, ConfigurationError> {
        // Parameters (runtime) from ParametersConfig
        let parameters = Parameters {
            t_end: cfg.parameters.t_end,
            h0: cfg.parameters.h0,
        };
        parameters.validate()?;

        // Engine (runtime) from EngineConfig
        let e_cfg = cfg.engine;
        let engine = Engine {
            leaf_capacity: e_cfg.leaf_capacity,
            max_depth: e_cfg.max_depth,
            indexing: e_cfg.indexing,
            walls: e_cfg.walls,
        };

        let b = vec_of::<4>("space.bounds", &cfg.space.bounds)?;
        let bounds = Rect::from_corners(b[0], b[1], b[2], b[3])?;

        // Bodies: map `BodyConfig` -> runtime `Body`, then append generated ones
        let mut bodies = cfg
            .bodies
            .iter()
            .map(body_from_config)
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(random) = &cfg.random {
            bodies.extend(random_bodies(random, &bounds)?);
        }

        let space = Space::new(bodies, bounds, engine)?;

        info!(
            bodies = space.len(),
            leaf_capacity = space.engine().leaf_capacity,
            max_depth = space.engine().max_depth,
            indexing = ?space.engine().indexing,
            walls = ?space.engine().walls,
            "scenario built"
        );

        Ok(Self { parameters, space })
    }

    /// Step the space until `t_end` and return the number of resolved collisions.
    pub fn run(&mut self) -> usize {
        let dt = self.parameters.h0;
        let steps = self.parameters.steps();
        let mut collisions = 0;

        for i in 0..steps {
            let stats = self.space.advance(dt);
            collisions += stats.collisions;

            if (i + 1) % LOG_EVERY == 0 {
                debug!(
                    step = i + 1,
                    t = self.space.t,
                    pairs = stats.candidate_pairs,
                    leaves = stats.leaves,
                    depth = stats.depth,
                    "progress"
                );
            }
        }

        let p = self.space.total_momentum();
        info!(
            steps,
            collisions,
            momentum_x = p.x,
            momentum_y = p.y,
            energy = self.space.kinetic_energy(),
            "run finished"
        );
        collisions
    }
}

/// Generate `cfg.count` bodies with uniform positions and directions, a fixed
/// speed, radii skewed toward `min_radius` and mass equal to radius.
///
/// Positions are drawn so each disc starts fully inside `bounds`.
pub fn random_bodies(cfg: &RandomConfig, bounds: &Rect) -> Result<Vec<Body>, ConfigurationError> {
    if !(cfg.min_radius > 0.0 && cfg.max_radius >= cfg.min_radius && cfg.max_radius.is_finite()) {
        return Err(ConfigurationError::InvalidRadiusRange {
            min: cfg.min_radius,
            max: cfg.max_radius,
        });
    }
    if !cfg.speed.is_finite() {
        return Err(ConfigurationError::NonFinite("random.speed"));
    }

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut bodies = Vec::new();
    bodies
        .try_reserve_exact(cfg.count)
        .map_err(|_| ConfigurationError::TooManyBodies(cfg.count))?;

    for _ in 0..cfg.count {
        let u: f64 = rng.gen();
        let radius = cfg.min_radius + (cfg.max_radius - cfg.min_radius) * u * u;

        if !fits_inside(radius, bounds) {
            return Err(ConfigurationError::BodyDoesNotFit {
                radius,
                width: bounds.width(),
                height: bounds.height(),
            });
        }

        let x = NVec2::new(
            rng.gen_range(bounds.min.x + radius..=bounds.max.x - radius),
            rng.gen_range(bounds.min.y + radius..=bounds.max.y - radius),
        );
        let theta = rng.gen_range(0.0..std::f64::consts::TAU);
        let v = cfg.speed * NVec2::new(theta.cos(), theta.sin());

        let color = [
            channel(60.0 + radius * 7.0),
            channel(230.0 - radius * 3.0),
            channel(230.0 - radius * 3.0),
        ];

        bodies.push(Body::new(x, v, radius, radius)?.with_color(color));
    }

    Ok(bodies)
}

// helpers ==============================================================================

fn body_from_config(bc: &BodyConfig) -> Result<Body, ConfigurationError> {
    let x = vec_of::<2>("bodies.x", &bc.x)?;
    let v = vec_of::<2>("bodies.v", &bc.v)?;
    let body = Body::new(NVec2::new(x[0], x[1]), NVec2::new(v[0], v[1]), bc.radius, bc.m)?;
    Ok(match bc.color {
        Some(color) => body.with_color(color),
        None => body,
    })
}

fn vec_of<const N: usize>(field: &'static str, values: &[f64]) -> Result<[f64; N], ConfigurationError> {
    values.try_into().map_err(|_| ConfigurationError::BadVector {
        field,
        expected: N,
        got: values.len(),
    })
}

fn channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}
