//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – quadtree and wall options
//! - [`ParametersConfig`] – step size and end time
//! - [`SpaceConfig`]      – the bounded region
//! - [`BodyConfig`]       – initial state for each hand-placed body
//! - [`RandomConfig`]     – optional generator for many random bodies
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario matching these types:
//!
//! ```yaml
//! engine:
//!   leaf_capacity: 4        # bodies per leaf before a split
//!   max_depth: 12           # depth limit of the quadtree
//!   indexing: "point"       # or "padded"
//!   walls: "reflect"        # or "open"
//!
//! parameters:
//!   t_end: 100.0            # total simulation time (headless runs)
//!   h0: 1.0                 # fixed step size
//!
//! space:
//!   bounds: [0.0, 0.0, 800.0, 800.0]
//!
//! bodies:
//!   - x: [ 300.0, 400.0 ]
//!     v: [   1.0,   0.0 ]
//!     m: 10.0
//!     radius: 10.0
//!     color: [ 230, 120, 120 ]
//!
//! random:
//!   count: 100
//!   speed: 2.0
//!   min_radius: 8.0
//!   max_radius: 26.0
//!   seed: 42
//! ```
//!
//! Every `engine` field is optional, as are `bodies` and `random`.
//! `Scenario::build_scenario` validates the values and maps them into the
//! runtime types.

use serde::Deserialize;

use crate::simulation::quadtree::{DEFAULT_LEAF_CAPACITY, DEFAULT_MAX_DEPTH};

/// How bodies are assigned to quadtree leaves
/// `indexing: "point"` or `indexing: "padded"`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexPolicy {
    #[default]
    #[serde(rename = "point")] // Center point only: exactly one leaf per body, may miss contacts across leaf edges
    Point,

    #[serde(rename = "padded")] // Every leaf the body's bounding square reaches, pairs de-duplicated
    Padded,
}

/// What happens at the edges of the space
/// `walls: "reflect"` or `walls: "open"`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WallPolicy {
    #[default]
    #[serde(rename = "reflect")] // Clamp discs inside the bounds and turn their velocity inward
    Reflect,

    #[serde(rename = "open")] // No walls; bodies may leave and are indexed into edge leaves
    Open,
}

/// Engine configuration
/// Controls the structure of the broad phase and the boundary
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub leaf_capacity: usize, // `k`: a leaf with more bodies is split
    pub max_depth: usize, // nodes at this depth are never split
    pub indexing: IndexPolicy, // Point or padded leaf membership
    pub walls: WallPolicy, // Reflecting walls or an open region
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            leaf_capacity: DEFAULT_LEAF_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
            indexing: IndexPolicy::default(),
            walls: WallPolicy::default(),
        }
    }
}

/// Numerical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub t_end: f64, // time end
    pub h0: f64, // time step size
}

/// The bounded region
#[derive(Deserialize, Debug, Clone)]
pub struct SpaceConfig {
    pub bounds: Vec<f64>, // [x0, y0, x1, y1]
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub x: Vec<f64>, // Initial position `[x, y]`
    #[serde(default = "zero_velocity")]
    pub v: Vec<f64>, // Initial velocity `[vx, vy]`, at rest if omitted
    #[serde(default = "default_mass")]
    pub m: f64, // Mass, `.inf` for a static body
    #[serde(default = "default_radius")]
    pub radius: f64, // Radius of the disc
    pub color: Option<[u8; 3]>, // Display color, grey if omitted
}

/// Generator for many bodies at once
///
/// Each body gets a uniform position inside the space, a uniform direction
/// at `speed`, radius `min_radius + (max_radius - min_radius) * u^2` and a
/// mass equal to its radius.
#[derive(Deserialize, Debug, Clone)]
pub struct RandomConfig {
    pub count: usize,
    pub speed: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    #[serde(default)]
    pub seed: u64, // deterministic seed to make runs reproducible
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig, // Quadtree and wall configuration
    pub parameters: ParametersConfig, // Step size and end time
    pub space: SpaceConfig, // The bounded region
    #[serde(default)]
    pub bodies: Vec<BodyConfig>, // Hand-placed bodies
    pub random: Option<RandomConfig>, // Generated bodies, appended after `bodies`
}

fn zero_velocity() -> Vec<f64> {
    vec![0.0, 0.0]
}

fn default_mass() -> f64 {
    10.0
}

fn default_radius() -> f64 {
    10.0
}
