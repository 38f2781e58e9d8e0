pub mod simulation;
pub mod configuration;
#[cfg(feature = "vis")]
pub mod visualization;
pub mod benchmark;

pub use simulation::states::{Body, BodyHandle, Rect, Space, NVec2};
pub use simulation::engine::Engine;
pub use simulation::error::ConfigurationError;
pub use simulation::params::Parameters;
pub use simulation::quadtree::{CollisionPair, NodeKind, QuadNode, QuadTree, DEFAULT_LEAF_CAPACITY, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
pub use simulation::collision::{test_overlap, CollisionResponse, ElasticCollision, ResolveOutcome};
pub use simulation::integrator::StepStats;
pub use simulation::scenario::{random_bodies, Scenario};

pub use configuration::config::{BodyConfig, EngineConfig, IndexPolicy, ParametersConfig, RandomConfig, ScenarioConfig, SpaceConfig, WallPolicy};

#[cfg(feature = "vis")]
pub use visualization::qtsim_vis2d::run_2d;

pub use benchmark::benchmark::{bench_broad_phase, brute_force_contacts};
