//! Construction-time validation errors
//!
//! Everything the simulation needs is checked once, when bodies, bounds and
//! engine settings are built. After that a step cannot fail.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("degenerate bounds: min {min:?} must be strictly below max {max:?}")]
    DegenerateBounds { min: [f64; 2], max: [f64; 2] },

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("radius must be positive, got {0}")]
    InvalidRadius(f64),

    #[error("mass must be positive, got {0}")]
    InvalidMass(f64),

    #[error("leaf capacity must be at least 1, got {0}")]
    InvalidLeafCapacity(usize),

    #[error("max depth must be at most {limit}, got {got}")]
    InvalidMaxDepth { got: usize, limit: usize },

    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),

    #[error("`{field}` expects {expected} components, got {got}")]
    BadVector {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("body of radius {radius} does not fit inside walled bounds of {width} x {height}")]
    BodyDoesNotFit { radius: f64, width: f64, height: f64 },

    #[error("random radius range is invalid: min {min}, max {max}")]
    InvalidRadiusRange { min: f64, max: f64 },

    #[error("cannot allocate {0} random bodies")]
    TooManyBodies(usize),
}
