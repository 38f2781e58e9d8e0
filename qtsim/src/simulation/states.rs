//! Core state types for the collision simulation.
//!
//! - `Rect`: axis-aligned rectangle used for the space and for tree nodes
//! - `Body`: a circle with position, velocity, radius, mass and display color
//! - `Space`: the arena owning every body, the bounds and the engine settings
//!
//! Bodies are identified by their index in the arena (`BodyHandle`). Handles
//! stay valid for the life of the `Space` since bodies are never removed.

use nalgebra::Vector2;

use crate::simulation::collision::{CollisionResponse, ElasticCollision};
use crate::simulation::engine::Engine;
use crate::simulation::error::ConfigurationError;
use crate::simulation::integrator::{self, StepStats};
use crate::simulation::quadtree::QuadTree;

pub type NVec2 = Vector2<f64>;

/// Axis-aligned rectangle `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: NVec2,
    pub max: NVec2,
}

impl Rect {
    /// Validated constructor: both corners finite and `min < max` on each axis.
    pub fn new(min: NVec2, max: NVec2) -> Result<Self, ConfigurationError> {
        let rect = Self { min, max };
        rect.validate()?;
        Ok(rect)
    }

    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Result<Self, ConfigurationError> {
        Self::new(NVec2::new(x0, y0), NVec2::new(x1, y1))
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.min.iter().all(|c| c.is_finite()) && self.max.iter().all(|c| c.is_finite())) {
            return Err(ConfigurationError::NonFinite("bounds"));
        }
        if self.min.x >= self.max.x || self.min.y >= self.max.y {
            return Err(ConfigurationError::DegenerateBounds {
                min: [self.min.x, self.min.y],
                max: [self.max.x, self.max.y],
            });
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> NVec2 {
        (self.min + self.max) * 0.5
    }

    /// Closed containment test.
    pub fn contains(&self, p: &NVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Quadrant index for a point relative to this rectangle's center.
    ///
    /// - Bit 0 (value 1): x half, set when `p.x >= center.x`
    /// - Bit 1 (value 2): y half, set when `p.y >= center.y`
    ///
    /// A point on a split line goes to the quadrant whose range starts there.
    /// Points outside the rectangle are classified by the same comparisons.
    pub fn quadrant_index(&self, p: &NVec2) -> usize {
        let center = self.center();
        let mut idx = 0;

        if p.x >= center.x { idx |= 1; } // bit 0
        if p.y >= center.y { idx |= 2; } // bit 1

        idx
    }

    /// The quadrant rectangle for `idx`, using the `quadrant_index` encoding.
    pub fn quadrant(&self, idx: usize) -> Rect {
        let center = self.center();

        let mut min = self.min;
        let mut max = self.max;

        if (idx & 1) == 0 {
            max.x = center.x;
        } else {
            min.x = center.x;
        }

        if (idx & 2) == 0 {
            max.y = center.y;
        } else {
            min.y = center.y;
        }

        Rect { min, max }
    }

    /// Whether the center lies strictly inside on both axes, so that all
    /// four quadrants are non-degenerate.
    pub fn can_split(&self) -> bool {
        let c = self.center();
        self.min.x < c.x && c.x < self.max.x && self.min.y < c.y && c.y < self.max.y
    }
}

/// Index of a body inside its `Space`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub x: NVec2, // position
    pub v: NVec2, // velocity
    m: f64, // mass, `f64::INFINITY` for a static body
    radius: f64, // radius
    color: [u8; 3], // display only
}

impl Body {
    pub const DEFAULT_COLOR: [u8; 3] = [200, 200, 200];

    /// Create a body, rejecting non-finite vectors and non-positive radius or mass.
    ///
    /// An infinite mass is accepted and marks the body as static: collisions
    /// never move it or change its velocity.
    pub fn new(x: NVec2, v: NVec2, radius: f64, m: f64) -> Result<Self, ConfigurationError> {
        if !x.iter().all(|c| c.is_finite()) {
            return Err(ConfigurationError::NonFinite("position"));
        }
        if !v.iter().all(|c| c.is_finite()) {
            return Err(ConfigurationError::NonFinite("velocity"));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigurationError::InvalidRadius(radius));
        }
        if m.is_nan() || m <= 0.0 {
            return Err(ConfigurationError::InvalidMass(m));
        }

        Ok(Self {
            x,
            v,
            m,
            radius,
            color: Self::DEFAULT_COLOR,
        })
    }

    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn m(&self) -> f64 {
        self.m
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn color(&self) -> [u8; 3] {
        self.color
    }

    pub fn is_static(&self) -> bool {
        self.m.is_infinite()
    }

    /// `1 / m`, zero for a static body.
    pub fn inv_mass(&self) -> f64 {
        self.m.recip()
    }

    /// Linear momentum. Static bodies report zero.
    pub fn momentum(&self) -> NVec2 {
        if self.is_static() {
            return NVec2::zeros();
        }
        self.v * self.m
    }

    /// Kinetic energy. Static bodies report zero.
    pub fn kinetic_energy(&self) -> f64 {
        if self.is_static() {
            return 0.0;
        }
        0.5 * self.m * self.v.norm_squared()
    }
}

/// The simulation: an arena of bodies inside a bounded region.
pub struct Space {
    pub(crate) bodies: Vec<Body>,
    pub(crate) bounds: Rect,
    pub(crate) engine: Engine,
    pub(crate) response: Box<dyn CollisionResponse + Send + Sync>,
    pub t: f64, // time
}

impl Space {
    /// Create a space over `bounds`, resolving collisions elastically.
    pub fn new(bodies: Vec<Body>, bounds: Rect, engine: Engine) -> Result<Self, ConfigurationError> {
        bounds.validate()?;
        engine.validate()?;

        let mut space = Self {
            bodies: Vec::with_capacity(bodies.len()),
            bounds,
            engine,
            response: Box::new(ElasticCollision),
            t: 0.0,
        };
        for body in bodies {
            space.insert(body)?;
        }
        Ok(space)
    }

    /// Replace the collision response.
    pub fn with_response<R>(mut self, response: R) -> Self
    where
        R: CollisionResponse + Send + Sync + 'static,
    {
        self.response = Box::new(response);
        self
    }

    /// Add a body and return its handle.
    ///
    /// Walled spaces reject bodies whose diameter exceeds either side.
    pub fn insert(&mut self, body: Body) -> Result<BodyHandle, ConfigurationError> {
        if self.engine.has_walls() && !fits_inside(body.radius, &self.bounds) {
            return Err(ConfigurationError::BodyDoesNotFit {
                radius: body.radius,
                width: self.bounds.width(),
                height: self.bounds.height(),
            });
        }
        self.bodies.push(body);
        Ok(BodyHandle(self.bodies.len() - 1))
    }

    /// Advance the simulation by one step of length `dt`.
    pub fn advance(&mut self, dt: f64) -> StepStats {
        integrator::step(self, dt)
    }

    /// Build the spatial index over the current positions.
    pub fn build_tree(&self) -> QuadTree {
        QuadTree::build_validated(&self.bodies, self.bounds, &self.engine)
    }

    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> {
        (0..self.bodies.len()).map(BodyHandle)
    }

    pub fn body(&self, h: BodyHandle) -> Option<&Body> {
        self.bodies.get(h.0)
    }

    /// Position of `h`. Panics on a handle from another space.
    pub fn position(&self, h: BodyHandle) -> NVec2 {
        self.bodies[h.0].x
    }

    pub fn velocity(&self, h: BodyHandle) -> NVec2 {
        self.bodies[h.0].v
    }

    pub fn radius(&self, h: BodyHandle) -> f64 {
        self.bodies[h.0].radius
    }

    pub fn color(&self, h: BodyHandle) -> [u8; 3] {
        self.bodies[h.0].color
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn total_momentum(&self) -> NVec2 {
        self.bodies.iter().map(Body::momentum).sum()
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }
}

pub(crate) fn fits_inside(radius: f64, bounds: &Rect) -> bool {
    let diameter = 2.0 * radius;
    diameter <= bounds.width() && diameter <= bounds.height()
}
