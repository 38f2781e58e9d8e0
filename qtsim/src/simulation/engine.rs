//! High-level runtime engine settings
//!
//! Leaf capacity and depth limit for the quadtree, the indexing policy and
//! the wall policy used when building and running a `Space`

use crate::configuration::config::{IndexPolicy, WallPolicy};
use crate::simulation::error::ConfigurationError;
use crate::simulation::quadtree::{DEFAULT_LEAF_CAPACITY, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};

#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    pub leaf_capacity: usize, // max bodies per leaf before a split (`k`)
    pub max_depth: usize, // nodes at this depth never split
    pub indexing: IndexPolicy, // point or radius-padded leaf membership
    pub walls: WallPolicy, // reflect at the bounds or leave them open
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            leaf_capacity: DEFAULT_LEAF_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
            indexing: IndexPolicy::default(),
            walls: WallPolicy::default(),
        }
    }
}

impl Engine {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.leaf_capacity < 1 {
            return Err(ConfigurationError::InvalidLeafCapacity(self.leaf_capacity));
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(ConfigurationError::InvalidMaxDepth {
                got: self.max_depth,
                limit: MAX_DEPTH_LIMIT,
            });
        }
        Ok(())
    }

    pub fn has_walls(&self) -> bool {
        self.walls == WallPolicy::Reflect
    }
}
