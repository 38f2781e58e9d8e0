//! Numerical parameters for a run
//!
//! `Parameters` holds the fixed step size and the end time used by headless
//! runs. The viewer advances one step per frame and ignores `t_end`.

use crate::simulation::error::ConfigurationError;

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub t_end: f64, // time end
    pub h0: f64, // step size
}

impl Parameters {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.h0.is_finite() && self.h0 > 0.0) {
            return Err(ConfigurationError::InvalidTimeStep(self.h0));
        }
        if !self.t_end.is_finite() {
            return Err(ConfigurationError::NonFinite("t_end"));
        }
        Ok(())
    }

    /// Number of fixed steps needed to reach `t_end`.
    pub fn steps(&self) -> usize {
        if self.t_end <= 0.0 {
            return 0;
        }
        (self.t_end / self.h0).ceil() as usize
    }
}
