use serde::{Deserialize, Serialize};

use crate::error::{AllocError, AllocResult};

/// Upper bound of the competency scale; the lower bound is 0.
pub const COMPETENCY_MAX: f64 = 10.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocCfg {
    pub population: usize,
    pub roles: usize,
    pub capacity: usize,
    pub mean: f64,
    pub variance: f64,
    /// Congestion resolution may run at most `congestion_cap_factor * population` passes.
    pub congestion_cap_factor: usize,
}

impl Default for AllocCfg {
    fn default() -> Self {
        Self {
            population: 10,
            roles: 5,
            capacity: 2,
            mean: 5.0,
            variance: 5.0,
            congestion_cap_factor: 4,
        }
    }
}

impl AllocCfg {
    pub fn with_distribution(mean: f64, variance: f64) -> Self {
        Self { mean, variance, ..Self::default() }
    }

    pub fn validate(&self) -> AllocResult<()> {
        if !self.variance.is_finite() || self.variance < 0.0 {
            return Err(AllocError::invalid(format!(
                "variance must be finite and >= 0, got {}",
                self.variance
            )));
        }
        if !self.mean.is_finite() {
            return Err(AllocError::invalid(format!("mean must be finite, got {}", self.mean)));
        }
        if self.population == 0 {
            return Err(AllocError::invalid("population must be at least 1"));
        }
        if self.roles == 0 || self.capacity == 0 {
            return Err(AllocError::invalid(format!(
                "grid of {} roles x capacity {} has no seats",
                self.roles, self.capacity
            )));
        }
        if self.congestion_cap_factor == 0 {
            return Err(AllocError::invalid("congestion_cap_factor must be at least 1"));
        }
        Ok(())
    }

    #[inline]
    pub fn total_capacity(&self) -> usize {
        self.roles * self.capacity
    }

    #[inline]
    pub fn congestion_cap(&self) -> usize {
        self.congestion_cap_factor.saturating_mul(self.population)
    }

    #[inline]
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}
