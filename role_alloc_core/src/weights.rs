use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{AllocError, AllocResult};
use crate::worker::RoleIdx;

/// Role importance weights, normalized to sum to 1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoleWeights(Vec<f64>);

impl RoleWeights {
    pub fn normalize(raw: Vec<f64>) -> AllocResult<Self> {
        if raw.is_empty() {
            return Err(AllocError::invalid("weight vector is empty"));
        }
        if let Some(bad) = raw.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(AllocError::invalid(format!("weight {bad} is negative or non-finite")));
        }
        let total: f64 = raw.iter().sum();
        if total <= 0.0 {
            return Err(AllocError::invalid("weights do not sum to a positive value"));
        }
        Ok(Self(raw.into_iter().map(|w| w / total).collect()))
    }

    pub fn uniform(roles: usize) -> AllocResult<Self> {
        Self::normalize(vec![1.0; roles])
    }

    /// Independent uniform [0, 1) draws per role, normalized.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, roles: usize) -> AllocResult<Self> {
        let raw = (0..roles).map(|_| rng.gen::<f64>()).collect();
        Self::normalize(raw)
    }

    #[inline]
    pub fn get(&self, role: RoleIdx) -> f64 {
        self.0[role]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Roles by descending weight, ascending index on ties.
    pub fn priority_order(&self) -> Vec<RoleIdx> {
        let mut order: Vec<RoleIdx> = (0..self.0.len()).collect();
        order.sort_by(|&a, &b| self.0[b].total_cmp(&self.0[a]));
        order
    }
}

