use serde::{Deserialize, Serialize};

use role_alloc_core::{AllocCfg, AllocError};

use crate::adapter::WeightPolicy;
use crate::error::{SimulationError, SimulationResult};

/// Monte-Carlo driver configuration.
///
/// Every field has a default, so a TOML document only needs the overrides:
///
/// ```toml
/// trials = 500
/// seed = 7
/// weights = { fixed = [1.0, 1.0, 2.0, 1.0, 1.0] }
///
/// [alloc]
/// mean = 6.0
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationCfg {
    pub alloc: AllocCfg,
    pub trials: usize,
    /// Base seed; each trial derives its own seed from this and its index.
    pub seed: u64,
    /// Run trials on the rayon pool. Results are identical either way.
    pub parallel: bool,
    pub weights: WeightPolicy,
}

impl Default for SimulationCfg {
    fn default() -> Self {
        Self {
            alloc: AllocCfg::default(),
            trials: 1000,
            seed: 0,
            parallel: false,
            weights: WeightPolicy::Random,
        }
    }
}

impl SimulationCfg {
    pub fn from_toml_str(s: &str) -> SimulationResult<Self> {
        let cfg: SimulationCfg = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> SimulationResult<()> {
        self.alloc.validate()?;
        if self.trials == 0 {
            return Err(SimulationError::ZeroTrials);
        }
        if let WeightPolicy::Fixed(raw) = &self.weights {
            if raw.len() != self.alloc.roles {
                return Err(AllocError::invalid(format!(
                    "{} fixed weights for {} roles",
                    raw.len(),
                    self.alloc.roles
                ))
                .into());
            }
        }
        Ok(())
    }
}
