//! Input adapter layer: where a trial's population and weights come from.
//!
//! The driver does not care how competencies are produced; it delegates to a
//! `PopulationSource` (the Gaussian generator by default, or a fixed table
//! supplied by the caller) and a `WeightPolicy`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use role_alloc_core::{generate_population, AllocCfg, AllocError, AllocResult, Population, RoleWeights};

/// Trait: produce one trial's population from the trial's RNG.
pub trait PopulationSource {
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R, cfg: &AllocCfg) -> AllocResult<Population>;
}

/// Two-level clipped Gaussian population from `cfg.mean` / `cfg.variance`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GaussianSource;

impl PopulationSource for GaussianSource {
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R, cfg: &AllocCfg) -> AllocResult<Population> {
        generate_population(rng, cfg)
    }
}

/// The same competency table every trial; ignores the RNG.
#[derive(Clone, Debug)]
pub struct FixedSource {
    pub rows: Vec<Vec<f64>>,
}

impl FixedSource {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }
}

impl PopulationSource for FixedSource {
    fn draw<R: Rng + ?Sized>(&self, _rng: &mut R, cfg: &AllocCfg) -> AllocResult<Population> {
        Population::with_cfg(self.rows.clone(), cfg)
    }
}

/// How each trial's role weights are chosen.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightPolicy {
    /// Fresh uniform draws per trial, normalized.
    #[default]
    Random,
    /// The same raw weights every trial; normalized on use.
    Fixed(Vec<f64>),
}

impl WeightPolicy {
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R, roles: usize) -> AllocResult<RoleWeights> {
        match self {
            WeightPolicy::Random => RoleWeights::random(rng, roles),
            WeightPolicy::Fixed(raw) => {
                if raw.len() != roles {
                    return Err(AllocError::invalid(format!(
                        "{} fixed weights for {roles} roles",
                        raw.len()
                    )));
                }
                RoleWeights::normalize(raw.clone())
            }
        }
    }
}
