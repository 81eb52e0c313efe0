//! Two-level clipped Gaussian competency sampling.
//!
//! Each worker first gets a personal mean drawn around the configured mean,
//! then every role competency is drawn around that personal mean. Both levels
//! use the configured variance and clip to `[0, COMPETENCY_MAX]`.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::cfg::{AllocCfg, COMPETENCY_MAX};
use crate::error::{AllocError, AllocResult};
use crate::population::Population;

#[inline]
fn clip(x: f64) -> f64 {
    x.clamp(0.0, COMPETENCY_MAX)
}

fn normal(mean: f64, std_dev: f64) -> AllocResult<Normal<f64>> {
    Normal::new(mean, std_dev)
        .map_err(|e| AllocError::invalid(format!("normal({mean}, {std_dev}): {e}")))
}

/// One competency row per worker, `cfg.roles` values each.
pub fn generate_competencies<R: Rng + ?Sized>(
    rng: &mut R,
    cfg: &AllocCfg,
) -> AllocResult<Vec<Vec<f64>>> {
    cfg.validate()?;
    let std_dev = cfg.std_dev();

    let population_level = normal(cfg.mean, std_dev)?;
    let personal_means: Vec<f64> = (0..cfg.population)
        .map(|_| clip(population_level.sample(rng)))
        .collect();

    personal_means
        .into_iter()
        .map(|personal| {
            let worker_level = normal(personal, std_dev)?;
            Ok((0..cfg.roles).map(|_| clip(worker_level.sample(rng))).collect())
        })
        .collect()
}

pub fn generate_population<R: Rng + ?Sized>(rng: &mut R, cfg: &AllocCfg) -> AllocResult<Population> {
    let rows = generate_competencies(rng, cfg)?;
    Population::with_cfg(rows, cfg)
}

