//! Monte-Carlo driver around `role_alloc_core`.
//!
//! - derives a private seed per trial (deterministic, order independent)
//! - draws weights, then the population, from that seed
//! - runs the three mechanisms through the core
//! - averages outcomes and population dispersion across trials
//!
//! No IO. Trials share no state, so the parallel path needs no locking.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use role_alloc_core::{run_trial, AllocError, Mechanism, TrialRecord};

use crate::adapter::{GaussianSource, PopulationSource};
use crate::cfg::SimulationCfg;
use crate::error::{SimulationError, SimulationResult};
use crate::stats::{population_stats, PopulationStats};

/// Per-mechanism averages over all trials of a simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MechanismAverages {
    pub productivity: f64,
    pub self_choice: f64,
    /// Mean number of workers left without a role.
    pub unassigned: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub trials: usize,
    pub top_down: MechanismAverages,
    pub self_nomination: MechanismAverages,
    pub stable_matching: MechanismAverages,
    pub population: PopulationStats,
}

impl SimulationSummary {
    pub fn mechanism(&self, mechanism: Mechanism) -> &MechanismAverages {
        match mechanism {
            Mechanism::TopDown => &self.top_down,
            Mechanism::SelfNomination => &self.self_nomination,
            Mechanism::StableMatching => &self.stable_matching,
        }
    }

    fn mechanism_mut(&mut self, mechanism: Mechanism) -> &mut MechanismAverages {
        match mechanism {
            Mechanism::TopDown => &mut self.top_down,
            Mechanism::SelfNomination => &mut self.self_nomination,
            Mechanism::StableMatching => &mut self.stable_matching,
        }
    }

    /// Average a batch of trial records, summing in slice order.
    pub fn from_records(records: &[TrialRecord]) -> Self {
        let mut out = SimulationSummary { trials: records.len(), ..Self::default() };
        if records.is_empty() {
            return out;
        }
        let n = records.len() as f64;

        for record in records {
            for m in Mechanism::ALL {
                let outcome = record.outcome(m);
                let avg = out.mechanism_mut(m);
                avg.productivity += outcome.total_productivity / n;
                avg.self_choice += outcome.self_choice_rate / n;
                avg.unassigned += outcome.assignment.unassigned.len() as f64 / n;
            }

            let stats = population_stats(&record.competencies);
            out.population.mean_competency += stats.mean_competency / n;
            out.population.between_worker_std += stats.between_worker_std / n;
            out.population.within_worker_std += stats.within_worker_std / n;
        }
        out
    }
}

/// One point of a mean sweep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub mean: f64,
    pub summary: SimulationSummary,
    /// (top-down - stable matching) / top-down productivity, in percent.
    pub productivity_gap_pct: f64,
}

/// Deterministic FNV-1a hash (stable across runs and platforms).
fn fnv1a_u64(bytes: impl IntoIterator<Item = u8>) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}

/// Seed of trial `trial` under base seed `base`.
pub fn trial_seed(base: u64, trial: usize) -> u64 {
    fnv1a_u64(base.to_le_bytes().into_iter().chain((trial as u64).to_le_bytes()))
}

#[derive(Debug)]
pub struct Simulation<S = GaussianSource> {
    cfg: SimulationCfg,
    source: S,
}

impl Simulation<GaussianSource> {
    pub fn new(cfg: SimulationCfg) -> Self {
        Self::with_source(cfg, GaussianSource)
    }
}

impl<S: PopulationSource + Sync> Simulation<S> {
    pub fn with_source(cfg: SimulationCfg, source: S) -> Self {
        Self { cfg, source }
    }

    pub fn cfg(&self) -> &SimulationCfg {
        &self.cfg
    }

    /// Run trial `trial` in isolation. Same index, same record.
    pub fn run_trial(&self, trial: usize) -> SimulationResult<TrialRecord> {
        let alloc = &self.cfg.alloc;
        let seed = trial_seed(self.cfg.seed, trial);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let at = |source: AllocError| SimulationError::Trial { trial, source };

        let weights = self.cfg.weights.draw(&mut rng, alloc.roles).map_err(at)?;
        let mut population = self.source.draw(&mut rng, alloc).map_err(at)?;
        let mut record = run_trial(alloc, &mut population, &weights).map_err(at)?;
        record.seed = Some(seed);

        debug!(trial, seed, "trial complete");
        Ok(record)
    }

    /// All trial records, in trial order.
    pub fn records(&self) -> SimulationResult<Vec<TrialRecord>> {
        self.cfg.validate()?;
        let trials = self.cfg.trials;
        if self.cfg.parallel {
            (0..trials).into_par_iter().map(|i| self.run_trial(i)).collect()
        } else {
            (0..trials).map(|i| self.run_trial(i)).collect()
        }
    }

    pub fn run(&self) -> SimulationResult<SimulationSummary> {
        info!(
            trials = self.cfg.trials,
            mean = self.cfg.alloc.mean,
            variance = self.cfg.alloc.variance,
            parallel = self.cfg.parallel,
            "simulation start"
        );
        let records = self.records()?;
        let summary = SimulationSummary::from_records(&records);
        info!(
            top_down = summary.top_down.productivity,
            self_nomination = summary.self_nomination.productivity,
            stable_matching = summary.stable_matching.productivity,
            "simulation done"
        );
        Ok(summary)
    }
}

/// Run one Gaussian-population simulation per mean, keeping everything else in `cfg`.
pub fn sweep_means(cfg: &SimulationCfg, means: &[f64]) -> SimulationResult<Vec<SweepPoint>> {
    means
        .iter()
        .map(|&mean| {
            let mut point_cfg = cfg.clone();
            point_cfg.alloc.mean = mean;
            let summary = Simulation::new(point_cfg).run()?;

            let top_down = summary.top_down.productivity;
            let productivity_gap_pct = if top_down > 0.0 {
                (top_down - summary.stable_matching.productivity) / top_down * 100.0
            } else {
                0.0
            };
            info!(mean, productivity_gap_pct, "sweep point");

            Ok(SweepPoint { mean, summary, productivity_gap_pct })
        })
        .collect()
}
