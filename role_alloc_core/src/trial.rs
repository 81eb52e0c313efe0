use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cfg::AllocCfg;
use crate::engine::{AllocationEngine, Mechanism};
use crate::error::AllocResult;
use crate::generator::generate_population;
use crate::matching::StableMatching;
use crate::metrics::{evaluate, Outcome};
use crate::nomination::SelfNomination;
use crate::population::Population;
use crate::topdown::TopDown;
use crate::weights::RoleWeights;

/// Everything one trial produced, per mechanism.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Seed the inputs were drawn from, when they were drawn at all.
    pub seed: Option<u64>,
    pub weights: RoleWeights,
    pub competencies: Vec<Vec<f64>>,
    pub top_down: Outcome,
    pub self_nomination: Outcome,
    pub stable_matching: Outcome,
}

impl TrialRecord {
    pub fn outcome(&self, mechanism: Mechanism) -> &Outcome {
        match mechanism {
            Mechanism::TopDown => &self.top_down,
            Mechanism::SelfNomination => &self.self_nomination,
            Mechanism::StableMatching => &self.stable_matching,
        }
    }
}

/// Reset the population, run one engine, and measure the result.
pub fn run_mechanism(
    engine: &dyn AllocationEngine,
    population: &mut Population,
    weights: &RoleWeights,
) -> AllocResult<Outcome> {
    population.reset();
    engine.allocate(population, weights)?;
    let outcome = evaluate(engine.mechanism(), population, weights);
    debug!(
        mechanism = engine.mechanism().name(),
        productivity = outcome.total_productivity,
        self_choice = outcome.self_choice_rate,
        unassigned = outcome.assignment.unassigned.len(),
        "mechanism settled"
    );
    Ok(outcome)
}

/// Run all three mechanisms on the same population and weights.
pub fn run_trial(
    cfg: &AllocCfg,
    population: &mut Population,
    weights: &RoleWeights,
) -> AllocResult<TrialRecord> {
    cfg.validate()?;
    let nomination = SelfNomination::with_cap_factor(cfg.congestion_cap_factor, population.len());

    let self_nomination = run_mechanism(&nomination, population, weights)?;
    let top_down = run_mechanism(&TopDown, population, weights)?;
    let stable_matching = run_mechanism(&StableMatching::default(), population, weights)?;
    population.reset();

    Ok(TrialRecord {
        seed: None,
        weights: weights.clone(),
        competencies: population.competency_rows(),
        top_down,
        self_nomination,
        stable_matching,
    })
}

/// Draw weights, then competencies, from `seed` and run one trial.
pub fn run_seeded_trial(cfg: &AllocCfg, seed: u64) -> AllocResult<TrialRecord> {
    cfg.validate()?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let weights = RoleWeights::random(&mut rng, cfg.roles)?;
    let mut population = generate_population(&mut rng, cfg)?;

    let mut record = run_trial(cfg, &mut population, &weights)?;
    record.seed = Some(seed);
    Ok(record)
}
