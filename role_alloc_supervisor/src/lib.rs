//! role_alloc_supervisor
//!
//! Driver layer for `role_alloc_core`.
//!
//! Responsibilities:
//! - choose where populations and weights come from (adapters)
//! - repeat trials under derived per-trial seeds, optionally in parallel
//! - average productivity, self-choice and population dispersion
//! - sweep the competency mean
//!
//! Non-goals:
//! - no IO or persistence
//! - no charts
//! - no allocation policy (lives in core)

pub mod adapter;
pub mod cfg;
pub mod error;
pub mod stats;
pub mod supervisor;

pub use adapter::{FixedSource, GaussianSource, PopulationSource, WeightPolicy};
pub use cfg::SimulationCfg;
pub use error::{SimulationError, SimulationResult};
pub use stats::{population_stats, PopulationStats};
pub use supervisor::{
    sweep_means,
    trial_seed,
    MechanismAverages,
    Simulation,
    SimulationSummary,
    SweepPoint,
};
