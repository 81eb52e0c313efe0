pub mod cfg;
pub mod error;

pub mod worker;
pub mod population;
pub mod weights;
pub mod generator;

pub mod engine;
pub mod topdown;
pub mod nomination;
pub mod matching;

pub mod metrics;
pub mod trial;

pub use cfg::{AllocCfg, COMPETENCY_MAX};
pub use error::{AllocError, AllocResult};

pub use worker::{RoleIdx, Worker, WorkerId};
pub use population::{Assignment, Population};
pub use weights::RoleWeights;
pub use generator::{generate_competencies, generate_population};

pub use engine::{AllocationEngine, Mechanism};
pub use topdown::TopDown;
pub use nomination::{specialization_margin, CongestionReport, SelfNomination};
pub use matching::{blocking_pairs, MatchingReport, StableMatching};

pub use metrics::{evaluate, role_productivity, self_choice_rate, total_productivity, Outcome};
pub use trial::{run_mechanism, run_seeded_trial, run_trial, TrialRecord};
