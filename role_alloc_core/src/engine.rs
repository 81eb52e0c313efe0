use serde::{Deserialize, Serialize};

use crate::error::{AllocError, AllocResult};
use crate::population::Population;
use crate::weights::RoleWeights;

/// The three allocation strategies under comparison.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mechanism {
    TopDown,
    SelfNomination,
    StableMatching,
}

impl Mechanism {
    pub const ALL: [Mechanism; 3] = [
        Mechanism::TopDown,
        Mechanism::SelfNomination,
        Mechanism::StableMatching,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Mechanism::TopDown => "top_down",
            Mechanism::SelfNomination => "self_nomination",
            Mechanism::StableMatching => "stable_matching",
        }
    }
}

/// A mechanism that fills seats on a population whose seats start empty.
///
/// Implementations leave the settled assignment on the population; metrics
/// are read from it afterwards.
pub trait AllocationEngine {
    fn mechanism(&self) -> Mechanism;

    fn allocate(&self, population: &mut Population, weights: &RoleWeights) -> AllocResult<()>;
}

pub(crate) fn check_grid(population: &Population, weights: &RoleWeights) -> AllocResult<()> {
    if weights.len() != population.roles() {
        return Err(AllocError::invalid(format!(
            "{} weights for {} roles",
            weights.len(),
            population.roles()
        )));
    }
    Ok(())
}
