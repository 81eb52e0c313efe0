use serde::{Deserialize, Serialize};

use crate::engine::Mechanism;
use crate::population::{Assignment, Population};
use crate::weights::RoleWeights;
use crate::worker::RoleIdx;

/// Sum of occupants' competency for `role`; 0 for an empty role.
pub fn role_productivity(population: &Population, role: RoleIdx) -> f64 {
    population
        .workers()
        .iter()
        .filter(|w| w.assigned == Some(role))
        .map(|w| w.competency(role))
        .sum()
}

/// Importance-weighted sum of role productivities.
pub fn total_productivity(population: &Population, weights: &RoleWeights) -> f64 {
    (0..population.roles())
        .map(|r| weights.get(r) * role_productivity(population, r))
        .sum()
}

/// Fraction of workers seated in their original top-ranked role.
///
/// Unassigned workers count as not self-choosing.
pub fn self_choice_rate(population: &Population) -> f64 {
    if population.is_empty() {
        return 0.0;
    }
    let chose = population
        .workers()
        .iter()
        .filter(|w| w.assigned == Some(w.top_choice()))
        .count();
    chose as f64 / population.len() as f64
}

/// Metrics of one settled mechanism run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub mechanism: Mechanism,
    pub total_productivity: f64,
    pub self_choice_rate: f64,
    pub role_productivity: Vec<f64>,
    pub assignment: Assignment,
}

pub fn evaluate(mechanism: Mechanism, population: &Population, weights: &RoleWeights) -> Outcome {
    Outcome {
        mechanism,
        total_productivity: total_productivity(population, weights),
        self_choice_rate: self_choice_rate(population),
        role_productivity: (0..population.roles())
            .map(|r| role_productivity(population, r))
            .collect(),
        assignment: population.assignment(),
    }
}
