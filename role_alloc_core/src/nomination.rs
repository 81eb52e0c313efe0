use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::{check_grid, AllocationEngine, Mechanism};
use crate::error::{AllocError, AllocResult};
use crate::population::Population;
use crate::weights::RoleWeights;
use crate::worker::{RoleIdx, Worker, WorkerId};

/// Counters from one congestion resolution run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CongestionReport {
    /// Roles over capacity right after nomination.
    pub initial_overfull: Vec<RoleIdx>,
    pub passes: usize,
    pub evictions: usize,
    /// Evicted workers that found no role with room.
    pub stranded: Vec<WorkerId>,
}

/// Decentralized allocation: everyone nominates their best role, then
/// overfull roles shed their least specialized occupant until all fit.
#[derive(Clone, Copy, Debug)]
pub struct SelfNomination {
    pub max_passes: usize,
}

impl SelfNomination {
    pub fn new(max_passes: usize) -> Self {
        Self { max_passes }
    }

    /// Cap of `factor` passes per worker.
    pub fn with_cap_factor(factor: usize, population: usize) -> Self {
        Self::new(factor.saturating_mul(population))
    }

    /// Every worker takes its highest-competency role, lowest index on ties.
    pub fn nominate(population: &mut Population) {
        for id in 0..population.len() {
            let choice = population.worker(id).top_choice();
            population.assign(id, choice);
        }
    }

    /// Evict and reroute until no role exceeds capacity.
    pub fn resolve(&self, population: &mut Population) -> AllocResult<CongestionReport> {
        let mut report = CongestionReport {
            initial_overfull: population.overfull_roles(),
            ..CongestionReport::default()
        };

        while report.passes < self.max_passes {
            let overfull = population.overfull_roles();
            if overfull.is_empty() {
                break;
            }
            report.passes += 1;

            for role in overfull {
                if population.occupancy(role) <= population.capacity() {
                    continue;
                }
                self.evict_one(population, role, &mut report);
            }
        }

        let overfull = population.overfull_roles();
        if !overfull.is_empty() {
            warn!(cap = self.max_passes, overfull = ?overfull, "congestion resolution did not converge");
            return Err(AllocError::CongestionLoopExceeded {
                cap: self.max_passes,
                overfull_roles: overfull,
            });
        }

        report.stranded = population.unassigned();
        Ok(report)
    }

    fn evict_one(&self, population: &mut Population, role: RoleIdx, report: &mut CongestionReport) {
        // `min_by` keeps the first minimum, so ties go to the lowest id.
        let Some(evicted) = population.occupants(role).into_iter().min_by(|&a, &b| {
            specialization_margin(population.worker(a), role)
                .total_cmp(&specialization_margin(population.worker(b), role))
        }) else {
            return;
        };

        population.unassign(evicted);
        report.evictions += 1;

        let seat = population
            .worker(evicted)
            .original_prefs()
            .iter()
            .copied()
            .find(|&r| population.has_room(r));

        match seat {
            Some(next) => {
                debug!(worker = evicted, from = role, to = next, "evicted and rerouted");
                population.assign(evicted, next);
            }
            None => debug!(worker = evicted, from = role, "evicted, no role has room"),
        }
    }

    pub fn run(&self, population: &mut Population, weights: &RoleWeights) -> AllocResult<CongestionReport> {
        check_grid(population, weights)?;
        Self::nominate(population);
        self.resolve(population)
    }
}

/// Competency in `role` minus the worker's second-highest competency.
pub fn specialization_margin(worker: &Worker, role: RoleIdx) -> f64 {
    worker.competency(role) - worker.second_best_competency()
}

impl AllocationEngine for SelfNomination {
    fn mechanism(&self) -> Mechanism {
        Mechanism::SelfNomination
    }

    fn allocate(&self, population: &mut Population, weights: &RoleWeights) -> AllocResult<()> {
        self.run(population, weights).map(|_| ())
    }
}
