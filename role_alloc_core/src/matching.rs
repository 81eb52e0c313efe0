//! Worker-proposing deferred acceptance with per-role capacity.
//!
//! Free workers propose in ascending id order: the lowest-id free worker with
//! a non-empty working queue always moves next. A full role keeps its
//! strongest occupants and bounces the weakest one (lowest id among equals)
//! only for a strictly stronger proposer.
//!
//! The optional post-pass seats leftover workers into any role with room
//! (ascending worker id, then ascending role index). It trades stability for
//! full assignment for exactly the workers it places.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{check_grid, AllocationEngine, Mechanism};
use crate::error::AllocResult;
use crate::population::Population;
use crate::weights::RoleWeights;
use crate::worker::{RoleIdx, WorkerId};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingReport {
    pub proposals: usize,
    pub rejections: usize,
    pub evictions: usize,
    /// Workers seated by the post-pass, ignoring their preferences.
    pub post_pass_placed: Vec<WorkerId>,
    /// Workers left without a role at the end.
    pub residual: Vec<WorkerId>,
}

#[derive(Clone, Copy, Debug)]
pub struct StableMatching {
    pub post_pass: bool,
}

impl Default for StableMatching {
    fn default() -> Self {
        Self { post_pass: true }
    }
}

impl StableMatching {
    pub fn without_post_pass() -> Self {
        Self { post_pass: false }
    }

    /// Seat unassigned workers in ascending id order into the lowest-index
    /// role with room. Returns the workers placed.
    ///
    /// After a complete proposal phase this is a no-op: a worker only runs
    /// out of proposals once every role has turned it away full.
    pub fn place_residual(population: &mut Population) -> Vec<WorkerId> {
        let mut placed = Vec::new();
        for worker in population.unassigned() {
            let Some(role) = (0..population.roles()).find(|&r| population.has_room(r)) else {
                break;
            };
            debug!(worker, role, "post-pass placement");
            population.assign(worker, role);
            placed.push(worker);
        }
        placed
    }

    pub fn run(&self, population: &mut Population, weights: &RoleWeights) -> AllocResult<MatchingReport> {
        check_grid(population, weights)?;

        let mut report = MatchingReport::default();
        propose(population, &mut report);
        if self.post_pass {
            report.post_pass_placed = Self::place_residual(population);
        }
        report.residual = population.unassigned();
        Ok(report)
    }
}

impl AllocationEngine for StableMatching {
    fn mechanism(&self) -> Mechanism {
        Mechanism::StableMatching
    }

    fn allocate(&self, population: &mut Population, weights: &RoleWeights) -> AllocResult<()> {
        self.run(population, weights).map(|_| ())
    }
}

fn weakest_occupant(population: &Population, role: RoleIdx) -> Option<WorkerId> {
    population.occupants(role).into_iter().min_by(|&a, &b| {
        population
            .worker(a)
            .competency(role)
            .total_cmp(&population.worker(b).competency(role))
    })
}

fn propose(population: &mut Population, report: &mut MatchingReport) {
    let mut free: BTreeSet<WorkerId> = population.unassigned().into_iter().collect();

    while let Some(proposer) = free.pop_first() {
        // An exhausted queue takes the worker out of the pool for good.
        let Some(role) = population.worker_mut(proposer).pop_preference() else {
            continue;
        };
        report.proposals += 1;

        if population.has_room(role) {
            population.assign(proposer, role);
            continue;
        }

        let strength = population.worker(proposer).competency(role);
        match weakest_occupant(population, role) {
            Some(weakest) if strength > population.worker(weakest).competency(role) => {
                debug!(role, proposer, evicted = weakest, "proposal displaced weakest occupant");
                population.unassign(weakest);
                population.assign(proposer, role);
                free.insert(weakest);
                report.evictions += 1;
            }
            _ => {
                report.rejections += 1;
                free.insert(proposer);
            }
        }
    }
}

/// `(worker, role)` pairs where the worker ranks `role` above its current
/// seat and the role either has room or holds an occupant strictly weaker
/// in that role. Unassigned workers rank every role above no seat.
pub fn blocking_pairs(population: &Population) -> Vec<(WorkerId, RoleIdx)> {
    let mut out = Vec::new();
    for worker in population.workers() {
        let preferred = match worker.assigned {
            Some(current) => {
                let rank = worker.rank_of(current).unwrap_or(0);
                &worker.original_prefs()[..rank]
            }
            None => worker.original_prefs(),
        };

        for &role in preferred {
            let blocks = population.has_room(role)
                || weakest_occupant(population, role)
                    .is_some_and(|w| population.worker(w).competency(role) < worker.competency(role));
            if blocks {
                out.push((worker.id, role));
            }
        }
    }
    out
}
