use tracing::debug;

use crate::engine::{check_grid, AllocationEngine, Mechanism};
use crate::error::AllocResult;
use crate::population::Population;
use crate::weights::RoleWeights;

/// Centralized greedy allocation.
///
/// Roles are served heaviest first; each takes the strongest still-unassigned
/// workers for that role up to capacity. A role served late can end with
/// fewer occupants than capacity when workers run out.
#[derive(Clone, Copy, Debug, Default)]
pub struct TopDown;

impl TopDown {
    pub fn run(&self, population: &mut Population, weights: &RoleWeights) -> AllocResult<()> {
        check_grid(population, weights)?;

        for role in weights.priority_order() {
            // `unassigned` is in ascending id order and the sort is stable.
            let mut candidates = population.unassigned();
            candidates.sort_by(|&a, &b| {
                population
                    .worker(b)
                    .competency(role)
                    .total_cmp(&population.worker(a).competency(role))
            });
            candidates.truncate(population.capacity());

            debug!(role, weight = weights.get(role), picked = ?candidates, "top-down role filled");
            for worker in candidates {
                population.assign(worker, role);
            }
        }
        Ok(())
    }
}

impl AllocationEngine for TopDown {
    fn mechanism(&self) -> Mechanism {
        Mechanism::TopDown
    }

    fn allocate(&self, population: &mut Population, weights: &RoleWeights) -> AllocResult<()> {
        self.run(population, weights)
    }
}
