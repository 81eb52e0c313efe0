use serde::{Deserialize, Serialize};

use crate::cfg::AllocCfg;
use crate::error::{AllocError, AllocResult};
use crate::worker::{RoleIdx, Worker, WorkerId};

/// Final role -> occupants relation of one mechanism run.
///
/// Occupant lists are sorted by ascending worker id. Workers no role could
/// take are listed in `unassigned` rather than dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub occupants: Vec<Vec<WorkerId>>,
    pub unassigned: Vec<WorkerId>,
}

impl Assignment {
    pub fn max_occupancy(&self) -> usize {
        self.occupants.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }

    pub fn role_of(&self, worker: WorkerId) -> Option<RoleIdx> {
        self.occupants.iter().position(|occ| occ.contains(&worker))
    }
}

/// Workers of one trial plus the role grid they are allocated onto.
/// Serialize-only: decoding would bypass the row checks in `new`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Population {
    workers: Vec<Worker>,
    roles: usize,
    capacity: usize,
}

impl Population {
    /// Build from one competency row per worker; worker ids are row indices.
    pub fn new(rows: Vec<Vec<f64>>, roles: usize, capacity: usize) -> AllocResult<Self> {
        if rows.is_empty() {
            return Err(AllocError::invalid("population must be at least 1"));
        }
        if roles == 0 || capacity == 0 {
            return Err(AllocError::invalid(format!(
                "grid of {roles} roles x capacity {capacity} has no seats"
            )));
        }

        let mut workers = Vec::with_capacity(rows.len());
        for (id, row) in rows.into_iter().enumerate() {
            if row.len() != roles {
                return Err(AllocError::invalid(format!(
                    "worker {id} has {} competencies, grid has {roles} roles",
                    row.len()
                )));
            }
            workers.push(Worker::new(id, row)?);
        }

        Ok(Self { workers, roles, capacity })
    }

    pub fn with_cfg(rows: Vec<Vec<f64>>, cfg: &AllocCfg) -> AllocResult<Self> {
        Self::new(rows, cfg.roles, cfg.capacity)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    #[inline]
    pub fn roles(&self) -> usize {
        self.roles
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn worker(&self, id: WorkerId) -> &Worker {
        &self.workers[id]
    }

    pub fn worker_mut(&mut self, id: WorkerId) -> &mut Worker {
        &mut self.workers[id]
    }

    pub fn competency_rows(&self) -> Vec<Vec<f64>> {
        self.workers.iter().map(|w| w.competencies().to_vec()).collect()
    }

    pub fn occupancy(&self, role: RoleIdx) -> usize {
        self.workers.iter().filter(|w| w.assigned == Some(role)).count()
    }

    pub fn occupants(&self, role: RoleIdx) -> Vec<WorkerId> {
        self.workers
            .iter()
            .filter(|w| w.assigned == Some(role))
            .map(|w| w.id)
            .collect()
    }

    #[inline]
    pub fn has_room(&self, role: RoleIdx) -> bool {
        self.occupancy(role) < self.capacity
    }

    pub fn unassigned(&self) -> Vec<WorkerId> {
        self.workers
            .iter()
            .filter(|w| w.assigned.is_none())
            .map(|w| w.id)
            .collect()
    }

    pub fn overfull_roles(&self) -> Vec<RoleIdx> {
        (0..self.roles)
            .filter(|&r| self.occupancy(r) > self.capacity)
            .collect()
    }

    pub fn assign(&mut self, worker: WorkerId, role: RoleIdx) {
        self.workers[worker].assigned = Some(role);
    }

    pub fn unassign(&mut self, worker: WorkerId) {
        self.workers[worker].assigned = None;
    }

    /// Clear every seat and restore every working preference queue.
    pub fn reset(&mut self) {
        for w in &mut self.workers {
            w.reset();
        }
    }

    pub fn assignment(&self) -> Assignment {
        Assignment {
            occupants: (0..self.roles).map(|r| self.occupants(r)).collect(),
            unassigned: self.unassigned(),
        }
    }
}
