use std::collections::VecDeque;

use serde::Serialize;

use crate::cfg::COMPETENCY_MAX;
use crate::error::{AllocError, AllocResult};

pub type WorkerId = usize;
pub type RoleIdx = usize;

/// One worker: fixed competencies, two preference sequences and a current seat.
///
/// `original_prefs` never changes after construction; only the stable matching
/// engine consumes `working_prefs`, and `reset` restores it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Worker {
    pub id: WorkerId,
    competencies: Vec<f64>,
    original_prefs: Vec<RoleIdx>,
    working_prefs: VecDeque<RoleIdx>,
    pub assigned: Option<RoleIdx>,
}

impl Worker {
    pub fn new(id: WorkerId, competencies: Vec<f64>) -> AllocResult<Self> {
        if competencies.is_empty() {
            return Err(AllocError::invalid(format!("worker {id} has no competencies")));
        }
        if let Some(bad) = competencies
            .iter()
            .find(|c| !c.is_finite() || **c < 0.0 || **c > COMPETENCY_MAX)
        {
            return Err(AllocError::invalid(format!(
                "worker {id} competency {bad} outside [0, {COMPETENCY_MAX}]"
            )));
        }

        let original_prefs = rank_roles(&competencies);
        Ok(Self {
            id,
            working_prefs: original_prefs.iter().copied().collect(),
            original_prefs,
            competencies,
            assigned: None,
        })
    }

    #[inline]
    pub fn competency(&self, role: RoleIdx) -> f64 {
        self.competencies[role]
    }

    pub fn competencies(&self) -> &[f64] {
        &self.competencies
    }

    pub fn original_prefs(&self) -> &[RoleIdx] {
        &self.original_prefs
    }

    pub fn working_prefs(&self) -> &VecDeque<RoleIdx> {
        &self.working_prefs
    }

    /// Role of maximal competency, lowest index on ties.
    #[inline]
    pub fn top_choice(&self) -> RoleIdx {
        self.original_prefs[0]
    }

    /// Second-highest competency across all roles; 0 when there is only one role.
    pub fn second_best_competency(&self) -> f64 {
        self.original_prefs
            .get(1)
            .map(|&r| self.competencies[r])
            .unwrap_or(0.0)
    }

    /// Position of `role` in the original ranking (0 = most preferred).
    pub fn rank_of(&self, role: RoleIdx) -> Option<usize> {
        self.original_prefs.iter().position(|&r| r == role)
    }

    pub fn pop_preference(&mut self) -> Option<RoleIdx> {
        self.working_prefs.pop_front()
    }

    pub fn reset(&mut self) {
        self.assigned = None;
        self.working_prefs = self.original_prefs.iter().copied().collect();
    }
}

/// Role indices by descending competency; the stable sort keeps ascending index on ties.
fn rank_roles(competencies: &[f64]) -> Vec<RoleIdx> {
    let mut order: Vec<RoleIdx> = (0..competencies.len()).collect();
    order.sort_by(|&a, &b| competencies[b].total_cmp(&competencies[a]));
    order
}

