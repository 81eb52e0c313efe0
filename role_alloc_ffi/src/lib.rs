#![allow(clippy::missing_safety_doc)]

//! C ABI over the allocation core and its Monte-Carlo driver.
//!
//! Callers own every output buffer; nothing allocated here crosses the boundary.

use role_alloc_core::{run_seeded_trial, AllocCfg, AllocError, Mechanism, Outcome};
use role_alloc_supervisor::{
    sweep_means, MechanismAverages, Simulation, SimulationCfg, SimulationError, SimulationSummary,
    WeightPolicy,
};

/// FFI ABI version for role_alloc_ffi.
///
/// Bump this when any `#[repr(C)]` struct layout or exported function signature changes.
pub const ROLE_ALLOC_FFI_VERSION: u32 = 1;

pub const RA_OK: i32 = 0;
pub const RA_INVALID_CONFIG: i32 = -1;
pub const RA_CONGESTION_EXCEEDED: i32 = -2;
pub const RA_BAD_POINTER: i32 = -3;

#[no_mangle]
pub extern "C" fn role_alloc_ffi_version() -> u32 {
    ROLE_ALLOC_FFI_VERSION
}

/// Allocation cfg for FFI.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct RaCfg {
    pub population: u32,
    pub roles: u32,
    pub capacity: u32,
    pub mean: f64,
    pub variance: f64,
    pub congestion_cap_factor: u32,
}

#[no_mangle]
pub extern "C" fn role_alloc_cfg_default() -> RaCfg {
    let d = AllocCfg::default();
    RaCfg {
        population: d.population as u32,
        roles: d.roles as u32,
        capacity: d.capacity as u32,
        mean: d.mean,
        variance: d.variance,
        congestion_cap_factor: d.congestion_cap_factor as u32,
    }
}

fn cfg_from_ffi(c: RaCfg) -> AllocCfg {
    AllocCfg {
        population: c.population as usize,
        roles: c.roles as usize,
        capacity: c.capacity as usize,
        mean: c.mean,
        variance: c.variance,
        congestion_cap_factor: c.congestion_cap_factor as usize,
    }
}

fn sim_cfg(cfg: RaCfg, trials: u32, seed: u64, parallel: u8) -> SimulationCfg {
    SimulationCfg {
        alloc: cfg_from_ffi(cfg),
        trials: trials as usize,
        seed,
        parallel: parallel != 0,
        weights: WeightPolicy::Random,
    }
}

fn alloc_rc(e: &AllocError) -> i32 {
    match e {
        AllocError::InvalidConfiguration { .. } => RA_INVALID_CONFIG,
        AllocError::CongestionLoopExceeded { .. } => RA_CONGESTION_EXCEEDED,
    }
}

fn sim_rc(e: &SimulationError) -> i32 {
    match e {
        SimulationError::Alloc(e) | SimulationError::Trial { source: e, .. } => alloc_rc(e),
        SimulationError::ConfigParse(_) | SimulationError::ZeroTrials => RA_INVALID_CONFIG,
    }
}

/// Mechanism as a C-friendly enum; also the block order of per-worker role arrays.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaMechanism {
    TopDown = 0,
    SelfNomination = 1,
    StableMatching = 2,
}

pub fn mechanism_to_ffi(m: Mechanism) -> RaMechanism {
    match m {
        Mechanism::TopDown => RaMechanism::TopDown,
        Mechanism::SelfNomination => RaMechanism::SelfNomination,
        Mechanism::StableMatching => RaMechanism::StableMatching,
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct RaOutcome {
    pub total_productivity: f64,
    pub self_choice_rate: f64,
    pub unassigned: u32,
}

impl From<&Outcome> for RaOutcome {
    fn from(o: &Outcome) -> Self {
        RaOutcome {
            total_productivity: o.total_productivity,
            self_choice_rate: o.self_choice_rate,
            unassigned: o.assignment.unassigned.len() as u32,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct RaTrialResult {
    pub seed: u64,
    pub top_down: RaOutcome,
    pub self_nomination: RaOutcome,
    pub stable_matching: RaOutcome,
}

/// Run one seeded trial.
///
/// `roles_out` may be null. Otherwise it must point to `roles_len >= 3 * population`
/// i32s, filled with one block per mechanism in `RaMechanism` order: each
/// worker's role index, or -1 when unassigned.
#[no_mangle]
pub unsafe extern "C" fn role_alloc_run_trial(
    cfg: RaCfg,
    seed: u64,
    out: *mut RaTrialResult,
    roles_out: *mut i32,
    roles_len: usize,
) -> i32 {
    if out.is_null() {
        return RA_BAD_POINTER;
    }
    let cfg = cfg_from_ffi(cfg);
    if !roles_out.is_null() && roles_len < 3 * cfg.population {
        return RA_BAD_POINTER;
    }

    let record = match run_seeded_trial(&cfg, seed) {
        Ok(r) => r,
        Err(e) => return alloc_rc(&e),
    };

    *out = RaTrialResult {
        seed,
        top_down: (&record.top_down).into(),
        self_nomination: (&record.self_nomination).into(),
        stable_matching: (&record.stable_matching).into(),
    };

    if !roles_out.is_null() {
        let n = record.competencies.len();
        let roles = std::slice::from_raw_parts_mut(roles_out, 3 * n);
        for m in Mechanism::ALL {
            let block = mechanism_to_ffi(m) as usize * n;
            let assignment = &record.outcome(m).assignment;
            for worker in 0..n {
                roles[block + worker] = assignment.role_of(worker).map(|r| r as i32).unwrap_or(-1);
            }
        }
    }
    RA_OK
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct RaAverages {
    pub productivity: f64,
    pub self_choice: f64,
    pub unassigned: f64,
}

impl From<MechanismAverages> for RaAverages {
    fn from(a: MechanismAverages) -> Self {
        RaAverages {
            productivity: a.productivity,
            self_choice: a.self_choice,
            unassigned: a.unassigned,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct RaSummary {
    pub trials: u32,
    pub top_down: RaAverages,
    pub self_nomination: RaAverages,
    pub stable_matching: RaAverages,
    pub mean_competency: f64,
    pub between_worker_std: f64,
    pub within_worker_std: f64,
}

impl From<&SimulationSummary> for RaSummary {
    fn from(s: &SimulationSummary) -> Self {
        RaSummary {
            trials: s.trials as u32,
            top_down: s.top_down.into(),
            self_nomination: s.self_nomination.into(),
            stable_matching: s.stable_matching.into(),
            mean_competency: s.population.mean_competency,
            between_worker_std: s.population.between_worker_std,
            within_worker_std: s.population.within_worker_std,
        }
    }
}

/// Average `trials` random-weight trials derived from `seed`.
#[no_mangle]
pub unsafe extern "C" fn role_alloc_run_simulation(
    cfg: RaCfg,
    trials: u32,
    seed: u64,
    parallel: u8,
    out: *mut RaSummary,
) -> i32 {
    if out.is_null() {
        return RA_BAD_POINTER;
    }
    match Simulation::new(sim_cfg(cfg, trials, seed, parallel)).run() {
        Ok(summary) => {
            *out = (&summary).into();
            RA_OK
        }
        Err(e) => sim_rc(&e),
    }
}

/// One simulation per entry of `means`.
///
/// `out` must hold `means_len` summaries. `gaps_out` may be null; otherwise it
/// receives `means_len` top-down vs stable-matching productivity gaps (percent).
#[no_mangle]
pub unsafe extern "C" fn role_alloc_sweep(
    cfg: RaCfg,
    trials: u32,
    seed: u64,
    means_ptr: *const f64,
    means_len: usize,
    out: *mut RaSummary,
    gaps_out: *mut f64,
) -> i32 {
    if means_ptr.is_null() || out.is_null() {
        return RA_BAD_POINTER;
    }
    let means = std::slice::from_raw_parts(means_ptr, means_len);

    let points = match sweep_means(&sim_cfg(cfg, trials, seed, 0), means) {
        Ok(p) => p,
        Err(e) => return sim_rc(&e),
    };

    let summaries = std::slice::from_raw_parts_mut(out, means_len);
    for (slot, point) in summaries.iter_mut().zip(&points) {
        *slot = (&point.summary).into();
    }
    if !gaps_out.is_null() {
        let gaps = std::slice::from_raw_parts_mut(gaps_out, means_len);
        for (slot, point) in gaps.iter_mut().zip(&points) {
            *slot = point.productivity_gap_pct;
        }
    }
    RA_OK
}
