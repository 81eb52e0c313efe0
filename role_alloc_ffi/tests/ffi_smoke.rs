//! FFI smoke tests.
//!
//! These tests call the exported `extern "C"` functions directly (as an external consumer would),
//! to validate:
//! - ABI surface compiles and links
//! - caller-owned output buffers are filled as documented
//! - errors map to the documented return codes

use std::ptr;

use role_alloc_ffi::*;

#[test]
fn ffi_version_and_default_cfg() {
    assert_eq!(role_alloc_ffi_version(), ROLE_ALLOC_FFI_VERSION);

    let cfg = role_alloc_cfg_default();
    assert_eq!(cfg.population, 10);
    assert_eq!(cfg.roles, 5);
    assert_eq!(cfg.capacity, 2);
    assert!(cfg.mean.is_finite());
    assert!(cfg.variance >= 0.0);
}

#[test]
fn ffi_trial_fills_result_and_roles() {
    let cfg = role_alloc_cfg_default();
    let mut out = RaTrialResult::default();
    let mut roles = vec![i32::MIN; 30];

    let rc = unsafe { role_alloc_run_trial(cfg, 11, &mut out, roles.as_mut_ptr(), roles.len()) };
    assert_eq!(rc, RA_OK);
    assert_eq!(out.seed, 11);
    for o in [out.top_down, out.self_nomination, out.stable_matching] {
        assert!(o.total_productivity.is_finite());
        assert!((0.0..=1.0).contains(&o.self_choice_rate));
        assert_eq!(o.unassigned, 0);
    }

    // Full grid: every worker seated, every role exactly full.
    for block in roles.chunks(10) {
        let mut per_role = [0usize; 5];
        for &r in block {
            assert!((0..5).contains(&r));
            per_role[r as usize] += 1;
        }
        assert_eq!(per_role, [2; 5]);
    }

    // Same seed, same answer.
    let mut again = RaTrialResult::default();
    let rc = unsafe { role_alloc_run_trial(cfg, 11, &mut again, ptr::null_mut(), 0) };
    assert_eq!(rc, RA_OK);
    assert_eq!(again.top_down.total_productivity, out.top_down.total_productivity);
}

#[test]
fn ffi_rejects_bad_input() {
    let mut cfg = role_alloc_cfg_default();
    let mut out = RaTrialResult::default();

    assert_eq!(unsafe { role_alloc_run_trial(cfg, 0, ptr::null_mut(), ptr::null_mut(), 0) }, RA_BAD_POINTER);

    let mut short = [0i32; 4];
    assert_eq!(
        unsafe { role_alloc_run_trial(cfg, 0, &mut out, short.as_mut_ptr(), short.len()) },
        RA_BAD_POINTER
    );

    cfg.variance = -1.0;
    assert_eq!(unsafe { role_alloc_run_trial(cfg, 0, &mut out, ptr::null_mut(), 0) }, RA_INVALID_CONFIG);

    let mut summary = RaSummary::default();
    let cfg = role_alloc_cfg_default();
    assert_eq!(unsafe { role_alloc_run_simulation(cfg, 0, 0, 0, &mut summary) }, RA_INVALID_CONFIG);
}

#[test]
fn ffi_simulation_and_sweep() {
    let cfg = role_alloc_cfg_default();
    let mut summary = RaSummary::default();
    let rc = unsafe { role_alloc_run_simulation(cfg, 50, 3, 1, &mut summary) };
    assert_eq!(rc, RA_OK);
    assert_eq!(summary.trials, 50);
    assert!(summary.self_nomination.self_choice >= summary.stable_matching.self_choice - 1e-12);

    let means = [3.0, 7.0];
    let mut points = [RaSummary::default(); 2];
    let mut gaps = [f64::NAN; 2];
    let rc = unsafe {
        role_alloc_sweep(cfg, 20, 3, means.as_ptr(), means.len(), points.as_mut_ptr(), gaps.as_mut_ptr())
    };
    assert_eq!(rc, RA_OK);
    assert!(points[0].mean_competency < points[1].mean_competency);
    assert!(gaps.iter().all(|g| g.is_finite()));
}
