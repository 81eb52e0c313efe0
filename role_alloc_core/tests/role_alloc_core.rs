use role_alloc_core::*;

fn population(rows: &[&[f64]], capacity: usize) -> Population {
    let roles = rows[0].len();
    Population::new(rows.iter().map(|r| r.to_vec()).collect(), roles, capacity).unwrap()
}

fn cfg_for(population: &Population) -> AllocCfg {
    AllocCfg {
        population: population.len(),
        roles: population.roles(),
        capacity: population.capacity(),
        ..AllocCfg::default()
    }
}

#[test]
fn no_contention_all_mechanisms_agree() {
    let mut pop = population(&[&[9.0, 1.0], &[8.0, 1.0], &[1.0, 9.0], &[1.0, 8.0]], 2);
    let weights = RoleWeights::normalize(vec![0.6, 0.4]).unwrap();
    let record = run_trial(&cfg_for(&pop), &mut pop, &weights).unwrap();

    for m in Mechanism::ALL {
        let out = record.outcome(m);
        assert_eq!(out.assignment.occupants, vec![vec![0, 1], vec![2, 3]], "{}", m.name());
        assert!(out.assignment.is_complete());
        assert!((out.total_productivity - (0.6 * 17.0 + 0.4 * 17.0)).abs() < 1e-9);
        assert_eq!(out.self_choice_rate, 1.0);
        assert_eq!(out.role_productivity, vec![17.0, 17.0]);
    }
}

#[test]
fn contention_stronger_worker_wins_single_seat() {
    let weights = RoleWeights::uniform(1).unwrap();

    let mut pop = population(&[&[9.0], &[2.0]], 1);
    TopDown.run(&mut pop, &weights).unwrap();
    assert_eq!(pop.occupants(0), vec![0]);
    assert_eq!(pop.unassigned(), vec![1]);
    assert!((total_productivity(&pop, &weights) - 9.0).abs() < 1e-12);

    let mut pop = population(&[&[9.0], &[2.0]], 1);
    let report = StableMatching::default().run(&mut pop, &weights).unwrap();
    assert_eq!(pop.occupants(0), vec![0]);
    assert_eq!(report.proposals, 2);
    assert_eq!(report.rejections, 1);
    assert_eq!(report.residual, vec![1]);
    assert!(report.post_pass_placed.is_empty());

    let mut pop = population(&[&[9.0], &[2.0]], 1);
    let report = SelfNomination::new(8).run(&mut pop, &weights).unwrap();
    assert_eq!(report.initial_overfull, vec![0]);
    assert_eq!(report.evictions, 1);
    assert_eq!(report.stranded, vec![1]);
    assert_eq!(pop.occupants(0), vec![0]);
    assert_eq!(self_choice_rate(&pop), 0.5);
}

#[test]
fn evicted_nominee_reroutes_by_original_ranking() {
    let mut pop = population(&[&[9.0, 1.0], &[2.0, 1.5]], 1);
    let weights = RoleWeights::normalize(vec![0.7, 0.3]).unwrap();

    let report = SelfNomination::new(8).run(&mut pop, &weights).unwrap();
    assert_eq!(report.evictions, 1);
    assert!(report.stranded.is_empty());
    assert_eq!(pop.worker(1).assigned, Some(1));
    assert_eq!(pop.worker(0).assigned, Some(0));
}

#[test]
fn nomination_evicts_least_specialized_not_weakest() {
    // Worker 0 is stronger in role 0 but nearly indifferent between roles.
    let mut pop = population(&[&[9.0, 8.5], &[6.0, 1.0]], 1);
    let weights = RoleWeights::normalize(vec![0.5, 0.5]).unwrap();

    SelfNomination::new(8).run(&mut pop, &weights).unwrap();
    assert_eq!(pop.worker(0).assigned, Some(1));
    assert_eq!(pop.worker(1).assigned, Some(0));

    pop.reset();
    TopDown.run(&mut pop, &weights).unwrap();
    assert_eq!(pop.worker(0).assigned, Some(0));
}

#[test]
fn top_down_serves_heavy_roles_first() {
    // Both workers are best at role 0, but role 1 weighs more and takes them.
    let mut pop = population(&[&[9.0, 5.0], &[8.0, 4.0]], 2);
    let weights = RoleWeights::normalize(vec![0.2, 0.8]).unwrap();
    TopDown.run(&mut pop, &weights).unwrap();
    assert_eq!(pop.occupants(1), vec![0, 1]);
    assert!(pop.occupants(0).is_empty());
    assert_eq!(self_choice_rate(&pop), 0.0);
    assert_eq!(role_productivity(&pop, 0), 0.0);
}

#[test]
fn top_down_breaks_equal_competency_by_worker_id() {
    // Workers 0 and 2 tie for role 0; the lower id takes the second seat.
    let mut pop = population(&[&[5.0, 1.0], &[7.0, 1.0], &[5.0, 1.0]], 2);
    let weights = RoleWeights::normalize(vec![0.9, 0.1]).unwrap();
    TopDown.run(&mut pop, &weights).unwrap();
    assert_eq!(pop.occupants(0), vec![0, 1]);
    assert_eq!(pop.occupants(1), vec![2]);
}

#[test]
fn matching_keeps_strongest_occupants() {
    // Everyone ranks role 0 first; the two weakest fall through to role 1.
    let rows: &[&[f64]] = &[&[9.0, 1.0], &[8.0, 2.0], &[7.0, 3.0], &[6.0, 0.0]];
    let weights = RoleWeights::uniform(2).unwrap();

    let mut pop = population(rows, 2);
    let report = StableMatching::without_post_pass().run(&mut pop, &weights).unwrap();
    assert_eq!(pop.occupants(0), vec![0, 1]);
    assert_eq!(pop.occupants(1), vec![2, 3]);
    assert!(report.residual.is_empty());
    assert!(blocking_pairs(&pop).is_empty());

    let mut pop = population(&[&[9.0, 1.0], &[8.0, 2.0], &[7.0, 3.0]], 1);
    let weights = RoleWeights::uniform(2).unwrap();
    let report = StableMatching::without_post_pass().run(&mut pop, &weights).unwrap();
    assert_eq!(report.residual, vec![1]);
    assert!(blocking_pairs(&pop).is_empty());
}

#[test]
fn post_pass_places_leftovers_in_id_then_role_order() {
    let mut pop = population(&[&[9.0, 1.0, 1.0], &[8.0, 1.0, 1.0], &[7.0, 1.0, 1.0], &[6.0, 1.0, 1.0]], 1);
    pop.assign(0, 1);
    let placed = StableMatching::place_residual(&mut pop);
    assert_eq!(placed, vec![1, 2]);
    assert_eq!(pop.worker(1).assigned, Some(0));
    assert_eq!(pop.worker(2).assigned, Some(2));
    assert_eq!(pop.unassigned(), vec![3]);
}

#[test]
fn exhausted_proposers_stay_residual_when_roles_are_full() {
    let mut pop = population(&[&[9.0, 0.0], &[8.0, 0.0], &[7.0, 0.0]], 1);
    let weights = RoleWeights::uniform(2).unwrap();
    let report = StableMatching::default().run(&mut pop, &weights).unwrap();
    assert_eq!(pop.occupants(0), vec![0]);
    assert_eq!(pop.occupants(1), vec![1]);
    assert!(report.post_pass_placed.is_empty());
    assert_eq!(report.residual, vec![2]);
    assert_eq!(pop.assignment().unassigned, vec![2]);
}

#[test]
fn seeded_trials_reproduce() {
    let cfg = AllocCfg::default();
    let a = run_seeded_trial(&cfg, 1234).unwrap();
    let b = run_seeded_trial(&cfg, 1234).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.seed, Some(1234));

    let c = run_seeded_trial(&cfg, 1235).unwrap();
    assert_ne!(a.competencies, c.competencies);
}

#[test]
fn default_grid_is_fully_used() {
    let cfg = AllocCfg::default();
    for seed in 0..50 {
        let record = run_seeded_trial(&cfg, seed).unwrap();
        for m in Mechanism::ALL {
            let out = record.outcome(m);
            assert!(out.assignment.is_complete(), "seed {seed} {}", m.name());
            let seated: usize = out.assignment.occupants.iter().map(Vec::len).sum();
            assert_eq!(seated, cfg.total_capacity());
            assert!(out.assignment.max_occupancy() <= cfg.capacity);
            assert!((0.0..=1.0).contains(&out.self_choice_rate));
        }
    }
}

#[test]
fn congestion_loop_converges_within_cap() {
    let cfg = AllocCfg::default();
    let mut contended = 0;
    for seed in 0..100 {
        let record = run_seeded_trial(&cfg, seed).unwrap();
        let mut pop = Population::with_cfg(record.competencies.clone(), &cfg).unwrap();
        let engine = SelfNomination::with_cap_factor(cfg.congestion_cap_factor, cfg.population);
        let report = engine.run(&mut pop, &record.weights).unwrap();

        if !report.initial_overfull.is_empty() {
            contended += 1;
            assert!(report.passes >= 1);
        }
        assert!(report.passes <= cfg.congestion_cap());
        assert!(pop.assignment().max_occupancy() <= 2);
    }
    assert!(contended > 0, "expected at least one over-nominated trial");
}

#[test]
fn congestion_cap_exhaustion_is_reported() {
    let mut pop = population(&[&[9.0], &[8.0], &[7.0]], 1);
    let weights = RoleWeights::uniform(1).unwrap();
    let err = SelfNomination::new(0).run(&mut pop, &weights).unwrap_err();
    assert_eq!(
        err,
        AllocError::CongestionLoopExceeded { cap: 0, overfull_roles: vec![0] }
    );
}

#[test]
fn invalid_configuration_fails_early() {
    let cfg = AllocCfg { variance: -0.1, ..AllocCfg::default() };
    assert!(matches!(run_seeded_trial(&cfg, 0), Err(AllocError::InvalidConfiguration { .. })));

    let cfg = AllocCfg { population: 0, ..AllocCfg::default() };
    assert!(cfg.validate().is_err());

    let mut pop = population(&[&[1.0, 2.0]], 1);
    let weights = RoleWeights::uniform(3).unwrap();
    assert!(TopDown.run(&mut pop, &weights).is_err());

    assert!(Population::new(vec![vec![1.0, 2.0], vec![1.0]], 2, 1).is_err());
}

#[test]
fn self_choice_reads_original_ranking() {
    let mut pop = population(&[&[9.0, 1.0], &[1.0, 9.0]], 1);
    let weights = RoleWeights::uniform(2).unwrap();
    StableMatching::default().run(&mut pop, &weights).unwrap();
    // The working queues were consumed, the top choices were not.
    assert!(pop.worker(0).working_prefs().len() < 2);
    assert_eq!(self_choice_rate(&pop), 1.0);
}
