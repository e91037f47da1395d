// ─────────────────────────────────────────────────────────────────────
// SCPN BBN Core — End-to-End Scenarios
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Full-network runs from 100 MeV to 10 keV plus the public array APIs.

use bbn_core::driver::NucleosynthesisSolver;
use bbn_core::expansion::ExpansionModel;
use bbn_core::{
    bbn, expansion, expansion_eq, expansion_eq_array, initialize, reaction_rate, weak_rate,
};
use bbn_nuclear::reactions::NUM_REACTIONS;
use bbn_nuclear::species::Species;
use bbn_types::config::BbnConfig;
use bbn_types::error::BbnError;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn final_helium(n_nu: f64, eta: f64) -> f64 {
    let cfg = initialize(n_nu).unwrap();
    let run = bbn(eta, &["helium4"], &cfg).unwrap();
    run.final_mass_fraction(Species::Helium4).unwrap()
}

// ── Nucleosynthesis ──────────────────────────────────────────────────

#[test]
fn helium_plateau_at_standard_eta() {
    init_tracing();
    let run = bbn(5e-10, &["neutron", "proton", "helium4"], &BbnConfig::default()).unwrap();
    assert_eq!(run.species, vec![Species::Neutron, Species::Proton, Species::Helium4]);
    assert_eq!(run.mass_fraction.nrows(), 3);
    assert_eq!(run.mass_fraction.ncols(), run.temperature.len());

    let he4 = run.get(Species::Helium4).unwrap();
    let last = he4[he4.len() - 1];
    assert!((0.20..=0.27).contains(&last), "Y_p = {last}");

    // Frozen out well before 30 keV
    let i = run.temperature.iter().position(|&t| t < 0.03).unwrap();
    assert!((he4[i] / last - 1.0).abs() < 1e-2, "He4 at {} MeV = {}", run.temperature[i], he4[i]);

    // Free neutrons are gone
    let n = run.final_mass_fraction(Species::Neutron).unwrap();
    assert!(n < 1e-3, "X_n = {n}");
}

#[test]
fn helium_grows_with_neutrino_generations() {
    let y2 = final_helium(2.0, 5e-10);
    let y3 = final_helium(3.0, 5e-10);
    let y4 = final_helium(4.0, 5e-10);
    assert!(y2 < y3 && y3 < y4, "Y_p(N_nu=2,3,4) = {y2}, {y3}, {y4}");
}

#[test]
fn mass_fractions_sum_to_one() {
    let solver = NucleosynthesisSolver::new(BbnConfig::default()).unwrap();
    let run = solver.run(5e-10, &Species::ALL).unwrap();
    for (k, col) in run.mass_fraction.columns().into_iter().enumerate() {
        let total: f64 = col.sum();
        assert!((total - 1.0).abs() < 1e-10, "Σ X = {total} at T = {}", run.temperature[k]);
    }
}

#[test]
fn repeated_runs_are_identical() {
    let cfg = BbnConfig::default();
    let a = bbn(5e-10, &["deutron", "helium4"], &cfg).unwrap();
    let b = bbn(5e-10, &["deutron", "helium4"], &cfg).unwrap();
    assert_eq!(a.temperature, b.temperature);
    assert_eq!(a.mass_fraction, b.mass_fraction);
}

#[test]
fn eta_shifts_helium_up_and_deuterium_down() {
    let solver = NucleosynthesisSolver::new(BbnConfig::default()).unwrap();
    let species = [Species::Deuteron, Species::Helium4];
    let table = solver.scan_eta(&[1e-10, 1e-9], &species).unwrap();
    assert_eq!(table.dim(), (2, 2));
    assert!(table[[1, 1]] > table[[0, 1]], "He4: {} vs {}", table[[0, 1]], table[[1, 1]]);
    assert!(table[[1, 0]] < table[[0, 0]], "D: {} vs {}", table[[0, 0]], table[[1, 0]]);
}

#[test]
fn custom_start_and_tolerance() {
    let cfg = BbnConfig::default()
        .with_start_temperature(10.0)
        .with_tolerance(1e-8, 1e-12);
    let run = bbn(5e-10, &["helium4"], &cfg).unwrap();
    assert_eq!(run.temperature[0], 10.0);
    let y = run.final_mass_fraction(Species::Helium4).unwrap();
    assert!((0.20..=0.27).contains(&y), "Y_p = {y}");
}

#[test]
fn unknown_species_is_rejected() {
    let err = bbn(5e-10, &["helium4", "unobtainium"], &BbnConfig::default()).unwrap_err();
    assert!(matches!(err, BbnError::UnknownSpecies(_)), "got {err:?}");
}

// ── Expansion ────────────────────────────────────────────────────────

#[test]
fn expansion_is_monotonic_and_neutrinos_run_cold() {
    let traj = expansion(100.0, 0.01, &BbnConfig::default()).unwrap();
    assert_eq!(traj.temperature[0], 100.0);
    assert_eq!(traj.neutrino_temperature[0], 100.0);
    assert_eq!(traj.time[0], 0.0);
    let n = traj.len();
    for i in 1..n {
        assert!(traj.temperature[i] < traj.temperature[i - 1]);
        assert!(traj.neutrino_temperature[i] < traj.neutrino_temperature[i - 1]);
        assert!(traj.time[i] > traj.time[i - 1]);
        assert!(traj.neutrino_temperature[i] < traj.temperature[i], "T_nu >= T at i = {i}");
    }
}

#[test]
fn expansion_eq_matches_trajectory_slope() {
    let mut cfg = BbnConfig::default();
    cfg.expansion.samples = 1024;
    let traj = expansion(10.0, 0.1, &cfg).unwrap();
    for i in (8..traj.len() - 1).step_by(97) {
        let dt = traj.temperature[i + 1] - traj.temperature[i - 1];
        let fd_nu = (traj.neutrino_temperature[i + 1] - traj.neutrino_temperature[i - 1]) / dt;
        let fd_time = (traj.time[i + 1] - traj.time[i - 1]) / dt;
        let (dtnu, dtime) =
            expansion_eq(traj.temperature[i], traj.neutrino_temperature[i], &cfg).unwrap();
        assert!((fd_nu / dtnu - 1.0).abs() < 1e-3, "dT_nu/dT at T = {}", traj.temperature[i]);
        assert!((fd_time / dtime - 1.0).abs() < 1e-3, "dt/dT at T = {}", traj.temperature[i]);
    }
}

#[test]
fn hubble_rate_along_the_trajectory() {
    let cfg = BbnConfig::default();
    let traj = expansion(100.0, 0.01, &cfg).unwrap();
    let (dtnu, dtime) = expansion_eq_array(
        traj.temperature.as_slice().unwrap(),
        traj.neutrino_temperature.as_slice().unwrap(),
        &cfg,
    )
    .unwrap();
    let model = ExpansionModel::new(&cfg).unwrap();
    for i in 0..traj.len() {
        let t_nu = traj.neutrino_temperature[i];
        let h = -dtnu[i] / t_nu / dtime[i];
        let direct = model.expansion_rate(traj.temperature[i], t_nu);
        assert!(h > 0.0);
        assert!((h / direct - 1.0).abs() < 1e-12, "H at T = {}: {h} vs {direct}", traj.temperature[i]);
    }
}

// ── Rates ────────────────────────────────────────────────────────────

#[test]
fn weak_rates_along_the_expansion() {
    let cfg = BbnConfig::default();
    let traj = expansion(10.0, 0.01, &cfg).unwrap();
    let (p_to_n, n_to_p) = weak_rate(
        traj.temperature.as_slice().unwrap(),
        traj.neutrino_temperature.as_slice().unwrap(),
        &cfg,
    )
    .unwrap();
    let last = traj.len() - 1;
    for i in 1..traj.len() {
        assert!(p_to_n[i] < p_to_n[i - 1], "p→n not decreasing at i = {i}");
    }
    assert!(p_to_n[last] < 1e-30);
    assert!((n_to_p[last] * cfg.neutron_lifetime - 1.0).abs() < 1e-2);
    assert!(n_to_p[0] > 1e3 * n_to_p[last]);
}

#[test]
fn reaction_rate_table_shape() {
    let temps = [10.0, 1.0, 0.1, 0.01];
    let r = reaction_rate(&temps).unwrap();
    assert_eq!(r.dim(), (NUM_REACTIONS, temps.len()));
    assert!(r.iter().all(|v| v.is_finite() && *v >= 0.0));
    assert!(reaction_rate(&[1.0, -1.0]).is_err());
}

#[test]
fn initialize_validates_generations() {
    assert_eq!(initialize(3.0).unwrap(), BbnConfig::default());
    assert!(initialize(f64::NAN).is_err());
    assert!(initialize(0.0).is_err());
    assert!(initialize(-1.0).is_err());
}
