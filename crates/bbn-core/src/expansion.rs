// ─────────────────────────────────────────────────────────────────────
// SCPN BBN Core — Expansion
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Thermal history of the radiation-dominated universe.
//!
//! Photons and e± share the temperature T; neutrinos are decoupled and
//! redshift freely, T_nu ∝ 1/a. Entropy conservation of the coupled plasma
//! gives dT/dt, and the Friedmann equation gives H from the total energy
//! density. Integration variable is the photon temperature T.
//!
//! Algorithm:
//! 1. e± thermodynamics: ρ, P and T·dρ/dT by 64-node Gauss-Laguerre
//!    quadrature in momentum p/T, plus photons a_rad·T⁴
//! 2. Neutrinos: ρ_ν = a_rad·(7/8)·N_ν·T_nu⁴
//! 3. H = √(8πG/3)/ħ · √(ρ + ρ_ν)
//! 4. dt/dT = -C / H,  dT_nu/dT = C·T_nu,  C = T·dρ/dT / (3T(ρ + P))

use bbn_math::ode::{CashKarp, OdeSystem, Tolerance};
use bbn_math::quadrature::GaussLaguerre;
use bbn_types::config::{BbnConfig, ExpansionConfig};
use bbn_types::constants::{A_RAD, FERMI_FACTOR, G_NEWTON, HBAR, M_ELECTRON};
use bbn_types::error::{BbnError, BbnResult};
use bbn_types::state::{log_spaced, ThermalTrajectory};
use ndarray::Array1;
use std::f64::consts::PI;

/// Energy density, pressure and T·dρ/dT of the photon + e± plasma (MeV⁴).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlasmaState {
    pub energy_density: f64,
    pub pressure: f64,
    pub heat_capacity: f64,
}

/// Right-hand side of the expansion equations at one (T, T_nu).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpansionDerivatives {
    /// dT_nu/dT
    pub dtnu_dt: f64,
    /// dt/dT (s/MeV), negative: time runs forward as T drops
    pub dtime_dt: f64,
}

#[derive(Debug, Clone)]
pub struct ExpansionModel {
    rule: GaussLaguerre,
    neutrino_generations: f64,
    /// √(8πG/3)/ħ
    hubble_coeff: f64,
    settings: ExpansionConfig,
}

fn check_temperature(label: &str, t: f64) -> BbnResult<()> {
    if !t.is_finite() || t <= 0.0 {
        return Err(BbnError::ConfigError(format!(
            "{label} must be positive and finite, got {t}"
        )));
    }
    Ok(())
}

impl ExpansionModel {
    pub fn new(config: &BbnConfig) -> BbnResult<Self> {
        config.validate()?;
        Ok(ExpansionModel {
            rule: GaussLaguerre::new(config.expansion.quadrature_nodes)?,
            neutrino_generations: config.neutrino_generations,
            hubble_coeff: (8.0 * PI * G_NEWTON / 3.0).sqrt() / HBAR,
            settings: config.expansion.clone(),
        })
    }

    pub fn neutrino_generations(&self) -> f64 {
        self.neutrino_generations
    }

    pub fn plasma_state(&self, t: f64) -> PlasmaState {
        let a = (M_ELECTRON / t).powi(2);
        let mut energy = 0.0;
        let mut pressure = 0.0;
        let mut heat = 0.0;

        for (&x, &w) in self.rule.nodes().iter().zip(self.rule.scaled_weights()) {
            let v = (x * x + a).sqrt();
            let ev = (-v).exp();
            // x² e^{x} w / (e^{v} + 1), with the e^{x} folded into w
            let u = x * x * w * ev / (1.0 + ev);
            energy += v * u;
            pressure += x * x / v / 3.0 * u;
            heat += v * v * u / (1.0 + ev);
        }

        let b = 2.0 * t.powi(4) / (PI * PI);
        let photons = A_RAD * t.powi(4);
        PlasmaState {
            energy_density: b * energy + photons,
            pressure: b * pressure + photons / 3.0,
            heat_capacity: b * heat + 4.0 * photons,
        }
    }

    fn neutrino_energy_density(&self, t_nu: f64) -> f64 {
        A_RAD * FERMI_FACTOR * self.neutrino_generations * t_nu.powi(4)
    }

    fn hubble(&self, plasma: &PlasmaState, t_nu: f64) -> f64 {
        self.hubble_coeff * (plasma.energy_density + self.neutrino_energy_density(t_nu)).sqrt()
    }

    /// Hubble rate H (1/s) at photon temperature `t`, neutrino temperature `t_nu`.
    pub fn expansion_rate(&self, t: f64, t_nu: f64) -> f64 {
        self.hubble(&self.plasma_state(t), t_nu)
    }

    /// dT_nu/dT and dt/dT. Unchecked; the checked form is [`expansion_eq`].
    pub fn derivatives(&self, t: f64, t_nu: f64) -> ExpansionDerivatives {
        let plasma = self.plasma_state(t);
        let h = self.hubble(&plasma, t_nu);
        let c = plasma.heat_capacity / (3.0 * t * (plasma.energy_density + plasma.pressure));
        ExpansionDerivatives {
            dtnu_dt: c * t_nu,
            dtime_dt: -c / h,
        }
    }

    /// Integrate the expansion through a decreasing temperature sequence.
    /// The first sample sets T_nu = T and t = 0.
    pub fn trajectory(&self, temperatures: &[f64]) -> BbnResult<ThermalTrajectory> {
        let Some(&t_first) = temperatures.first() else {
            return Err(BbnError::ConfigError(
                "trajectory needs at least one temperature".to_string(),
            ));
        };
        for &t in temperatures {
            check_temperature("temperature", t)?;
        }
        if temperatures.windows(2).any(|w| w[1] >= w[0]) {
            return Err(BbnError::ConfigError(
                "trajectory temperatures must strictly decrease".to_string(),
            ));
        }

        let tol = Tolerance::new(self.settings.rtol, self.settings.atol)?;
        let mut rk = CashKarp::new(tol, self.settings.max_steps);
        let mut traj = ThermalTrajectory::with_capacity(temperatures.to_vec().into());
        let mut y = [t_first, 0.0];
        traj.neutrino_temperature[0] = y[0];
        traj.time[0] = y[1];

        for i in 1..temperatures.len() {
            rk.integrate(self, temperatures[i - 1], temperatures[i], &mut y)?;
            traj.neutrino_temperature[i] = y[0];
            traj.time[i] = y[1];
        }

        let stats = rk.stats();
        tracing::debug!(
            samples = temperatures.len(),
            accepted = stats.accepted,
            rejected = stats.rejected,
            "expansion integrated"
        );
        Ok(traj)
    }

    /// T, T_nu and t from `t0` down to `t1` at `expansion.samples`
    /// log-spaced intervals.
    pub fn expansion(&self, t0: f64, t1: f64) -> BbnResult<ThermalTrajectory> {
        check_temperature("T0", t0)?;
        check_temperature("T1", t1)?;
        if t1 >= t0 {
            return Err(BbnError::ConfigError(format!(
                "expansion needs T0 > T1, got {t0} -> {t1}"
            )));
        }
        let grid = log_spaced(t0, t1, self.settings.samples);
        self.trajectory(&grid.to_vec())
    }
}

/// State [T_nu, t] as a function of photon temperature.
impl OdeSystem for ExpansionModel {
    fn dim(&self) -> usize {
        2
    }

    fn rhs(&self, t: f64, y: &[f64], dydt: &mut [f64]) {
        let d = self.derivatives(t, y[0]);
        dydt[0] = d.dtnu_dt;
        dydt[1] = d.dtime_dt;
    }
}

/// Sample the thermal history from `t0` to `t1` (MeV).
pub fn expansion(t0: f64, t1: f64, config: &BbnConfig) -> BbnResult<ThermalTrajectory> {
    ExpansionModel::new(config)?.expansion(t0, t1)
}

/// (dT_nu/dT, dt/dT) at photon temperature `t` and neutrino temperature `t_nu`.
pub fn expansion_eq(t: f64, t_nu: f64, config: &BbnConfig) -> BbnResult<(f64, f64)> {
    check_temperature("T", t)?;
    check_temperature("T_nu", t_nu)?;
    let d = ExpansionModel::new(config)?.derivatives(t, t_nu);
    Ok((d.dtnu_dt, d.dtime_dt))
}

/// Elementwise [`expansion_eq`] along paired (T, T_nu) arrays:
/// (dT_nu/dT, dt/dT). The quadrature rule is built once for the whole array.
pub fn expansion_eq_array(
    t: &[f64],
    t_nu: &[f64],
    config: &BbnConfig,
) -> BbnResult<(Array1<f64>, Array1<f64>)> {
    if t.len() != t_nu.len() {
        return Err(BbnError::ConfigError(format!(
            "expansion_eq needs matching T and T_nu lengths, got {} and {}",
            t.len(),
            t_nu.len()
        )));
    }
    for (&a, &b) in t.iter().zip(t_nu) {
        check_temperature("T", a)?;
        check_temperature("T_nu", b)?;
    }

    let model = ExpansionModel::new(config)?;
    let mut dtnu_dt = Array1::zeros(t.len());
    let mut dtime_dt = Array1::zeros(t.len());
    for i in 0..t.len() {
        let d = model.derivatives(t[i], t_nu[i]);
        dtnu_dt[i] = d.dtnu_dt;
        dtime_dt[i] = d.dtime_dt;
    }
    Ok((dtnu_dt, dtime_dt))
}
