// ─────────────────────────────────────────────────────────────────────
// SCPN BBN Core — Reaction Network ODE
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Mass-fraction evolution of the 8 light nuclides as a function of T.
//!
//! Abundances Y = X/A evolve in time as
//!   dYᵢ/dt = Σ_reactions ± (r_fwd·n₀n₁ - r_rev·n₂n₃) / n_b  + weak terms
//! with number densities nₖ = n_b·Yₖ (a photon slot contributes 1), and
//! n_b ∝ T_nu³ from baryon-number conservation. The time derivative is
//! mapped to T via dt/dT of the expansion, and back to mass fractions.
//!
//! The Jacobian is analytic in Y; reactions with identical reactants carry
//! a factor 1/2 on the whole flux.

use bbn_math::ode::{OdeSystem, StiffSystem};
use bbn_nuclear::rates::{forward_rates, reverse_rates};
use bbn_nuclear::reactions::NETWORK;
use bbn_nuclear::species::{Species, NUM_SPECIES};
use bbn_types::constants::{HBAR_C, Q_NP, ZETA3};
use bbn_types::error::{BbnError, BbnResult};
use ndarray::Array2;
use std::f64::consts::PI;

use crate::expansion::ExpansionModel;
use crate::history::ThermalHistory;

/// Baryon number density per T_nu³ (cm⁻³ MeV⁻³) for baryon-to-photon ratio
/// `eta`: n_b = η·n_γ, n_γ = 2ζ(3)/π²·T³ and T³ = (11/4)·T_nu³ after e± annihilation.
pub fn baryon_density_coefficient(eta: f64) -> f64 {
    11.0 / 4.0 * eta * 2.0 * ZETA3 / (PI * PI) / HBAR_C.powi(3)
}

fn mass_numbers() -> [f64; NUM_SPECIES] {
    Species::ALL.map(|s| s.mass_number() as f64)
}

/// Network right-hand side dX/dT over a precomputed thermal background.
pub struct NetworkSystem<'a> {
    model: &'a ExpansionModel,
    history: &'a ThermalHistory,
    density_coeff: f64,
    mass_numbers: [f64; NUM_SPECIES],
}

impl<'a> NetworkSystem<'a> {
    pub fn new(model: &'a ExpansionModel, history: &'a ThermalHistory, eta: f64) -> Self {
        NetworkSystem {
            model,
            history,
            density_coeff: baryon_density_coefficient(eta),
            mass_numbers: mass_numbers(),
        }
    }

    /// dY/dt (and ∂(dY/dt)/∂Y) at temperature `t`, then mapped to dX/dT.
    fn evaluate(&self, t: f64, x: &[f64], f: &mut [f64], jac: Option<&mut Array2<f64>>) {
        let bg = self.history.at(t);
        let t_nu = bg.neutrino_temperature;
        let dtime_dt = self.model.derivatives(t, t_nu).dtime_dt;

        let a = &self.mass_numbers;
        let y: [f64; NUM_SPECIES] = std::array::from_fn(|i| x[i] / a[i]);
        let n_b = self.density_coeff * t_nu.powi(3);
        let dens: [f64; NUM_SPECIES] = std::array::from_fn(|i| n_b * y[i]);

        let fwd = forward_rates(t);
        let rev = reverse_rates(&fwd, t);

        let mut dy = [0.0; NUM_SPECIES];
        let (n, p) = (Species::Neutron.index(), Species::Proton.index());
        let weak = y[p] * bg.p_to_n - y[n] * bg.n_to_p;
        dy[n] += weak;
        dy[p] -= weak;

        let mut jy = [[0.0; NUM_SPECIES]; NUM_SPECIES];
        jy[n][n] -= bg.n_to_p;
        jy[n][p] += bg.p_to_n;
        jy[p][n] += bg.n_to_p;
        jy[p][p] -= bg.p_to_n;

        for (k, reaction) in NETWORK.iter().enumerate() {
            let slots = reaction.slots();
            let xs: [f64; 4] = std::array::from_fn(|j| slots[j].map_or(1.0, |i| dens[i]));
            let half = if reaction.identical_reactants() { 0.5 } else { 1.0 };
            let flux = half * (fwd[k] * xs[0] * xs[1] - rev[k] * xs[2] * xs[3]) / n_b;

            for (j, slot) in slots.iter().enumerate() {
                let Some(i) = *slot else { continue };
                let sign = if j < 2 { -1.0 } else { 1.0 };
                dy[i] += sign * flux;

                for (m, other) in slots.iter().enumerate() {
                    let Some(col) = *other else { continue };
                    let d_flux = if m < 2 {
                        half * fwd[k] * xs[m ^ 1]
                    } else {
                        -half * rev[k] * xs[m ^ 1]
                    };
                    jy[i][col] += sign * d_flux;
                }
            }
        }

        for i in 0..NUM_SPECIES {
            f[i] = a[i] * dy[i] * dtime_dt;
        }
        if let Some(jac) = jac {
            for i in 0..NUM_SPECIES {
                for j in 0..NUM_SPECIES {
                    jac[[i, j]] = a[i] * jy[i][j] / a[j] * dtime_dt;
                }
            }
        }
    }

    /// Nuclear-statistical-equilibrium mass fractions at `t` (normalised).
    ///
    /// n/p from the weak equilibrium ratio e^{-Q/T}; each heavier nucleus
    /// from detailed balance of one producing reaction:
    /// d ← n+p, ³He ← d+p, t ← d+d (with p), ⁴He ← t+d (with n),
    /// ⁷Be ← ³He+⁴He, ⁷Li ← ⁴He+t.
    pub fn equilibrium_state(&self, t: f64) -> BbnResult<[f64; NUM_SPECIES]> {
        let t_nu = self.history.at(t).neutrino_temperature;
        let n_b = self.density_coeff * t_nu.powi(3);
        // Equilibrium constant r_fwd / r_rev of reaction i
        let k = |i: usize| 1.0 / NETWORK[i].reverse_rate(1.0, t);

        use Species::*;
        let mut y = [0.0; NUM_SPECIES];
        y[Neutron.index()] = 1.0 / ((Q_NP / t).exp() + 1.0);
        y[Proton.index()] = 1.0 / (1.0 + (-Q_NP / t).exp());
        let (yn, yp) = (y[Neutron.index()], y[Proton.index()]);

        let yd = yn * yp * n_b * k(0);
        let yhe3 = yd * yp * n_b * k(1);
        let yt = yd * yd * k(3) / yp;
        let yhe4 = yt * yd * k(5) / yn;
        y[Deuteron.index()] = yd;
        y[Helium3.index()] = yhe3;
        y[Tritium.index()] = yt;
        y[Helium4.index()] = yhe4;
        y[Beryllium7.index()] = yhe3 * yhe4 * n_b * k(7);
        y[Lithium7.index()] = yhe4 * yt * n_b * k(8);

        let mut xs: [f64; NUM_SPECIES] = std::array::from_fn(|i| y[i] * self.mass_numbers[i]);
        let total: f64 = xs.iter().sum();
        if !total.is_finite() || xs.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(BbnError::PhysicsViolation(format!(
                "equilibrium abundances not representable at T = {t} MeV"
            )));
        }
        for v in xs.iter_mut() {
            *v /= total;
        }
        Ok(xs)
    }
}

impl OdeSystem for NetworkSystem<'_> {
    fn dim(&self) -> usize {
        NUM_SPECIES
    }

    fn rhs(&self, t: f64, x: &[f64], dxdt: &mut [f64]) {
        self.evaluate(t, x, dxdt, None);
    }
}

impl StiffSystem for NetworkSystem<'_> {
    fn jacobian(&self, t: f64, x: &[f64], dfdx: &mut Array2<f64>) {
        let mut f = [0.0; NUM_SPECIES];
        self.evaluate(t, x, &mut f, Some(dfdx));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weak::WeakRates;
    use bbn_types::config::BbnConfig;

    struct Fixture {
        model: ExpansionModel,
        history: ThermalHistory,
    }

    fn fixture() -> Fixture {
        let cfg = BbnConfig::default();
        let model = ExpansionModel::new(&cfg).unwrap();
        let weak = WeakRates::new(&cfg).unwrap();
        let history = ThermalHistory::build(&model, &weak, 100.0, 0.01, &cfg).unwrap();
        Fixture { model, history }
    }

    fn sample_state() -> [f64; NUM_SPECIES] {
        [0.1, 0.6, 1e-3, 1e-5, 1e-4, 0.2985, 1e-9, 1e-8]
    }

    #[test]
    fn test_rhs_conserves_mass() {
        let fx = fixture();
        let sys = NetworkSystem::new(&fx.model, &fx.history, 5e-10);
        let x = sample_state();
        for t in [30.0, 1.0, 0.08, 0.02] {
            let mut f = [0.0; NUM_SPECIES];
            sys.rhs(t, &x, &mut f);
            let scale: f64 = f.iter().map(|v| v.abs()).sum();
            let total: f64 = f.iter().sum();
            assert!(total.abs() <= 1e-9 * scale.max(1e-300), "Σ dX/dT = {total} at T={t}");
        }
    }

    #[test]
    fn test_jacobian_matches_finite_difference() {
        let fx = fixture();
        let sys = NetworkSystem::new(&fx.model, &fx.history, 5e-10);
        let x = sample_state();
        let t = 0.08;

        let mut jac = Array2::zeros((NUM_SPECIES, NUM_SPECIES));
        sys.jacobian(t, &x, &mut jac);

        let mut f0 = [0.0; NUM_SPECIES];
        sys.rhs(t, &x, &mut f0);
        // Row scale: magnitude of the terms that build dX_i/dT
        let scale: [f64; NUM_SPECIES] = std::array::from_fn(|i| {
            f0[i].abs() + (0..NUM_SPECIES).map(|k| (jac[[i, k]] * x[k]).abs()).sum::<f64>()
        });
        for j in 0..NUM_SPECIES {
            let h = 1e-6 * x[j];
            let mut xp = x;
            xp[j] += h;
            let mut f1 = [0.0; NUM_SPECIES];
            sys.rhs(t, &xp, &mut f1);
            for i in 0..NUM_SPECIES {
                let fd = (f1[i] - f0[i]) / h;
                let err = (fd - jac[[i, j]]).abs() * x[j];
                assert!(
                    err <= 1e-5 * scale[i],
                    "J[{i}][{j}]: analytic {} vs fd {fd}",
                    jac[[i, j]]
                );
            }
        }
    }

    #[test]
    fn test_jacobian_columns_conserve_mass() {
        let fx = fixture();
        let sys = NetworkSystem::new(&fx.model, &fx.history, 5e-10);
        let mut jac = Array2::zeros((NUM_SPECIES, NUM_SPECIES));
        sys.jacobian(0.5, &sample_state(), &mut jac);
        for j in 0..NUM_SPECIES {
            let col: f64 = (0..NUM_SPECIES).map(|i| jac[[i, j]]).sum();
            let scale: f64 = (0..NUM_SPECIES).map(|i| jac[[i, j]].abs()).sum();
            assert!(col.abs() <= 1e-9 * scale.max(1e-300), "column {j} sums to {col}");
        }
    }

    #[test]
    fn test_equilibrium_state_hot() {
        let fx = fixture();
        let sys = NetworkSystem::new(&fx.model, &fx.history, 5e-10);
        let x = sys.equilibrium_state(100.0).unwrap();
        let total: f64 = x.iter().sum();
        assert!((total - 1.0).abs() < 1e-14);
        // n/p ≈ 1 when T ≫ Q; nuclei photodissociated
        assert!((x[0] / x[1] - (-Q_NP / 100.0).exp()).abs() < 1e-10);
        for (i, &v) in x.iter().enumerate().skip(2) {
            assert!(v < 1e-6, "species {i} has X = {v} at 100 MeV");
        }
        assert!(x[Species::Helium4.index()] < x[Species::Deuteron.index()]);
    }

    #[test]
    fn test_density_coefficient_scales_with_eta() {
        let a = baryon_density_coefficient(1e-10);
        let b = baryon_density_coefficient(3e-10);
        assert!((b / a - 3.0).abs() < 1e-12);
    }
}
