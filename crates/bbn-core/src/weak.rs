// ─────────────────────────────────────────────────────────────────────
// SCPN BBN Core — Weak Rates
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Neutron ↔ proton conversion rates.
//!
//! Sums the six processes n + ν ↔ p + e⁻, n + e⁺ ↔ p + ν̄, n ↔ p + e⁻ + ν̄
//! in the Born approximation, with electrons at T and neutrinos at T_nu.
//! The phase-space integral runs over electron kinetic energy in units of T
//! and is normalised to the free-neutron lifetime, so n → p tends to 1/τ_n
//! once the plasma is cold.
//!
//! All Fermi-Dirac factors go through [`fermi`], so no intermediate
//! exponential overflows at low temperature.

use bbn_math::quadrature::GaussLaguerre;
use bbn_types::config::BbnConfig;
use bbn_types::constants::{M_ELECTRON, NEUTRON_DECAY_PHASE_SPACE, Q_NP};
use bbn_types::error::{BbnError, BbnResult};
use ndarray::Array1;

/// 1 / (e^x + 1) without overflow for either sign of x.
#[inline]
pub fn fermi(x: f64) -> f64 {
    if x > 0.0 {
        let e = (-x).exp();
        e / (1.0 + e)
    } else {
        1.0 / (1.0 + x.exp())
    }
}

/// Directional weak rates (1/s).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeakRateSample {
    /// p → n
    pub p_to_n: f64,
    /// n → p
    pub n_to_p: f64,
}

#[derive(Debug, Clone)]
pub struct WeakRates {
    rule: GaussLaguerre,
    neutron_lifetime: f64,
}

impl WeakRates {
    pub fn new(config: &BbnConfig) -> BbnResult<Self> {
        config.validate()?;
        Ok(WeakRates {
            rule: GaussLaguerre::new(config.expansion.quadrature_nodes)?,
            neutron_lifetime: config.neutron_lifetime,
        })
    }

    pub fn neutron_lifetime(&self) -> f64 {
        self.neutron_lifetime
    }

    /// Rates at photon temperature `t` and neutrino temperature `t_nu` (MeV).
    /// Unchecked: both must be positive.
    pub fn rates(&self, t: f64, t_nu: f64) -> WeakRateSample {
        let a = M_ELECTRON / t;
        let b = t / t_nu;
        let q = Q_NP / t;

        let mut p_to_n = 0.0;
        let mut n_to_p = 0.0;
        for (&x, &w) in self.rule.nodes().iter().zip(self.rule.scaled_weights()) {
            // Electron energy and momentum over T
            let v = x + a;
            let p = (x * (x + 2.0 * a)).sqrt();
            let ev = (-v).exp();
            let s = v * p * w / (1.0 + ev);

            // Neutrino energies over T_nu for the two kinematic branches
            let hi = (v + q) * b;
            let lo = (v - q) * b;
            let e_hi = (v + q) * (v + q);
            let e_lo = (v - q) * (v - q);

            p_to_n += s * (e_hi * fermi(hi) + e_lo * fermi(-lo) * ev);
            n_to_p += s * (e_lo * fermi(lo) + e_hi * fermi(-hi) * ev);
        }

        let norm = 1.0 / (NEUTRON_DECAY_PHASE_SPACE * self.neutron_lifetime * a.powi(5));
        WeakRateSample {
            p_to_n: p_to_n * norm,
            n_to_p: n_to_p * norm,
        }
    }
}

/// Elementwise weak rates along paired (T, T_nu) arrays: (p → n, n → p).
pub fn weak_rate(
    t: &[f64],
    t_nu: &[f64],
    config: &BbnConfig,
) -> BbnResult<(Array1<f64>, Array1<f64>)> {
    if t.len() != t_nu.len() {
        return Err(BbnError::ConfigError(format!(
            "weak_rate needs matching T and T_nu lengths, got {} and {}",
            t.len(),
            t_nu.len()
        )));
    }
    if let Some(bad) = t.iter().chain(t_nu).find(|v| !(v.is_finite() && **v > 0.0)) {
        return Err(BbnError::ConfigError(format!(
            "weak_rate needs positive finite temperatures, got {bad}"
        )));
    }

    let weak = WeakRates::new(config)?;
    let mut p_to_n = Array1::zeros(t.len());
    let mut n_to_p = Array1::zeros(t.len());
    for i in 0..t.len() {
        let r = weak.rates(t[i], t_nu[i]);
        p_to_n[i] = r.p_to_n;
        n_to_p[i] = r.n_to_p;
    }
    Ok((p_to_n, n_to_p))
}
