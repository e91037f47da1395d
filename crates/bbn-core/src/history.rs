// ─────────────────────────────────────────────────────────────────────
// SCPN BBN Core — Thermal History Table
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Tabulated background for the reaction network.
//!
//! The expansion and the weak rates depend only on T (and N_nu, τ_n), not on
//! the nuclear abundances, so they are integrated once on a log-spaced grid
//! and interpolated with natural cubic splines in ln T. Rates are splined in
//! the log since they span ~70 decades between 100 MeV and 10 keV.

use bbn_math::interp::CubicSpline;
use bbn_types::config::BbnConfig;
use bbn_types::error::{BbnError, BbnResult};
use bbn_types::state::log_spaced;

use crate::expansion::ExpansionModel;
use crate::weak::WeakRates;

/// Temperature (MeV) at which T_nu = T is imposed when the table starts
/// colder than this; e± annihilation heating above it is negligible.
pub const DECOUPLING_ANCHOR: f64 = 100.0;

/// Background quantities at one temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryPoint {
    pub neutrino_temperature: f64,
    /// Seconds since the anchor temperature
    pub time: f64,
    pub p_to_n: f64,
    pub n_to_p: f64,
}

#[derive(Debug, Clone)]
pub struct ThermalHistory {
    ratio: CubicSpline,
    time: CubicSpline,
    ln_p_to_n: CubicSpline,
    ln_n_to_p: CubicSpline,
    t_max: f64,
    t_min: f64,
}

impl ThermalHistory {
    /// Tabulate from `t0` down to `t1` on `expansion.table_points` knots.
    pub fn build(
        model: &ExpansionModel,
        weak: &WeakRates,
        t0: f64,
        t1: f64,
        config: &BbnConfig,
    ) -> BbnResult<Self> {
        if !(t0.is_finite() && t1.is_finite() && t1 > 0.0 && t0 > t1) {
            return Err(BbnError::ConfigError(format!(
                "thermal history needs T0 > T1 > 0, got {t0} -> {t1}"
            )));
        }
        let points = config.expansion.table_points;
        let grid = log_spaced(t0, t1, points - 1);

        let mut temps = Vec::with_capacity(points + 1);
        let anchored = t0 < DECOUPLING_ANCHOR;
        if anchored {
            temps.push(DECOUPLING_ANCHOR);
        }
        temps.extend(grid.iter().copied());
        let traj = model.trajectory(&temps)?;
        let offset = usize::from(anchored);

        // Ascending ln T for the splines
        let n = grid.len();
        let mut ln_t = Vec::with_capacity(n);
        let mut ratio = Vec::with_capacity(n);
        let mut time = Vec::with_capacity(n);
        let mut ln_pn = Vec::with_capacity(n);
        let mut ln_np = Vec::with_capacity(n);
        for i in (0..n).rev() {
            let t = traj.temperature[i + offset];
            let t_nu = traj.neutrino_temperature[i + offset];
            let r = weak.rates(t, t_nu);
            ln_t.push(t.ln());
            ratio.push(t_nu / t);
            time.push(traj.time[i + offset]);
            ln_pn.push(r.p_to_n.max(f64::MIN_POSITIVE).ln());
            ln_np.push(r.n_to_p.max(f64::MIN_POSITIVE).ln());
        }

        tracing::debug!(points = n, t0, t1, "thermal history tabulated");
        Ok(ThermalHistory {
            ratio: CubicSpline::new(&ln_t, &ratio)?,
            time: CubicSpline::new(&ln_t, &time)?,
            ln_p_to_n: CubicSpline::new(&ln_t, &ln_pn)?,
            ln_n_to_p: CubicSpline::new(&ln_t, &ln_np)?,
            t_max: t0,
            t_min: t1,
        })
    }

    /// (hottest, coldest) tabulated temperature.
    pub fn range(&self) -> (f64, f64) {
        (self.t_max, self.t_min)
    }

    /// Interpolated background at photon temperature `t`.
    pub fn at(&self, t: f64) -> HistoryPoint {
        let x = t.ln();
        HistoryPoint {
            neutrino_temperature: self.ratio.eval(x) * t,
            time: self.time.eval(x),
            p_to_n: self.ln_p_to_n.eval(x).exp(),
            n_to_p: self.ln_n_to_p.eval(x).exp(),
        }
    }
}
