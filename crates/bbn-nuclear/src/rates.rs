// ─────────────────────────────────────────────────────────────────────
// SCPN BBN Core — Thermonuclear Reaction Rates
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Forward rate coefficients of the 11-reaction network.
//!
//! Analytic fits N_A⟨σv⟩(T9) (Smith, Kawano & Malaney 1993) divided by
//! Avogadro's number, giving ⟨σv⟩ in cm³/s. Index order is
//! [`crate::reactions::NETWORK`].

use bbn_types::constants::{N_AVOGADRO, T9_MEV};
use bbn_types::error::{BbnError, BbnResult};
use ndarray::Array2;

use crate::reactions::{NETWORK, NUM_REACTIONS};

/// Upper T9 at which the fits are evaluated (~8.6 MeV). Several fits turn
/// negative beyond ~10 MeV; hotter temperatures reuse the capped value.
pub const T9_CAP: f64 = 100.0;

/// Forward ⟨σv⟩ (cm³/s) for every reaction at photon temperature `t` (MeV).
/// Unchecked: `t` must be positive and finite.
pub fn forward_rates(t: f64) -> [f64; NUM_REACTIONS] {
    let t9 = (t / T9_MEV).min(T9_CAP);
    let t912 = t9.sqrt();
    let t932 = t9 * t912;
    let t913 = t9.cbrt();
    let t923 = t913 * t913;
    let t943 = t923 * t923;
    let t953 = t9 * t923;

    let t9f = t9 / (1.0 + 0.1071 * t9);
    let t9f13 = t9f.cbrt();
    let t9f56 = t9f.powf(5.0 / 6.0);
    let t9e = t9 / (1.0 + 0.1378 * t9);
    let t9e13 = t9e.cbrt();
    let t9e56 = t9e.powf(5.0 / 6.0);
    let t9a = t9 / (1.0 + 13.076 * t9);
    let t9a32 = t9a.powf(1.5);
    let t9d = t9 / (1.0 + 0.759 * t9);
    let t9d13 = t9d.cbrt();
    let t9d56 = t9d.powf(5.0 / 6.0);

    let exp = f64::exp;
    let mut r = [
        // n(p,g)d
        4.742e4
            * (1.0 - 0.8504 * t912 + 0.4895 * t9 - 0.09623 * t932 + 8.471e-3 * t9 * t9
                - 2.80e-4 * t9 * t932),
        // d(p,g)3He
        2.65e3 / t923
            * exp(-3.720 / t913)
            * (1.0 + 0.112 * t913 + 1.99 * t923 + 1.56 * t9 + 0.162 * t943 + 0.324 * t953),
        // d(d,n)3He
        3.95e8 / t923
            * exp(-4.259 / t913)
            * (1.0 + 0.098 * t913 + 0.765 * t923 + 0.525 * t9 + 9.61e-3 * t943 + 0.0167 * t953),
        // d(d,p)t
        4.17e8 / t923
            * exp(-4.258 / t913)
            * (1.0 + 0.098 * t913 + 0.518 * t923 + 0.355 * t9 - 0.010 * t943 - 0.018 * t953),
        // 3He(n,p)t
        7.21e8 * (1.0 - 0.508 * t912 + 0.228 * t9),
        // t(d,n)4He
        1.063e11 / t923
            * exp(-4.559 / t913 - (t9 / 0.0754).powi(2))
            * (1.0 + 0.092 * t913 - 0.375 * t923 - 0.242 * t9 + 33.82 * t943 + 55.42 * t953)
            + 8.047e8 / t923 * exp(-0.4857 / t9),
        // 3He(d,p)4He
        5.021e10 / t923
            * exp(-7.144 / t913 - (t9 / 0.270).powi(2))
            * (1.0 + 0.058 * t913 + 0.603 * t923 + 0.245 * t9 + 6.97 * t943 + 7.19 * t953)
            + 5.212e8 / t912 * exp(-1.762 / t9),
        // 3He(4He,g)7Be
        4.817e6 / t923
            * exp(-14.964 / t913)
            * (1.0 + 0.0325 * t913 - 1.04e-3 * t923 - 2.37e-4 * t9 - 8.11e-5 * t943
                - 4.69e-5 * t953)
            + 5.938e6 * t9f56 / t932 * exp(-12.859 / t9f13),
        // 4He(t,g)7Li
        3.032e5 / t923
            * exp(-8.090 / t913)
            * (1.0 + 0.0516 * t913 + 0.0229 * t923 + 8.28e-3 * t9 - 3.28e-4 * t943
                - 3.01e-4 * t953)
            + 5.109e5 * t9e56 / t932 * exp(-8.068 / t9e13),
        // 7Be(n,p)7Li
        2.675e9
            * (1.0 - 0.560 * t912 + 0.179 * t9 - 0.0283 * t932 + 2.214e-3 * t9 * t9
                - 6.851e-5 * t9 * t932)
            + 9.391e8 * t9a32 / t932
            + 4.467e7 / t932 * exp(-0.07486 / t9),
        // 7Li(p,4He)4He
        1.096e9 / t923 * exp(-8.472 / t913) - 4.830e8 * t9d56 / t932 * exp(-8.472 / t9d13)
            + 1.06e10 / t932 * exp(-30.442 / t9)
            + 1.56e5 / t923
                * exp(-8.472 / t913 - (t9 / 1.696).powi(2))
                * (1.0 + 0.049 * t913 - 2.498 * t923 + 0.860 * t9 + 3.518 * t943
                    + 3.08 * t953)
            + 1.55e6 / t932 * exp(-4.478 / t9),
    ];
    for v in r.iter_mut() {
        *v /= N_AVOGADRO;
    }
    r
}

/// Reverse rates by detailed balance from `forward` at `t` (MeV).
pub fn reverse_rates(forward: &[f64; NUM_REACTIONS], t: f64) -> [f64; NUM_REACTIONS] {
    std::array::from_fn(|i| NETWORK[i].reverse_rate(forward[i], t))
}

/// Rate matrix [reaction × temperature] of forward ⟨σv⟩ (cm³/s).
///
/// Temperatures are photon temperatures in MeV and must be positive and
/// finite. Monotonicity in T is not implied. Above T9 = [`T9_CAP`]
/// (~8.6 MeV) every column equals the one at the cap.
pub fn reaction_rate(temperatures: &[f64]) -> BbnResult<Array2<f64>> {
    if let Some(&bad) = temperatures.iter().find(|t| !(t.is_finite() && **t > 0.0)) {
        return Err(BbnError::ConfigError(format!(
            "reaction_rate needs positive finite temperatures, got {bad}"
        )));
    }
    let mut out = Array2::zeros((NUM_REACTIONS, temperatures.len()));
    for (j, &t) in temperatures.iter().enumerate() {
        for (i, v) in forward_rates(t).into_iter().enumerate() {
            out[[i, j]] = v;
        }
    }
    Ok(out)
}
