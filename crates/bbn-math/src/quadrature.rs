// ─────────────────────────────────────────────────────────────────────
// SCPN BBN Core — Quadrature
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Gauss-Laguerre quadrature.
//!
//! Nodes and weights for ∫₀^∞ x^α e^{-x} f(x) dx ≈ Σ wᵢ f(xᵢ), found by Newton
//! iteration on the three-term Laguerre recurrence with asymptotic initial
//! guesses for each root.

use bbn_types::error::{BbnError, BbnResult};

const NEWTON_MAX_ITER: usize = 100;
const NEWTON_EPS: f64 = 3.0e-14;

/// Lanczos coefficients (g = 7, n = 9).
const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEF: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// ln Γ(x) for x > 0, accurate to ~1e-15 relative.
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection: Γ(x)Γ(1-x) = π / sin(πx)
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).abs().ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let mut a = LANCZOS_COEF[0];
    for (i, &c) in LANCZOS_COEF.iter().enumerate().skip(1) {
        a += c / (x + i as f64);
    }
    let t = x + LANCZOS_G + 0.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + a.ln()
}

/// Gauss-Laguerre rule with weight x^α e^{-x}.
#[derive(Debug, Clone)]
pub struct GaussLaguerre {
    nodes: Vec<f64>,
    weights: Vec<f64>,
    /// wᵢ e^{xᵢ}, for integrands that already carry their own exponential.
    scaled_weights: Vec<f64>,
}

impl GaussLaguerre {
    /// Ordinary Laguerre rule (α = 0).
    pub fn new(n: usize) -> BbnResult<Self> {
        Self::generalized(n, 0.0)
    }

    pub fn generalized(n: usize, alpha: f64) -> BbnResult<Self> {
        if n == 0 {
            return Err(BbnError::ConfigError(
                "Gauss-Laguerre rule needs at least one node".to_string(),
            ));
        }
        if !alpha.is_finite() || alpha <= -1.0 {
            return Err(BbnError::ConfigError(format!(
                "Gauss-Laguerre alpha must be > -1, got {alpha}"
            )));
        }

        let nf = n as f64;
        let norm = ln_gamma(alpha + nf) - ln_gamma(nf);
        let mut nodes = vec![0.0; n];
        let mut weights = vec![0.0; n];
        let mut z = 0.0_f64;

        for i in 0..n {
            z = match i {
                0 => (1.0 + alpha) * (3.0 + 0.92 * alpha) / (1.0 + 2.4 * nf + 1.8 * alpha),
                1 => z + (15.0 + 6.25 * alpha) / (1.0 + 0.9 * alpha + 2.5 * nf),
                _ => {
                    let ai = (i - 1) as f64;
                    z + ((1.0 + 2.55 * ai) / (1.9 * ai) + 1.26 * ai * alpha / (1.0 + 3.5 * ai))
                        * (z - nodes[i - 2])
                        / (1.0 + 0.3 * alpha)
                }
            };

            let mut converged = false;
            let mut pp = 0.0;
            let mut p2 = 0.0;
            for _ in 0..NEWTON_MAX_ITER {
                let mut p1 = 1.0;
                p2 = 0.0;
                for j in 1..=n {
                    let jf = j as f64;
                    let p3 = p2;
                    p2 = p1;
                    p1 = ((2.0 * jf - 1.0 + alpha - z) * p2 - (jf - 1.0 + alpha) * p3) / jf;
                }
                pp = (nf * p1 - (nf + alpha) * p2) / z;
                let z1 = z;
                z = z1 - p1 / pp;
                if (z - z1).abs() <= NEWTON_EPS * z.abs().max(1.0) {
                    converged = true;
                    break;
                }
            }
            if !converged || !z.is_finite() {
                return Err(BbnError::SolverDiverged {
                    iteration: NEWTON_MAX_ITER,
                    message: format!("Laguerre root {i} of {n} did not converge"),
                });
            }

            nodes[i] = z;
            weights[i] = -norm.exp() / (pp * nf * p2);
        }

        let scaled_weights = nodes
            .iter()
            .zip(&weights)
            .map(|(&x, &w)| w * x.exp())
            .collect();

        Ok(GaussLaguerre {
            nodes,
            weights,
            scaled_weights,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn scaled_weights(&self) -> &[f64] {
        &self.scaled_weights
    }

    /// Σ wᵢ f(xᵢ) ≈ ∫₀^∞ x^α e^{-x} f(x) dx
    pub fn integrate<F: Fn(f64) -> f64>(&self, f: F) -> f64 {
        self.nodes
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| w * f(x))
            .sum()
    }
}
