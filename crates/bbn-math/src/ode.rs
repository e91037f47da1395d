// ─────────────────────────────────────────────────────────────────────
// SCPN BBN Core — ODE Integration
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Adaptive initial-value integration.
//!
//! Systems implement [`OdeSystem`] (and [`StiffSystem`] when they can supply
//! a Jacobian) as pure functions of `(x, y)`. Integrators are stateful only in
//! their step-size estimate and counters, so one instance can be driven
//! across consecutive output segments without restarting step control.
//!
//! [`CashKarp`] is the explicit embedded 5(4) Runge-Kutta pair with the
//! classic "safety 0.9, grow at most 5x, shrink at most 10x" controller.

use bbn_types::error::{BbnError, BbnResult};
use ndarray::Array2;

/// First-order system dy/dx = f(x, y).
pub trait OdeSystem {
    fn dim(&self) -> usize;
    fn rhs(&self, x: f64, y: &[f64], dydx: &mut [f64]);
}

/// System that also provides ∂f/∂y for linearly implicit methods.
pub trait StiffSystem: OdeSystem {
    /// Fill `dfdy[[i, j]] = ∂fᵢ/∂yⱼ`.
    fn jacobian(&self, x: f64, y: &[f64], dfdy: &mut Array2<f64>);

    /// ∂f/∂x. Default: one-sided difference of width `dx` from `f0 = f(x, y)`.
    fn dfdx(&self, x: f64, y: &[f64], f0: &[f64], dx: f64, out: &mut [f64]) {
        let mut f1 = vec![0.0; f0.len()];
        self.rhs(x + dx, y, &mut f1);
        for i in 0..f0.len() {
            out[i] = (f1[i] - f0[i]) / dx;
        }
    }
}

/// Mixed error tolerance: component i is accepted when
/// |errᵢ| ≤ atol + rtol·|yᵢ|.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub rtol: f64,
    pub atol: f64,
}

impl Tolerance {
    pub fn new(rtol: f64, atol: f64) -> BbnResult<Self> {
        if !rtol.is_finite() || rtol <= 0.0 {
            return Err(BbnError::ConfigError(format!(
                "rtol must be finite and > 0, got {rtol}"
            )));
        }
        if !atol.is_finite() || atol <= 0.0 {
            return Err(BbnError::ConfigError(format!(
                "atol must be finite and > 0, got {atol}"
            )));
        }
        Ok(Tolerance { rtol, atol })
    }
}

/// Work counters, cumulative over the integrator's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub accepted: usize,
    pub rejected: usize,
    pub rhs_evals: usize,
    pub jacobian_evals: usize,
    pub factorizations: usize,
}

impl SolverStats {
    pub fn steps(&self) -> usize {
        self.accepted + self.rejected
    }
}

/// Step proposed for the next segment: the carried estimate, or a small
/// fraction of the span on the first call, clipped to the span.
pub(crate) fn initial_step(carried: Option<f64>, span: f64, fraction: f64) -> f64 {
    let mag = carried.map_or(fraction * span.abs(), f64::abs);
    span.signum() * mag.min(span.abs())
}

pub(crate) fn check_step(h: f64, x: f64, iteration: usize) -> BbnResult<()> {
    if !h.is_finite() || h.abs() <= 16.0 * f64::EPSILON * x.abs().max(f64::MIN_POSITIVE) {
        return Err(BbnError::SolverDiverged {
            iteration,
            message: format!("step size underflow (h = {h:e}) at x = {x}"),
        });
    }
    Ok(())
}

pub(crate) fn check_step_limit(stats: &SolverStats, max_steps: usize, x: f64) -> BbnResult<()> {
    if stats.steps() >= max_steps {
        return Err(BbnError::SolverDiverged {
            iteration: stats.steps(),
            message: format!("step limit {max_steps} exhausted at x = {x}"),
        });
    }
    Ok(())
}

// Cash-Karp tableau
const A2: f64 = 0.2;
const A3: f64 = 0.3;
const A4: f64 = 0.6;
const A5: f64 = 1.0;
const A6: f64 = 0.875;
const B21: f64 = 0.2;
const B31: f64 = 3.0 / 40.0;
const B32: f64 = 9.0 / 40.0;
const B41: f64 = 0.3;
const B42: f64 = -0.9;
const B43: f64 = 1.2;
const B51: f64 = -11.0 / 54.0;
const B52: f64 = 2.5;
const B53: f64 = -70.0 / 27.0;
const B54: f64 = 35.0 / 27.0;
const B61: f64 = 1631.0 / 55296.0;
const B62: f64 = 175.0 / 512.0;
const B63: f64 = 575.0 / 13824.0;
const B64: f64 = 44275.0 / 110592.0;
const B65: f64 = 253.0 / 4096.0;
const C1: f64 = 37.0 / 378.0;
const C3: f64 = 250.0 / 621.0;
const C4: f64 = 125.0 / 594.0;
const C6: f64 = 512.0 / 1771.0;
const DC1: f64 = C1 - 2825.0 / 27648.0;
const DC3: f64 = C3 - 18575.0 / 48384.0;
const DC4: f64 = C4 - 13525.0 / 55296.0;
const DC5: f64 = -277.0 / 14336.0;
const DC6: f64 = C6 - 0.25;

const SAFETY: f64 = 0.9;
const PGROW: f64 = -0.2;
const PSHRINK: f64 = -0.25;
/// (5 / SAFETY)^(1 / PGROW): below this error the step grows by the full 5x.
const ERRCON: f64 = 1.89e-4;

/// Explicit embedded Runge-Kutta 5(4) integrator with adaptive step size.
#[derive(Debug, Clone)]
pub struct CashKarp {
    tol: Tolerance,
    max_steps: usize,
    h: Option<f64>,
    stats: SolverStats,
}

struct RkWork {
    k: [Vec<f64>; 6],
    ytmp: Vec<f64>,
    yout: Vec<f64>,
    yerr: Vec<f64>,
}

impl RkWork {
    fn new(n: usize) -> Self {
        RkWork {
            k: std::array::from_fn(|_| vec![0.0; n]),
            ytmp: vec![0.0; n],
            yout: vec![0.0; n],
            yerr: vec![0.0; n],
        }
    }
}

impl CashKarp {
    pub fn new(tol: Tolerance, max_steps: usize) -> Self {
        CashKarp {
            tol,
            max_steps,
            h: None,
            stats: SolverStats::default(),
        }
    }

    pub fn stats(&self) -> SolverStats {
        self.stats
    }

    /// Step size the next `integrate` call will try first.
    pub fn next_step(&self) -> Option<f64> {
        self.h
    }

    /// One trial step of size `h` from `(x, y)` with `k[0] = f(x, y)` filled in.
    fn trial<S: OdeSystem>(&mut self, system: &S, x: f64, y: &[f64], h: f64, w: &mut RkWork) {
        let n = y.len();
        let [k1, k2, k3, k4, k5, k6] = &mut w.k;

        for i in 0..n {
            w.ytmp[i] = y[i] + h * B21 * k1[i];
        }
        system.rhs(x + A2 * h, &w.ytmp, k2);
        for i in 0..n {
            w.ytmp[i] = y[i] + h * (B31 * k1[i] + B32 * k2[i]);
        }
        system.rhs(x + A3 * h, &w.ytmp, k3);
        for i in 0..n {
            w.ytmp[i] = y[i] + h * (B41 * k1[i] + B42 * k2[i] + B43 * k3[i]);
        }
        system.rhs(x + A4 * h, &w.ytmp, k4);
        for i in 0..n {
            w.ytmp[i] = y[i] + h * (B51 * k1[i] + B52 * k2[i] + B53 * k3[i] + B54 * k4[i]);
        }
        system.rhs(x + A5 * h, &w.ytmp, k5);
        for i in 0..n {
            w.ytmp[i] = y[i]
                + h * (B61 * k1[i] + B62 * k2[i] + B63 * k3[i] + B64 * k4[i] + B65 * k5[i]);
        }
        system.rhs(x + A6 * h, &w.ytmp, k6);
        self.stats.rhs_evals += 5;

        for i in 0..n {
            w.yout[i] = y[i] + h * (C1 * k1[i] + C3 * k3[i] + C4 * k4[i] + C6 * k6[i]);
            w.yerr[i] =
                h * (DC1 * k1[i] + DC3 * k3[i] + DC4 * k4[i] + DC5 * k5[i] + DC6 * k6[i]);
        }
    }

    /// Advance `y` from `x0` to exactly `x1` (either direction).
    pub fn integrate<S: OdeSystem>(
        &mut self,
        system: &S,
        x0: f64,
        x1: f64,
        y: &mut [f64],
    ) -> BbnResult<()> {
        let n = system.dim();
        if y.len() != n {
            return Err(BbnError::ConfigError(format!(
                "state has {} components, system expects {n}",
                y.len()
            )));
        }
        if x1 == x0 {
            return Ok(());
        }

        let dir = (x1 - x0).signum();
        let mut w = RkWork::new(n);
        let mut x = x0;
        let mut h = initial_step(self.h, x1 - x0, 1e-3);

        while (x1 - x) * dir > 0.0 {
            check_step_limit(&self.stats, self.max_steps, x)?;

            let planned = h;
            let remaining = x1 - x;
            let mut last = (h - remaining) * dir >= 0.0;
            if last {
                h = remaining;
            }

            system.rhs(x, y, &mut w.k[0]);
            self.stats.rhs_evals += 1;

            loop {
                self.trial(system, x, y, h, &mut w);

                let mut errmax = 0.0_f64;
                for i in 0..n {
                    let scale = y[i].abs() + (h * w.k[0][i]).abs() + self.tol.atol;
                    errmax = errmax.max((w.yerr[i] / scale).abs());
                }
                errmax /= self.tol.rtol;
                if !errmax.is_finite() {
                    errmax = f64::MAX;
                }

                if errmax <= 1.0 {
                    let h_next = if errmax > ERRCON {
                        SAFETY * h * errmax.powf(PGROW)
                    } else {
                        5.0 * h
                    };
                    self.stats.accepted += 1;
                    y.copy_from_slice(&w.yout);
                    if last {
                        x = x1;
                        h = if h_next.abs() > planned.abs() { h_next } else { planned };
                    } else {
                        x += h;
                        h = h_next;
                    }
                    break;
                }

                self.stats.rejected += 1;
                last = false;
                let h_try = SAFETY * h * errmax.powf(PSHRINK);
                h = if h_try.abs() > 0.1 * h.abs() { h_try } else { 0.1 * h };
                check_step(h, x, self.stats.steps())?;
                check_step_limit(&self.stats, self.max_steps, x)?;
                tracing::trace!(x, h, errmax, "cash-karp step rejected");
            }
        }

        self.h = Some(h);
        Ok(())
    }
}
