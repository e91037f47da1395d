// ─────────────────────────────────────────────────────────────────────
// SCPN BBN Core — Stiff Integration
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Linearly implicit Rosenbrock-W 2(3) integrator for stiff systems.
//!
//! Shampine & Reichelt's modified Rosenbrock pair: one LU factorisation of
//! W = I - γhJ per attempted step, three solves, and an embedded third-order
//! error estimate. The second-order solution is L-stable, so rate constants
//! many decades faster than the step (equilibrium reactions) are damped
//! rather than amplified.
//!
//! The last stage evaluates f at the accepted point and is reused as the
//! first stage of the next step.

use bbn_types::error::{BbnError, BbnResult};
use ndarray::Array2;

use crate::linalg::LuDecomposition;
use crate::ode::{check_step_limit, check_step, initial_step, SolverStats, StiffSystem, Tolerance};

/// γ = 1 / (2 + √2)
const GAMMA: f64 = 0.292_893_218_813_452_5;
/// e32 = 6 + √2
const E32: f64 = 7.414_213_562_373_095;

const SAFETY: f64 = 0.8;
const MAX_GROWTH: f64 = 5.0;
const MAX_SHRINK: f64 = 0.1;
/// Relative width of the finite difference for ∂f/∂x.
const DFDX_REL_STEP: f64 = 1e-7;

#[derive(Debug, Clone)]
pub struct Rosenbrock23 {
    tol: Tolerance,
    max_steps: usize,
    h: Option<f64>,
    stats: SolverStats,
}

struct Work {
    f0: Vec<f64>,
    f1: Vec<f64>,
    f2: Vec<f64>,
    dfdx: Vec<f64>,
    k1: Vec<f64>,
    k2: Vec<f64>,
    k3: Vec<f64>,
    ytmp: Vec<f64>,
    ynew: Vec<f64>,
    jac: Array2<f64>,
    w: Array2<f64>,
}

impl Work {
    fn new(n: usize) -> Self {
        Work {
            f0: vec![0.0; n],
            f1: vec![0.0; n],
            f2: vec![0.0; n],
            dfdx: vec![0.0; n],
            k1: vec![0.0; n],
            k2: vec![0.0; n],
            k3: vec![0.0; n],
            ytmp: vec![0.0; n],
            ynew: vec![0.0; n],
            jac: Array2::zeros((n, n)),
            w: Array2::zeros((n, n)),
        }
    }
}

impl Rosenbrock23 {
    pub fn new(tol: Tolerance, max_steps: usize) -> Self {
        Rosenbrock23 {
            tol,
            max_steps,
            h: None,
            stats: SolverStats::default(),
        }
    }

    pub fn stats(&self) -> SolverStats {
        self.stats
    }

    pub fn next_step(&self) -> Option<f64> {
        self.h
    }

    /// Seed the first step instead of the default 1e-6 of the span.
    pub fn with_initial_step(mut self, h: f64) -> Self {
        self.h = Some(h);
        self
    }

    /// Attempt one step of size `h`. Returns the scaled error norm; the
    /// candidate state is left in `w.ynew` and f at it in `w.f2`.
    fn attempt<S: StiffSystem>(
        &mut self,
        system: &S,
        x: f64,
        y: &[f64],
        h: f64,
        w: &mut Work,
    ) -> BbnResult<f64> {
        let n = y.len();
        let hd = h * GAMMA;

        for i in 0..n {
            for j in 0..n {
                w.w[[i, j]] = -hd * w.jac[[i, j]];
            }
            w.w[[i, i]] += 1.0;
        }
        let lu = LuDecomposition::factor(&w.w)?;
        self.stats.factorizations += 1;

        // k1 = W⁻¹ (F0 + hγ ∂f/∂x)
        for i in 0..n {
            w.k1[i] = w.f0[i] + hd * w.dfdx[i];
        }
        lu.solve_in_place(&mut w.k1);

        // k2 = W⁻¹ (F1 - k1) + k1
        for i in 0..n {
            w.ytmp[i] = y[i] + 0.5 * h * w.k1[i];
        }
        system.rhs(x + 0.5 * h, &w.ytmp, &mut w.f1);
        for i in 0..n {
            w.k2[i] = w.f1[i] - w.k1[i];
        }
        lu.solve_in_place(&mut w.k2);
        for i in 0..n {
            w.k2[i] += w.k1[i];
            w.ynew[i] = y[i] + h * w.k2[i];
        }

        // k3 = W⁻¹ (F2 - e32 (k2 - F1) - 2 (k1 - F0) + hγ ∂f/∂x)
        system.rhs(x + h, &w.ynew, &mut w.f2);
        self.stats.rhs_evals += 2;
        for i in 0..n {
            w.k3[i] = w.f2[i] - E32 * (w.k2[i] - w.f1[i]) - 2.0 * (w.k1[i] - w.f0[i])
                + hd * w.dfdx[i];
        }
        lu.solve_in_place(&mut w.k3);

        let mut err = 0.0_f64;
        for i in 0..n {
            let e = h / 6.0 * (w.k1[i] - 2.0 * w.k2[i] + w.k3[i]);
            let scale = self.tol.atol + self.tol.rtol * y[i].abs().max(w.ynew[i].abs());
            err = err.max(e.abs() / scale);
        }
        if !err.is_finite() || w.ynew.iter().any(|v| !v.is_finite()) {
            tracing::warn!(x, h, "non-finite Rosenbrock stage; shrinking step");
            return Ok(f64::INFINITY);
        }
        Ok(err)
    }

    /// Advance `y` from `x0` to exactly `x1` (either direction).
    pub fn integrate<S: StiffSystem>(
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
        let mut w = Work::new(n);
        let mut x = x0;
        let mut h = initial_step(self.h, x1 - x0, 1e-6);

        system.rhs(x, y, &mut w.f0);
        self.stats.rhs_evals += 1;

        while (x1 - x) * dir > 0.0 {
            check_step_limit(&self.stats, self.max_steps, x)?;

            system.jacobian(x, y, &mut w.jac);
            self.stats.jacobian_evals += 1;
            let dx = dir * DFDX_REL_STEP * x.abs().max(DFDX_REL_STEP);
            system.dfdx(x, y, &w.f0, dx, &mut w.dfdx);
            self.stats.rhs_evals += 1;

            let planned = h;
            let remaining = x1 - x;
            let mut last = (h - remaining) * dir >= 0.0;
            if last {
                h = remaining;
            }

            loop {
                let err = match self.attempt(system, x, y, h, &mut w) {
                    Ok(err) => err,
                    // Singular W: treat like a failed error test
                    Err(BbnError::LinAlg(msg)) => {
                        tracing::debug!(x, h, %msg, "singular iteration matrix");
                        f64::INFINITY
                    }
                    Err(e) => return Err(e),
                };

                if err <= 1.0 {
                    let growth = if err == 0.0 {
                        MAX_GROWTH
                    } else {
                        (SAFETY * err.powf(-1.0 / 3.0)).min(MAX_GROWTH)
                    };
                    self.stats.accepted += 1;
                    y.copy_from_slice(&w.ynew);
                    std::mem::swap(&mut w.f0, &mut w.f2);
                    let h_next = h * growth;
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
                let shrink = if err.is_finite() {
                    (SAFETY * err.powf(-1.0 / 3.0)).max(MAX_SHRINK)
                } else {
                    MAX_SHRINK
                };
                h *= shrink;
                check_step(h, x, self.stats.steps())?;
                check_step_limit(&self.stats, self.max_steps, x)?;
                tracing::trace!(x, h, err, "rosenbrock step rejected");
            }
        }

        self.h = Some(h);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ode::OdeSystem;

    /// Robertson's chemical kinetics problem, the standard stiff benchmark.
    struct Robertson;

    impl OdeSystem for Robertson {
        fn dim(&self) -> usize {
            3
        }
        fn rhs(&self, _x: f64, y: &[f64], f: &mut [f64]) {
            f[0] = -0.04 * y[0] + 1e4 * y[1] * y[2];
            f[1] = 0.04 * y[0] - 1e4 * y[1] * y[2] - 3e7 * y[1] * y[1];
            f[2] = 3e7 * y[1] * y[1];
        }
    }

    impl StiffSystem for Robertson {
        fn jacobian(&self, _x: f64, y: &[f64], j: &mut Array2<f64>) {
            j[[0, 0]] = -0.04;
            j[[0, 1]] = 1e4 * y[2];
            j[[0, 2]] = 1e4 * y[1];
            j[[1, 0]] = 0.04;
            j[[1, 1]] = -1e4 * y[2] - 6e7 * y[1];
            j[[1, 2]] = -1e4 * y[1];
            j[[2, 0]] = 0.0;
            j[[2, 1]] = 6e7 * y[1];
            j[[2, 2]] = 0.0;
        }
    }

    /// y' = -λ (y - cos x) - sin x, relaxation onto y = cos x.
    /// Stiff and stable forward for λ > 0, backward for λ < 0.
    struct Prothero {
        lambda: f64,
    }

    impl OdeSystem for Prothero {
        fn dim(&self) -> usize {
            1
        }
        fn rhs(&self, x: f64, y: &[f64], f: &mut [f64]) {
            f[0] = -self.lambda * (y[0] - x.cos()) - x.sin();
        }
    }

    impl StiffSystem for Prothero {
        fn jacobian(&self, _x: f64, _y: &[f64], j: &mut Array2<f64>) {
            j[[0, 0]] = -self.lambda;
        }
    }

    #[test]
    fn test_robertson_conserves_mass() {
        let mut solver = Rosenbrock23::new(Tolerance::new(1e-4, 1e-10).unwrap(), 50_000);
        let mut y = [1.0, 0.0, 0.0];
        let mut x = 0.0;
        for x_next in [1e-3, 1.0, 40.0, 1e3, 1e5] {
            solver.integrate(&Robertson, x, x_next, &mut y).unwrap();
            x = x_next;
            let total: f64 = y.iter().sum();
            assert!((total - 1.0).abs() < 1e-12, "mass drift {total} at x={x}");
        }
        // Reference values at x = 40 are y0 ≈ 0.7158; at 1e5 y0 ≈ 0.0179
        assert!((y[0] - 0.01786).abs() < 5e-4, "y0(1e5) = {}", y[0]);
        assert!(solver.stats().accepted < 5_000, "stats {:?}", solver.stats());
    }

    #[test]
    fn test_large_steps_on_stiff_relaxation() {
        let sys = Prothero { lambda: 1e6 };
        let mut solver = Rosenbrock23::new(Tolerance::new(1e-6, 1e-9).unwrap(), 50_000);
        let mut y = [1.0];
        solver.integrate(&sys, 0.0, 10.0, &mut y).unwrap();
        assert!((y[0] - 10.0_f64.cos()).abs() < 1e-5, "y = {}", y[0]);
        // Explicit stability would cap h at 2/λ, i.e. ~5e6 steps
        assert!(solver.stats().accepted < 20_000, "stats {:?}", solver.stats());
    }

    #[test]
    fn test_backward_in_x() {
        let sys = Prothero { lambda: -1e3 };
        let mut solver = Rosenbrock23::new(Tolerance::new(1e-7, 1e-10).unwrap(), 10_000);
        let mut y = [2.0_f64.cos()];
        solver.integrate(&sys, 2.0, 0.5, &mut y).unwrap();
        assert!((y[0] - 0.5_f64.cos()).abs() < 1e-5, "y = {}", y[0]);
    }

    #[test]
    fn test_step_estimate_carries_over() {
        let sys = Prothero { lambda: 1e4 };
        let tol = Tolerance::new(1e-6, 1e-9).unwrap();
        let mut first = Rosenbrock23::new(tol, 10_000);
        assert_eq!(first.next_step(), None);
        let mut y = [1.0];
        first.integrate(&sys, 0.0, 1.0, &mut y).unwrap();
        let h = first.next_step().unwrap();
        assert!(h > 0.0 && h.is_finite(), "h = {h}");

        // A fresh solver seeded with that step resumes the same way
        let mut seeded = Rosenbrock23::new(tol, 10_000).with_initial_step(h);
        assert_eq!(seeded.next_step(), Some(h));
        let mut z = y;
        first.integrate(&sys, 1.0, 3.0, &mut y).unwrap();
        seeded.integrate(&sys, 1.0, 3.0, &mut z).unwrap();
        assert_eq!(y, z);
        assert!((z[0] - 3.0_f64.cos()).abs() < 1e-5, "y = {}", z[0]);
    }

    #[test]
    fn test_step_limit_reported() {
        let mut solver = Rosenbrock23::new(Tolerance::new(1e-8, 1e-12).unwrap(), 2);
        let mut y = [1.0, 0.0, 0.0];
        let err = solver.integrate(&Robertson, 0.0, 1e5, &mut y).unwrap_err();
        assert!(matches!(err, BbnError::SolverDiverged { .. }), "got {err:?}");
    }
}
