//! Natural cubic spline interpolation on a 1D grid.
//!
//! Knots may be non-uniform; queries outside the knot range extrapolate
//! the end cubic.

use bbn_types::error::{BbnError, BbnResult};

use crate::tridiag::thomas_solve;

#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivatives at the knots; zero at both ends.
    y2: Vec<f64>,
}

impl CubicSpline {
    /// Build a natural spline through `(x[i], y[i])`.
    /// `x` must be strictly increasing; all values finite.
    pub fn new(x: &[f64], y: &[f64]) -> BbnResult<Self> {
        let n = x.len();
        if n < 2 || y.len() != n {
            return Err(BbnError::ConfigError(format!(
                "spline needs >= 2 matching knots, got x={}, y={}",
                n,
                y.len()
            )));
        }
        if x.iter().chain(y).any(|v| !v.is_finite()) {
            return Err(BbnError::ConfigError(
                "spline knots must be finite".to_string(),
            ));
        }
        if x.windows(2).any(|w| w[1] <= w[0]) {
            return Err(BbnError::ConfigError(
                "spline abscissae must be strictly increasing".to_string(),
            ));
        }

        let mut y2 = vec![0.0; n];
        if n > 2 {
            let m = n - 2;
            let mut sub = vec![0.0; m];
            let mut diag = vec![0.0; m];
            let mut sup = vec![0.0; m];
            let mut rhs = vec![0.0; m];
            for k in 0..m {
                let i = k + 1;
                let h0 = x[i] - x[i - 1];
                let h1 = x[i + 1] - x[i];
                sub[k] = h0;
                diag[k] = 2.0 * (h0 + h1);
                sup[k] = h1;
                rhs[k] = 6.0 * ((y[i + 1] - y[i]) / h1 - (y[i] - y[i - 1]) / h0);
            }
            let inner = thomas_solve(&sub, &diag, &sup, &rhs)?;
            y2[1..n - 1].copy_from_slice(&inner);
        }

        Ok(CubicSpline {
            x: x.to_vec(),
            y: y.to_vec(),
            y2,
        })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// (first, last) knot abscissa.
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    fn interval(&self, xq: f64) -> usize {
        let upper = self.x.partition_point(|&v| v <= xq);
        upper.saturating_sub(1).min(self.x.len() - 2)
    }

    pub fn eval(&self, xq: f64) -> f64 {
        let k = self.interval(xq);
        let h = self.x[k + 1] - self.x[k];
        let a = (self.x[k + 1] - xq) / h;
        let b = (xq - self.x[k]) / h;
        a * self.y[k]
            + b * self.y[k + 1]
            + ((a * a * a - a) * self.y2[k] + (b * b * b - b) * self.y2[k + 1]) * h * h / 6.0
    }

    /// dy/dx of the interpolant.
    pub fn derivative(&self, xq: f64) -> f64 {
        let k = self.interval(xq);
        let h = self.x[k + 1] - self.x[k];
        let a = (self.x[k + 1] - xq) / h;
        let b = (xq - self.x[k]) / h;
        (self.y[k + 1] - self.y[k]) / h - (3.0 * a * a - 1.0) / 6.0 * h * self.y2[k]
            + (3.0 * b * b - 1.0) / 6.0 * h * self.y2[k + 1]
    }
}
