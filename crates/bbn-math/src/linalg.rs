//! Dense LU factorisation with partial pivoting.
//!
//! Sized for the small iteration matrices (I - γhJ) of the stiff
//! integrator: factor once per attempted step, then solve several
//! right-hand sides in place.

use bbn_types::error::{BbnError, BbnResult};
use ndarray::Array2;

/// Row-pivoted LU factors of a square matrix, packed in one array
/// (unit-diagonal L below the diagonal, U on and above it).
#[derive(Debug, Clone)]
pub struct LuDecomposition {
    lu: Array2<f64>,
    pivots: Vec<usize>,
}

impl LuDecomposition {
    /// Factor `a`. Fails on a non-square input or a zero/non-finite pivot.
    pub fn factor(a: &Array2<f64>) -> BbnResult<Self> {
        let (n, m) = a.dim();
        if n != m {
            return Err(BbnError::LinAlg(format!(
                "LU needs a square matrix, got {n}x{m}"
            )));
        }

        let mut lu = a.clone();
        let mut pivots = vec![0; n];

        for k in 0..n {
            let mut p = k;
            let mut big = lu[[k, k]].abs();
            for i in (k + 1)..n {
                let v = lu[[i, k]].abs();
                if v > big {
                    big = v;
                    p = i;
                }
            }
            if big == 0.0 || !big.is_finite() {
                return Err(BbnError::LinAlg(format!(
                    "singular matrix: pivot {big} in column {k}"
                )));
            }
            pivots[k] = p;
            if p != k {
                for j in 0..n {
                    lu.swap([k, j], [p, j]);
                }
            }

            let inv = 1.0 / lu[[k, k]];
            for i in (k + 1)..n {
                let factor = lu[[i, k]] * inv;
                lu[[i, k]] = factor;
                if factor != 0.0 {
                    for j in (k + 1)..n {
                        lu[[i, j]] -= factor * lu[[k, j]];
                    }
                }
            }
        }

        Ok(LuDecomposition { lu, pivots })
    }

    pub fn dim(&self) -> usize {
        self.pivots.len()
    }

    /// Overwrite `b` with the solution of A x = b.
    pub fn solve_in_place(&self, b: &mut [f64]) {
        let n = self.dim();
        debug_assert_eq!(b.len(), n);

        for k in 0..n {
            b.swap(k, self.pivots[k]);
        }
        // Forward: L y = Pb
        for i in 1..n {
            let mut sum = b[i];
            for j in 0..i {
                sum -= self.lu[[i, j]] * b[j];
            }
            b[i] = sum;
        }
        // Backward: U x = y
        for i in (0..n).rev() {
            let mut sum = b[i];
            for j in (i + 1)..n {
                sum -= self.lu[[i, j]] * b[j];
            }
            b[i] = sum / self.lu[[i, i]];
        }
    }

    pub fn solve(&self, b: &[f64]) -> Vec<f64> {
        let mut x = b.to_vec();
        self.solve_in_place(&mut x);
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_lu_identity() {
        let lu = LuDecomposition::factor(&Array2::eye(4)).unwrap();
        let x = lu.solve(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(x, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_lu_needs_pivoting() {
        // Zero leading entry forces a row swap
        let a = array![[0.0, 2.0, 1.0], [1.0, 1.0, 0.0], [3.0, 0.0, 1.0]];
        let b = [5.0, 3.0, 6.0];
        let lu = LuDecomposition::factor(&a).unwrap();
        let x = lu.solve(&b);
        for i in 0..3 {
            let row: f64 = (0..3).map(|j| a[[i, j]] * x[j]).sum();
            assert!((row - b[i]).abs() < 1e-12, "row {i}: {row} vs {}", b[i]);
        }
    }

    #[test]
    fn test_lu_singular() {
        let a = array![[1.0, 2.0], [2.0, 4.0]];
        let err = LuDecomposition::factor(&a).unwrap_err();
        assert!(matches!(err, BbnError::LinAlg(_)), "got {err:?}");
    }

    #[test]
    fn test_lu_non_square() {
        let a = Array2::<f64>::zeros((2, 3));
        assert!(LuDecomposition::factor(&a).is_err());
    }

    #[test]
    fn test_lu_widely_scaled_rows() {
        // Mimics I - γhJ with rate constants spanning many decades
        let a = array![[1.0 + 1e8, -1e8], [-1e-6, 1.0 + 1e-6]];
        let lu = LuDecomposition::factor(&a).unwrap();
        let x = lu.solve(&[1.0, 1.0]);
        let r0 = a[[0, 0]] * x[0] + a[[0, 1]] * x[1];
        let r1 = a[[1, 0]] * x[0] + a[[1, 1]] * x[1];
        assert!((r0 - 1.0).abs() < 1e-6);
        assert!((r1 - 1.0).abs() < 1e-12);
    }
}
