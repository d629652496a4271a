use serde::Serialize;

use super::{cholesky_in_place, force_ldl_in_place, ldl_in_place, ForcePdConfig};
use crate::error::Result;
use crate::matrix::Matrix;
use crate::scalar::Scalar;

/// An owned Cholesky factor `L` (lower triangle of the wrapped matrix).
#[derive(Debug, Clone)]
pub struct Llt<M: Matrix> {
    factor: M,
}

impl<M: Matrix> Llt<M> {
    /// Factorize `a` in place and take ownership of the result.
    pub fn new(mut a: M) -> Result<Self> {
        cholesky_in_place(&mut a)?;
        Ok(Self { factor: a })
    }

    pub fn dim(&self) -> usize {
        self.factor.dim()
    }

    /// The matrix holding `L` on and below its diagonal.
    pub fn factor(&self) -> &M {
        &self.factor
    }

    pub fn into_inner(self) -> M {
        self.factor
    }

    /// `log|A| = 2 * Σ ln L_ii`. Differentiable for tracked scalars.
    pub fn log_determinant(&self) -> M::Elem {
        let mut r = M::Elem::zero();
        for i in 0..self.dim() {
            r = r.add(&self.factor.const_at(i, i).ln());
        }
        r.add(&r)
    }

    /// `|A| = (Π L_ii)^2`.
    pub fn determinant(&self) -> M::Elem {
        let mut r = M::Elem::one();
        for i in 0..self.dim() {
            r = r.mul(self.factor.const_at(i, i));
        }
        r.mul(&r)
    }
}

/// Counts of positive, negative and zero pivots of an LDL factorization.
///
/// By Sylvester's law of inertia these equal the eigenvalue sign counts of the
/// factorized matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Inertia {
    pub positive: usize,
    pub negative: usize,
    pub zero: usize,
}

/// An owned LDL factor in packed form: `L` strictly below the diagonal, `D` on it.
#[derive(Debug, Clone)]
pub struct Ldl<M: Matrix> {
    factor: M,
}

impl<M: Matrix> Ldl<M> {
    /// Exact LDL of `a`; fails on a singular pivot.
    pub fn new(mut a: M) -> Result<Self> {
        ldl_in_place(&mut a)?;
        Ok(Self { factor: a })
    }

    /// Forced LDL of `a`: every pivot is at least `config.epsilon()`.
    pub fn force(mut a: M, config: &ForcePdConfig) -> Result<Self> {
        force_ldl_in_place(&mut a, config)?;
        Ok(Self { factor: a })
    }

    pub fn dim(&self) -> usize {
        self.factor.dim()
    }

    pub fn factor(&self) -> &M {
        &self.factor
    }

    pub fn into_inner(self) -> M {
        self.factor
    }

    /// Pivot `D[i]`.
    pub fn d(&self, i: usize) -> &M::Elem {
        self.factor.const_at(i, i)
    }

    pub fn diagonal(&self) -> Vec<M::Elem> {
        (0..self.dim()).map(|i| self.d(i).clone()).collect()
    }

    /// Entry `L[i][j]` of the unit lower-triangular factor.
    pub fn l(&self, i: usize, j: usize) -> M::Elem {
        match i.cmp(&j) {
            std::cmp::Ordering::Greater => self.factor.const_at(i, j).clone(),
            std::cmp::Ordering::Equal => M::Elem::one(),
            std::cmp::Ordering::Less => M::Elem::zero(),
        }
    }

    /// `|A| = Π D_i`.
    pub fn determinant(&self) -> M::Elem {
        let mut r = M::Elem::one();
        for i in 0..self.dim() {
            r = r.mul(self.d(i));
        }
        r
    }

    pub fn inertia(&self) -> Inertia {
        let mut inertia = Inertia::default();
        for i in 0..self.dim() {
            let v = self.d(i).value();
            if v > 0.0 {
                inertia.positive += 1;
            } else if v < 0.0 {
                inertia.negative += 1;
            } else {
                inertia.zero += 1;
            }
        }
        inertia
    }

    pub fn is_positive_definite(&self) -> bool {
        (0..self.dim()).all(|i| self.d(i).value() > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{DenseMatrix, SparseMatrix};
    use approx::assert_relative_eq;

    #[test]
    fn test_llt_determinant() {
        // det([[4, 2], [2, 3]]) = 8
        let a = DenseMatrix::from_row_slice(2, &[4.0, 2.0, 2.0, 3.0]);
        let llt = Llt::new(a).unwrap();
        assert_relative_eq!(llt.determinant(), 8.0, epsilon = 1e-12);
        assert_relative_eq!(llt.log_determinant(), 8.0_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_llt_log_determinant_sparse() {
        // det of the tridiagonal [[4,1,0],[1,3,1],[0,1,4]] is 40.
        let a = SparseMatrix::from_triplets(
            3,
            &[(0, 0, 4.0), (1, 0, 1.0), (1, 1, 3.0), (2, 1, 1.0), (2, 2, 4.0)],
        )
        .unwrap();
        let llt = Llt::new(a).unwrap();
        assert_relative_eq!(llt.log_determinant(), 40.0_f64.ln(), epsilon = 1e-10);
    }

    #[test]
    fn test_ldl_inertia_indefinite() {
        // Eigenvalues of [[1, 2], [2, 1]] are 3 and -1.
        let a = DenseMatrix::from_row_slice(2, &[1.0, 2.0, 2.0, 1.0]);
        let ldl = Ldl::new(a).unwrap();
        assert_eq!(
            ldl.inertia(),
            Inertia {
                positive: 1,
                negative: 1,
                zero: 0
            }
        );
        assert!(!ldl.is_positive_definite());
        assert_relative_eq!(ldl.determinant(), -3.0);
        assert_eq!(ldl.l(1, 0), 2.0);
        assert_eq!(ldl.l(1, 1), 1.0);
        assert_eq!(ldl.l(0, 1), 0.0);
    }

    #[test]
    fn test_forced_ldl_is_positive_definite() {
        let a = DenseMatrix::from_row_slice(2, &[1.0, 2.0, 2.0, 1.0]);
        let ldl = Ldl::force(a, &ForcePdConfig::default()).unwrap();
        assert!(ldl.is_positive_definite());
        assert_eq!(ldl.inertia().positive, 2);
        assert_eq!(ldl.diagonal().len(), 2);
    }
}
