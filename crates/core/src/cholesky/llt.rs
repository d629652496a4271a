use super::row_dot;
use crate::error::{FactorError, Result};
use crate::matrix::Matrix;
use crate::scalar::Scalar;

/// Cholesky-Banachiewicz, row by row, in place on the lower triangle of `m`.
///
/// On entry the lower triangle holds `A`; on success it holds `L`. Cell
/// `(i, j)` is read as `A` exactly once, immediately before it is overwritten,
/// and every other read hits an already finished entry of `L`.
pub(super) fn factorize<M: Matrix>(m: &mut M) -> Result<()> {
    let n = m.dim();
    for i in 0..n {
        for j in 0..i {
            let sum = row_dot(m, i, j, j);
            let c = m.const_at(i, j).sub(&sum);
            let lij = c.div(m.const_at(j, j));
            m.set(i, j, lij);
        }

        let mut sum = M::Elem::zero();
        for k in 0..i {
            sum = sum.add(&m.const_at(i, k).pow(2.0));
        }
        let s = m.const_at(i, i).sub(&sum);
        let pivot = s.value();
        log::trace!("cholesky: pivot {i} = {pivot:e}");
        // NaN fails here too.
        if !(pivot > 0.0) {
            return Err(FactorError::NotPositiveDefinite { index: i, pivot });
        }
        m.set(i, i, s.sqrt());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{lower_factor, DenseMatrix};
    use approx::assert_relative_eq;

    #[test]
    fn test_known_factor() {
        let mut a = DenseMatrix::from_row_slice(
            4,
            &[
                18.0, 22.0, 54.0, 42.0, //
                22.0, 70.0, 86.0, 62.0, //
                54.0, 86.0, 174.0, 134.0, //
                42.0, 62.0, 134.0, 106.0,
            ],
        );
        factorize(&mut a).unwrap();
        let expected = [
            [4.24264, 0.0, 0.0, 0.0],
            [5.18545, 6.56591, 0.0, 0.0],
            [12.72792, 3.04604, 1.64974, 0.0],
            [9.89949, 1.62455, 1.84971, 1.39262],
        ];
        let l = lower_factor(&a);
        for i in 0..4 {
            for j in 0..=i {
                assert_relative_eq!(l[(i, j)], expected[i][j], epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_negative_pivot_reports_index() {
        // [[1, 5], [5, 1]] has eigenvalues 6 and -4.
        let mut a = DenseMatrix::from_row_slice(2, &[1.0, 5.0, 5.0, 1.0]);
        match factorize(&mut a) {
            Err(FactorError::NotPositiveDefinite { index, pivot }) => {
                assert_eq!(index, 1);
                assert_relative_eq!(pivot, -24.0);
            }
            other => panic!("expected NotPositiveDefinite, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_pivot_fails() {
        let mut a = DenseMatrix::from_row_slice(2, &[0.0, 0.0, 0.0, 1.0]);
        assert!(matches!(
            factorize(&mut a),
            Err(FactorError::NotPositiveDefinite { index: 0, .. })
        ));
    }

    #[test]
    fn test_nan_pivot_fails() {
        let mut a = DenseMatrix::from_row_slice(1, &[f64::NAN]);
        assert!(factorize(&mut a).is_err());
    }
}
