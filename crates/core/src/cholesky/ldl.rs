use super::{row_dot_weighted, row_square_weighted};
use crate::error::{FactorError, Result};
use crate::matrix::Matrix;
use crate::scalar::Scalar;

/// Row-by-row LDL in packed form, in place on the lower triangle of `m`.
///
/// A zero `D[j]` fails with `SingularPivot` as soon as a later row would have
/// to divide by it; a zero in the last pivot is returned as is.
pub(super) fn factorize<M: Matrix>(m: &mut M) -> Result<()> {
    let n = m.dim();
    for i in 0..n {
        let di = eliminate_row(m, i);
        log::trace!("ldl: pivot {i} = {:e}", di.value());
        let singular = di.is_zero() && i + 1 < n;
        m.set(i, i, di);
        if singular {
            return Err(FactorError::SingularPivot { index: i });
        }
    }
    Ok(())
}

/// Overwrite `A[i][j]` with `L[i][j]` for every `j < i` and return the
/// unstored pivot candidate `D[i]`.
///
/// Rows `0..i` must already be factorized with nonzero pivots.
pub(super) fn eliminate_row<M: Matrix>(m: &mut M, i: usize) -> M::Elem {
    for j in 0..i {
        let sum = row_dot_weighted(m, i, j, j);
        let c = m.const_at(i, j).sub(&sum);
        let lij = c.div(m.const_at(j, j));
        m.set(i, j, lij);
    }
    let sum = row_square_weighted(m, i, i);
    m.const_at(i, i).sub(&sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{ldl_product, unpack_ldl, DenseMatrix};
    use approx::assert_relative_eq;

    #[test]
    fn test_indefinite_matrix() {
        // [[1, 2], [2, 1]]: D = [1, -3], L[1][0] = 2
        let mut a = DenseMatrix::from_row_slice(2, &[1.0, 2.0, 2.0, 1.0]);
        factorize(&mut a).unwrap();
        assert_relative_eq!(*a.const_at(0, 0), 1.0);
        assert_relative_eq!(*a.const_at(1, 0), 2.0);
        assert_relative_eq!(*a.const_at(1, 1), -3.0);
    }

    #[test]
    fn test_reconstruction_4x4() {
        let data = [
            18.0, 22.0, 54.0, 42.0, //
            22.0, 70.0, 86.0, 62.0, //
            54.0, 86.0, 174.0, 134.0, //
            42.0, 62.0, 134.0, 106.0,
        ];
        let mut a = DenseMatrix::from_row_slice(4, &data);
        factorize(&mut a).unwrap();
        let (l, d) = unpack_ldl(&a);
        let r = ldl_product(&l, &d);
        for i in 0..4 {
            for j in 0..4 {
                assert_relative_eq!(r[(i, j)], data[i * 4 + j], epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_singular_pivot_in_later_row() {
        // D[0] = 0 and row 1 has to divide by it.
        let mut a = DenseMatrix::from_row_slice(2, &[0.0, 1.0, 1.0, 1.0]);
        let err = factorize(&mut a).unwrap_err();
        assert!(matches!(err, FactorError::SingularPivot { index: 0 }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_trailing_zero_pivot_is_accepted() {
        let mut a = DenseMatrix::from_row_slice(2, &[1.0, 1.0, 1.0, 1.0]);
        factorize(&mut a).unwrap();
        assert_eq!(*a.const_at(1, 1), 0.0);
    }

    #[test]
    fn test_singular_pivot_leaves_earlier_rows_final() {
        let mut a = DenseMatrix::from_row_slice(3, &[2.0, 4.0, 0.0, 4.0, 8.0, 1.0, 0.0, 1.0, 1.0]);
        let err = factorize(&mut a).unwrap_err();
        assert!(matches!(err, FactorError::SingularPivot { index: 1 }));
        assert_eq!(*a.const_at(0, 0), 2.0);
        assert_eq!(*a.const_at(1, 0), 2.0);
        assert_eq!(*a.const_at(1, 1), 0.0);
    }
}
