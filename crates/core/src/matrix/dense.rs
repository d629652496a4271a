use nalgebra::DMatrix;

use super::Matrix;
use crate::scalar::Scalar;

/// Dense matrix with every cell materialized, backed by `nalgebra`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<S: Scalar> {
    inner: DMatrix<S>,
}

impl<S: Scalar> DenseMatrix<S> {
    /// Square matrix of zeros.
    pub fn new(n: usize) -> Self {
        Self::zeros(n, n)
    }

    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            inner: DMatrix::from_element(nrows, ncols, S::zero()),
        }
    }

    pub fn identity(n: usize) -> Self {
        Self {
            inner: DMatrix::from_fn(n, n, |i, j| if i == j { S::one() } else { S::zero() }),
        }
    }

    /// Square matrix from row-major data.
    ///
    /// # Panics
    /// If `data.len() != n * n`.
    pub fn from_row_slice(n: usize, data: &[S]) -> Self {
        assert_eq!(data.len(), n * n, "from_row_slice: expected {} values", n * n);
        Self {
            inner: DMatrix::from_fn(n, n, |i, j| data[i * n + j].clone()),
        }
    }

    pub fn from_dmatrix(inner: DMatrix<S>) -> Self {
        Self { inner }
    }

    pub fn as_dmatrix(&self) -> &DMatrix<S> {
        &self.inner
    }

    pub fn into_inner(self) -> DMatrix<S> {
        self.inner
    }

    /// Convert every element, e.g. to lift bare values into tracked scalars.
    pub fn map_values<T: Scalar>(&self, mut f: impl FnMut(usize, usize, &S) -> T) -> DenseMatrix<T> {
        DenseMatrix {
            inner: DMatrix::from_fn(self.inner.nrows(), self.inner.ncols(), |i, j| {
                f(i, j, &self.inner[(i, j)])
            }),
        }
    }
}

impl<S: Scalar> Matrix for DenseMatrix<S> {
    type Elem = S;

    fn nrows(&self) -> usize {
        self.inner.nrows()
    }

    fn ncols(&self) -> usize {
        self.inner.ncols()
    }

    #[inline]
    fn const_at(&self, i: usize, j: usize) -> &S {
        &self.inner[(i, j)]
    }

    #[inline]
    fn at(&mut self, i: usize, j: usize) -> &mut S {
        &mut self.inner[(i, j)]
    }
}

/// Symmetric `f64` matrix built from the lower triangle of `a`.
pub fn symmetric_values<M: Matrix>(a: &M) -> DMatrix<f64> {
    let n = a.nrows();
    DMatrix::from_fn(n, n, |i, j| {
        if j <= i {
            a.const_at(i, j).value()
        } else {
            a.const_at(j, i).value()
        }
    })
}

/// The lower triangle of a factor as `f64`, zeros above the diagonal.
pub fn lower_factor<M: Matrix>(l: &M) -> DMatrix<f64> {
    let n = l.nrows();
    DMatrix::from_fn(n, n, |i, j| if j <= i { l.const_at(i, j).value() } else { 0.0 })
}

/// Split a packed LDL factor into a unit lower-triangular `L` and the diagonal `D`.
pub fn unpack_ldl<M: Matrix>(packed: &M) -> (DMatrix<f64>, Vec<f64>) {
    let n = packed.nrows();
    let l = DMatrix::from_fn(n, n, |i, j| match i.cmp(&j) {
        std::cmp::Ordering::Greater => packed.const_at(i, j).value(),
        std::cmp::Ordering::Equal => 1.0,
        std::cmp::Ordering::Less => 0.0,
    });
    let d = (0..n).map(|i| packed.const_at(i, i).value()).collect();
    (l, d)
}

/// Compute L * L^T.
pub fn llt_product(l: &DMatrix<f64>) -> DMatrix<f64> {
    l * l.transpose()
}

/// Compute L * diag(D) * L^T.
pub fn ldl_product(l: &DMatrix<f64>, d: &[f64]) -> DMatrix<f64> {
    let mut ld = l.clone();
    for (j, &dj) in d.iter().enumerate() {
        for i in 0..ld.nrows() {
            ld[(i, j)] *= dj;
        }
    }
    ld * l.transpose()
}

/// Compute the Frobenius norm of a matrix.
pub fn frobenius_norm(a: &DMatrix<f64>) -> f64 {
    a.iter().map(|x| x * x).sum::<f64>().sqrt()
}
