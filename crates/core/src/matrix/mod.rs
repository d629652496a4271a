//! The matrix capability consumed by the factorization engine.
//!
//! The engine only ever touches cells on or below the diagonal, through
//! [`Matrix::const_at`] and [`Matrix::set`]; storage layout is entirely the
//! backend's business.

pub mod dense;
pub mod sparse;

pub use dense::{frobenius_norm, ldl_product, llt_product, lower_factor, symmetric_values, unpack_ldl};
pub use dense::DenseMatrix;
pub use sparse::SparseMatrix;

use crate::scalar::Scalar;

/// Two-dimensional, indexable container of scalars.
pub trait Matrix {
    type Elem: Scalar;

    fn nrows(&self) -> usize;

    fn ncols(&self) -> usize;

    fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }

    /// Side length of a square matrix.
    fn dim(&self) -> usize {
        self.nrows()
    }

    /// Read-only access. Never allocates storage for an absent cell.
    fn const_at(&self, i: usize, j: usize) -> &Self::Elem;

    /// Mutable access. Sparse backends materialize the cell on first use;
    /// repeated calls with the same coordinates return the same slot.
    fn at(&mut self, i: usize, j: usize) -> &mut Self::Elem;

    /// Store `value` at `(i, j)`. Backends may decline to materialize zeros.
    fn set(&mut self, i: usize, j: usize, value: Self::Elem) {
        *self.at(i, j) = value;
    }
}
