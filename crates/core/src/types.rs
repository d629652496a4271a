//! Named instantiations of the generic engine.

use crate::matrix::{DenseMatrix, SparseMatrix};
use crate::scalar::Tracked;

/// Bare single-precision dense matrix.
pub type DenseF32 = DenseMatrix<f32>;

/// Bare double-precision dense matrix.
pub type DenseF64 = DenseMatrix<f64>;

/// Differentiable dense matrix.
pub type DenseTracked = DenseMatrix<Tracked>;

/// Bare double-precision sparse matrix.
pub type SparseF64 = SparseMatrix<f64>;

/// Differentiable sparse matrix.
pub type SparseTracked = SparseMatrix<Tracked>;

/// Sparse interchange format (CSC) shared with `sprs`.
pub type SparseMat = sprs::CsMat<f64>;
