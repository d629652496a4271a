//! Cholesky-family factorization over interchangeable scalar and storage types.
//!
//! The same algorithm body runs over bare floats (`f32`, `f64`) and over
//! [`Tracked`](scalar::Tracked) scalars that carry first-order derivatives, and
//! over both [`DenseMatrix`](matrix::DenseMatrix) and
//! [`SparseMatrix`](matrix::SparseMatrix) storage.
//!
//! ```
//! use cholad_core::cholesky::cholesky_in_place;
//! use cholad_core::matrix::{DenseMatrix, Matrix};
//!
//! let mut a = DenseMatrix::<f64>::from_row_slice(2, &[4.0, 2.0, 2.0, 3.0]);
//! cholesky_in_place(&mut a).unwrap();
//! assert_eq!(*a.const_at(0, 0), 2.0);
//! ```

pub mod batch;
pub mod cholesky;
pub mod error;
pub mod io;
pub mod matrix;
pub mod scalar;
pub mod types;

pub use error::{FactorError, Result};
