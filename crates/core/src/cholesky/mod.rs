//! Cholesky, LDL and force-positive-definite LDL factorization.
//!
//! Every entry point is generic over the scalar type and the storage backend.
//! Shapes are validated before any arithmetic. Only cells on or below the
//! diagonal are read from the input or written to the output.
//!
//! | Entry point | Result | Failure |
//! |---|---|---|
//! | [`cholesky`] | `A = L Lᵗ` | `NotPositiveDefinite` |
//! | [`ldl`] | `A = L D Lᵗ` | `SingularPivot` |
//! | [`force_ldl`] | `L D Lᵗ` of a nearby SPD matrix, `D >= epsilon` | none |
//!
//! All three also return `DimensionMismatch` for malformed shapes.

mod factor;
mod force;
mod ldl;
mod llt;

pub use factor::{Inertia, Ldl, Llt};
pub use force::{ForcePdConfig, PivotStrategy, DEFAULT_EPSILON};

use crate::error::{FactorError, Result};
use crate::matrix::Matrix;
use crate::scalar::Scalar;

/// Compute the lower-triangular `L` with `A = L Lᵗ`, writing it into `l`.
///
/// Cells of `l` above the diagonal are left untouched.
///
/// # Errors
/// `DimensionMismatch` if `a` is not square or `l` has a different shape;
/// `NotPositiveDefinite` if a diagonal pivot is not strictly positive.
pub fn cholesky<A, L>(a: &A, l: &mut L) -> Result<()>
where
    A: Matrix,
    L: Matrix<Elem = A::Elem>,
{
    let n = check_square(a, "cholesky: input")?;
    check_output(l, n, "cholesky: output factor")?;
    log::debug!("cholesky: factorizing {n}x{n} matrix");
    copy_lower(a, l);
    llt::factorize(l)
}

/// [`cholesky`], overwriting the lower triangle of `a` with `L`.
pub fn cholesky_in_place<M: Matrix>(a: &mut M) -> Result<()> {
    let n = check_square(a, "cholesky_in_place: input")?;
    log::debug!("cholesky_in_place: factorizing {n}x{n} matrix");
    llt::factorize(a)
}

/// Compute unit lower-triangular `L` and diagonal `D` with `A = L D Lᵗ`.
///
/// The strictly lower part of `l` receives `L`, its diagonal is set to one,
/// and `d[i]` receives `D[i]`. Pivots may be zero or negative.
///
/// # Errors
/// `DimensionMismatch` on shape errors (including `d.len() != n`);
/// `SingularPivot` when a later row would divide by a zero pivot.
pub fn ldl<A, L>(a: &A, l: &mut L, d: &mut [A::Elem]) -> Result<()>
where
    A: Matrix,
    L: Matrix<Elem = A::Elem>,
{
    let n = check_square(a, "ldl: input")?;
    check_output(l, n, "ldl: output factor")?;
    check_diagonal(d, n, "ldl: output diagonal")?;
    log::debug!("ldl: factorizing {n}x{n} matrix");
    copy_lower(a, l);
    ldl::factorize(l)?;
    split_diagonal(l, d);
    Ok(())
}

/// [`ldl`] in packed form: `L` below the diagonal of `a`, `D` on it.
pub fn ldl_in_place<M: Matrix>(a: &mut M) -> Result<()> {
    let n = check_square(a, "ldl_in_place: input")?;
    log::debug!("ldl_in_place: factorizing {n}x{n} matrix");
    ldl::factorize(a)
}

/// LDL factorization that replaces unusable pivots so that every `D[i]` is at
/// least `config.epsilon()`.
///
/// The result factors a nearby positive-definite matrix, not `a` itself,
/// whenever a pivot had to be replaced. Output layout matches [`ldl`].
///
/// For scalar types that cannot hold `epsilon` exactly the floor is the
/// next representable value above it, so `D[i] >= epsilon` holds as an `f64`
/// comparison.
///
/// # Errors
/// Only `DimensionMismatch`.
pub fn force_ldl<A, L>(a: &A, l: &mut L, d: &mut [A::Elem], config: &ForcePdConfig) -> Result<()>
where
    A: Matrix,
    L: Matrix<Elem = A::Elem>,
{
    let n = check_square(a, "force_ldl: input")?;
    check_output(l, n, "force_ldl: output factor")?;
    check_diagonal(d, n, "force_ldl: output diagonal")?;
    log::debug!("force_ldl: factorizing {n}x{n} matrix ({config:?})");
    copy_lower(a, l);
    force::factorize(l, config);
    split_diagonal(l, d);
    Ok(())
}

/// [`force_ldl`] in packed form.
pub fn force_ldl_in_place<M: Matrix>(a: &mut M, config: &ForcePdConfig) -> Result<()> {
    let n = check_square(a, "force_ldl_in_place: input")?;
    log::debug!("force_ldl_in_place: factorizing {n}x{n} matrix ({config:?})");
    force::factorize(a, config);
    Ok(())
}

fn check_square<M: Matrix>(a: &M, context: &str) -> Result<usize> {
    if !a.is_square() {
        return Err(FactorError::DimensionMismatch {
            expected: a.nrows(),
            got: a.ncols(),
            context: format!("{context}: matrix must be square"),
        });
    }
    Ok(a.nrows())
}

fn check_output<M: Matrix>(out: &M, n: usize, context: &str) -> Result<()> {
    if out.nrows() != n {
        return Err(FactorError::DimensionMismatch {
            expected: n,
            got: out.nrows(),
            context: format!("{context}: rows"),
        });
    }
    if out.ncols() != n {
        return Err(FactorError::DimensionMismatch {
            expected: n,
            got: out.ncols(),
            context: format!("{context}: columns"),
        });
    }
    Ok(())
}

fn check_diagonal<S>(d: &[S], n: usize, context: &str) -> Result<()> {
    if d.len() != n {
        return Err(FactorError::DimensionMismatch {
            expected: n,
            got: d.len(),
            context: context.to_string(),
        });
    }
    Ok(())
}

/// Copy the lower triangle (diagonal included) of `a` into `l`.
fn copy_lower<A, L>(a: &A, l: &mut L)
where
    A: Matrix,
    L: Matrix<Elem = A::Elem>,
{
    for i in 0..a.nrows() {
        for j in 0..=i {
            l.set(i, j, a.const_at(i, j).clone());
        }
    }
}

/// Move the packed pivots out of `l` into `d`, leaving a unit diagonal behind.
fn split_diagonal<M: Matrix>(l: &mut M, d: &mut [M::Elem]) {
    for (i, di) in d.iter_mut().enumerate() {
        *di = std::mem::replace(l.at(i, i), M::Elem::one());
    }
}

/// `Σ_{k < len} m[i][k] * m[j][k]`, accumulated left to right.
fn row_dot<M: Matrix>(m: &M, i: usize, j: usize, len: usize) -> M::Elem {
    let mut sum = M::Elem::zero();
    for k in 0..len {
        sum = sum.add(&m.const_at(i, k).mul(m.const_at(j, k)));
    }
    sum
}

/// `Σ_{k < len} m[i][k] * D[k] * m[j][k]` where `D[k]` is the packed pivot `m[k][k]`.
fn row_dot_weighted<M: Matrix>(m: &M, i: usize, j: usize, len: usize) -> M::Elem {
    let mut sum = M::Elem::zero();
    for k in 0..len {
        let term = m.const_at(i, k).mul(m.const_at(k, k)).mul(m.const_at(j, k));
        sum = sum.add(&term);
    }
    sum
}

/// `Σ_{k < len} m[i][k]^2 * D[k]`.
fn row_square_weighted<M: Matrix>(m: &M, i: usize, len: usize) -> M::Elem {
    let mut sum = M::Elem::zero();
    for k in 0..len {
        sum = sum.add(&m.const_at(i, k).pow(2.0).mul(m.const_at(k, k)));
    }
    sum
}
