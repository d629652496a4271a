//! Factorize many independent matrices at once.
//!
//! Each matrix is factorized in place by the sequential kernel, so results are
//! bit-for-bit identical to calling the single-matrix entry points. Batches at
//! or above [`PARALLEL_THRESHOLD`] are spread over the rayon thread pool.

use rayon::prelude::*;

use crate::cholesky::{cholesky_in_place, force_ldl_in_place, ldl_in_place, ForcePdConfig};
use crate::error::Result;
use crate::matrix::Matrix;

/// Minimum batch size before work is distributed across threads.
pub const PARALLEL_THRESHOLD: usize = 8;

fn run_batch<M, F>(matrices: &mut [M], factorize: F) -> Vec<Result<()>>
where
    M: Matrix + Send,
    F: Fn(&mut M) -> Result<()> + Sync,
{
    if matrices.len() >= PARALLEL_THRESHOLD {
        log::debug!("batch: factorizing {} matrices in parallel", matrices.len());
        matrices.par_iter_mut().map(|m| factorize(m)).collect()
    } else {
        matrices.iter_mut().map(|m| factorize(m)).collect()
    }
}

/// [`cholesky_in_place`] on every matrix; one result per matrix.
pub fn cholesky_batch<M: Matrix + Send>(matrices: &mut [M]) -> Vec<Result<()>> {
    run_batch(matrices, cholesky_in_place)
}

/// [`ldl_in_place`] on every matrix; one result per matrix.
pub fn ldl_batch<M: Matrix + Send>(matrices: &mut [M]) -> Vec<Result<()>> {
    run_batch(matrices, ldl_in_place)
}

/// [`force_ldl_in_place`] on every matrix with a shared configuration.
pub fn force_ldl_batch<M: Matrix + Send>(matrices: &mut [M], config: &ForcePdConfig) -> Vec<Result<()>> {
    run_batch(matrices, |m| force_ldl_in_place(m, config))
}
