use serde::{Deserialize, Serialize};

use super::ldl::eliminate_row;
use super::{row_dot_weighted, row_square_weighted};
use crate::error::{FactorError, Result};
use crate::matrix::Matrix;
use crate::scalar::Scalar;

/// Smallest pivot a forced factorization will emit unless configured otherwise.
pub const DEFAULT_EPSILON: f64 = 1e-10;

/// How a forced LDL factorization repairs unusable pivots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PivotStrategy {
    /// Replace any pivot `<= epsilon` with `epsilon`.
    #[default]
    Clamp,
    /// Gill-Murray-Wright modified Cholesky: bound each pivot from below by
    /// `epsilon` and by the size of the column below it, which also keeps the
    /// entries of `L` bounded.
    GillMurray,
}

/// Settings for [`force_ldl`](super::force_ldl).
///
/// `epsilon` is always finite and strictly positive; both the constructor and
/// deserialization enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawForcePdConfig")]
pub struct ForcePdConfig {
    epsilon: f64,
    strategy: PivotStrategy,
}

#[derive(Deserialize)]
struct RawForcePdConfig {
    #[serde(default = "default_epsilon")]
    epsilon: f64,
    #[serde(default)]
    strategy: PivotStrategy,
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

impl TryFrom<RawForcePdConfig> for ForcePdConfig {
    type Error = FactorError;

    fn try_from(raw: RawForcePdConfig) -> Result<Self> {
        Ok(Self::new(raw.epsilon)?.with_strategy(raw.strategy))
    }
}

impl Default for ForcePdConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            strategy: PivotStrategy::Clamp,
        }
    }
}

impl ForcePdConfig {
    pub fn new(epsilon: f64) -> Result<Self> {
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(FactorError::InvalidParameter(format!(
                "epsilon must be finite and positive, got {epsilon}"
            )));
        }
        Ok(Self {
            epsilon,
            strategy: PivotStrategy::Clamp,
        })
    }

    pub fn with_strategy(mut self, strategy: PivotStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn strategy(&self) -> PivotStrategy {
        self.strategy
    }
}

/// Forced LDL in packed form. Every stored pivot is at least `epsilon`,
/// measured after conversion to the scalar type: when `epsilon` is not
/// representable the next larger value is used instead.
pub(super) fn factorize<M: Matrix>(m: &mut M, config: &ForcePdConfig) {
    let n = m.dim();
    let replaced = match config.strategy {
        PivotStrategy::Clamp => clamp(m, &M::Elem::from_f64_up(config.epsilon)),
        PivotStrategy::GillMurray => gill_murray(m, config.epsilon),
    };
    if replaced > 0 {
        log::warn!(
            "force_ldl: modified {replaced} of {n} pivots ({:?}, epsilon = {:e}); \
             the factor belongs to a nearby matrix",
            config.strategy,
            config.epsilon
        );
    }
}

/// `floor` is strictly positive, so later rows never divide by zero.
fn clamp<M: Matrix>(m: &mut M, floor: &M::Elem) -> usize {
    let mut replaced = 0;
    for i in 0..m.dim() {
        let d = eliminate_row(m, i);
        // NaN pivots fail the comparison and are replaced too.
        let d = if d.value() > floor.value() {
            d
        } else {
            log::trace!("force_ldl: pivot {i} = {:e} replaced", d.value());
            replaced += 1;
            floor.clone()
        };
        m.set(i, i, d);
    }
    replaced
}

fn gill_murray<M: Matrix>(m: &mut M, epsilon: f64) -> usize {
    let n = m.dim();
    if n == 0 {
        return 0;
    }

    // gamma: largest diagonal magnitude, xi: largest off-diagonal magnitude.
    // Symmetry means the lower triangle sees every off-diagonal value.
    let mut gamma = 0.0_f64;
    let mut xi = 0.0_f64;
    for i in 0..n {
        for j in 0..=i {
            let r = m.const_at(i, j).value().abs();
            if i == j {
                gamma = gamma.max(r);
            } else {
                xi = xi.max(r);
            }
        }
    }
    let nu = ((n * n - 1) as f64).sqrt().max(1.0);
    let beta = gamma.max(xi / nu).max(1e-20).sqrt();

    let mut modified = 0;
    for j in 0..n {
        let sum = row_square_weighted(m, j, j);
        let c_jj = m.const_at(j, j).sub(&sum);

        // Column j below the diagonal temporarily holds c_ij.
        let mut theta = 0.0_f64;
        for i in (j + 1)..n {
            let sum = row_dot_weighted(m, i, j, j);
            let c_ij = m.const_at(i, j).sub(&sum);
            theta = theta.max(c_ij.value().abs());
            m.set(i, j, c_ij);
        }

        let bound = if j + 1 < n {
            (theta / beta).powi(2).max(epsilon)
        } else {
            epsilon
        };
        let magnitude = c_jj.value().abs();
        let d_j = if magnitude >= bound {
            if c_jj.value() < 0.0 {
                modified += 1;
                c_jj.neg()
            } else {
                c_jj
            }
        } else {
            log::trace!("force_ldl: pivot {j} = {:e} raised to {bound:e}", c_jj.value());
            modified += 1;
            M::Elem::from_f64_up(bound)
        };

        for i in (j + 1)..n {
            let lij = m.const_at(i, j).div(&d_j);
            m.set(i, j, lij);
        }
        m.set(j, j, d_j);
    }
    modified
}
