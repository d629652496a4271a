//! The scalar capability consumed by the factorization engine.
//!
//! Every arithmetic operation returns a fresh value and leaves its operands
//! untouched. Bare floats implement the operations directly; [`Tracked`]
//! additionally pushes first-order derivatives through each operation with the
//! chain rule.

mod bare;
mod params;
mod tracked;

pub use params::ParameterSet;
pub use tracked::Tracked;

use std::fmt::Debug;

/// Numeric value the factorization engine computes with.
///
/// The bounds mirror what the storage backends need: `Clone + PartialEq + Debug +
/// 'static` for `nalgebra` element storage and `Send + Sync` so independent
/// factorizations can run on separate threads.
pub trait Scalar: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// Additive identity.
    fn zero() -> Self;

    /// Multiplicative identity.
    fn one() -> Self;

    /// A constant; tracked scalars built this way carry a zero gradient.
    fn from_f64(value: f64) -> Self;

    /// The smallest representable constant whose [`value`](Scalar::value) is
    /// at least `value`, saturating at infinity.
    ///
    /// Types whose `from_f64` rounds must override this.
    fn from_f64_up(value: f64) -> Self {
        Self::from_f64(value)
    }

    /// The numeric magnitude, used for every comparison the engine makes.
    fn value(&self) -> f64;

    fn add(&self, rhs: &Self) -> Self;

    fn sub(&self, rhs: &Self) -> Self;

    fn mul(&self, rhs: &Self) -> Self;

    fn div(&self, rhs: &Self) -> Self;

    fn neg(&self) -> Self;

    fn sqrt(&self) -> Self;

    /// `self` raised to a constant real power.
    fn pow(&self, exponent: f64) -> Self;

    /// Natural logarithm.
    fn ln(&self) -> Self;

    fn is_zero(&self) -> bool {
        self.value() == 0.0
    }
}
