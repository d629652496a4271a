use super::Scalar;

/// A real value together with its partial derivatives.
///
/// `gradient[k]` is the derivative with respect to parameter `k` (see
/// [`ParameterSet`](super::ParameterSet)). Slots past the end of the vector are
/// zero, so constants carry an empty gradient and values created before a new
/// parameter was registered stay valid.
#[derive(Debug, Clone, Default)]
pub struct Tracked {
    value: f64,
    gradient: Vec<f64>,
}

impl Tracked {
    pub fn new(value: f64, gradient: Vec<f64>) -> Self {
        Self { value, gradient }
    }

    /// A value with no dependence on any parameter.
    pub fn constant(value: f64) -> Self {
        Self {
            value,
            gradient: Vec::new(),
        }
    }

    /// A value seeded with unit derivative in slot `id`.
    pub fn variable(value: f64, id: usize) -> Self {
        let mut gradient = vec![0.0; id + 1];
        gradient[id] = 1.0;
        Self { value, gradient }
    }

    /// Partial derivative with respect to parameter `id`.
    pub fn derivative(&self, id: usize) -> f64 {
        self.gradient.get(id).copied().unwrap_or(0.0)
    }

    pub fn gradient(&self) -> &[f64] {
        &self.gradient
    }

    /// True when every partial derivative is zero.
    pub fn is_constant(&self) -> bool {
        self.gradient.iter().all(|&g| g == 0.0)
    }

    /// Value of `f(self)` given `f(x)` and `f'(x)` evaluated at `x = self.value`.
    fn chain(&self, value: f64, derivative: impl FnOnce() -> f64) -> Self {
        let gradient = if self.gradient.is_empty() {
            Vec::new()
        } else {
            let d = derivative();
            self.gradient.iter().map(|g| g * d).collect()
        };
        Self { value, gradient }
    }
}

/// `fa * a + fb * b`, treating the shorter slice as zero-padded.
fn linear_combination(a: &[f64], fa: f64, b: &[f64], fb: f64) -> Vec<f64> {
    let n = a.len().max(b.len());
    (0..n)
        .map(|k| {
            let ga = a.get(k).copied().unwrap_or(0.0);
            let gb = b.get(k).copied().unwrap_or(0.0);
            fa * ga + fb * gb
        })
        .collect()
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        if self.value != other.value {
            return false;
        }
        let n = self.gradient.len().max(other.gradient.len());
        (0..n).all(|k| self.derivative(k) == other.derivative(k))
    }
}

impl Scalar for Tracked {
    fn zero() -> Self {
        Self::constant(0.0)
    }

    fn one() -> Self {
        Self::constant(1.0)
    }

    fn from_f64(value: f64) -> Self {
        Self::constant(value)
    }

    fn value(&self) -> f64 {
        self.value
    }

    fn add(&self, rhs: &Self) -> Self {
        Self {
            value: self.value + rhs.value,
            gradient: linear_combination(&self.gradient, 1.0, &rhs.gradient, 1.0),
        }
    }

    fn sub(&self, rhs: &Self) -> Self {
        Self {
            value: self.value - rhs.value,
            gradient: linear_combination(&self.gradient, 1.0, &rhs.gradient, -1.0),
        }
    }

    fn mul(&self, rhs: &Self) -> Self {
        Self {
            value: self.value * rhs.value,
            gradient: linear_combination(&self.gradient, rhs.value, &rhs.gradient, self.value),
        }
    }

    fn div(&self, rhs: &Self) -> Self {
        // (a/b)' = a'/b - a b'/b^2
        let inv = 1.0 / rhs.value;
        Self {
            value: self.value * inv,
            gradient: linear_combination(
                &self.gradient,
                inv,
                &rhs.gradient,
                -self.value * inv * inv,
            ),
        }
    }

    fn neg(&self) -> Self {
        self.chain(-self.value, || -1.0)
    }

    fn sqrt(&self) -> Self {
        let r = self.value.sqrt();
        self.chain(r, || 0.5 / r)
    }

    fn pow(&self, exponent: f64) -> Self {
        let x = self.value;
        self.chain(x.powf(exponent), || exponent * x.powf(exponent - 1.0))
    }

    fn ln(&self) -> Self {
        let x = self.value;
        self.chain(x.ln(), || 1.0 / x)
    }
}

impl std::ops::Add for &Tracked {
    type Output = Tracked;

    fn add(self, rhs: &Tracked) -> Tracked {
        Scalar::add(self, rhs)
    }
}

impl std::ops::Sub for &Tracked {
    type Output = Tracked;

    fn sub(self, rhs: &Tracked) -> Tracked {
        Scalar::sub(self, rhs)
    }
}

impl std::ops::Mul for &Tracked {
    type Output = Tracked;

    fn mul(self, rhs: &Tracked) -> Tracked {
        Scalar::mul(self, rhs)
    }
}

impl std::ops::Div for &Tracked {
    type Output = Tracked;

    fn div(self, rhs: &Tracked) -> Tracked {
        Scalar::div(self, rhs)
    }
}

impl std::fmt::Display for Tracked {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:e}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_product_rule() {
        // f(x, y) = x * y at (3, 5): df/dx = 5, df/dy = 3
        let x = Tracked::variable(3.0, 0);
        let y = Tracked::variable(5.0, 1);
        let f = &x * &y;
        assert_relative_eq!(f.value(), 15.0);
        assert_relative_eq!(f.derivative(0), 5.0);
        assert_relative_eq!(f.derivative(1), 3.0);
    }

    #[test]
    fn test_quotient_rule() {
        // f(x, y) = x / y at (3, 2): df/dx = 1/2, df/dy = -3/4
        let x = Tracked::variable(3.0, 0);
        let y = Tracked::variable(2.0, 1);
        let f = &x / &y;
        assert_relative_eq!(f.value(), 1.5);
        assert_relative_eq!(f.derivative(0), 0.5);
        assert_relative_eq!(f.derivative(1), -0.75);
    }

    #[test]
    fn test_sqrt_and_pow() {
        let x = Tracked::variable(4.0, 0);
        let r = x.sqrt();
        assert_relative_eq!(r.value(), 2.0);
        assert_relative_eq!(r.derivative(0), 0.25);

        let p = x.pow(3.0);
        assert_relative_eq!(p.value(), 64.0);
        assert_relative_eq!(p.derivative(0), 48.0);
    }

    #[test]
    fn test_ln() {
        let x = Tracked::variable(2.0, 0);
        let l = x.ln();
        assert_relative_eq!(l.value(), 2.0_f64.ln());
        assert_relative_eq!(l.derivative(0), 0.5);
    }

    #[test]
    fn test_constants_stay_constant() {
        let a = Tracked::constant(2.0);
        let b = Tracked::constant(7.0);
        let c = Scalar::sub(&a.mul(&b), &b.sqrt());
        assert!(c.gradient().is_empty());
        assert!(c.is_constant());
    }

    #[test]
    fn test_operands_are_not_mutated() {
        let x = Tracked::variable(2.0, 0);
        let before = x.clone();
        let _ = Scalar::add(&x, &x);
        let _ = x.sqrt();
        assert_eq!(x, before);
    }

    #[test]
    fn test_equality_ignores_zero_padding() {
        let a = Tracked::new(1.0, vec![1.0]);
        let b = Tracked::new(1.0, vec![1.0, 0.0, 0.0]);
        assert_eq!(a, b);
        assert_ne!(a, Tracked::new(1.0, vec![1.0, 2.0]));
    }
}
