use super::Scalar;

impl Scalar for f64 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn value(&self) -> f64 {
        *self
    }

    #[inline]
    fn add(&self, rhs: &Self) -> Self {
        *self + *rhs
    }

    #[inline]
    fn sub(&self, rhs: &Self) -> Self {
        *self - *rhs
    }

    #[inline]
    fn mul(&self, rhs: &Self) -> Self {
        *self * *rhs
    }

    #[inline]
    fn div(&self, rhs: &Self) -> Self {
        *self / *rhs
    }

    #[inline]
    fn neg(&self) -> Self {
        -*self
    }

    #[inline]
    fn sqrt(&self) -> Self {
        f64::sqrt(*self)
    }

    #[inline]
    fn pow(&self, exponent: f64) -> Self {
        f64::powf(*self, exponent)
    }

    #[inline]
    fn ln(&self) -> Self {
        f64::ln(*self)
    }
}

impl Scalar for f32 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn from_f64_up(value: f64) -> Self {
        let rounded = value as f32;
        if rounded.is_nan() || f64::from(rounded) >= value {
            rounded
        } else {
            next_up(rounded)
        }
    }

    #[inline]
    fn value(&self) -> f64 {
        f64::from(*self)
    }

    #[inline]
    fn add(&self, rhs: &Self) -> Self {
        *self + *rhs
    }

    #[inline]
    fn sub(&self, rhs: &Self) -> Self {
        *self - *rhs
    }

    #[inline]
    fn mul(&self, rhs: &Self) -> Self {
        *self * *rhs
    }

    #[inline]
    fn div(&self, rhs: &Self) -> Self {
        *self / *rhs
    }

    #[inline]
    fn neg(&self) -> Self {
        -*self
    }

    #[inline]
    fn sqrt(&self) -> Self {
        f32::sqrt(*self)
    }

    #[inline]
    fn pow(&self, exponent: f64) -> Self {
        f32::powf(*self, exponent as f32)
    }

    #[inline]
    fn ln(&self) -> Self {
        f32::ln(*self)
    }
}

/// Next `f32` towards positive infinity; `x` is finite or `-inf`.
fn next_up(x: f32) -> f32 {
    if x == 0.0 {
        return f32::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f32::from_bits(bits + 1)
    } else {
        f32::from_bits(bits - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_f64_operations() {
        let a = 6.0_f64;
        let b = 2.0_f64;
        assert_eq!(Scalar::add(&a, &b), 8.0);
        assert_eq!(Scalar::sub(&a, &b), 4.0);
        assert_eq!(Scalar::mul(&a, &b), 12.0);
        assert_eq!(Scalar::div(&a, &b), 3.0);
        assert_eq!(Scalar::neg(&a), -6.0);
        assert_relative_eq!(Scalar::sqrt(&4.0_f64), 2.0);
        assert_relative_eq!(Scalar::pow(&b, 3.0), 8.0);
        assert_relative_eq!(Scalar::ln(&std::f64::consts::E), 1.0);
    }

    #[test]
    fn test_f32_value_widens() {
        let x = 0.5_f32;
        assert_eq!(x.value(), 0.5_f64);
        assert_eq!(<f32 as Scalar>::from_f64(0.25), 0.25_f32);
        assert!(<f32 as Scalar>::zero().is_zero());
    }

    #[test]
    fn test_f32_from_f64_up_never_rounds_down() {
        for value in [1e-9, 1e-10, 0.1, 1.0 / 3.0, 1e-40, 1e-50, 3e38] {
            let up = <f32 as Scalar>::from_f64_up(value);
            assert!(up.value() >= value, "{value:e} -> {up:e}");
            assert!(up > 0.0);
        }
        // Exactly representable values are returned unchanged.
        assert_eq!(<f32 as Scalar>::from_f64_up(0.25), 0.25_f32);
        assert_eq!(<f32 as Scalar>::from_f64_up(1e-50), f32::from_bits(1));
        assert_eq!(<f32 as Scalar>::from_f64_up(1e39), f32::INFINITY);
    }

    #[test]
    fn test_f64_from_f64_up_is_exact() {
        assert_eq!(<f64 as Scalar>::from_f64_up(1e-9), 1e-9);
    }
}
