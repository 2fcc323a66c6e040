//! Scalar type bounds for block expressions.

use num_complex::Complex;
use num_traits::Num;

/// Complex conjugation on a scalar.
///
/// The default implementation returns `self` unchanged, so real-valued types
/// (and custom types without an imaginary part) can simply write:
/// ```ignore
/// impl Conjugate for MyType {}
/// ```
pub trait Conjugate: Copy {
    #[inline(always)]
    fn conj(self) -> Self {
        self
    }
}

macro_rules! impl_conjugate_real {
    ($($t:ty),*) => {
        $(impl Conjugate for $t {})*
    };
}

impl_conjugate_real!(f32, f64, i8, i16, i32, i64, i128, isize);

impl<T: Num + Copy + std::ops::Neg<Output = T>> Conjugate for Complex<T> {
    #[inline(always)]
    fn conj(self) -> Self {
        Complex::conj(&self)
    }
}

/// Trait bounds for the multiplier carried by a scaled block expression.
///
/// A scalar must form a ring with negation (scale factors are negated by
/// unary minus) and support conjugation (conjugating a scaled block
/// conjugates its factor).
pub trait Scalar:
    Copy
    + Send
    + Sync
    + std::fmt::Debug
    + PartialEq
    + std::ops::Mul<Output = Self>
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Neg<Output = Self>
    + num_traits::Zero
    + num_traits::One
    + Conjugate
    + 'static
{
}

impl<T> Scalar for T where
    T: Copy
        + Send
        + Sync
        + std::fmt::Debug
        + PartialEq
        + std::ops::Mul<Output = T>
        + std::ops::Add<Output = T>
        + std::ops::Sub<Output = T>
        + std::ops::Neg<Output = T>
        + num_traits::Zero
        + num_traits::One
        + Conjugate
        + 'static
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::{Complex32, Complex64};
    use num_traits::{One, Zero};

    fn assert_scalar<T: Scalar>() {}

    #[test]
    fn test_standard_types() {
        assert_scalar::<f32>();
        assert_scalar::<f64>();
        assert_scalar::<i32>();
        assert_scalar::<i64>();
        assert_scalar::<Complex32>();
        assert_scalar::<Complex64>();
    }

    #[test]
    fn test_conj_complex() {
        let x = Complex64::new(3.0, 4.0);
        assert_eq!(x.conj(), Complex64::new(3.0, -4.0));
        assert_eq!(Conjugate::conj(Conjugate::conj(x)), x);
    }

    #[test]
    fn test_conj_real_is_identity() {
        assert_eq!(Conjugate::conj(2.5f64), 2.5);
        assert_eq!(Conjugate::conj(-7i32), -7);
    }

    #[test]
    fn test_custom_type() {
        #[derive(Debug, Clone, Copy, PartialEq)]
        struct Fixed(i64);

        impl std::ops::Add for Fixed {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Fixed(self.0 + rhs.0)
            }
        }
        impl std::ops::Sub for Fixed {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Fixed(self.0 - rhs.0)
            }
        }
        impl std::ops::Mul for Fixed {
            type Output = Self;
            fn mul(self, rhs: Self) -> Self {
                Fixed(self.0 * rhs.0)
            }
        }
        impl std::ops::Neg for Fixed {
            type Output = Self;
            fn neg(self) -> Self {
                Fixed(-self.0)
            }
        }
        impl Zero for Fixed {
            fn zero() -> Self {
                Fixed(0)
            }
            fn is_zero(&self) -> bool {
                self.0 == 0
            }
        }
        impl One for Fixed {
            fn one() -> Self {
                Fixed(1)
            }
        }
        impl Conjugate for Fixed {}

        assert_scalar::<Fixed>();
        let a = Fixed(3);
        assert_eq!(a.conj(), a);
        assert_eq!((-a * Fixed::one()).0, -3);
        assert!(Fixed::zero().is_zero());
    }
}
