//! Numeric bounds shared by every value family.

use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

use num_traits::{AsPrimitive, Bounded, Float, FloatConst, Num, NumCast};
use vectra_core::Element;

/// Component arithmetic. Integer kinds wrap on overflow in every build
/// profile; float kinds follow IEEE semantics.
pub trait WrappingArith: Copy {
    fn add_wrapped(self, rhs: Self) -> Self;
    fn sub_wrapped(self, rhs: Self) -> Self;
    fn mul_wrapped(self, rhs: Self) -> Self;
    /// Integer division by zero still panics.
    fn div_wrapped(self, rhs: Self) -> Self;
    fn neg_wrapped(self) -> Self;
}

macro_rules! impl_wrapping_int {
    ($($t:ty),+) => {$(
        impl WrappingArith for $t {
            #[inline]
            fn add_wrapped(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            #[inline]
            fn sub_wrapped(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }

            #[inline]
            fn mul_wrapped(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }

            #[inline]
            fn div_wrapped(self, rhs: Self) -> Self {
                self.wrapping_div(rhs)
            }

            #[inline]
            fn neg_wrapped(self) -> Self {
                self.wrapping_neg()
            }
        }
    )+};
}

macro_rules! impl_wrapping_float {
    ($($t:ty),+) => {$(
        impl WrappingArith for $t {
            #[inline]
            fn add_wrapped(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline]
            fn sub_wrapped(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline]
            fn mul_wrapped(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline]
            fn div_wrapped(self, rhs: Self) -> Self {
                self / rhs
            }

            #[inline]
            fn neg_wrapped(self) -> Self {
                -self
            }
        }
    )+};
}

impl_wrapping_int!(i8, u8, i32, u32);
impl_wrapping_float!(f32, f64);

/// Any of the six component kinds.
pub trait Scalar:
    Element
    + WrappingArith
    + Num
    + NumCast
    + Bounded
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + AsPrimitive<f64>
{
}

impl<T> Scalar for T where
    T: Element
        + WrappingArith
        + Num
        + NumCast
        + Bounded
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
        + AsPrimitive<f64>
{
}

/// Kinds with a meaningful negation.
pub trait SignedScalar: Scalar + std::ops::Neg<Output = Self> {}

impl<T> SignedScalar for T where T: Scalar + std::ops::Neg<Output = T> {}

/// `f32` and `f64`.
pub trait FloatScalar: SignedScalar + Float + FloatConst {
    /// Tolerance for the `is_normalized` family of checks.
    fn fuzzy_epsilon() -> Self;

    #[inline]
    fn fuzzy_eq(self, other: Self) -> bool {
        (self - other).abs() < Self::fuzzy_epsilon()
    }
}

impl FloatScalar for f32 {
    fn fuzzy_epsilon() -> f32 {
        1.0e-5
    }
}

impl FloatScalar for f64 {
    fn fuzzy_epsilon() -> f64 {
        1.0e-14
    }
}

/// Literal conversion for generic code. Only used with small constants that
/// every float kind represents.
#[inline]
pub(crate) fn lit<T: FloatScalar>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::nan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_arith_wraps() {
        assert_eq!(200u8.add_wrapped(100), 44);
        assert_eq!(0u32.sub_wrapped(1), u32::MAX);
        assert_eq!(i32::MAX.mul_wrapped(2), -2);
        assert_eq!(i32::MIN.div_wrapped(-1), i32::MIN);
        assert_eq!(i8::MIN.neg_wrapped(), i8::MIN);
    }

    #[test]
    fn test_float_arith_is_plain() {
        assert_eq!(f32::MAX.add_wrapped(f32::MAX), f32::INFINITY);
        assert_eq!(1.0f64.div_wrapped(0.0), f64::INFINITY);
        assert_eq!(2.5f64.neg_wrapped(), -2.5);
    }
}
