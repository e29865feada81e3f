//! Strongly typed angles.
//!
//! [`Deg`] and [`Rad`] wrap a float and only mix with each other through an
//! explicit conversion. Arithmetic keeps the unit; dividing two angles of the
//! same unit gives a plain ratio.

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::scalar::{lit, FloatScalar};

/// Angle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Deg<T>(pub T);

/// Angle in radians.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Rad<T>(pub T);

macro_rules! impl_angle {
    ($name:ident, $label:literal) => {
        impl<T: FloatScalar> $name<T> {
            pub const fn new(value: T) -> Self {
                $name(value)
            }

            pub fn zero() -> Self {
                $name(T::zero())
            }

            /// The unitless value.
            pub fn value(self) -> T {
                self.0
            }
        }

        impl<T: FloatScalar> Neg for $name<T> {
            type Output = Self;

            fn neg(self) -> Self {
                $name(-self.0)
            }
        }

        impl<T: FloatScalar> Add for $name<T> {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                $name(self.0 + rhs.0)
            }
        }

        impl<T: FloatScalar> Sub for $name<T> {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                $name(self.0 - rhs.0)
            }
        }

        impl<T: FloatScalar> Mul<T> for $name<T> {
            type Output = Self;

            fn mul(self, rhs: T) -> Self {
                $name(self.0 * rhs)
            }
        }

        impl<T: FloatScalar> Div<T> for $name<T> {
            type Output = Self;

            fn div(self, rhs: T) -> Self {
                $name(self.0 / rhs)
            }
        }

        /// Ratio of two angles.
        impl<T: FloatScalar> Div for $name<T> {
            type Output = T;

            fn div(self, rhs: Self) -> T {
                self.0 / rhs.0
            }
        }

        impl<T: FloatScalar> AddAssign for $name<T> {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl<T: FloatScalar> SubAssign for $name<T> {
            fn sub_assign(&mut self, rhs: Self) {
                self.0 -= rhs.0;
            }
        }

        impl<T: FloatScalar> MulAssign<T> for $name<T> {
            fn mul_assign(&mut self, rhs: T) {
                self.0 *= rhs;
            }
        }

        impl<T: FloatScalar> DivAssign<T> for $name<T> {
            fn div_assign(&mut self, rhs: T) {
                self.0 /= rhs;
            }
        }

        impl Mul<$name<f32>> for f32 {
            type Output = $name<f32>;

            fn mul(self, rhs: $name<f32>) -> $name<f32> {
                $name(self * rhs.0)
            }
        }

        impl Mul<$name<f64>> for f64 {
            type Output = $name<f64>;

            fn mul(self, rhs: $name<f64>) -> $name<f64> {
                $name(self * rhs.0)
            }
        }

        impl<T: fmt::Display> fmt::Display for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }
    };
}

impl_angle!(Deg, "Deg");
impl_angle!(Rad, "Rad");

impl<T: FloatScalar> From<Rad<T>> for Deg<T> {
    fn from(rad: Rad<T>) -> Self {
        Deg(rad.0 * lit::<T>(180.0) / T::PI())
    }
}

impl<T: FloatScalar> From<Deg<T>> for Rad<T> {
    fn from(deg: Deg<T>) -> Self {
        Rad(deg.0 * T::PI() / lit::<T>(180.0))
    }
}

impl Deg<f32> {
    /// Widens to double precision.
    pub fn to_f64(self) -> Deg<f64> {
        Deg(self.0 as f64)
    }
}

impl Rad<f32> {
    pub fn to_f64(self) -> Rad<f64> {
        Rad(self.0 as f64)
    }
}

impl Deg<f64> {
    pub fn to_f32(self) -> Deg<f32> {
        Deg(self.0 as f32)
    }
}

impl Rad<f64> {
    pub fn to_f32(self) -> Rad<f32> {
        Rad(self.0 as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_conversion() {
        let rad: Rad<f64> = Deg(180.0).into();
        assert_relative_eq!(rad.0, std::f64::consts::PI);
        let deg: Deg<f32> = Rad(std::f32::consts::FRAC_PI_2).into();
        assert_relative_eq!(deg.0, 90.0f32, epsilon = 1e-5);
    }

    #[test]
    fn test_repeated_cycles_recover_value() {
        let mut deg = Deg(180.0f64);
        for _ in 0..100 {
            deg = Deg::from(Rad::from(deg));
        }
        assert_relative_eq!(deg.0, 180.0, epsilon = 1e-10);
    }

    #[test]
    fn test_arithmetic_keeps_unit() {
        let a = Deg(30.0f64);
        let b = Deg(60.0);
        assert_eq!(a + b, Deg(90.0));
        assert_eq!(b - a, Deg(30.0));
        assert_eq!(-a, Deg(-30.0));
        assert_eq!(a * 2.0, Deg(60.0));
        assert_eq!(2.0 * a, Deg(60.0));
        assert_eq!(b / 2.0, Deg(30.0));
        assert_eq!(b / a, 2.0);

        let mut c = a;
        c += b;
        c -= Deg(10.0);
        c *= 2.0;
        c /= 4.0;
        assert_eq!(c, Deg(40.0));
    }

    #[test]
    fn test_ordering() {
        assert!(Rad(1.0f32) < Rad(2.0));
        assert!(Deg(-1.0f64) <= Deg(-1.0));
        assert!(Deg(3.0f64) > Deg::zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(Deg(180.0f64).to_string(), "Deg(180)");
        assert_eq!(Rad(1.5f32).to_string(), "Rad(1.5)");
    }
}
