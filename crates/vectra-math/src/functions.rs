//! Constants and free functions.
//!
//! Constants are `f64` only; the host does not tell single from double
//! precision apart. Trigonometry takes anything convertible to [`Rad`], so
//! degrees work as well.

use crate::angle::Rad;
use crate::quaternion::{self, Quaternion};
use crate::scalar::FloatScalar;
use crate::vector::{self, Vector};

pub const PI: f64 = std::f64::consts::PI;
pub const PI_HALF: f64 = std::f64::consts::FRAC_PI_2;
pub const PI_QUARTER: f64 = std::f64::consts::FRAC_PI_4;
pub const TAU: f64 = std::f64::consts::TAU;
pub const E: f64 = std::f64::consts::E;
pub const SQRT2: f64 = std::f64::consts::SQRT_2;
pub const SQRT3: f64 = 1.732_050_807_568_877_2;
pub const SQRT_HALF: f64 = std::f64::consts::FRAC_1_SQRT_2;
pub const NAN: f64 = f64::NAN;
pub const INF: f64 = f64::INFINITY;

pub fn sin<T: FloatScalar>(angle: impl Into<Rad<T>>) -> T {
    angle.into().0.sin()
}

pub fn cos<T: FloatScalar>(angle: impl Into<Rad<T>>) -> T {
    angle.into().0.cos()
}

/// Sine and cosine at once.
pub fn sincos<T: FloatScalar>(angle: impl Into<Rad<T>>) -> (T, T) {
    angle.into().0.sin_cos()
}

pub fn tan<T: FloatScalar>(angle: impl Into<Rad<T>>) -> T {
    angle.into().0.tan()
}

pub fn asin<T: FloatScalar>(value: T) -> Rad<T> {
    Rad(value.asin())
}

pub fn acos<T: FloatScalar>(value: T) -> Rad<T> {
    Rad(value.acos())
}

pub fn atan<T: FloatScalar>(value: T) -> Rad<T> {
    Rad(value.atan())
}

/// Values with an inner product and an angle between normalized instances.
pub trait InnerProduct {
    type Scalar: FloatScalar;

    fn inner(&self, other: &Self) -> Self::Scalar;

    /// Angle between `self` and `other`, both normalized.
    fn angle_to(&self, other: &Self) -> Rad<Self::Scalar>;
}

impl<T: FloatScalar, const N: usize> InnerProduct for Vector<T, N> {
    type Scalar = T;

    fn inner(&self, other: &Self) -> T {
        self.dot(other)
    }

    fn angle_to(&self, other: &Self) -> Rad<T> {
        Rad(vector::angle_between(self, other))
    }
}

impl<T: FloatScalar> InnerProduct for Quaternion<T> {
    type Scalar = T;

    fn inner(&self, other: &Self) -> T {
        quaternion::dot(self, other)
    }

    fn angle_to(&self, other: &Self) -> Rad<T> {
        quaternion::angle(self, other)
    }
}

/// Dot product of two vectors or two quaternions.
pub fn dot<V: InnerProduct>(a: &V, b: &V) -> V::Scalar {
    a.inner(b)
}

/// Angle between two normalized vectors or two normalized quaternions.
pub fn angle<V: InnerProduct>(normalized_a: &V, normalized_b: &V) -> Rad<V::Scalar> {
    normalized_a.angle_to(normalized_b)
}
