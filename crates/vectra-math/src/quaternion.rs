use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use bytemuck::{Pod, Zeroable};

use crate::angle::Rad;
use crate::matrix::Matrix3x3;
use crate::scalar::{lit, FloatScalar};
use crate::vector::Vector3;

/// Rotation quaternion: a vector part and a scalar part, stored in that
/// order.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion<T> {
    vector: Vector3<T>,
    scalar: T,
}

// SAFETY: `repr(C)` over four values of the same `Pod` type, no padding.
unsafe impl<T: FloatScalar> Zeroable for Quaternion<T> {}
unsafe impl<T: FloatScalar> Pod for Quaternion<T> {}

/// Identity rotation.
impl<T: FloatScalar> Default for Quaternion<T> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: FloatScalar> Quaternion<T> {
    pub const fn new(vector: Vector3<T>, scalar: T) -> Self {
        Quaternion { vector, scalar }
    }

    /// Pure quaternion with a zero scalar part.
    pub fn from_vector(vector: Vector3<T>) -> Self {
        Quaternion { vector, scalar: T::zero() }
    }

    pub fn identity() -> Self {
        Quaternion { vector: Vector3::zero(), scalar: T::one() }
    }

    pub fn zero() -> Self {
        Quaternion { vector: Vector3::zero(), scalar: T::zero() }
    }

    /// Rotation by `angle` around `normalized_axis`. The axis is not
    /// normalized here.
    pub fn rotation(angle: Rad<T>, normalized_axis: Vector3<T>) -> Self {
        let half = angle.0 / lit(2.0);
        Quaternion {
            vector: normalized_axis * half.sin(),
            scalar: half.cos(),
        }
    }

    /// Quaternion of a pure rotation matrix.
    pub fn from_matrix(m: &Matrix3x3<T>) -> Self {
        let at = |col: usize, row: usize| m.columns()[col][row];
        let trace = at(0, 0) + at(1, 1) + at(2, 2);
        let half = lit::<T>(0.5);

        if trace > T::zero() {
            let s = (trace + T::one()).sqrt();
            let t = half / s;
            return Quaternion {
                vector: Vector3::new(
                    at(1, 2) - at(2, 1),
                    at(2, 0) - at(0, 2),
                    at(0, 1) - at(1, 0),
                ) * t,
                scalar: s * half,
            };
        }

        // Largest diagonal element leads.
        let mut i = 0;
        if at(1, 1) > at(0, 0) {
            i = 1;
        }
        if at(2, 2) > at(i, i) {
            i = 2;
        }
        let j = (i + 1) % 3;
        let k = (j + 1) % 3;

        let mut s = (at(i, i) - at(j, j) - at(k, k) + T::one()).sqrt();
        let mut vector = Vector3::zero();
        vector[i] = s * half;
        if s != T::zero() {
            s = half / s;
        }
        vector[j] = (at(i, j) + at(j, i)) * s;
        vector[k] = (at(i, k) + at(k, i)) * s;
        Quaternion { vector, scalar: (at(j, k) - at(k, j)) * s }
    }

    pub fn vector(&self) -> Vector3<T> {
        self.vector
    }

    pub fn scalar(&self) -> T {
        self.scalar
    }

    pub fn vector_mut(&mut self) -> &mut Vector3<T> {
        &mut self.vector
    }

    pub fn scalar_mut(&mut self) -> &mut T {
        &mut self.scalar
    }

    pub fn dot(&self) -> T {
        dot(self, self)
    }

    pub fn length(&self) -> T {
        self.dot().sqrt()
    }

    pub fn normalized(&self) -> Self {
        *self / self.length()
    }

    pub fn is_normalized(&self) -> bool {
        self.dot().fuzzy_eq(T::one())
    }

    pub fn conjugated(&self) -> Self {
        Quaternion { vector: -self.vector, scalar: self.scalar }
    }

    pub fn inverted(&self) -> Self {
        self.conjugated() / self.dot()
    }

    /// Inverse of a unit quaternion, which is its conjugate.
    pub fn inverted_normalized(&self) -> Self {
        self.conjugated()
    }

    /// Rotation angle of a unit quaternion.
    pub fn angle(&self) -> Rad<T> {
        Rad(lit::<T>(2.0) * self.scalar.acos())
    }

    /// Rotation axis of a unit quaternion. Undefined (NaN) for the identity.
    pub fn axis(&self) -> Vector3<T> {
        self.vector / (T::one() - self.scalar * self.scalar).sqrt()
    }

    /// Rotation matrix, column-major.
    pub fn to_matrix(&self) -> Matrix3x3<T> {
        let [x, y, z] = self.vector.to_array();
        let w = self.scalar;
        let one = T::one();
        let two = lit::<T>(2.0);
        Matrix3x3::from_columns([
            Vector3::new(
                one - two * y * y - two * z * z,
                two * x * y + two * z * w,
                two * x * z - two * y * w,
            ),
            Vector3::new(
                two * x * y - two * z * w,
                one - two * x * x - two * z * z,
                two * y * z + two * x * w,
            ),
            Vector3::new(
                two * x * z + two * y * w,
                two * y * z - two * x * w,
                one - two * x * x - two * y * y,
            ),
        ])
    }

    /// Rotates `vector` with this (not necessarily unit) quaternion.
    pub fn transform_vector(&self, vector: Vector3<T>) -> Vector3<T> {
        (*self * Quaternion::from_vector(vector) * self.inverted()).vector
    }

    /// Rotates `vector` with this unit quaternion.
    pub fn transform_vector_normalized(&self, vector: Vector3<T>) -> Vector3<T> {
        let t = self.vector.cross(&vector) * lit::<T>(2.0);
        vector + t * self.scalar + self.vector.cross(&t)
    }
}

impl Quaternion<f32> {
    pub fn to_f64(self) -> Quaternion<f64> {
        Quaternion { vector: self.vector.cast(), scalar: self.scalar as f64 }
    }
}

impl Quaternion<f64> {
    pub fn to_f32(self) -> Quaternion<f32> {
        Quaternion { vector: self.vector.cast(), scalar: self.scalar as f32 }
    }
}

// =============================================================================
// Free functions
// =============================================================================

pub fn dot<T: FloatScalar>(a: &Quaternion<T>, b: &Quaternion<T>) -> T {
    a.vector.dot(&b.vector) + a.scalar * b.scalar
}

/// Angle between two unit quaternions.
pub fn angle<T: FloatScalar>(
    normalized_a: &Quaternion<T>,
    normalized_b: &Quaternion<T>,
) -> Rad<T> {
    Rad(dot(normalized_a, normalized_b).acos())
}

/// Normalized linear interpolation.
pub fn lerp<T: FloatScalar>(
    normalized_a: &Quaternion<T>,
    normalized_b: &Quaternion<T>,
    t: T,
) -> Quaternion<T> {
    (*normalized_a * (T::one() - t) + *normalized_b * t).normalized()
}

/// [`lerp`] along the shorter of the two arcs.
pub fn lerp_shortest_path<T: FloatScalar>(
    normalized_a: &Quaternion<T>,
    normalized_b: &Quaternion<T>,
    t: T,
) -> Quaternion<T> {
    if dot(normalized_a, normalized_b) < T::zero() {
        lerp(&-*normalized_a, normalized_b, t)
    } else {
        lerp(normalized_a, normalized_b, t)
    }
}

fn slerp_from_cos<T: FloatScalar>(
    a: &Quaternion<T>,
    b: &Quaternion<T>,
    cos_half_angle: T,
    t: T,
) -> Quaternion<T> {
    // Nearly parallel: the sine below would vanish, so blend without
    // renormalizing.
    if cos_half_angle.abs() >= T::one() - T::epsilon() {
        return *a * (T::one() - t) + *b * t;
    }
    let half_angle = cos_half_angle.acos();
    (*a * ((T::one() - t) * half_angle).sin() + *b * (t * half_angle).sin()) / half_angle.sin()
}

/// Spherical linear interpolation.
pub fn slerp<T: FloatScalar>(
    normalized_a: &Quaternion<T>,
    normalized_b: &Quaternion<T>,
    t: T,
) -> Quaternion<T> {
    slerp_from_cos(normalized_a, normalized_b, dot(normalized_a, normalized_b), t)
}

/// [`slerp`] along the shorter of the two arcs.
pub fn slerp_shortest_path<T: FloatScalar>(
    normalized_a: &Quaternion<T>,
    normalized_b: &Quaternion<T>,
    t: T,
) -> Quaternion<T> {
    let cos_half_angle = dot(normalized_a, normalized_b);
    if cos_half_angle < T::zero() {
        slerp_from_cos(&-*normalized_a, normalized_b, -cos_half_angle, t)
    } else {
        slerp_from_cos(normalized_a, normalized_b, cos_half_angle, t)
    }
}

// =============================================================================
// Operators
// =============================================================================

impl<T: FloatScalar> Neg for Quaternion<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Quaternion { vector: -self.vector, scalar: -self.scalar }
    }
}

impl<T: FloatScalar> Add for Quaternion<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Quaternion { vector: self.vector + rhs.vector, scalar: self.scalar + rhs.scalar }
    }
}

impl<T: FloatScalar> Sub for Quaternion<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Quaternion { vector: self.vector - rhs.vector, scalar: self.scalar - rhs.scalar }
    }
}

/// Hamilton product.
impl<T: FloatScalar> Mul for Quaternion<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Quaternion {
            vector: rhs.vector * self.scalar
                + self.vector * rhs.scalar
                + self.vector.cross(&rhs.vector),
            scalar: self.scalar * rhs.scalar - self.vector.dot(&rhs.vector),
        }
    }
}

impl<T: FloatScalar> Mul<T> for Quaternion<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        Quaternion { vector: self.vector * rhs, scalar: self.scalar * rhs }
    }
}

impl<T: FloatScalar> Div<T> for Quaternion<T> {
    type Output = Self;

    fn div(self, rhs: T) -> Self {
        Quaternion { vector: self.vector / rhs, scalar: self.scalar / rhs }
    }
}

impl<T: FloatScalar> AddAssign for Quaternion<T> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: FloatScalar> SubAssign for Quaternion<T> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: FloatScalar> MulAssign<T> for Quaternion<T> {
    fn mul_assign(&mut self, rhs: T) {
        *self = *self * rhs;
    }
}

impl<T: FloatScalar> DivAssign<T> for Quaternion<T> {
    fn div_assign(&mut self, rhs: T) {
        *self = *self / rhs;
    }
}

macro_rules! impl_quaternion_scalar_lhs {
    ($($ty:ty),+) => {$(
        impl Mul<Quaternion<$ty>> for $ty {
            type Output = Quaternion<$ty>;

            fn mul(self, rhs: Quaternion<$ty>) -> Quaternion<$ty> {
                rhs * self
            }
        }

        /// Divides `self` by every component.
        impl Div<Quaternion<$ty>> for $ty {
            type Output = Quaternion<$ty>;

            fn div(self, rhs: Quaternion<$ty>) -> Quaternion<$ty> {
                Quaternion { vector: self / rhs.vector, scalar: self / rhs.scalar }
            }
        }
    )+};
}

impl_quaternion_scalar_lhs!(f32, f64);

impl<T: FloatScalar> From<(Vector3<T>, T)> for Quaternion<T> {
    fn from((vector, scalar): (Vector3<T>, T)) -> Self {
        Quaternion { vector, scalar }
    }
}

impl<T: FloatScalar> fmt::Display for Quaternion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.vector.to_array();
        write!(f, "Quaternion({{{x}, {y}, {z}}}, {})", self.scalar)
    }
}
