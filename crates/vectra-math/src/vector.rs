use std::fmt;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use bytemuck::{Pod, Zeroable};
use num_traits::AsPrimitive;
use vectra_core::{BufferLayout, ShapeDescriptor};

use crate::bool_vector::BoolVector;
use crate::scalar::{FloatScalar, Scalar, SignedScalar, WrappingArith};

/// `N` components of kind `T`, stored contiguously with no padding.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Vector<T, const N: usize>(pub(crate) [T; N]);

pub type Vector2<T> = Vector<T, 2>;
pub type Vector3<T> = Vector<T, 3>;
pub type Vector4<T> = Vector<T, 4>;

// SAFETY: transparent over `[T; N]`, which is `Pod` for any `Pod` element.
unsafe impl<T: Scalar, const N: usize> Zeroable for Vector<T, N> {}
unsafe impl<T: Scalar, const N: usize> Pod for Vector<T, N> {}

impl<T: Scalar, const N: usize> BufferLayout for Vector<T, N> {
    type Element = T;
    const SHAPE: ShapeDescriptor = ShapeDescriptor::Vector { components: N };
}

impl<T: Scalar, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Scalar, const N: usize> Vector<T, N> {
    pub const SIZE: usize = N;

    pub const fn from_array(components: [T; N]) -> Self {
        Vector(components)
    }

    pub fn zero() -> Self {
        Vector([T::zero(); N])
    }

    /// One value for all components.
    pub fn splat(value: T) -> Self {
        Vector([value; N])
    }

    pub fn to_array(self) -> [T; N] {
        self.0
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.0
    }

    /// Converts every component to another kind with an `as` cast.
    pub fn cast<U>(self) -> Vector<U, N>
    where
        U: Scalar,
        T: AsPrimitive<U>,
    {
        Vector(self.0.map(|c| c.as_()))
    }

    fn zip_with<U>(self, rhs: Self, f: impl Fn(T, T) -> U) -> [U; N] {
        std::array::from_fn(|i| f(self.0[i], rhs.0[i]))
    }

    fn compare(&self, rhs: &Self, f: impl Fn(&T, &T) -> bool) -> BoolVector<N> {
        BoolVector::from_array(std::array::from_fn(|i| f(&self.0[i], &rhs.0[i])))
    }

    // =========================================================================
    // Component-wise comparison
    // =========================================================================

    pub fn lt(&self, rhs: &Self) -> BoolVector<N> {
        self.compare(rhs, |a, b| a < b)
    }

    pub fn le(&self, rhs: &Self) -> BoolVector<N> {
        self.compare(rhs, |a, b| a <= b)
    }

    pub fn gt(&self, rhs: &Self) -> BoolVector<N> {
        self.compare(rhs, |a, b| a > b)
    }

    pub fn ge(&self, rhs: &Self) -> BoolVector<N> {
        self.compare(rhs, |a, b| a >= b)
    }

    // =========================================================================
    // Reductions
    // =========================================================================

    pub fn dot(&self, rhs: &Self) -> T {
        self.0
            .iter()
            .zip(&rhs.0)
            .fold(T::zero(), |acc, (&a, &b)| acc.add_wrapped(a.mul_wrapped(b)))
    }

    pub fn sum(&self) -> T {
        self.0.iter().fold(T::zero(), |acc, &c| acc.add_wrapped(c))
    }

    pub fn product(&self) -> T {
        self.0.iter().fold(T::one(), |acc, &c| acc.mul_wrapped(c))
    }

    pub fn min(&self) -> T {
        self.0[1..]
            .iter()
            .fold(self.0[0], |m, &c| if c < m { c } else { m })
    }

    pub fn max(&self) -> T {
        self.0[1..]
            .iter()
            .fold(self.0[0], |m, &c| if c > m { c } else { m })
    }

    pub fn minmax(&self) -> (T, T) {
        (self.min(), self.max())
    }

    /// Components in reverse order.
    pub fn flipped(&self) -> Self {
        let mut out = *self;
        out.0.reverse();
        out
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|c| *c == T::zero())
    }

    /// Aliasing view of the first `M` components.
    #[inline]
    pub(crate) fn prefix<const M: usize>(&self) -> &Vector<T, M> {
        &bytemuck::cast_slice::<T, Vector<T, M>>(&self.0[..M])[0]
    }

    #[inline]
    pub(crate) fn prefix_mut<const M: usize>(&mut self) -> &mut Vector<T, M> {
        &mut bytemuck::cast_slice_mut::<T, Vector<T, M>>(&mut self.0[..M])[0]
    }
}

impl<T: FloatScalar, const N: usize> Vector<T, N> {
    pub fn dot_self(&self) -> T {
        self.dot(self)
    }

    pub fn length(&self) -> T {
        self.dot_self().sqrt()
    }

    pub fn length_inverted(&self) -> T {
        T::one() / self.length()
    }

    pub fn normalized(&self) -> Self {
        *self * self.length_inverted()
    }

    pub fn is_normalized(&self) -> bool {
        self.dot_self().fuzzy_eq(T::one())
    }

    /// Same direction, given length.
    pub fn resized(&self, length: T) -> Self {
        *self * (length * self.length_inverted())
    }

    /// Projection onto `line`.
    pub fn projected(&self, line: &Self) -> Self {
        *line * (self.dot(line) / line.dot_self())
    }

    /// Projection onto an already normalized `line`.
    pub fn projected_onto_normalized(&self, line: &Self) -> Self {
        *line * self.dot(line)
    }
}

// =============================================================================
// Size-specific API
// =============================================================================

impl<T: Scalar> Vector<T, 2> {
    pub const fn new(x: T, y: T) -> Self {
        Vector([x, y])
    }

    pub fn x(&self) -> T {
        self.0[0]
    }

    pub fn y(&self) -> T {
        self.0[1]
    }

    pub fn x_mut(&mut self) -> &mut T {
        &mut self.0[0]
    }

    pub fn y_mut(&mut self) -> &mut T {
        &mut self.0[1]
    }

    pub fn x_axis(length: T) -> Self {
        Vector([length, T::zero()])
    }

    pub fn y_axis(length: T) -> Self {
        Vector([T::zero(), length])
    }

    /// Scaling vector along X, identity along Y.
    pub fn x_scale(scale: T) -> Self {
        Vector([scale, T::one()])
    }

    pub fn y_scale(scale: T) -> Self {
        Vector([T::one(), scale])
    }

    /// 2D cross product, the Z component of the 3D one.
    pub fn cross(&self, rhs: &Self) -> T {
        let [ax, ay] = self.0;
        let [bx, by] = rhs.0;
        ax.mul_wrapped(by).sub_wrapped(ay.mul_wrapped(bx))
    }
}

impl<T: SignedScalar> Vector<T, 2> {
    /// Rotated 90 degrees counterclockwise.
    pub fn perpendicular(&self) -> Self {
        Vector([self.0[1].neg_wrapped(), self.0[0]])
    }
}

impl<T: FloatScalar> Vector<T, 2> {
    /// X divided by Y.
    pub fn aspect_ratio(&self) -> T {
        self.0[0] / self.0[1]
    }
}

impl<T: Scalar> Vector<T, 3> {
    pub const fn new(x: T, y: T, z: T) -> Self {
        Vector([x, y, z])
    }

    pub fn from_xy(xy: Vector2<T>, z: T) -> Self {
        Vector([xy.0[0], xy.0[1], z])
    }

    pub fn x(&self) -> T {
        self.0[0]
    }

    pub fn y(&self) -> T {
        self.0[1]
    }

    pub fn z(&self) -> T {
        self.0[2]
    }

    pub fn x_mut(&mut self) -> &mut T {
        &mut self.0[0]
    }

    pub fn y_mut(&mut self) -> &mut T {
        &mut self.0[1]
    }

    pub fn z_mut(&mut self) -> &mut T {
        &mut self.0[2]
    }

    pub fn xy(&self) -> &Vector2<T> {
        self.prefix()
    }

    /// Writes go straight into this vector.
    pub fn xy_mut(&mut self) -> &mut Vector2<T> {
        self.prefix_mut()
    }

    pub fn x_axis(length: T) -> Self {
        Vector([length, T::zero(), T::zero()])
    }

    pub fn y_axis(length: T) -> Self {
        Vector([T::zero(), length, T::zero()])
    }

    pub fn z_axis(length: T) -> Self {
        Vector([T::zero(), T::zero(), length])
    }

    pub fn x_scale(scale: T) -> Self {
        Vector([scale, T::one(), T::one()])
    }

    pub fn y_scale(scale: T) -> Self {
        Vector([T::one(), scale, T::one()])
    }

    pub fn z_scale(scale: T) -> Self {
        Vector([T::one(), T::one(), scale])
    }

    pub fn cross(&self, rhs: &Self) -> Self {
        let [ax, ay, az] = self.0;
        let [bx, by, bz] = rhs.0;
        let det = |p: T, q: T, r: T, s: T| p.mul_wrapped(q).sub_wrapped(r.mul_wrapped(s));
        Vector([det(ay, bz, az, by), det(az, bx, ax, bz), det(ax, by, ay, bx)])
    }
}

impl<T: Scalar> Vector<T, 4> {
    pub const fn new(x: T, y: T, z: T, w: T) -> Self {
        Vector([x, y, z, w])
    }

    pub fn from_xyz(xyz: Vector3<T>, w: T) -> Self {
        Vector([xyz.0[0], xyz.0[1], xyz.0[2], w])
    }

    pub fn x(&self) -> T {
        self.0[0]
    }

    pub fn y(&self) -> T {
        self.0[1]
    }

    pub fn z(&self) -> T {
        self.0[2]
    }

    pub fn w(&self) -> T {
        self.0[3]
    }

    pub fn x_mut(&mut self) -> &mut T {
        &mut self.0[0]
    }

    pub fn y_mut(&mut self) -> &mut T {
        &mut self.0[1]
    }

    pub fn z_mut(&mut self) -> &mut T {
        &mut self.0[2]
    }

    pub fn w_mut(&mut self) -> &mut T {
        &mut self.0[3]
    }

    pub fn xy(&self) -> &Vector2<T> {
        self.prefix()
    }

    pub fn xy_mut(&mut self) -> &mut Vector2<T> {
        self.prefix_mut()
    }

    pub fn xyz(&self) -> &Vector3<T> {
        self.prefix()
    }

    pub fn xyz_mut(&mut self) -> &mut Vector3<T> {
        self.prefix_mut()
    }
}

// =============================================================================
// Operators
// =============================================================================

impl<T: Scalar, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.0[index]
    }
}

impl<T: Scalar, const N: usize> IndexMut<usize> for Vector<T, N> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.0[index]
    }
}

impl<T: SignedScalar, const N: usize> Neg for Vector<T, N> {
    type Output = Self;

    fn neg(self) -> Self {
        Vector(self.0.map(WrappingArith::neg_wrapped))
    }
}

/// Integer kinds wrap on overflow.
macro_rules! impl_componentwise {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign:ident, $op:ident) => {
        impl<T: Scalar, const N: usize> $trait for Vector<T, N> {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                Vector(self.zip_with(rhs, T::$op))
            }
        }

        impl<T: Scalar, const N: usize> $assign_trait for Vector<T, N> {
            fn $assign(&mut self, rhs: Self) {
                for (a, b) in self.0.iter_mut().zip(rhs.0) {
                    *a = a.$op(b);
                }
            }
        }
    };
}

impl_componentwise!(Add, add, AddAssign, add_assign, add_wrapped);
impl_componentwise!(Sub, sub, SubAssign, sub_assign, sub_wrapped);
impl_componentwise!(Mul, mul, MulAssign, mul_assign, mul_wrapped);
impl_componentwise!(Div, div, DivAssign, div_assign, div_wrapped);

impl<T: Scalar, const N: usize> Mul<T> for Vector<T, N> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        Vector(self.0.map(|c| c.mul_wrapped(rhs)))
    }
}

impl<T: Scalar, const N: usize> Div<T> for Vector<T, N> {
    type Output = Self;

    fn div(self, rhs: T) -> Self {
        Vector(self.0.map(|c| c.div_wrapped(rhs)))
    }
}

impl<T: Scalar, const N: usize> MulAssign<T> for Vector<T, N> {
    fn mul_assign(&mut self, rhs: T) {
        for c in &mut self.0 {
            *c = c.mul_wrapped(rhs);
        }
    }
}

impl<T: Scalar, const N: usize> DivAssign<T> for Vector<T, N> {
    fn div_assign(&mut self, rhs: T) {
        for c in &mut self.0 {
            *c = c.div_wrapped(rhs);
        }
    }
}

/// `s * v` and `s / v` for a primitive on the left. `s / v` divides `s` by
/// every component.
macro_rules! impl_scalar_lhs {
    ($($ty:ty),+) => {$(
        impl<const N: usize> Mul<Vector<$ty, N>> for $ty {
            type Output = Vector<$ty, N>;

            fn mul(self, rhs: Vector<$ty, N>) -> Vector<$ty, N> {
                rhs * self
            }
        }

        impl<const N: usize> Div<Vector<$ty, N>> for $ty {
            type Output = Vector<$ty, N>;

            fn div(self, rhs: Vector<$ty, N>) -> Vector<$ty, N> {
                Vector(rhs.0.map(|c| self.div_wrapped(c)))
            }
        }
    )+};
}

impl_scalar_lhs!(i8, u8, i32, u32, f32, f64);

impl<T: Scalar, const N: usize> From<[T; N]> for Vector<T, N> {
    fn from(components: [T; N]) -> Self {
        Vector(components)
    }
}

impl<T: Scalar, const N: usize> From<Vector<T, N>> for [T; N] {
    fn from(v: Vector<T, N>) -> Self {
        v.0
    }
}

impl<T: Scalar> From<(T, T)> for Vector<T, 2> {
    fn from((x, y): (T, T)) -> Self {
        Vector([x, y])
    }
}

impl<T: Scalar> From<(T, T, T)> for Vector<T, 3> {
    fn from((x, y, z): (T, T, T)) -> Self {
        Vector([x, y, z])
    }
}

impl<T: Scalar> From<(T, T, T, T)> for Vector<T, 4> {
    fn from((x, y, z, w): (T, T, T, T)) -> Self {
        Vector([x, y, z, w])
    }
}

pub(crate) fn write_components<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    components: &[T],
) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, c) in components.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{c}")?;
    }
    write!(f, ")")
}

impl<T: Scalar, const N: usize> fmt::Display for Vector<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_components(f, "Vector", &self.0)
    }
}

/// Angle between two normalized vectors.
pub(crate) fn angle_between<T: FloatScalar, const N: usize>(
    a: &Vector<T, N>,
    b: &Vector<T, N>,
) -> T {
    a.dot(b).max(-T::one()).min(T::one()).acos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_construction() {
        assert_eq!(Vector3::<i32>::default(), Vector3::new(0, 0, 0));
        assert_eq!(Vector4::splat(2u8), Vector4::new(2, 2, 2, 2));
        assert_eq!(Vector2::from((1.0f32, 2.0)), Vector2::new(1.0, 2.0));
        assert_eq!(Vector3::from([1u32, 2, 3]).to_array(), [1, 2, 3]);
        assert_eq!(Vector4::from_xyz(Vector3::new(1, 2, 3), 4), Vector4::new(1, 2, 3, 4));
    }

    #[test]
    fn test_cast() {
        let v = Vector3::new(1.7f32, -2.2, 300.0);
        assert_eq!(v.cast::<i32>(), Vector3::new(1, -2, 300));
        assert_eq!(Vector2::new(1u8, 255).cast::<f64>(), Vector2::new(1.0, 255.0));
    }

    #[test]
    fn test_arithmetic() {
        let a = Vector3::new(1.0f32, 2.0, 3.0);
        let b = Vector3::new(4.0f32, 5.0, 6.0);
        assert_eq!(a + b, Vector3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vector3::splat(3.0));
        assert_eq!(-a, Vector3::new(-1.0, -2.0, -3.0));
        assert_eq!(a * b, Vector3::new(4.0, 10.0, 18.0));
        assert_eq!(b / a, Vector3::new(4.0, 2.5, 2.0));
        assert_eq!(a * 2.0, 2.0 * a);
        assert_eq!(6.0 / a, Vector3::new(6.0, 3.0, 2.0));
        assert_eq!(b / 2.0, Vector3::new(2.0, 2.5, 3.0));

        let mut c = a;
        c += b;
        c -= a;
        c *= 2.0;
        c /= Vector3::splat(2.0);
        assert_eq!(c, b);
    }

    #[test]
    fn test_division_by_zero_is_not_guarded() {
        let v = Vector2::new(1.0f64, -1.0) / 0.0;
        assert!(v.x().is_infinite() && v.y().is_infinite());
    }

    #[test]
    fn test_comparisons() {
        let a = Vector3::new(1, 5, 3);
        let b = Vector3::new(2, 5, 1);
        assert_eq!(a.lt(&b).bits(), 0b001);
        assert_eq!(a.le(&b).bits(), 0b011);
        assert_eq!(a.gt(&b).bits(), 0b100);
        assert_eq!(a.ge(&b).bits(), 0b110);
        // lexicographic
        assert!(a < b);
        assert!(Vector2::new(1, 2) < Vector2::new(1, 3));
    }

    #[test]
    fn test_reductions() {
        let v = Vector4::new(3i32, -1, 4, 2);
        assert_eq!(v.sum(), 8);
        assert_eq!(v.product(), -24);
        assert_eq!(v.min(), -1);
        assert_eq!(v.max(), 4);
        assert_eq!(v.minmax(), (-1, 4));
        assert_eq!(v.flipped(), Vector4::new(2, 4, -1, 3));
        assert_eq!(v.dot(&Vector4::splat(1)), 8);
        assert!(Vector4::<i32>::zero().is_zero());
        assert!(!v.is_zero());
    }

    #[test]
    fn test_float_methods() {
        let v = Vector3::new(3.0f64, 0.0, 4.0);
        assert_relative_eq!(v.length(), 5.0);
        assert_relative_eq!(v.length_inverted(), 0.2);
        assert!(v.normalized().is_normalized());
        assert!(!v.is_normalized());
        assert_relative_eq!(v.resized(10.0).length(), 10.0);

        let line = Vector3::new(2.0f64, 0.0, 0.0);
        assert_eq!(v.projected(&line), Vector3::new(3.0, 0.0, 0.0));
        assert_eq!(
            v.projected_onto_normalized(&Vector3::z_axis(1.0)),
            Vector3::new(0.0, 0.0, 4.0)
        );
    }

    #[test]
    fn test_two_dimensional() {
        let v = Vector2::new(2.0f32, 1.0);
        assert_eq!(v.perpendicular(), Vector2::new(-1.0, 2.0));
        assert_eq!(v.aspect_ratio(), 2.0);
        assert_eq!(Vector2::<f32>::x_axis(3.0), Vector2::new(3.0, 0.0));
        assert_eq!(Vector2::<f32>::y_scale(3.0), Vector2::new(1.0, 3.0));
        assert_eq!(Vector2::new(1, 0).cross(&Vector2::new(0, 1)), 1);
    }

    #[test]
    fn test_cross() {
        let x = Vector3::<f32>::x_axis(1.0);
        let y = Vector3::<f32>::y_axis(1.0);
        assert_eq!(x.cross(&y), Vector3::z_axis(1.0));
        assert_eq!(Vector3::<i32>::z_scale(5), Vector3::new(1, 1, 5));
    }

    #[test]
    fn test_swizzle_aliases_storage() {
        let mut v = Vector4::new(1.0f32, 2.0, 3.0, 4.0);
        assert_eq!(*v.xyz(), Vector3::new(1.0, 2.0, 3.0));
        *v.xy_mut() *= 10.0;
        v.xyz_mut()[2] = -3.0;
        assert_eq!(v, Vector4::new(10.0, 20.0, -3.0, 4.0));

        let mut w = Vector3::new(1u8, 2, 3);
        *w.xy_mut() = Vector2::new(7, 8);
        assert_eq!(w, Vector3::new(7, 8, 3));
    }

    #[test]
    fn test_angle_between() {
        let a = Vector2::new(1.0f64, 0.0);
        let b = Vector2::new(0.0f64, 1.0);
        assert_relative_eq!(angle_between(&a, &b), std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(angle_between(&a, &a), 0.0);
    }

    #[test]
    fn test_integer_components_wrap() {
        let v = Vector4::<u8>::new(200, 200, 0, 0);
        assert_eq!(v.sum(), 144);
        assert_eq!(v.dot(&v), 128);
        assert_eq!(Vector2::<u8>::new(16, 32).product(), 0);
        assert_eq!(v + v, Vector4::new(144, 144, 0, 0));
        assert_eq!(Vector2::<u32>::new(0, 5) - Vector2::new(1, 1), Vector2::new(u32::MAX, 4));
        assert_eq!(Vector2::new(i32::MAX, 3) * 2, Vector2::new(-2, 6));
        assert_eq!(-Vector2::new(i8::MIN, 1), Vector2::new(i8::MIN, -1));
        assert_eq!(
            Vector3::new(i32::MAX, 0, 0).cross(&Vector3::new(0, 2, 0)),
            Vector3::new(0, 0, -2)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Vector3::new(1.0f32, 2.0, 3.0).to_string(), "Vector(1, 2, 3)");
        assert_eq!(Vector2::new(-1i8, 5).to_string(), "Vector(-1, 5)");
        assert_eq!(Vector4::new(0.5f64, 1.0, 0.0, 2.0).to_string(), "Vector(0.5, 1, 0, 2)");
    }
}
