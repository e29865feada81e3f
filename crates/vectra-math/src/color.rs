//! RGB and RGBA colors.
//!
//! Colors are vectors with channel names, HSV conversion and a notion of a
//! "full" channel value: `1.0` for float colors and the maximum for integer
//! colors. Everything a vector can do is reachable through `Deref`.

use std::fmt;
use std::ops::{
    Add, AddAssign, Deref, DerefMut, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign,
};

use bytemuck::{Pod, Zeroable};
use vectra_core::{BufferLayout, ShapeDescriptor};

use crate::angle::Deg;
use crate::scalar::{lit, FloatScalar, Scalar, SignedScalar};
use crate::vector::{Vector3, Vector4};

/// A channel type colors can be built from.
pub trait ColorChannel: Scalar {
    /// Float type HSV math runs in.
    type Float: FloatScalar;

    /// Channel value meaning "fully on".
    const FULL: Self;

    /// Maps `0..=FULL` onto `0.0..=1.0`.
    fn to_unit(self) -> Self::Float;

    /// Inverse of [`to_unit`](Self::to_unit). Integer channels clamp and round.
    fn from_unit(value: Self::Float) -> Self;
}

macro_rules! impl_float_channel {
    ($ty:ty) => {
        impl ColorChannel for $ty {
            type Float = $ty;
            const FULL: $ty = 1.0;

            fn to_unit(self) -> $ty {
                self
            }

            fn from_unit(value: $ty) -> $ty {
                value
            }
        }
    };
}

macro_rules! impl_int_channel {
    ($ty:ty, $float:ty) => {
        impl ColorChannel for $ty {
            type Float = $float;
            const FULL: $ty = <$ty>::MAX;

            fn to_unit(self) -> $float {
                self as $float / <$ty>::MAX as $float
            }

            fn from_unit(value: $float) -> $ty {
                (value.clamp(0.0, 1.0) * <$ty>::MAX as $float).round() as $ty
            }
        }
    };
}

impl_float_channel!(f32);
impl_float_channel!(f64);
impl_int_channel!(u8, f32);
impl_int_channel!(u32, f64);

// =============================================================================
// HSV
// =============================================================================

fn hsv_to_rgb<F: FloatScalar>(hue: Deg<F>, saturation: F, value: F) -> [F; 3] {
    let full_turn = lit::<F>(360.0);
    let sixty = lit::<F>(60.0);
    let h = hue.0 - (hue.0 / full_turn).floor() * full_turn;
    let sector = (h / sixty).floor();
    let f = h / sixty - sector;

    let one = F::one();
    let p = value * (one - saturation);
    let q = value * (one - f * saturation);
    let t = value * (one - (one - f) * saturation);

    match sector.to_usize().unwrap_or(0) % 6 {
        0 => [value, t, p],
        1 => [q, value, p],
        2 => [p, value, t],
        3 => [p, q, value],
        4 => [t, p, value],
        _ => [value, p, q],
    }
}

fn rgb_to_hsv<F: FloatScalar>([r, g, b]: [F; 3]) -> (Deg<F>, F, F) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta == F::zero() {
        F::zero()
    } else if max == r {
        let wrap = if g < b { lit(6.0) } else { F::zero() };
        (g - b) / delta + wrap
    } else if max == g {
        (b - r) / delta + lit(2.0)
    } else {
        (r - g) / delta + lit(4.0)
    };
    let saturation = if max == F::zero() { F::zero() } else { delta / max };

    (Deg(hue * lit(60.0)), saturation, max)
}

// =============================================================================
// Color3
// =============================================================================

/// RGB color.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Color3<T>(Vector3<T>);

/// RGBA color.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Color4<T>(Vector4<T>);

// SAFETY: both are transparent over a `Pod` vector.
unsafe impl<T: Scalar> Zeroable for Color3<T> {}
unsafe impl<T: Scalar> Pod for Color3<T> {}
unsafe impl<T: Scalar> Zeroable for Color4<T> {}
unsafe impl<T: Scalar> Pod for Color4<T> {}

impl<T: Scalar> BufferLayout for Color3<T> {
    type Element = T;
    const SHAPE: ShapeDescriptor = ShapeDescriptor::Vector { components: 3 };
}

impl<T: Scalar> BufferLayout for Color4<T> {
    type Element = T;
    const SHAPE: ShapeDescriptor = ShapeDescriptor::Vector { components: 4 };
}

impl<T: ColorChannel> Color3<T> {
    pub const fn new(r: T, g: T, b: T) -> Self {
        Color3(Vector3::new(r, g, b))
    }

    pub fn zero() -> Self {
        Color3(Vector3::zero())
    }

    /// Same value in every channel.
    pub fn gray(value: T) -> Self {
        Color3(Vector3::splat(value))
    }

    pub fn r(&self) -> T {
        self.0.x()
    }

    pub fn g(&self) -> T {
        self.0.y()
    }

    pub fn b(&self) -> T {
        self.0.z()
    }

    pub fn r_mut(&mut self) -> &mut T {
        self.0.x_mut()
    }

    pub fn g_mut(&mut self) -> &mut T {
        self.0.y_mut()
    }

    pub fn b_mut(&mut self) -> &mut T {
        self.0.z_mut()
    }

    pub fn to_vector(self) -> Vector3<T> {
        self.0
    }

    pub fn cast<U: ColorChannel>(self) -> Color3<U>
    where
        T: num_traits::AsPrimitive<U>,
    {
        Color3(self.0.cast())
    }

    fn unit(&self) -> [T::Float; 3] {
        [self.r().to_unit(), self.g().to_unit(), self.b().to_unit()]
    }

    /// Hue wraps into `[0, 360)`; saturation and value are in `0..=1`.
    pub fn from_hsv(hue: Deg<T::Float>, saturation: T::Float, value: T::Float) -> Self {
        let [r, g, b] = hsv_to_rgb(hue, saturation, value);
        Color3::new(T::from_unit(r), T::from_unit(g), T::from_unit(b))
    }

    pub fn to_hsv(&self) -> (Deg<T::Float>, T::Float, T::Float) {
        rgb_to_hsv(self.unit())
    }

    pub fn hue(&self) -> Deg<T::Float> {
        self.to_hsv().0
    }

    pub fn saturation(&self) -> T::Float {
        self.to_hsv().1
    }

    pub fn value(&self) -> T::Float {
        self.to_hsv().2
    }
}

// =============================================================================
// Color4
// =============================================================================

impl<T: ColorChannel> Color4<T> {
    pub const fn new(r: T, g: T, b: T, a: T) -> Self {
        Color4(Vector4::new(r, g, b, a))
    }

    pub fn zero() -> Self {
        Color4(Vector4::zero())
    }

    /// RGB with a full alpha channel.
    pub fn opaque(r: T, g: T, b: T) -> Self {
        Color4::new(r, g, b, T::FULL)
    }

    pub fn from_rgb(rgb: Color3<T>, alpha: T) -> Self {
        Color4(Vector4::from_xyz(rgb.0, alpha))
    }

    pub fn r(&self) -> T {
        self.0.x()
    }

    pub fn g(&self) -> T {
        self.0.y()
    }

    pub fn b(&self) -> T {
        self.0.z()
    }

    pub fn a(&self) -> T {
        self.0.w()
    }

    pub fn r_mut(&mut self) -> &mut T {
        self.0.x_mut()
    }

    pub fn g_mut(&mut self) -> &mut T {
        self.0.y_mut()
    }

    pub fn b_mut(&mut self) -> &mut T {
        self.0.z_mut()
    }

    pub fn a_mut(&mut self) -> &mut T {
        self.0.w_mut()
    }

    /// RGB part, aliasing this color's storage.
    pub fn rgb(&self) -> &Color3<T> {
        &bytemuck::cast_slice::<T, Color3<T>>(&self.0.as_slice()[..3])[0]
    }

    pub fn rgb_mut(&mut self) -> &mut Color3<T> {
        &mut bytemuck::cast_slice_mut::<T, Color3<T>>(&mut self.0.as_mut_slice()[..3])[0]
    }

    pub fn to_vector(self) -> Vector4<T> {
        self.0
    }

    pub fn cast<U: ColorChannel>(self) -> Color4<U>
    where
        T: num_traits::AsPrimitive<U>,
    {
        Color4(self.0.cast())
    }

    /// Opaque color from HSV.
    pub fn from_hsv(hue: Deg<T::Float>, saturation: T::Float, value: T::Float) -> Self {
        Self::from_hsv_alpha(hue, saturation, value, T::FULL)
    }

    pub fn from_hsv_alpha(
        hue: Deg<T::Float>,
        saturation: T::Float,
        value: T::Float,
        alpha: T,
    ) -> Self {
        Color4::from_rgb(Color3::from_hsv(hue, saturation, value), alpha)
    }

    /// HSV of the RGB part; alpha is ignored.
    pub fn to_hsv(&self) -> (Deg<T::Float>, T::Float, T::Float) {
        self.rgb().to_hsv()
    }

    pub fn hue(&self) -> Deg<T::Float> {
        self.rgb().hue()
    }

    pub fn saturation(&self) -> T::Float {
        self.rgb().saturation()
    }

    pub fn value(&self) -> T::Float {
        self.rgb().value()
    }
}

// =============================================================================
// Shared plumbing
// =============================================================================

macro_rules! impl_color_common {
    ($name:ident, $vector:ident, $n:literal) => {
        impl<T: ColorChannel> Default for $name<T> {
            fn default() -> Self {
                Self::zero()
            }
        }

        impl<T: Scalar> Deref for $name<T> {
            type Target = $vector<T>;

            fn deref(&self) -> &$vector<T> {
                &self.0
            }
        }

        impl<T: Scalar> DerefMut for $name<T> {
            fn deref_mut(&mut self) -> &mut $vector<T> {
                &mut self.0
            }
        }

        impl<T: Scalar> From<$vector<T>> for $name<T> {
            fn from(v: $vector<T>) -> Self {
                $name(v)
            }
        }

        impl<T: Scalar> From<$name<T>> for $vector<T> {
            fn from(c: $name<T>) -> Self {
                c.0
            }
        }

        impl<T: Scalar> From<[T; $n]> for $name<T> {
            fn from(channels: [T; $n]) -> Self {
                $name($vector::from(channels))
            }
        }

        impl<T: SignedScalar> Neg for $name<T> {
            type Output = Self;

            fn neg(self) -> Self {
                $name(-self.0)
            }
        }

        impl_color_common!(@binary $name, Add, add, AddAssign, add_assign);
        impl_color_common!(@binary $name, Sub, sub, SubAssign, sub_assign);
        impl_color_common!(@binary $name, Mul, mul, MulAssign, mul_assign);
        impl_color_common!(@binary $name, Div, div, DivAssign, div_assign);

        impl<T: Scalar> Mul<T> for $name<T> {
            type Output = Self;

            fn mul(self, rhs: T) -> Self {
                $name(self.0 * rhs)
            }
        }

        impl<T: Scalar> Div<T> for $name<T> {
            type Output = Self;

            fn div(self, rhs: T) -> Self {
                $name(self.0 / rhs)
            }
        }

        impl<T: Scalar> MulAssign<T> for $name<T> {
            fn mul_assign(&mut self, rhs: T) {
                self.0 *= rhs;
            }
        }

        impl<T: Scalar> DivAssign<T> for $name<T> {
            fn div_assign(&mut self, rhs: T) {
                self.0 /= rhs;
            }
        }

        impl_color_common!(@lhs $name, f32, f64, u8, u32);

        impl<T: Scalar> fmt::Display for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
    (@binary $name:ident, $trait:ident, $method:ident, $assign_trait:ident, $assign:ident) => {
        impl<T: Scalar> $trait for $name<T> {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                $name($trait::$method(self.0, rhs.0))
            }
        }

        impl<T: Scalar> $assign_trait for $name<T> {
            fn $assign(&mut self, rhs: Self) {
                $assign_trait::$assign(&mut self.0, rhs.0);
            }
        }
    };
    (@lhs $name:ident, $($ty:ty),+) => {$(
        impl Mul<$name<$ty>> for $ty {
            type Output = $name<$ty>;

            fn mul(self, rhs: $name<$ty>) -> $name<$ty> {
                $name(self * rhs.0)
            }
        }

        impl Div<$name<$ty>> for $ty {
            type Output = $name<$ty>;

            fn div(self, rhs: $name<$ty>) -> $name<$ty> {
                $name(self / rhs.0)
            }
        }
    )+};
}

impl_color_common!(Color3, Vector3, 3);
impl_color_common!(Color4, Vector4, 4);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_hsv_primaries() {
        assert_eq!(Color3::<f32>::from_hsv(Deg(0.0), 1.0, 1.0), Color3::new(1.0, 0.0, 0.0));
        assert_eq!(Color3::<f64>::from_hsv(Deg(120.0), 1.0, 1.0), Color3::new(0.0, 1.0, 0.0));
        assert_eq!(Color3::<f64>::from_hsv(Deg(240.0), 1.0, 1.0), Color3::new(0.0, 0.0, 1.0));
        // hue wraps
        assert_eq!(Color3::<f64>::from_hsv(Deg(360.0), 1.0, 1.0), Color3::new(1.0, 0.0, 0.0));
        assert_eq!(Color3::<f64>::from_hsv(Deg(-120.0), 1.0, 1.0), Color3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_from_hsv_integer_channels() {
        let yellow = Color3::<u8>::from_hsv(Deg(60.0), 1.0, 1.0);
        assert_eq!(yellow, Color3::new(255, 255, 0));
        let gray = Color3::<u8>::from_hsv(Deg(0.0), 0.0, 0.5);
        assert_eq!(gray, Color3::gray(128));
        let full = Color4::<u32>::from_hsv(Deg(0.0), 1.0, 1.0);
        assert_eq!(full.a(), u32::MAX);
        assert_eq!(full.r(), u32::MAX);
    }

    #[test]
    fn test_to_hsv() {
        let (hue, sat, val) = Color3::new(1.0f32, 0.5, 0.0).to_hsv();
        assert_relative_eq!(hue.0, 30.0);
        assert_relative_eq!(sat, 1.0);
        assert_relative_eq!(val, 1.0);

        let magenta = Color3::new(1.0f64, 0.0, 1.0);
        assert_relative_eq!(magenta.hue().0, 300.0);
        assert_eq!(Color3::<f64>::zero().saturation(), 0.0);
        assert_relative_eq!(Color3::new(0u8, 0, 51).value(), 0.2);
    }

    #[test]
    fn test_hsv_round_trip() {
        for hue in [15.0f64, 75.0, 135.0, 195.0, 255.0, 315.0] {
            let c = Color3::<f64>::from_hsv(Deg(hue), 0.75, 0.5);
            let (h, s, v) = c.to_hsv();
            assert_relative_eq!(h.0, hue, epsilon = 1e-9);
            assert_relative_eq!(s, 0.75, epsilon = 1e-12);
            assert_relative_eq!(v, 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_alpha_defaults_to_full() {
        assert_eq!(Color4::<u8>::opaque(1, 2, 3).a(), 255);
        assert_eq!(Color4::<f32>::from_hsv(Deg(0.0), 0.0, 1.0).a(), 1.0);
        let c = Color4::<f32>::from_hsv_alpha(Deg(0.0), 0.0, 1.0, 0.25);
        assert_eq!(c.a(), 0.25);
        assert_eq!(Color4::<f32>::default(), Color4::new(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_rgb_aliases_storage() {
        let mut c = Color4::new(0.1f32, 0.2, 0.3, 0.4);
        assert_eq!(*c.rgb(), Color3::new(0.1, 0.2, 0.3));
        *c.rgb_mut() = Color3::new(1.0, 1.0, 1.0);
        *c.rgb_mut().g_mut() = 0.5;
        assert_eq!(c, Color4::new(1.0, 0.5, 1.0, 0.4));
    }

    #[test]
    fn test_vector_capabilities_through_deref() {
        let c = Color3::new(3.0f32, 4.0, 0.0);
        assert_eq!(c.length(), 5.0);
        assert_eq!(c.sum(), 7.0);
        assert_eq!(c[1], 4.0);
        assert_eq!(c * 2.0, Color3::new(6.0, 8.0, 0.0));
        assert_eq!(2u8 * Color3::new(1u8, 2, 3), Color3::new(2, 4, 6));
        assert_eq!(c + c, c * 2.0);
        assert_eq!(-c, Color3::new(-3.0, -4.0, 0.0));
        assert_eq!(Color4::from_rgb(Color3::gray(1u8), 9).to_vector(), Vector4::new(1, 1, 1, 9));
    }

    #[test]
    fn test_display_matches_vector() {
        assert_eq!(Color3::new(1u8, 2, 3).to_string(), "Vector(1, 2, 3)");
    }
}
