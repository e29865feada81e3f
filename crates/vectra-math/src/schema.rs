//! Host names and metadata of every exposed type.
//!
//! Suffixes follow the element type: none for `f32`, `d` for `f64`, `i` for
//! `i32`, `ui` for `u32` and `ub` for `u8`.

use bytemuck::{cast_mut, cast_ref};
use vectra_core::{export_view, BufferFlags, BufferLayout, BufferView, Element, ScalarKind};

use crate::angle::{Deg, Rad};
use crate::bool_vector::{BoolVector2, BoolVector3, BoolVector4};
use crate::color::{Color3, Color4};
use crate::exposed::{host_object, Exposed, Family};
use crate::matrix::{
    Matrix2x2, Matrix2x3, Matrix2x4, Matrix3x2, Matrix3x3, Matrix3x4, Matrix4x2, Matrix4x3,
    Matrix4x4,
};
use crate::quaternion::Quaternion;
use crate::scalar::FloatScalar;
use crate::vector::{Vector, Vector2, Vector3, Vector4};

macro_rules! expose_angles {
    ($($ty:ty => $name:literal, $doc:literal;)+) => {$(
        impl Exposed for $ty {
            type Item = f64;

            const NAME: &'static str = $name;
            const DOC: &'static str = $doc;
            const FAMILY: Family = Family::Angle;
            const KIND: Option<ScalarKind> = Some(ScalarKind::F64);
            const SIZE: usize = 1;

            fn zero_init() -> Self {
                Self::zero()
            }

            fn item(&self, _index: usize) -> f64 {
                self.0
            }

            fn put_item(&mut self, _index: usize, value: f64) {
                self.0 = value;
            }
        }
    )+};
}

expose_angles! {
    Deg<f64> => "Deg", "Angle in degrees";
    Rad<f64> => "Rad", "Angle in radians";
}

macro_rules! expose_bool_vectors {
    ($($ty:ty => $name:literal, $size:literal;)+) => {$(
        impl Exposed for $ty {
            type Item = bool;

            const NAME: &'static str = $name;
            const DOC: &'static str = "Vector of bits";
            const FAMILY: Family = Family::BoolVector;
            const KIND: Option<ScalarKind> = None;
            const SIZE: usize = $size;

            fn zero_init() -> Self {
                Self::zero()
            }

            fn item(&self, index: usize) -> bool {
                self.bit(index)
            }

            fn put_item(&mut self, index: usize, value: bool) {
                self.put(index, value);
            }
        }
    )+};
}

expose_bool_vectors! {
    BoolVector2 => "BoolVector2", 2;
    BoolVector3 => "BoolVector3", 3;
    BoolVector4 => "BoolVector4", 4;
}

/// Vectors and colors: scalar items straight out of the buffer layout.
macro_rules! expose_components {
    ($family:ident; $($ty:ty => $name:literal, $doc:literal;)+) => {$(
        impl Exposed for $ty {
            type Item = <$ty as BufferLayout>::Element;

            const NAME: &'static str = $name;
            const DOC: &'static str = $doc;
            const FAMILY: Family = Family::$family;
            const KIND: Option<ScalarKind> = Some(<Self::Item as Element>::KIND);
            const SIZE: usize = <$ty as BufferLayout>::SHAPE.element_count();

            fn zero_init() -> Self {
                Self::zero()
            }

            fn item(&self, index: usize) -> Self::Item {
                self.components()[index]
            }

            fn put_item(&mut self, index: usize, value: Self::Item) {
                self.components_mut()[index] = value;
            }

            fn buffer_view(&mut self, flags: BufferFlags) -> Option<BufferView<'_>> {
                Some(export_view(self, flags))
            }
        }
    )+};
}

expose_components! { Vector;
    Vector2<f32> => "Vector2", "Two-component float vector";
    Vector3<f32> => "Vector3", "Three-component float vector";
    Vector4<f32> => "Vector4", "Four-component float vector";
    Vector2<f64> => "Vector2d", "Two-component double vector";
    Vector3<f64> => "Vector3d", "Three-component double vector";
    Vector4<f64> => "Vector4d", "Four-component double vector";
    Vector2<i32> => "Vector2i", "Two-component signed integral vector";
    Vector3<i32> => "Vector3i", "Three-component signed integral vector";
    Vector4<i32> => "Vector4i", "Four-component signed integral vector";
    Vector2<u32> => "Vector2ui", "Two-component unsigned integral vector";
    Vector3<u32> => "Vector3ui", "Three-component unsigned integral vector";
    Vector4<u32> => "Vector4ui", "Four-component unsigned integral vector";
}

expose_components! { Color;
    Color3<f32> => "Color3", "Float RGB color";
    Color4<f32> => "Color4", "Float RGBA color";
    Color3<f64> => "Color3d", "Double RGB color";
    Color4<f64> => "Color4d", "Double RGBA color";
    Color3<u8> => "Color3ub", "Byte RGB color";
    Color4<u8> => "Color4ub", "Byte RGBA color";
    Color3<u32> => "Color3ui", "Unsigned integral RGB color";
    Color4<u32> => "Color4ui", "Unsigned integral RGBA color";
}

host_object!(
    Vector2<f32>,
    Vector3<f32>,
    Vector4<f32>,
    Vector2<f64>,
    Vector3<f64>,
    Vector4<f64>,
);

macro_rules! expose_quaternions {
    ($($t:ty => $name:literal, $doc:literal;)+) => {$(
        impl Exposed for Quaternion<$t> {
            type Item = $t;

            const NAME: &'static str = $name;
            const DOC: &'static str = $doc;
            const FAMILY: Family = Family::Quaternion;
            const KIND: Option<ScalarKind> = Some(<$t as Element>::KIND);
            const SIZE: usize = 4;

            fn zero_init() -> Self {
                Self::zero()
            }

            /// Vector part first, then the scalar.
            fn item(&self, index: usize) -> $t {
                quaternion_components(self)[index]
            }

            fn put_item(&mut self, index: usize, value: $t) {
                quaternion_components_mut(self)[index] = value;
            }
        }
    )+};
}

expose_quaternions! {
    f32 => "Quaternion", "Float quaternion";
    f64 => "Quaterniond", "Double quaternion";
}

fn quaternion_components<T: FloatScalar>(q: &Quaternion<T>) -> &[T; 4] {
    cast_ref(q)
}

fn quaternion_components_mut<T: FloatScalar>(q: &mut Quaternion<T>) -> &mut [T; 4] {
    cast_mut(q)
}

/// Matrices index by column; each item is a column vector.
macro_rules! expose_matrices {
    ($($ty:ident < $t:ty > => $name:literal, $rows:literal;)+) => {$(
        impl Exposed for $ty<$t> {
            type Item = Vector<$t, $rows>;

            const NAME: &'static str = $name;
            const DOC: &'static str = concat!(stringify!($ty), " of ", stringify!($t));
            const FAMILY: Family = Family::Matrix;
            const KIND: Option<ScalarKind> = Some(<$t as Element>::KIND);
            const SIZE: usize = Self::COLS;

            fn zero_init() -> Self {
                Self::zero()
            }

            fn item(&self, index: usize) -> Self::Item {
                self[index]
            }

            fn put_item(&mut self, index: usize, value: Self::Item) {
                self[index] = value;
            }

            fn buffer_view(&mut self, flags: BufferFlags) -> Option<BufferView<'_>> {
                Some(export_view(self, flags))
            }
        }
    )+};
}

expose_matrices! {
    Matrix2x2<f32> => "Matrix2x2", 2;
    Matrix2x3<f32> => "Matrix2x3", 3;
    Matrix2x4<f32> => "Matrix2x4", 4;
    Matrix3x2<f32> => "Matrix3x2", 2;
    Matrix3x3<f32> => "Matrix3x3", 3;
    Matrix3x4<f32> => "Matrix3x4", 4;
    Matrix4x2<f32> => "Matrix4x2", 2;
    Matrix4x3<f32> => "Matrix4x3", 3;
    Matrix4x4<f32> => "Matrix4x4", 4;
    Matrix2x2<f64> => "Matrix2x2d", 2;
    Matrix2x3<f64> => "Matrix2x3d", 3;
    Matrix2x4<f64> => "Matrix2x4d", 4;
    Matrix3x2<f64> => "Matrix3x2d", 2;
    Matrix3x3<f64> => "Matrix3x3d", 3;
    Matrix3x4<f64> => "Matrix3x4d", 4;
    Matrix4x2<f64> => "Matrix4x2d", 2;
    Matrix4x3<f64> => "Matrix4x3d", 3;
    Matrix4x4<f64> => "Matrix4x4d", 4;
}
