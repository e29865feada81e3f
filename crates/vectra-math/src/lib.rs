//! # vectra-math
//!
//! Fixed-size math value types for a dynamic host: angles, bool vectors,
//! vectors, colors, quaternions and 2..4 square and rectangular matrices.
//! Vectors, colors and matrices take part in zero-copy buffer interchange
//! through `vectra-core`.

pub mod angle;
pub mod bool_vector;
pub mod color;
pub mod exposed;
pub mod functions;
pub mod matrix;
pub mod quaternion;
pub mod registry;
pub mod scalar;
mod schema;
pub mod vector;

pub use angle::{Deg, Rad};
pub use bool_vector::{BoolVector, BoolVector2, BoolVector3, BoolVector4};
pub use color::{Color3, Color4, ColorChannel};
pub use exposed::{iter_items, Buffered, Exposed, ExposedObject, Family, HostConvert, HostValue};
pub use matrix::{
    Matrix, Matrix2x2, Matrix2x3, Matrix2x4, Matrix3x2, Matrix3x3, Matrix3x4, Matrix4x2,
    Matrix4x3, Matrix4x4,
};
pub use quaternion::Quaternion;
pub use registry::{Binder, Registry, TypeDescriptor, NAMESPACE};
pub use scalar::{FloatScalar, Scalar, SignedScalar, WrappingArith};
pub use vector::{Vector, Vector2, Vector3, Vector4};

pub use vectra_core::{Result, VectraError};
