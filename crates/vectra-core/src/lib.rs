//! Scalar formats, shape/stride tables and zero-copy buffer interchange for
//! fixed-size math values.
//!
//! Everything here is independent of the concrete value types: a type takes
//! part in the buffer paths by implementing [`buffer::BufferLayout`].

pub mod buffer;
pub mod config;
pub mod dtype;
pub mod error;
pub mod shape;

pub use buffer::{
    export_view, import_into, import_into_with, BufferFlags, BufferLayout, BufferView,
    ForeignBuffer, RawBuffer,
};
pub use config::{load_config, ImportConfig, NarrowingPolicy};
pub use dtype::{format_of, is_compatible, Element, FormatTag, ScalarKind};
pub use error::VectraError;
pub use shape::{shape_index, strides_of, ShapeDescriptor, MATRIX_SHAPES};

pub type Result<T> = std::result::Result<T, VectraError>;
