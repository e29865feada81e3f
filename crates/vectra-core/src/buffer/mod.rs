//! Zero-copy interchange with the host's strided buffer convention.
//!
//! Import reads a [`ForeignBuffer`] into a freshly built value; export
//! hands out a [`BufferView`] aliasing a value's own storage.

mod export;
mod foreign;
mod import;
mod raw;

pub use export::{export_view, BufferView};
pub use foreign::ForeignBuffer;
pub use import::{import_into, import_into_with};
pub use raw::{BufferFlags, RawBuffer};

use bytemuck::Pod;

use crate::dtype::Element;
use crate::shape::ShapeDescriptor;

/// A fixed-size value whose storage is exactly `SHAPE.element_count()`
/// contiguous `Element`s, in native (column-major) order, with no padding.
pub trait BufferLayout: Pod {
    type Element: Element;

    const SHAPE: ShapeDescriptor;

    /// Row of the shape/stride tables. Fails to compile for a shape outside
    /// the tables or a type whose size disagrees with its shape.
    const TABLE_INDEX: usize = {
        assert!(
            std::mem::size_of::<Self>()
                == Self::SHAPE.element_count() * std::mem::size_of::<Self::Element>(),
            "storage size does not match the declared shape"
        );
        match Self::SHAPE.table_index() {
            Some(index) => index,
            None => panic!("shape has no entry in the stride tables"),
        }
    };

    fn components(&self) -> &[Self::Element] {
        bytemuck::cast_slice(std::slice::from_ref(self))
    }

    fn components_mut(&mut self) -> &mut [Self::Element] {
        bytemuck::cast_slice_mut(std::slice::from_mut(self))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Minimal layouts for exercising the buffer paths without the math crate.

    use bytemuck::{Pod, Zeroable};

    use super::BufferLayout;
    use crate::shape::ShapeDescriptor;

    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Vec4f(pub [f32; 4]);

    unsafe impl Zeroable for Vec4f {}
    unsafe impl Pod for Vec4f {}

    impl BufferLayout for Vec4f {
        type Element = f32;
        const SHAPE: ShapeDescriptor = ShapeDescriptor::Vector { components: 4 };
    }

    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Vec3i(pub [i32; 3]);

    unsafe impl Zeroable for Vec3i {}
    unsafe impl Pod for Vec3i {}

    impl BufferLayout for Vec3i {
        type Element = i32;
        const SHAPE: ShapeDescriptor = ShapeDescriptor::Vector { components: 3 };
    }

    /// 3 columns of 2 rows, column-major.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Mat3x2d(pub [f64; 6]);

    unsafe impl Zeroable for Mat3x2d {}
    unsafe impl Pod for Mat3x2d {}

    impl BufferLayout for Mat3x2d {
        type Element = f64;
        const SHAPE: ShapeDescriptor = ShapeDescriptor::Matrix { cols: 3, rows: 2 };
    }

    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Mat3f(pub [f32; 9]);

    unsafe impl Zeroable for Mat3f {}
    unsafe impl Pod for Mat3f {}

    impl BufferLayout for Mat3f {
        type Element = f32;
        const SHAPE: ShapeDescriptor = ShapeDescriptor::Matrix { cols: 3, rows: 3 };
    }
}
