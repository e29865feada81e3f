use std::ffi::c_int;

use log::trace;

use crate::buffer::{BufferFlags, BufferLayout, RawBuffer};
use crate::dtype::{format_of, Element, FormatTag, ScalarKind};
use crate::error::check_index;
use crate::shape::{kind_strides, ShapeDescriptor, MATRIX_SHAPES};
use crate::{Result, VectraError};

/// A live, writable view over the storage of one value.
///
/// The view mutably borrows its source, so it can never outlive it and the
/// value cannot be touched through any other path while the view exists.
/// Shape and strides always point into the static tables.
#[derive(Debug)]
pub struct BufferView<'a> {
    bytes: &'a mut [u8],
    kind: ScalarKind,
    shape: &'static [isize],
    strides: &'static [isize],
    /// What the consumer asked to see. Element access always uses the full
    /// layout regardless.
    format_requested: bool,
    shape_requested: bool,
    strides_requested: bool,
}

/// Exposes `value` as a buffer view.
///
/// Without shape information the view is a flat byte span. Matrices always
/// publish strides together with their shape, since their row-major
/// presentation is not C-contiguous.
pub fn export_view<T: BufferLayout>(value: &mut T, flags: BufferFlags) -> BufferView<'_> {
    let kind = <T::Element as Element>::KIND;
    let index = T::TABLE_INDEX;
    let ndim = T::SHAPE.ndim();
    let is_matrix = matches!(T::SHAPE, ShapeDescriptor::Matrix { .. });

    let shape_requested = flags.wants_shape();
    let strides_requested =
        shape_requested && (is_matrix || flags.contains(BufferFlags::STRIDES));
    trace!(
        "exporting {} {} view with flags {:#x}",
        kind,
        T::SHAPE,
        flags.bits()
    );

    BufferView {
        bytes: bytemuck::bytes_of_mut(value),
        kind,
        shape: &MATRIX_SHAPES[index][..ndim],
        strides: &kind_strides(kind)[index][..ndim],
        format_requested: flags.contains(BufferFlags::FORMAT),
        shape_requested,
        strides_requested,
    }
}

impl<'a> BufferView<'a> {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn itemsize(&self) -> usize {
        self.kind.element_size()
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Always false: exported views are writable.
    pub fn is_readonly(&self) -> bool {
        false
    }

    pub fn ndim(&self) -> usize {
        if self.shape_requested {
            self.shape.len()
        } else {
            1
        }
    }

    /// Published format, if the consumer asked for one.
    pub fn format(&self) -> Option<FormatTag> {
        self.format_requested.then(|| format_of(self.kind))
    }

    /// Published row-major shape.
    pub fn shape(&self) -> Option<&'static [isize]> {
        self.shape_requested.then_some(self.shape)
    }

    /// Published byte strides matching [`shape`](Self::shape).
    pub fn strides(&self) -> Option<&'static [isize]> {
        self.strides_requested.then_some(self.strides)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..]
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[..]
    }

    fn offset_of(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.shape.len() {
            return Err(VectraError::DimensionMismatch {
                expected: self.shape.len(),
                got: index.len(),
            });
        }
        let mut offset = 0usize;
        for ((&i, &n), &stride) in index.iter().zip(self.shape).zip(self.strides) {
            check_index(i, n as usize)?;
            offset += i * stride as usize;
        }
        Ok(offset)
    }

    fn check_kind<E: Element>(&self) -> Result<()> {
        if E::KIND != self.kind {
            return Err(VectraError::FormatMismatch {
                format: format_of(E::KIND).to_string(),
                expected: self.kind,
            });
        }
        Ok(())
    }

    /// Element at row-major `index` (`[i]` or `[row, col]`).
    pub fn element<E: Element>(&self, index: &[usize]) -> Result<E> {
        self.check_kind::<E>()?;
        let offset = self.offset_of(index)?;
        let size = std::mem::size_of::<E>();
        Ok(bytemuck::pod_read_unaligned(&self.bytes[offset..offset + size]))
    }

    /// Writes through the view into the underlying value.
    pub fn set_element<E: Element>(&mut self, index: &[usize], value: E) -> Result<()> {
        self.check_kind::<E>()?;
        let offset = self.offset_of(index)?;
        let size = std::mem::size_of::<E>();
        self.bytes[offset..offset + size].copy_from_slice(bytemuck::bytes_of(&value));
        Ok(())
    }

    /// Fills a host-layout descriptor for this view. `obj` is left null for
    /// the host to set.
    ///
    /// The returned pointers into the value are only valid while this view
    /// is alive; the format, shape and stride pointers are static.
    pub fn to_raw(&mut self) -> RawBuffer {
        let format = match self.format() {
            Some(tag) => tag.as_cstr().as_ptr().cast_mut(),
            None => std::ptr::null_mut(),
        };
        let shape = match self.shape() {
            Some(shape) => shape.as_ptr().cast_mut(),
            None => std::ptr::null_mut(),
        };
        let strides = match self.strides() {
            Some(strides) => strides.as_ptr().cast_mut(),
            None => std::ptr::null_mut(),
        };
        RawBuffer {
            buf: self.bytes.as_mut_ptr().cast(),
            len: self.bytes.len() as isize,
            itemsize: self.itemsize() as isize,
            readonly: 0,
            ndim: self.ndim() as c_int,
            format,
            shape,
            strides,
            ..RawBuffer::default()
        }
    }
}
