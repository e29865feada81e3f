use std::ffi::CStr;

use smallvec::SmallVec;

use crate::buffer::RawBuffer;
use crate::dtype::{format_of, Element};
use crate::{Result, VectraError};

/// Read-only description of a strided buffer owned by someone else.
///
/// Every element addressed by `shape` and `strides` is checked to lie inside
/// `data` when the descriptor is built, so element reads never go out of
/// bounds.
#[derive(Debug, Clone)]
pub struct ForeignBuffer<'a> {
    data: &'a [u8],
    /// Byte offset of element `[0, .., 0]` inside `data`. Non-zero only when
    /// some stride is negative.
    origin: usize,
    itemsize: usize,
    format: &'a str,
    shape: SmallVec<[usize; 2]>,
    strides: SmallVec<[isize; 2]>,
    readonly: bool,
}

/// Lowest and one-past-highest byte offsets touched, relative to the first
/// element. `None` if the offsets do not fit in `isize`.
fn extent(itemsize: usize, shape: &[usize], strides: &[isize]) -> Option<(isize, isize)> {
    if shape.iter().any(|&n| n == 0) {
        return Some((0, 0));
    }
    let (mut low, mut high) = (0isize, 0isize);
    for (&n, &stride) in shape.iter().zip(strides) {
        let last = isize::try_from(n - 1).ok()?.checked_mul(stride)?;
        if last < 0 {
            low = low.checked_add(last)?;
        } else {
            high = high.checked_add(last)?;
        }
    }
    let high = high.checked_add(isize::try_from(itemsize).ok()?)?;
    // The span itself has to be addressable.
    high.checked_sub(low)?;
    Some((low, high))
}

fn overflow(shape: &[usize], strides: &[isize]) -> VectraError {
    VectraError::InvalidBuffer(format!(
        "shape {:?} with strides {:?} overflows the address space",
        shape, strides
    ))
}

fn contiguous_strides(itemsize: usize, shape: &[usize]) -> Option<SmallVec<[isize; 2]>> {
    let mut strides: SmallVec<[isize; 2]> = SmallVec::from_elem(0, shape.len());
    let mut acc = isize::try_from(itemsize).ok()?;
    for i in (0..shape.len()).rev() {
        strides[i] = acc;
        acc = acc.checked_mul(isize::try_from(shape[i]).ok()?)?;
    }
    Some(strides)
}

impl<'a> ForeignBuffer<'a> {
    /// Describes a strided buffer starting at `data[0]`.
    pub fn new(
        data: &'a [u8],
        format: &'a str,
        itemsize: usize,
        shape: &[usize],
        strides: &[isize],
    ) -> Result<Self> {
        if shape.len() != strides.len() {
            return Err(VectraError::InvalidBuffer(format!(
                "{} dimensions but {} strides",
                shape.len(),
                strides.len()
            )));
        }
        if itemsize == 0 {
            return Err(VectraError::InvalidBuffer("zero item size".into()));
        }
        let (low, high) =
            extent(itemsize, shape, strides).ok_or_else(|| overflow(shape, strides))?;
        if low < 0 || high as usize > data.len() {
            return Err(VectraError::InvalidBuffer(format!(
                "shape {:?} with strides {:?} addresses bytes {}..{} of a {}-byte buffer",
                shape,
                strides,
                low,
                high,
                data.len()
            )));
        }
        Ok(Self {
            data,
            origin: 0,
            itemsize,
            format,
            shape: SmallVec::from_slice(shape),
            strides: SmallVec::from_slice(strides),
            readonly: true,
        })
    }

    /// Contiguous one-dimensional buffer over a slice of elements. This is
    /// the path host sequences take for implicit construction.
    pub fn from_slice<E: Element>(data: &'a [E]) -> Self {
        let itemsize = std::mem::size_of::<E>();
        Self {
            data: bytemuck::cast_slice(data),
            origin: 0,
            itemsize,
            format: format_of(E::KIND).as_str(),
            shape: SmallVec::from_slice(&[data.len()]),
            strides: SmallVec::from_slice(&[itemsize as isize]),
            readonly: true,
        }
    }

    /// Row-major two-dimensional buffer over `rows * cols` elements.
    pub fn from_slice_2d<E: Element>(data: &'a [E], rows: usize, cols: usize) -> Result<Self> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(VectraError::InvalidBuffer(format!(
                "{} elements cannot form a {}x{} buffer",
                data.len(),
                rows,
                cols
            )));
        }
        let itemsize = std::mem::size_of::<E>();
        let strides = contiguous_strides(itemsize, &[rows, cols])
            .ok_or_else(|| overflow(&[rows, cols], &[]))?;
        Self::new(
            bytemuck::cast_slice(data),
            format_of(E::KIND).as_str(),
            itemsize,
            &[rows, cols],
            &strides,
        )
    }

    /// Adopts a descriptor filled in by the host.
    ///
    /// A null format means unsigned bytes, a null shape means a flat span of
    /// `len / itemsize` items and null strides mean C-contiguous.
    ///
    /// # Safety
    ///
    /// `raw` must describe memory that is readable for every addressed
    /// element and stays valid and unmodified for `'a`. `format`, `shape` and
    /// `strides`, when non-null, must point to a NUL-terminated string and
    /// `ndim` entries respectively.
    pub unsafe fn from_raw(raw: &'a RawBuffer) -> Result<Self> {
        if raw.buf.is_null() {
            return Err(VectraError::InvalidBuffer("null data pointer".into()));
        }
        let itemsize = usize::try_from(raw.itemsize)
            .ok()
            .filter(|&s| s > 0)
            .ok_or_else(|| VectraError::InvalidBuffer(format!("item size {}", raw.itemsize)))?;
        let ndim = usize::try_from(raw.ndim)
            .map_err(|_| VectraError::InvalidBuffer(format!("ndim {}", raw.ndim)))?;

        let format: &'a str = if raw.format.is_null() {
            "B"
        } else {
            // Non-UTF-8 formats can never be compatible; an empty string fails
            // the format gate on import.
            CStr::from_ptr(raw.format).to_str().unwrap_or("")
        };

        let shape: SmallVec<[usize; 2]> = if raw.shape.is_null() {
            SmallVec::from_slice(&[raw.len.max(0) as usize / itemsize])
        } else {
            std::slice::from_raw_parts(raw.shape, ndim)
                .iter()
                .map(|&n| usize::try_from(n))
                .collect::<std::result::Result<_, _>>()
                .map_err(|_| VectraError::InvalidBuffer("negative extent".into()))?
        };
        let strides: SmallVec<[isize; 2]> = if raw.strides.is_null() {
            contiguous_strides(itemsize, &shape).ok_or_else(|| overflow(&shape, &[]))?
        } else {
            SmallVec::from_slice(std::slice::from_raw_parts(raw.strides, shape.len()))
        };

        let (low, high) =
            extent(itemsize, &shape, &strides).ok_or_else(|| overflow(&shape, &strides))?;
        let start = (raw.buf as *const u8).offset(low);
        let data = std::slice::from_raw_parts(start, (high - low) as usize);

        Ok(Self {
            data,
            origin: (-low) as usize,
            itemsize,
            format,
            shape,
            strides,
            readonly: raw.readonly != 0,
        })
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    pub fn itemsize(&self) -> usize {
        self.itemsize
    }

    pub fn format(&self) -> &'a str {
        self.format
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Bytes of the element at `index`, or `None` if the index does not
    /// address an element.
    pub fn element_bytes(&self, index: &[usize]) -> Option<&'a [u8]> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = self.origin as isize;
        for ((&i, &n), &stride) in index.iter().zip(&self.shape).zip(&self.strides) {
            if i >= n {
                return None;
            }
            offset += i as isize * stride;
        }
        let start = offset as usize;
        self.data.get(start..start + self.itemsize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_is_contiguous() {
        let data = [1.0f32, 2.0, 3.0];
        let buf = ForeignBuffer::from_slice(&data);
        assert_eq!(buf.ndim(), 1);
        assert_eq!(buf.shape(), &[3]);
        assert_eq!(buf.strides(), &[4]);
        assert_eq!(buf.format(), "f");
        assert_eq!(buf.element_bytes(&[2]).unwrap(), &3.0f32.to_ne_bytes());
        assert!(buf.element_bytes(&[3]).is_none());
    }

    #[test]
    fn test_from_slice_2d_row_major() {
        let data = [1i32, 2, 3, 4, 5, 6];
        let buf = ForeignBuffer::from_slice_2d(&data, 2, 3).unwrap();
        assert_eq!(buf.strides(), &[12, 4]);
        assert_eq!(buf.element_bytes(&[1, 0]).unwrap(), &4i32.to_ne_bytes());
        assert!(ForeignBuffer::from_slice_2d(&data, 4, 2).is_err());
    }

    #[test]
    fn test_new_rejects_out_of_bounds() {
        let bytes = [0u8; 16];
        let err = ForeignBuffer::new(&bytes, "f", 4, &[4], &[8]).unwrap_err();
        assert!(matches!(err, VectraError::InvalidBuffer(_)));
        assert!(ForeignBuffer::new(&bytes, "f", 4, &[2], &[8]).is_ok());
        assert!(ForeignBuffer::new(&bytes, "f", 4, &[2], &[-8]).is_err());
        assert!(ForeignBuffer::new(&bytes, "f", 4, &[2, 2], &[8]).is_err());
    }

    #[test]
    fn test_overflowing_layouts_are_rejected() {
        let bytes = [0u8; 16];
        let err = ForeignBuffer::new(&bytes, "f", 4, &[(1 << 62) + 1], &[4]).unwrap_err();
        assert!(matches!(err, VectraError::InvalidBuffer(_)));
        assert!(ForeignBuffer::new(&bytes, "f", 4, &[3], &[isize::MAX]).is_err());
        assert!(ForeignBuffer::new(&bytes, "f", 4, &[3], &[isize::MIN]).is_err());
        assert!(ForeignBuffer::new(&bytes, "f", 4, &[2, 2], &[isize::MAX, isize::MIN]).is_err());

        let data = [1i32, 2];
        assert!(ForeignBuffer::from_slice_2d(&data, usize::MAX, 2).is_err());
        assert!(ForeignBuffer::from_slice_2d(&data, 1 << 62, 4).is_err());
    }

    #[test]
    fn test_from_raw_rejects_overflowing_shape() {
        let data = [0i32; 4];
        let shape = [isize::MAX, 4];
        let raw = RawBuffer {
            buf: data.as_ptr() as *mut _,
            len: 16,
            itemsize: 4,
            ndim: 2,
            format: c"i".as_ptr() as *mut _,
            shape: shape.as_ptr() as *mut _,
            ..RawBuffer::default()
        };
        let err = unsafe { ForeignBuffer::from_raw(&raw) }.unwrap_err();
        assert!(matches!(err, VectraError::InvalidBuffer(_)));
    }

    #[test]
    fn test_from_raw_negative_stride() {
        let data = [10i32, 20, 30];
        let shape = [3isize];
        let strides = [-4isize];
        let raw = RawBuffer {
            // last element, walking backwards
            buf: data.as_ptr().wrapping_add(2) as *mut _,
            len: 12,
            itemsize: 4,
            ndim: 1,
            format: c"i".as_ptr() as *mut _,
            shape: shape.as_ptr() as *mut _,
            strides: strides.as_ptr() as *mut _,
            ..RawBuffer::default()
        };
        let buf = unsafe { ForeignBuffer::from_raw(&raw) }.unwrap();
        assert_eq!(buf.element_bytes(&[0]).unwrap(), &30i32.to_ne_bytes());
        assert_eq!(buf.element_bytes(&[2]).unwrap(), &10i32.to_ne_bytes());
    }

    #[test]
    fn test_from_raw_null_format_is_bytes() {
        let data = [1u8, 2, 3, 4];
        let raw = RawBuffer {
            buf: data.as_ptr() as *mut _,
            len: 4,
            itemsize: 1,
            ndim: 1,
            ..RawBuffer::default()
        };
        let buf = unsafe { ForeignBuffer::from_raw(&raw) }.unwrap();
        assert_eq!(buf.format(), "B");
        assert_eq!(buf.shape(), &[4]);
        assert_eq!(buf.strides(), &[1]);
    }

    #[test]
    fn test_from_raw_null_pointer() {
        let raw = RawBuffer::default();
        assert!(unsafe { ForeignBuffer::from_raw(&raw) }.is_err());
    }
}
