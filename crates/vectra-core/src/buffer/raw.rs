//! C-layout buffer descriptor shared with the host.
//!
//! Field order and widths follow the host's array-interchange struct so a
//! pointer to a [`RawBuffer`] can be handed to third-party consumers as is.

use std::ffi::{c_char, c_int, c_void};
use std::ops::BitOr;
use std::ptr;

#[repr(C)]
#[derive(Debug)]
pub struct RawBuffer {
    pub buf: *mut c_void,
    /// Owning host object. Never touched on this side.
    pub obj: *mut c_void,
    pub len: isize,
    pub itemsize: isize,
    pub readonly: c_int,
    pub ndim: c_int,
    pub format: *mut c_char,
    pub shape: *mut isize,
    pub strides: *mut isize,
    pub suboffsets: *mut isize,
    pub internal: *mut c_void,
}

impl Default for RawBuffer {
    fn default() -> Self {
        Self {
            buf: ptr::null_mut(),
            obj: ptr::null_mut(),
            len: 0,
            itemsize: 0,
            readonly: 0,
            ndim: 0,
            format: ptr::null_mut(),
            shape: ptr::null_mut(),
            strides: ptr::null_mut(),
            suboffsets: ptr::null_mut(),
            internal: ptr::null_mut(),
        }
    }
}

/// Request bits a consumer passes when asking for a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferFlags(c_int);

impl BufferFlags {
    pub const SIMPLE: BufferFlags = BufferFlags(0);
    pub const WRITABLE: BufferFlags = BufferFlags(0x0001);
    pub const FORMAT: BufferFlags = BufferFlags(0x0004);
    pub const ND: BufferFlags = BufferFlags(0x0008);
    pub const STRIDES: BufferFlags = BufferFlags(0x0010 | 0x0008);
    pub const FULL: BufferFlags = BufferFlags(0x0001 | 0x0004 | 0x0010 | 0x0008);

    pub const fn from_bits(bits: c_int) -> Self {
        BufferFlags(bits)
    }

    pub const fn bits(&self) -> c_int {
        self.0
    }

    pub const fn contains(&self, other: BufferFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Any flag beyond `SIMPLE` was requested, so shape gets published.
    pub const fn wants_shape(&self) -> bool {
        self.0 != Self::SIMPLE.0
    }
}

impl BitOr for BufferFlags {
    type Output = BufferFlags;

    fn bitor(self, rhs: BufferFlags) -> BufferFlags {
        BufferFlags(self.0 | rhs.0)
    }
}
