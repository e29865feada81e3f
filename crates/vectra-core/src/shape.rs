use smallvec::{smallvec, SmallVec};
use std::fmt;

use crate::dtype::ScalarKind;

/// Shape of a buffer-capable fixed-size value.
///
/// Matrices are stored column-major: `cols` columns of `rows` contiguous
/// elements each. The host sees them row-major, which is the same memory
/// with the two axes (and their strides) swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeDescriptor {
    Vector { components: usize },
    Matrix { cols: usize, rows: usize },
}

impl ShapeDescriptor {
    pub const fn ndim(&self) -> usize {
        match self {
            ShapeDescriptor::Vector { .. } => 1,
            ShapeDescriptor::Matrix { .. } => 2,
        }
    }

    pub const fn element_count(&self) -> usize {
        match *self {
            ShapeDescriptor::Vector { components } => components,
            ShapeDescriptor::Matrix { cols, rows } => cols * rows,
        }
    }

    /// Dimensions in native indexing order: `[n]` or `[cols, rows]`.
    pub fn native_dims(&self) -> SmallVec<[usize; 2]> {
        match *self {
            ShapeDescriptor::Vector { components } => smallvec![components],
            ShapeDescriptor::Matrix { cols, rows } => smallvec![cols, rows],
        }
    }

    /// Dimensions as the host sees them: `[n]` or `[rows, cols]`.
    pub fn dims(&self) -> SmallVec<[usize; 2]> {
        let mut dims = self.native_dims();
        dims.reverse();
        dims
    }

    /// Byte strides matching [`native_dims`](Self::native_dims).
    pub fn native_strides(&self, element_size: usize) -> SmallVec<[isize; 2]> {
        let elem = element_size as isize;
        match *self {
            ShapeDescriptor::Vector { .. } => smallvec![elem],
            ShapeDescriptor::Matrix { rows, .. } => smallvec![rows as isize * elem, elem],
        }
    }

    /// Row of the shape/stride tables this shape reads from. Vectors use the
    /// two-column entry whose row count equals their size.
    pub const fn table_index(&self) -> Option<usize> {
        match *self {
            ShapeDescriptor::Vector { components } => shape_index(2, components),
            ShapeDescriptor::Matrix { cols, rows } => shape_index(cols, rows),
        }
    }
}

impl fmt::Display for ShapeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeDescriptor::Vector { components } => write!(f, "[{components}]"),
            ShapeDescriptor::Matrix { cols, rows } => write!(f, "[{rows}, {cols}]"),
        }
    }
}

/// Index into [`MATRIX_SHAPES`] and the stride tables.
pub const fn shape_index(cols: usize, rows: usize) -> Option<usize> {
    if cols < 2 || cols > 4 || rows < 2 || rows > 4 {
        return None;
    }
    Some((cols - 2) * 3 + (rows - 2))
}

const SHAPES: [[isize; 2]; 9] = [
    [2, 2], // 2 cols, 2 rows
    [3, 2], // 2 cols, 3 rows
    [4, 2], // 2 cols, 4 rows
    [2, 3], // 3 cols, 2 rows
    [3, 3], // 3 cols, 3 rows
    [4, 3], // 3 cols, 4 rows
    [2, 4], // 4 cols, 2 rows
    [3, 4], // 4 cols, 3 rows
    [4, 4], // 4 cols, 4 rows
];

/// Host-facing `[rows, cols]` of every matrix shape, flipped from the native
/// column-major order.
pub static MATRIX_SHAPES: [[isize; 2]; 9] = SHAPES;

const fn build_strides(element_size: isize) -> [[isize; 2]; 9] {
    let mut out = [[0isize; 2]; 9];
    let mut i = 0;
    while i < 9 {
        out[i] = [element_size, element_size * SHAPES[i][0]];
        i += 1;
    }
    out
}

static MATRIX_STRIDES_BYTE: [[isize; 2]; 9] = build_strides(1);
static MATRIX_STRIDES_FLOAT: [[isize; 2]; 9] = build_strides(4);
static MATRIX_STRIDES_DOUBLE: [[isize; 2]; 9] = build_strides(8);

/// Row-major `[row stride, column stride]` for shape `index` and an element
/// of `element_size` bytes.
pub fn strides_of(index: usize, element_size: usize) -> Option<&'static [isize; 2]> {
    let table = match element_size {
        1 => &MATRIX_STRIDES_BYTE,
        4 => &MATRIX_STRIDES_FLOAT,
        8 => &MATRIX_STRIDES_DOUBLE,
        _ => return None,
    };
    table.get(index)
}

/// Stride table for elements of `kind`. Total over every kind.
pub const fn kind_strides(kind: ScalarKind) -> &'static [[isize; 2]; 9] {
    match kind.element_size() {
        1 => &MATRIX_STRIDES_BYTE,
        4 => &MATRIX_STRIDES_FLOAT,
        _ => &MATRIX_STRIDES_DOUBLE,
    }
}
