use std::fmt;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use bytemuck::{Pod, Zeroable};
use num_traits::AsPrimitive;
use vectra_core::error::check_index;
use vectra_core::{BufferLayout, Result, ShapeDescriptor};

use crate::scalar::{Scalar, SignedScalar};
use crate::vector::Vector;

/// `C` columns of `R` rows, stored column-major.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<T, const C: usize, const R: usize>([Vector<T, R>; C]);

pub type Matrix2x2<T> = Matrix<T, 2, 2>;
pub type Matrix2x3<T> = Matrix<T, 2, 3>;
pub type Matrix2x4<T> = Matrix<T, 2, 4>;
pub type Matrix3x2<T> = Matrix<T, 3, 2>;
pub type Matrix3x3<T> = Matrix<T, 3, 3>;
pub type Matrix3x4<T> = Matrix<T, 3, 4>;
pub type Matrix4x2<T> = Matrix<T, 4, 2>;
pub type Matrix4x3<T> = Matrix<T, 4, 3>;
pub type Matrix4x4<T> = Matrix<T, 4, 4>;

// SAFETY: transparent over an array of `Pod` vectors.
unsafe impl<T: Scalar, const C: usize, const R: usize> Zeroable for Matrix<T, C, R> {}
unsafe impl<T: Scalar, const C: usize, const R: usize> Pod for Matrix<T, C, R> {}

impl<T: Scalar, const C: usize, const R: usize> BufferLayout for Matrix<T, C, R> {
    type Element = T;
    const SHAPE: ShapeDescriptor = ShapeDescriptor::Matrix { cols: C, rows: R };
}

/// Identity.
impl<T: Scalar, const C: usize, const R: usize> Default for Matrix<T, C, R> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: Scalar, const C: usize, const R: usize> Matrix<T, C, R> {
    pub const COLS: usize = C;
    pub const ROWS: usize = R;

    pub const fn from_columns(columns: [Vector<T, R>; C]) -> Self {
        Matrix(columns)
    }

    pub fn zero() -> Self {
        Matrix([Vector::zero(); C])
    }

    /// Ones on the diagonal. Non-square matrices get ones on the leading
    /// square part.
    pub fn identity() -> Self {
        let mut out = Self::zero();
        for i in 0..C.min(R) {
            out.0[i][i] = T::one();
        }
        out
    }

    pub fn columns(&self) -> &[Vector<T, R>; C] {
        &self.0
    }

    pub fn into_columns(self) -> [Vector<T, R>; C] {
        self.0
    }

    pub fn row(&self, row: usize) -> Result<Vector<T, C>> {
        check_index(row, R)?;
        Ok(Vector::from_array(std::array::from_fn(|col| self.0[col][row])))
    }

    pub fn element(&self, col: usize, row: usize) -> Result<T> {
        check_index(col, C)?;
        check_index(row, R)?;
        Ok(self.0[col][row])
    }

    pub fn set_element(&mut self, col: usize, row: usize, value: T) -> Result<()> {
        check_index(col, C)?;
        check_index(row, R)?;
        self.0[col][row] = value;
        Ok(())
    }

    pub fn transposed(&self) -> Matrix<T, R, C> {
        Matrix(std::array::from_fn(|row| {
            Vector::from_array(std::array::from_fn(|col| self.0[col][row]))
        }))
    }

    pub fn cast<U>(self) -> Matrix<U, C, R>
    where
        U: Scalar,
        T: AsPrimitive<U>,
    {
        Matrix(self.0.map(|c| c.cast()))
    }
}

impl<T: Scalar, const N: usize> Matrix<T, N, N> {
    pub fn from_diagonal(diagonal: Vector<T, N>) -> Self {
        let mut out = Self::zero();
        for i in 0..N {
            out.0[i][i] = diagonal[i];
        }
        out
    }

    pub fn diagonal(&self) -> Vector<T, N> {
        Vector::from_array(std::array::from_fn(|i| self.0[i][i]))
    }

    pub fn trace(&self) -> T {
        self.diagonal().sum()
    }
}

// =============================================================================
// Operators
// =============================================================================

/// Column access; panics past the last column.
impl<T: Scalar, const C: usize, const R: usize> Index<usize> for Matrix<T, C, R> {
    type Output = Vector<T, R>;

    fn index(&self, col: usize) -> &Vector<T, R> {
        &self.0[col]
    }
}

impl<T: Scalar, const C: usize, const R: usize> IndexMut<usize> for Matrix<T, C, R> {
    fn index_mut(&mut self, col: usize) -> &mut Vector<T, R> {
        &mut self.0[col]
    }
}

impl<T: SignedScalar, const C: usize, const R: usize> Neg for Matrix<T, C, R> {
    type Output = Self;

    fn neg(self) -> Self {
        Matrix(self.0.map(|c| -c))
    }
}

impl<T: Scalar, const C: usize, const R: usize> Add for Matrix<T, C, R> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<T: Scalar, const C: usize, const R: usize> Sub for Matrix<T, C, R> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl<T: Scalar, const C: usize, const R: usize> AddAssign for Matrix<T, C, R> {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a += b;
        }
    }
}

impl<T: Scalar, const C: usize, const R: usize> SubAssign for Matrix<T, C, R> {
    fn sub_assign(&mut self, rhs: Self) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a -= b;
        }
    }
}

impl<T: Scalar, const C: usize, const R: usize> Mul<T> for Matrix<T, C, R> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        Matrix(self.0.map(|c| c * rhs))
    }
}

impl<T: Scalar, const C: usize, const R: usize> Div<T> for Matrix<T, C, R> {
    type Output = Self;

    fn div(self, rhs: T) -> Self {
        Matrix(self.0.map(|c| c / rhs))
    }
}

impl<T: Scalar, const C: usize, const R: usize> MulAssign<T> for Matrix<T, C, R> {
    fn mul_assign(&mut self, rhs: T) {
        for c in &mut self.0 {
            *c *= rhs;
        }
    }
}

impl<T: Scalar, const C: usize, const R: usize> DivAssign<T> for Matrix<T, C, R> {
    fn div_assign(&mut self, rhs: T) {
        for c in &mut self.0 {
            *c /= rhs;
        }
    }
}

impl<T: Scalar, const C: usize, const R: usize> Mul<Vector<T, C>> for Matrix<T, C, R> {
    type Output = Vector<T, R>;

    fn mul(self, rhs: Vector<T, C>) -> Vector<T, R> {
        self.0
            .iter()
            .zip(rhs.to_array())
            .fold(Vector::zero(), |acc, (&col, s)| acc + col * s)
    }
}

impl<T: Scalar, const C: usize, const R: usize, const K: usize> Mul<Matrix<T, K, C>>
    for Matrix<T, C, R>
{
    type Output = Matrix<T, K, R>;

    fn mul(self, rhs: Matrix<T, K, C>) -> Matrix<T, K, R> {
        Matrix(rhs.0.map(|col| self * col))
    }
}

macro_rules! impl_matrix_scalar_lhs {
    ($($ty:ty),+) => {$(
        impl<const C: usize, const R: usize> Mul<Matrix<$ty, C, R>> for $ty {
            type Output = Matrix<$ty, C, R>;

            fn mul(self, rhs: Matrix<$ty, C, R>) -> Matrix<$ty, C, R> {
                rhs * self
            }
        }

        /// Divides `self` by every element.
        impl<const C: usize, const R: usize> Div<Matrix<$ty, C, R>> for $ty {
            type Output = Matrix<$ty, C, R>;

            fn div(self, rhs: Matrix<$ty, C, R>) -> Matrix<$ty, C, R> {
                Matrix(rhs.0.map(|c| self / c))
            }
        }
    )+};
}

impl_matrix_scalar_lhs!(f32, f64);

impl<T: Scalar, const C: usize, const R: usize> From<[Vector<T, R>; C]> for Matrix<T, C, R> {
    fn from(columns: [Vector<T, R>; C]) -> Self {
        Matrix(columns)
    }
}

/// Row by row, the way the matrix reads on paper.
impl<T: Scalar, const C: usize, const R: usize> fmt::Display for Matrix<T, C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Matrix(")?;
        for row in 0..R {
            if row > 0 {
                write!(f, ",\n       ")?;
            }
            for col in 0..C {
                if col > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.0[col][row])?;
            }
        }
        write!(f, ")")
    }
}
