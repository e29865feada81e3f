use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

/// Up to eight booleans packed into one byte, component `i` in bit `i`.
///
/// Bits at positions `>= N` are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoolVector<const N: usize>(u8);

pub type BoolVector2 = BoolVector<2>;
pub type BoolVector3 = BoolVector<3>;
pub type BoolVector4 = BoolVector<4>;

impl<const N: usize> BoolVector<N> {
    const MASK: u8 = {
        assert!(N >= 1 && N <= 8, "a bool vector holds one to eight components");
        if N == 8 {
            0xff
        } else {
            (1u8 << N) - 1
        }
    };

    pub const SIZE: usize = N;

    /// Every component false.
    pub const fn zero() -> Self {
        BoolVector(0)
    }

    /// Every component set to `value`.
    pub const fn splat(value: bool) -> Self {
        BoolVector(if value { Self::MASK } else { 0 })
    }

    /// Builds from a segment byte. Bits beyond `N` are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        BoolVector(bits & Self::MASK)
    }

    pub fn from_array(values: [bool; N]) -> Self {
        let mut out = Self::zero();
        for (i, &v) in values.iter().enumerate() {
            out.put(i, v);
        }
        out
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Component `i`. `i` must be below `N`.
    #[inline]
    pub(crate) fn bit(&self, i: usize) -> bool {
        (self.0 >> i) & 1 == 1
    }

    #[inline]
    pub(crate) fn put(&mut self, i: usize, value: bool) {
        if value {
            self.0 |= 1 << i;
        } else {
            self.0 &= !(1 << i);
        }
    }

    pub fn all(&self) -> bool {
        self.0 == Self::MASK
    }

    pub fn none(&self) -> bool {
        self.0 == 0
    }

    pub fn any(&self) -> bool {
        self.0 != 0
    }

    /// Boolean conversion: true when every component is set.
    pub fn as_bool(&self) -> bool {
        self.all()
    }

    pub fn to_array(&self) -> [bool; N] {
        std::array::from_fn(|i| self.bit(i))
    }
}

impl<const N: usize> Not for BoolVector<N> {
    type Output = Self;

    fn not(self) -> Self {
        BoolVector(!self.0 & Self::MASK)
    }
}

macro_rules! impl_bool_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign:ident, $op:tt) => {
        impl<const N: usize> $trait for BoolVector<N> {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                BoolVector(self.0 $op rhs.0)
            }
        }

        impl<const N: usize> $assign_trait for BoolVector<N> {
            fn $assign(&mut self, rhs: Self) {
                self.0 = self.0 $op rhs.0;
            }
        }
    };
}

impl_bool_op!(BitAnd, bitand, BitAndAssign, bitand_assign, &);
impl_bool_op!(BitOr, bitor, BitOrAssign, bitor_assign, |);
impl_bool_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, ^);

impl<const N: usize> From<[bool; N]> for BoolVector<N> {
    fn from(values: [bool; N]) -> Self {
        Self::from_array(values)
    }
}

impl<const N: usize> fmt::Display for BoolVector<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoolVector(0b{:0width$b})", self.0, width = N)
    }
}
