use std::ffi::CStr;
use std::fmt;

use bytemuck::Pod;

use crate::config::NarrowingPolicy;

/// Scalar kinds a fixed-size value can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    I8,
    U8,
    I32,
    U32,
    F32,
    F64,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 6] = [
        ScalarKind::I8,
        ScalarKind::U8,
        ScalarKind::I32,
        ScalarKind::U32,
        ScalarKind::F32,
        ScalarKind::F64,
    ];

    pub const fn element_size(&self) -> usize {
        match self {
            ScalarKind::I8 | ScalarKind::U8 => 1,
            ScalarKind::I32 | ScalarKind::U32 | ScalarKind::F32 => 4,
            ScalarKind::F64 => 8,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, ScalarKind::F32 | ScalarKind::F64)
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            ScalarKind::I8 | ScalarKind::I32 | ScalarKind::F32 | ScalarKind::F64
        )
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::I8 => write!(f, "i8"),
            ScalarKind::U8 => write!(f, "u8"),
            ScalarKind::I32 => write!(f, "i32"),
            ScalarKind::U32 => write!(f, "u32"),
            ScalarKind::F32 => write!(f, "f32"),
            ScalarKind::F64 => write!(f, "f64"),
        }
    }
}

/// One-character interchange codes of the host's buffer convention.
///
/// `U8` is also the raw-byte fallback: bytes are presented as unsigned so
/// that `view[0] = 65` works the same way it does on a byte array. `I64` and
/// `U64` never describe native storage; they are only accepted on import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    I8,
    U8,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl FormatTag {
    pub const RAW_BYTE: FormatTag = FormatTag::U8;

    pub const fn as_char(&self) -> char {
        match self {
            FormatTag::I8 => 'b',
            FormatTag::U8 => 'B',
            FormatTag::I32 => 'i',
            FormatTag::U32 => 'I',
            FormatTag::I64 => 'l',
            FormatTag::U64 => 'L',
            FormatTag::F32 => 'f',
            FormatTag::F64 => 'd',
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            FormatTag::I8 => "b",
            FormatTag::U8 => "B",
            FormatTag::I32 => "i",
            FormatTag::U32 => "I",
            FormatTag::I64 => "l",
            FormatTag::U64 => "L",
            FormatTag::F32 => "f",
            FormatTag::F64 => "d",
        }
    }

    /// NUL-terminated form, with static lifetime so raw descriptors can point
    /// at it.
    pub const fn as_cstr(&self) -> &'static CStr {
        match self {
            FormatTag::I8 => c"b",
            FormatTag::U8 => c"B",
            FormatTag::I32 => c"i",
            FormatTag::U32 => c"I",
            FormatTag::I64 => c"l",
            FormatTag::U64 => c"L",
            FormatTag::F32 => c"f",
            FormatTag::F64 => c"d",
        }
    }

    pub const fn item_size(&self) -> usize {
        match self {
            FormatTag::I8 | FormatTag::U8 => 1,
            FormatTag::I32 | FormatTag::U32 | FormatTag::F32 => 4,
            FormatTag::I64 | FormatTag::U64 | FormatTag::F64 => 8,
        }
    }

    pub fn from_char(c: char) -> Option<FormatTag> {
        match c {
            'b' => Some(FormatTag::I8),
            'B' => Some(FormatTag::U8),
            'i' => Some(FormatTag::I32),
            'I' => Some(FormatTag::U32),
            'l' => Some(FormatTag::I64),
            'L' => Some(FormatTag::U64),
            'f' => Some(FormatTag::F32),
            'd' => Some(FormatTag::F64),
            _ => None,
        }
    }

    /// Parses a format string. Only single-letter formats are understood;
    /// byte-order prefixes and struct formats are rejected.
    pub fn from_format_str(format: &str) -> Option<FormatTag> {
        let mut chars = format.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => FormatTag::from_char(c),
            _ => None,
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The tag a value of `kind` is exported with.
pub const fn format_of(kind: ScalarKind) -> FormatTag {
    match kind {
        ScalarKind::I8 => FormatTag::I8,
        ScalarKind::U8 => FormatTag::U8,
        ScalarKind::I32 => FormatTag::I32,
        ScalarKind::U32 => FormatTag::U32,
        ScalarKind::F32 => FormatTag::F32,
        ScalarKind::F64 => FormatTag::F64,
    }
}

/// Whether a buffer tagged `tag` can be read into a `kind` target. Only
/// same-family conversions are allowed: floats from either float width,
/// 32-bit integers from 32- or 64-bit integers of the same signedness, and
/// byte kinds from the raw-byte tag. int8 also takes its own `b` tag.
pub fn is_compatible(kind: ScalarKind, tag: FormatTag) -> bool {
    match kind {
        ScalarKind::F32 | ScalarKind::F64 => matches!(tag, FormatTag::F32 | FormatTag::F64),
        ScalarKind::I32 => matches!(tag, FormatTag::I32 | FormatTag::I64),
        ScalarKind::U32 => matches!(tag, FormatTag::U32 | FormatTag::U64),
        ScalarKind::I8 => matches!(tag, FormatTag::I8 | FormatTag::RAW_BYTE),
        ScalarKind::U8 => tag == FormatTag::RAW_BYTE,
    }
}

/// A scalar that can live inside an exposed value and be marshaled through a
/// buffer.
pub trait Element:
    Pod + PartialEq + PartialOrd + Default + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    const KIND: ScalarKind;

    /// Reads one element stored as `tag` from the start of `bytes` and
    /// converts it. Returns `None` for a tag outside this kind's family.
    fn read_foreign(bytes: &[u8], tag: FormatTag, policy: NarrowingPolicy) -> Option<Self>;
}

#[inline]
fn read<S: Pod>(bytes: &[u8]) -> S {
    bytemuck::pod_read_unaligned(&bytes[..std::mem::size_of::<S>()])
}

macro_rules! impl_float_element {
    ($ty:ty, $kind:expr) => {
        impl Element for $ty {
            const KIND: ScalarKind = $kind;

            fn read_foreign(bytes: &[u8], tag: FormatTag, policy: NarrowingPolicy) -> Option<Self> {
                let wide = match tag {
                    FormatTag::F32 => read::<f32>(bytes) as f64,
                    FormatTag::F64 => read::<f64>(bytes),
                    _ => return None,
                };
                Some(match policy {
                    NarrowingPolicy::PassThrough => wide as $ty,
                    NarrowingPolicy::Saturate if wide.is_finite() => {
                        wide.clamp(<$ty>::MIN as f64, <$ty>::MAX as f64) as $ty
                    }
                    NarrowingPolicy::Saturate => wide as $ty,
                })
            }
        }
    };
}

macro_rules! impl_int_element {
    ($ty:ty, $kind:expr, $wide:ty, [$($tag:path => $src:ty),+]) => {
        impl Element for $ty {
            const KIND: ScalarKind = $kind;

            fn read_foreign(bytes: &[u8], tag: FormatTag, policy: NarrowingPolicy) -> Option<Self> {
                let wide: $wide = match tag {
                    $($tag => read::<$src>(bytes) as $wide,)+
                    _ => return None,
                };
                Some(match policy {
                    NarrowingPolicy::PassThrough => wide as $ty,
                    NarrowingPolicy::Saturate => {
                        wide.clamp(<$ty>::MIN as $wide, <$ty>::MAX as $wide) as $ty
                    }
                })
            }
        }
    };
}

impl_float_element!(f32, ScalarKind::F32);
impl_float_element!(f64, ScalarKind::F64);
impl_int_element!(i32, ScalarKind::I32, i64, [FormatTag::I32 => i32, FormatTag::I64 => i64]);
impl_int_element!(u32, ScalarKind::U32, u64, [FormatTag::U32 => u32, FormatTag::U64 => u64]);
impl_int_element!(i8, ScalarKind::I8, i16, [FormatTag::I8 => i8, FormatTag::U8 => u8]);
impl_int_element!(u8, ScalarKind::U8, u8, [FormatTag::U8 => u8]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_of_round_trips_through_char() {
        for kind in ScalarKind::ALL {
            let tag = format_of(kind);
            assert_eq!(FormatTag::from_char(tag.as_char()), Some(tag));
            assert_eq!(tag.item_size(), kind.element_size());
            assert!(is_compatible(kind, tag));
        }
    }

    #[test]
    fn test_compatibility_sets() {
        assert!(is_compatible(ScalarKind::F32, FormatTag::F64));
        assert!(is_compatible(ScalarKind::F64, FormatTag::F32));
        assert!(is_compatible(ScalarKind::I32, FormatTag::I64));
        assert!(is_compatible(ScalarKind::U32, FormatTag::U64));
        assert!(!is_compatible(ScalarKind::F32, FormatTag::RAW_BYTE));
        assert!(!is_compatible(ScalarKind::I32, FormatTag::U32));
        assert!(!is_compatible(ScalarKind::U32, FormatTag::F32));
        assert!(is_compatible(ScalarKind::I8, FormatTag::RAW_BYTE));
        assert!(!is_compatible(ScalarKind::U8, FormatTag::I8));
        assert!(is_compatible(ScalarKind::U8, FormatTag::RAW_BYTE));
    }

    #[test]
    fn test_format_str_single_letter_only() {
        assert_eq!(FormatTag::from_format_str("d"), Some(FormatTag::F64));
        assert_eq!(FormatTag::from_format_str(""), None);
        assert_eq!(FormatTag::from_format_str("<d"), None);
        assert_eq!(FormatTag::from_format_str("dd"), None);
        assert_eq!(FormatTag::from_format_str("q"), None);
    }

    #[test]
    fn test_cstr_matches_char() {
        for tag in [FormatTag::I8, FormatTag::U64, FormatTag::F32] {
            assert_eq!(tag.as_cstr().to_str().unwrap(), tag.as_char().to_string());
        }
    }

    #[test]
    fn test_read_foreign_narrowing() {
        let bytes = 1.0e300f64.to_ne_bytes();
        let pass = f32::read_foreign(&bytes, FormatTag::F64, NarrowingPolicy::PassThrough).unwrap();
        assert!(pass.is_infinite());
        let sat = f32::read_foreign(&bytes, FormatTag::F64, NarrowingPolicy::Saturate).unwrap();
        assert_eq!(sat, f32::MAX);

        let big = (i32::MAX as i64 + 5).to_ne_bytes();
        let wrapped = i32::read_foreign(&big, FormatTag::I64, NarrowingPolicy::PassThrough).unwrap();
        assert_eq!(wrapped, i32::MIN + 4);
        let clamped = i32::read_foreign(&big, FormatTag::I64, NarrowingPolicy::Saturate).unwrap();
        assert_eq!(clamped, i32::MAX);
    }

    #[test]
    fn test_read_foreign_rejects_other_family() {
        let bytes = 7i32.to_ne_bytes();
        assert_eq!(f32::read_foreign(&bytes, FormatTag::I32, NarrowingPolicy::default()), None);
        assert_eq!(u32::read_foreign(&bytes, FormatTag::I32, NarrowingPolicy::default()), None);
    }

    #[test]
    fn test_int8_reads_raw_bytes() {
        let bytes = [200u8];
        let pass = i8::read_foreign(&bytes, FormatTag::RAW_BYTE, NarrowingPolicy::PassThrough);
        assert_eq!(pass, Some(-56));
        let sat = i8::read_foreign(&bytes, FormatTag::RAW_BYTE, NarrowingPolicy::Saturate);
        assert_eq!(sat, Some(i8::MAX));
        let signed = (-3i8).to_ne_bytes();
        assert_eq!(i8::read_foreign(&signed, FormatTag::I8, NarrowingPolicy::Saturate), Some(-3));
        assert_eq!(u8::read_foreign(&signed, FormatTag::I8, NarrowingPolicy::default()), None);
    }

    #[test]
    fn test_nan_survives_saturation() {
        let bytes = f64::NAN.to_ne_bytes();
        let v = f32::read_foreign(&bytes, FormatTag::F64, NarrowingPolicy::Saturate).unwrap();
        assert!(v.is_nan());
    }
}
