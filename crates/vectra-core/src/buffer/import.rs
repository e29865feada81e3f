use log::trace;

use crate::buffer::{BufferLayout, ForeignBuffer};
use crate::config::{ImportConfig, NarrowingPolicy};
use crate::dtype::{is_compatible, Element, FormatTag};
use crate::shape::ShapeDescriptor;
use crate::{Result, VectraError};

/// Builds a `T` from `source` with the default narrowing policy.
pub fn import_into<T: BufferLayout>(source: &ForeignBuffer<'_>) -> Result<T> {
    import_into_with(source, &ImportConfig::default())
}

/// Builds a `T` from `source`.
///
/// Dimension count, shape and format are all checked before anything is
/// read; a failing call never yields a partially filled value.
pub fn import_into_with<T: BufferLayout>(
    source: &ForeignBuffer<'_>,
    config: &ImportConfig,
) -> Result<T> {
    let target = T::SHAPE;
    let kind = <T::Element as Element>::KIND;

    if source.ndim() != target.ndim() {
        trace!("import rejected: {} dims into {}", source.ndim(), target);
        return Err(VectraError::DimensionMismatch {
            expected: target.ndim(),
            got: source.ndim(),
        });
    }

    let expected = target.dims();
    if source.shape() != expected.as_slice() {
        trace!("import rejected: shape {:?} into {}", source.shape(), target);
        return Err(VectraError::SizeMismatch {
            expected: expected.to_vec(),
            got: source.shape().to_vec(),
        });
    }

    let tag = match FormatTag::from_format_str(source.format()) {
        Some(tag) if is_compatible(kind, tag) && tag.item_size() == source.itemsize() => tag,
        _ => {
            trace!("import rejected: format {:?} into {}", source.format(), kind);
            return Err(VectraError::FormatMismatch {
                format: source.format().to_string(),
                expected: kind,
            });
        }
    };

    let policy = config.narrowing;
    let mut out = T::zeroed();
    let components = out.components_mut();
    match target {
        ShapeDescriptor::Vector { components: n } => {
            for (i, slot) in components.iter_mut().enumerate().take(n) {
                *slot = read_element(source, &[i], tag, policy)?;
            }
        }
        ShapeDescriptor::Matrix { cols, rows } => {
            // The source is indexed [row, col]; native storage is column-major.
            for col in 0..cols {
                for row in 0..rows {
                    components[col * rows + row] = read_element(source, &[row, col], tag, policy)?;
                }
            }
        }
    }
    Ok(out)
}

#[inline]
fn read_element<E: Element>(
    source: &ForeignBuffer<'_>,
    index: &[usize],
    tag: FormatTag,
    policy: NarrowingPolicy,
) -> Result<E> {
    let bytes = source
        .element_bytes(index)
        .ok_or_else(|| VectraError::InvalidBuffer(format!("no element at {index:?}")))?;
    E::read_foreign(bytes, tag, policy).ok_or_else(|| VectraError::FormatMismatch {
        format: tag.to_string(),
        expected: E::KIND,
    })
}
