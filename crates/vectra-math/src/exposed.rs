//! The surface a dynamic host binds against.
//!
//! Every exposed type implements [`Exposed`]: a name, a doc string, a fixed
//! component count and indexed access. [`ExposedObject`] erases the concrete
//! type so a host can hold any of them behind one pointer, and [`HostValue`]
//! is what crosses the boundary on item access.

use std::any::Any;
use std::fmt;

use vectra_core::error::check_index;
use vectra_core::{
    export_view, import_into, import_into_with, BufferFlags, BufferLayout, BufferView,
    ForeignBuffer, ImportConfig, Result, ScalarKind, VectraError,
};

/// Groups of exposed types sharing a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Angle,
    BoolVector,
    Vector,
    Color,
    Quaternion,
    Matrix,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Family::Angle => "angle",
            Family::BoolVector => "bool vector",
            Family::Vector => "vector",
            Family::Color => "color",
            Family::Quaternion => "quaternion",
            Family::Matrix => "matrix",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Host values
// ============================================================================

/// A value as the host sees it.
#[derive(Debug)]
pub enum HostValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Object(Box<dyn ExposedObject>),
}

impl HostValue {
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            HostValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            HostValue::Int(i) => Some(i),
            _ => None,
        }
    }

    /// Floats, and integers widened to float.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            HostValue::Float(v) => Some(v),
            HostValue::Int(i) => Some(i as f64),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&dyn ExposedObject> {
        match self {
            HostValue::Object(obj) => Some(obj.as_ref()),
            _ => None,
        }
    }

    /// Host-side type name, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::Bool(_) => "bool",
            HostValue::Int(_) => "int",
            HostValue::Float(_) => "float",
            HostValue::Object(obj) => obj.type_name(),
        }
    }
}

impl Clone for HostValue {
    fn clone(&self) -> Self {
        match self {
            HostValue::Bool(b) => HostValue::Bool(*b),
            HostValue::Int(i) => HostValue::Int(*i),
            HostValue::Float(v) => HostValue::Float(*v),
            HostValue::Object(obj) => HostValue::Object(obj.clone_boxed()),
        }
    }
}

impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HostValue::Bool(a), HostValue::Bool(b)) => a == b,
            (HostValue::Int(a), HostValue::Int(b)) => a == b,
            (HostValue::Float(a), HostValue::Float(b)) => a == b,
            (HostValue::Object(a), HostValue::Object(b)) => a.eq_dyn(b.as_ref()),
            _ => false,
        }
    }
}

/// Conversion of a component type to and from [`HostValue`].
pub trait HostConvert: Sized {
    /// Host-side name of the expected type.
    const HOST_TYPE: &'static str;

    fn into_host(self) -> HostValue;

    /// `None` when the host value has the wrong type or is out of range.
    fn from_host(value: &HostValue) -> Option<Self>;
}

impl HostConvert for bool {
    const HOST_TYPE: &'static str = "bool";

    fn into_host(self) -> HostValue {
        HostValue::Bool(self)
    }

    fn from_host(value: &HostValue) -> Option<Self> {
        value.as_bool()
    }
}

macro_rules! host_int {
    ($($t:ty),+) => {$(
        impl HostConvert for $t {
            const HOST_TYPE: &'static str = "int";

            fn into_host(self) -> HostValue {
                HostValue::Int(i64::from(self))
            }

            fn from_host(value: &HostValue) -> Option<Self> {
                value.as_i64().and_then(|i| <$t>::try_from(i).ok())
            }
        }
    )+};
}

host_int!(i8, u8, i32, u32);

macro_rules! host_float {
    ($($t:ty),+) => {$(
        impl HostConvert for $t {
            const HOST_TYPE: &'static str = "float";

            fn into_host(self) -> HostValue {
                HostValue::Float(f64::from(self))
            }

            fn from_host(value: &HostValue) -> Option<Self> {
                value.as_f64().map(|v| v as $t)
            }
        }
    )+};
}

host_float!(f32, f64);

// ============================================================================
// Exposed types
// ============================================================================

/// Schema and indexed access shared by every exposed type.
pub trait Exposed:
    Clone + PartialEq + Default + fmt::Debug + fmt::Display + 'static
{
    /// What indexing yields: a scalar, a bool, or a column for matrices.
    type Item: HostConvert;

    const NAME: &'static str;
    const DOC: &'static str;
    const FAMILY: Family;
    /// Element kind, for types with a scalar storage.
    const KIND: Option<ScalarKind>;
    /// Number of indexable items.
    const SIZE: usize;

    /// Explicitly zero-filled instance. Differs from `default()` for
    /// matrices and quaternions, which default to identity.
    fn zero_init() -> Self;

    /// Item at `index`. Callers guarantee `index < SIZE`.
    fn item(&self, index: usize) -> Self::Item;

    /// Replaces the item at `index`. Callers guarantee `index < SIZE`.
    fn put_item(&mut self, index: usize, value: Self::Item);

    fn len(&self) -> usize {
        Self::SIZE
    }

    fn get(&self, index: usize) -> Result<Self::Item> {
        check_index(index, Self::SIZE)?;
        Ok(self.item(index))
    }

    fn set(&mut self, index: usize, value: Self::Item) -> Result<()> {
        check_index(index, Self::SIZE)?;
        self.put_item(index, value);
        Ok(())
    }

    fn repr(&self) -> String {
        self.to_string()
    }

    /// Buffer view over the value's own storage, for buffer-capable types.
    fn buffer_view(&mut self, _flags: BufferFlags) -> Option<BufferView<'_>> {
        None
    }
}

/// Exposed types with a buffer layout.
pub trait Buffered: Exposed + BufferLayout {
    fn from_buffer(source: &ForeignBuffer<'_>) -> Result<Self> {
        import_into(source)
    }

    fn from_buffer_with(source: &ForeignBuffer<'_>, config: &ImportConfig) -> Result<Self> {
        import_into_with(source, config)
    }

    fn view(&mut self, flags: BufferFlags) -> BufferView<'_> {
        export_view(self, flags)
    }
}

impl<T: Exposed + BufferLayout> Buffered for T {}

// ============================================================================
// Type-erased objects
// ============================================================================

/// Object-safe face of [`Exposed`].
pub trait ExposedObject: fmt::Debug {
    fn type_name(&self) -> &'static str;
    fn family(&self) -> Family;
    fn size(&self) -> usize;
    fn get_item(&self, index: usize) -> Result<HostValue>;
    fn set_item(&mut self, index: usize, value: &HostValue) -> Result<()>;
    fn to_repr(&self) -> String;
    fn eq_dyn(&self, other: &dyn ExposedObject) -> bool;
    fn clone_boxed(&self) -> Box<dyn ExposedObject>;
    fn export_buffer(&mut self, flags: BufferFlags) -> Option<BufferView<'_>>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Exposed> ExposedObject for T {
    fn type_name(&self) -> &'static str {
        T::NAME
    }

    fn family(&self) -> Family {
        T::FAMILY
    }

    fn size(&self) -> usize {
        T::SIZE
    }

    fn get_item(&self, index: usize) -> Result<HostValue> {
        self.get(index).map(HostConvert::into_host)
    }

    fn set_item(&mut self, index: usize, value: &HostValue) -> Result<()> {
        check_index(index, T::SIZE)?;
        let item = T::Item::from_host(value).ok_or(VectraError::TypeMismatch {
            expected: T::Item::HOST_TYPE,
        })?;
        self.put_item(index, item);
        Ok(())
    }

    fn to_repr(&self) -> String {
        self.repr()
    }

    fn eq_dyn(&self, other: &dyn ExposedObject) -> bool {
        other.as_any().downcast_ref::<T>() == Some(self)
    }

    fn clone_boxed(&self) -> Box<dyn ExposedObject> {
        Box::new(self.clone())
    }

    fn export_buffer(&mut self, flags: BufferFlags) -> Option<BufferView<'_>> {
        self.buffer_view(flags)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl dyn ExposedObject + '_ {
    pub fn downcast_ref<T: Exposed>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    pub fn downcast_mut<T: Exposed>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    pub fn is<T: Exposed>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

impl Clone for Box<dyn ExposedObject> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

impl PartialEq for dyn ExposedObject + '_ {
    fn eq(&self, other: &Self) -> bool {
        self.eq_dyn(other)
    }
}

/// Items of `obj` in index order, stopping at the first out-of-range index
/// the same way a host's index-based iteration does.
pub fn iter_items(obj: &dyn ExposedObject) -> impl Iterator<Item = HostValue> + '_ {
    (0..).map_while(move |i| obj.get_item(i).ok())
}

/// Boxes an exposed value so it can cross the host boundary as an object.
/// Matrix columns travel this way.
macro_rules! host_object {
    ($($t:ty),+ $(,)?) => {$(
        impl $crate::exposed::HostConvert for $t {
            const HOST_TYPE: &'static str = <$t as $crate::exposed::Exposed>::NAME;

            fn into_host(self) -> $crate::exposed::HostValue {
                $crate::exposed::HostValue::Object(Box::new(self))
            }

            fn from_host(value: &$crate::exposed::HostValue) -> Option<Self> {
                value.as_object().and_then(|obj| obj.downcast_ref::<$t>()).copied()
            }
        }
    )+};
}

pub(crate) use host_object;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Matrix2x2;
    use crate::vector::{Vector2, Vector3};

    #[test]
    fn test_get_set_bounds() {
        let mut v = Vector3::new(1.0f32, 2.0, 3.0);
        assert_eq!(Exposed::len(&v), 3);
        assert_eq!(v.get(2).unwrap(), 3.0);
        v.set(0, 7.0).unwrap();
        assert_eq!(v.x(), 7.0);

        let err = v.get(3).unwrap_err();
        assert!(err.is_index_error());
        assert_eq!(err, VectraError::IndexOutOfRange { index: 3, len: 3 });
        assert!(v.set(3, 0.0).is_err());
    }

    #[test]
    fn test_object_item_access() {
        let mut obj: Box<dyn ExposedObject> = Box::new(Vector2::new(1i32, -2));
        assert_eq!(obj.type_name(), "Vector2i");
        assert_eq!(obj.family(), Family::Vector);
        assert_eq!(obj.get_item(1).unwrap(), HostValue::Int(-2));

        obj.set_item(0, &HostValue::Int(5)).unwrap();
        assert_eq!(obj.downcast_ref::<Vector2<i32>>(), Some(&Vector2::new(5, -2)));

        let err = obj.set_item(0, &HostValue::Float(1.5)).unwrap_err();
        assert_eq!(err, VectraError::TypeMismatch { expected: "int" });
        let err = obj.set_item(2, &HostValue::Int(1)).unwrap_err();
        assert!(err.is_index_error());
    }

    #[test]
    fn test_unsigned_items_reject_out_of_range() {
        let mut obj: Box<dyn ExposedObject> = Box::new(Vector2::new(1u32, 2));
        assert!(obj.set_item(0, &HostValue::Int(-1)).is_err());
        assert!(obj.set_item(0, &HostValue::Int(1 << 40)).is_err());
        obj.set_item(0, &HostValue::Int(4_000_000_000)).unwrap();
        assert_eq!(obj.get_item(0).unwrap(), HostValue::Int(4_000_000_000));
    }

    #[test]
    fn test_float_items_accept_ints() {
        let mut v = Vector2::new(0.5f64, 0.25);
        ExposedObject::set_item(&mut v, 1, &HostValue::Int(3)).unwrap();
        assert_eq!(v, Vector2::new(0.5, 3.0));
    }

    #[test]
    fn test_iteration_ends_at_size() {
        let v = Vector3::new(1.0f64, 2.0, 3.0);
        let items: Vec<f64> = iter_items(&v).filter_map(|h| h.as_f64()).collect();
        assert_eq!(items, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_matrix_items_are_columns() {
        let mut m = Matrix2x2::from_columns([Vector2::new(1.0f32, 2.0), Vector2::new(3.0, 4.0)]);
        let column = ExposedObject::get_item(&m, 1).unwrap();
        assert_eq!(column.type_name(), "Vector2");
        assert_eq!(
            column.as_object().and_then(|c| c.downcast_ref::<Vector2<f32>>()),
            Some(&Vector2::new(3.0, 4.0))
        );

        let replacement = HostValue::Object(Box::new(Vector2::new(9.0f32, 8.0)));
        ExposedObject::set_item(&mut m, 0, &replacement).unwrap();
        assert_eq!(m[0], Vector2::new(9.0, 8.0));

        let wrong = HostValue::Object(Box::new(Vector2::new(9.0f64, 8.0)));
        let err = ExposedObject::set_item(&mut m, 0, &wrong).unwrap_err();
        assert_eq!(err, VectraError::TypeMismatch { expected: "Vector2" });
        assert_eq!(iter_items(&m).count(), 2);
    }

    #[test]
    fn test_dyn_equality_and_clone() {
        let a: Box<dyn ExposedObject> = Box::new(Vector2::new(1.0f32, 2.0));
        let b = a.clone();
        let c: Box<dyn ExposedObject> = Box::new(Vector2::new(1.0f64, 2.0));
        assert!(a.eq_dyn(b.as_ref()));
        assert!(!a.eq_dyn(c.as_ref()));
        assert_eq!(HostValue::Object(a.clone()), HostValue::Object(b));
        assert!(a.is::<Vector2<f32>>());
    }

    fn first_as_f32(obj: &dyn ExposedObject) -> Option<f32> {
        obj.downcast_ref::<Vector2<f32>>().map(|v| v.x())
    }

    #[test]
    fn test_downcast_through_borrowed_object() {
        let mut v = Vector2::new(1.5f32, 2.0);
        assert_eq!(first_as_f32(&v), Some(1.5));
        {
            let obj: &mut dyn ExposedObject = &mut v;
            assert!(obj.is::<Vector2<f32>>());
            if let Some(inner) = obj.downcast_mut::<Vector2<f32>>() {
                *inner = Vector2::new(4.0, 2.0);
            }
            assert!(obj.downcast_ref::<Vector2<f64>>().is_none());
        }
        let w = Vector2::new(4.0f32, 2.0);
        assert!(*(&v as &dyn ExposedObject) == *(&w as &dyn ExposedObject));
        assert_eq!(first_as_f32(&v), Some(4.0));
    }

    #[test]
    fn test_repr_matches_display() {
        let v = Vector3::new(1i32, 2, 3);
        assert_eq!(v.repr(), "Vector(1, 2, 3)");
        assert_eq!(ExposedObject::to_repr(&v), v.to_string());
    }

    #[test]
    fn test_buffer_capable_types_export() {
        let mut v = Vector3::new(1.0f32, 2.0, 3.0);
        let view = ExposedObject::export_buffer(&mut v, BufferFlags::FULL).unwrap();
        assert_eq!(view.len(), 12);
        assert_eq!(view.shape(), Some(&[3isize][..]));

        let mut q = crate::quaternion::Quaternion::<f32>::identity();
        assert!(ExposedObject::export_buffer(&mut q, BufferFlags::FULL).is_none());
    }

    #[test]
    fn test_buffered_import() {
        let data = [1.0f64, 2.0, 3.0];
        let v = Vector3::<f32>::from_buffer(&ForeignBuffer::from_slice(&data)).unwrap();
        assert_eq!(v, Vector3::new(1.0, 2.0, 3.0));

        let err = Vector3::<i32>::from_buffer(&ForeignBuffer::from_slice(&data)).unwrap_err();
        assert!(matches!(err, VectraError::FormatMismatch { .. }));
    }
}
