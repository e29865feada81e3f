//! Catalogue of exposed types and the conversions a host may apply
//! implicitly.
//!
//! A host embedding walks [`Registry::standard`] with its own [`Binder`] to
//! create one host class per descriptor. Nothing here depends on a particular
//! host.

use std::any::TypeId;
use std::fmt;

use log::debug;
use vectra_core::{ForeignBuffer, ImportConfig, Result, ScalarKind, ShapeDescriptor, VectraError};

use crate::angle::{Deg, Rad};
use crate::bool_vector::{BoolVector2, BoolVector3, BoolVector4};
use crate::color::{Color3, Color4};
use crate::exposed::{Buffered, Exposed, ExposedObject, Family};
use crate::matrix::{
    Matrix2x2, Matrix2x3, Matrix2x4, Matrix3x2, Matrix3x3, Matrix3x4, Matrix4x2, Matrix4x3,
    Matrix4x4,
};
use crate::quaternion::Quaternion;
use crate::vector::{Vector2, Vector3, Vector4};

/// Namespace every standard type is bound under.
pub const NAMESPACE: &str = "math";

type Constructor = fn() -> Box<dyn ExposedObject>;
type BufferConstructor = fn(&ForeignBuffer<'_>, &ImportConfig) -> Result<Box<dyn ExposedObject>>;
type Converter = fn(&dyn ExposedObject) -> Option<Box<dyn ExposedObject>>;

/// Everything a host needs to publish one type.
#[derive(Clone)]
pub struct TypeDescriptor {
    pub name: &'static str,
    pub namespace: &'static str,
    pub doc: &'static str,
    pub family: Family,
    pub kind: Option<ScalarKind>,
    /// Number of indexable items.
    pub size: usize,
    /// Buffer shape, for types that support the buffer protocol.
    pub shape: Option<ShapeDescriptor>,
    type_id: TypeId,
    default: Constructor,
    zero_init: Constructor,
    from_buffer: Option<BufferConstructor>,
}

impl TypeDescriptor {
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn supports_buffer(&self) -> bool {
        self.from_buffer.is_some()
    }

    /// A default-constructed instance.
    pub fn instantiate(&self) -> Box<dyn ExposedObject> {
        (self.default)()
    }

    /// An explicitly zero-filled instance.
    pub fn zero_init(&self) -> Box<dyn ExposedObject> {
        (self.zero_init)()
    }

    pub fn from_buffer(&self, source: &ForeignBuffer<'_>) -> Result<Box<dyn ExposedObject>> {
        self.from_buffer_with(source, &ImportConfig::default())
    }

    pub fn from_buffer_with(
        &self,
        source: &ForeignBuffer<'_>,
        config: &ImportConfig,
    ) -> Result<Box<dyn ExposedObject>> {
        match self.from_buffer {
            Some(construct) => construct(source, config),
            None => Err(VectraError::InvalidBuffer(format!(
                "{} cannot be built from a buffer",
                self.name
            ))),
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field("family", &self.family)
            .field("kind", &self.kind)
            .field("size", &self.size)
            .field("shape", &self.shape)
            .finish()
    }
}

fn boxed_default<T: Exposed>() -> Box<dyn ExposedObject> {
    Box::new(T::default())
}

fn boxed_zero<T: Exposed>() -> Box<dyn ExposedObject> {
    Box::new(T::zero_init())
}

fn boxed_from_buffer<T: Buffered>(
    source: &ForeignBuffer<'_>,
    config: &ImportConfig,
) -> Result<Box<dyn ExposedObject>> {
    let value: T = T::from_buffer_with(source, config)?;
    Ok(Box::new(value))
}

/// Descriptor of a type without buffer support.
pub fn describe<T: Exposed>(namespace: &'static str) -> TypeDescriptor {
    TypeDescriptor {
        name: T::NAME,
        namespace,
        doc: T::DOC,
        family: T::FAMILY,
        kind: T::KIND,
        size: T::SIZE,
        shape: None,
        type_id: TypeId::of::<T>(),
        default: boxed_default::<T>,
        zero_init: boxed_zero::<T>,
        from_buffer: None,
    }
}

/// Descriptor of a buffer-capable type.
pub fn describe_buffered<T: Buffered>(namespace: &'static str) -> TypeDescriptor {
    TypeDescriptor {
        shape: Some(T::SHAPE),
        from_buffer: Some(boxed_from_buffer::<T>),
        ..describe::<T>(namespace)
    }
}

/// Receives one call per registered type.
pub trait Binder {
    fn bind(&mut self, namespace: &str, descriptor: &TypeDescriptor) -> Result<()>;
}

#[derive(Clone)]
struct ImplicitConversion {
    from: TypeId,
    to: &'static str,
    convert: Converter,
}

fn convert_via<F, T>(value: &dyn ExposedObject) -> Option<Box<dyn ExposedObject>>
where
    F: Exposed,
    T: Exposed + From<F>,
{
    value
        .downcast_ref::<F>()
        .map(|v| Box::new(T::from(v.clone())) as Box<dyn ExposedObject>)
}

#[derive(Clone, Default)]
pub struct Registry {
    descriptors: Vec<TypeDescriptor>,
    conversions: Vec<ImplicitConversion>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every standard type under [`NAMESPACE`], with the angle conversions
    /// wired.
    pub fn standard() -> Self {
        let ns = NAMESPACE;
        let descriptors = vec![
            describe::<Deg<f64>>(ns),
            describe::<Rad<f64>>(ns),
            describe::<BoolVector2>(ns),
            describe::<BoolVector3>(ns),
            describe::<BoolVector4>(ns),
            describe_buffered::<Vector2<f32>>(ns),
            describe_buffered::<Vector3<f32>>(ns),
            describe_buffered::<Vector4<f32>>(ns),
            describe_buffered::<Vector2<f64>>(ns),
            describe_buffered::<Vector3<f64>>(ns),
            describe_buffered::<Vector4<f64>>(ns),
            describe_buffered::<Vector2<i32>>(ns),
            describe_buffered::<Vector3<i32>>(ns),
            describe_buffered::<Vector4<i32>>(ns),
            describe_buffered::<Vector2<u32>>(ns),
            describe_buffered::<Vector3<u32>>(ns),
            describe_buffered::<Vector4<u32>>(ns),
            describe_buffered::<Color3<f32>>(ns),
            describe_buffered::<Color4<f32>>(ns),
            describe_buffered::<Color3<f64>>(ns),
            describe_buffered::<Color4<f64>>(ns),
            describe_buffered::<Color3<u8>>(ns),
            describe_buffered::<Color4<u8>>(ns),
            describe_buffered::<Color3<u32>>(ns),
            describe_buffered::<Color4<u32>>(ns),
            describe::<Quaternion<f32>>(ns),
            describe::<Quaternion<f64>>(ns),
            describe_buffered::<Matrix2x2<f32>>(ns),
            describe_buffered::<Matrix2x3<f32>>(ns),
            describe_buffered::<Matrix2x4<f32>>(ns),
            describe_buffered::<Matrix3x2<f32>>(ns),
            describe_buffered::<Matrix3x3<f32>>(ns),
            describe_buffered::<Matrix3x4<f32>>(ns),
            describe_buffered::<Matrix4x2<f32>>(ns),
            describe_buffered::<Matrix4x3<f32>>(ns),
            describe_buffered::<Matrix4x4<f32>>(ns),
            describe_buffered::<Matrix2x2<f64>>(ns),
            describe_buffered::<Matrix2x3<f64>>(ns),
            describe_buffered::<Matrix2x4<f64>>(ns),
            describe_buffered::<Matrix3x2<f64>>(ns),
            describe_buffered::<Matrix3x3<f64>>(ns),
            describe_buffered::<Matrix3x4<f64>>(ns),
            describe_buffered::<Matrix4x2<f64>>(ns),
            describe_buffered::<Matrix4x3<f64>>(ns),
            describe_buffered::<Matrix4x4<f64>>(ns),
        ];

        let mut registry = Registry { descriptors, conversions: Vec::new() };
        registry.add_angle_conversions();
        debug!(
            "standard registry: {} types, {} implicit conversions",
            registry.len(),
            registry.conversions.len()
        );
        registry
    }

    /// Adds a descriptor. Names are unique across namespaces.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Result<()> {
        if self.get(descriptor.name).is_some() {
            return Err(VectraError::DuplicateType(descriptor.name.to_string()));
        }
        debug!("registered {}.{}", descriptor.namespace, descriptor.name);
        self.descriptors.push(descriptor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    pub fn descriptor_of<T: Exposed>(&self) -> Option<&TypeDescriptor> {
        let id = TypeId::of::<T>();
        self.descriptors.iter().find(|d| d.type_id == id)
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> &[TypeDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Default-constructs the type registered as `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn ExposedObject>> {
        self.get(name)
            .map(TypeDescriptor::instantiate)
            .ok_or_else(|| VectraError::UnknownType(name.to_string()))
    }

    /// Lets `Deg` and `Rad` convert into each other implicitly. Both must be
    /// registered already.
    pub fn wire_angle_conversions(&mut self) -> Result<()> {
        for name in [<Deg<f64> as Exposed>::NAME, <Rad<f64> as Exposed>::NAME] {
            if self.get(name).is_none() {
                return Err(VectraError::UnknownType(name.to_string()));
            }
        }
        self.add_angle_conversions();
        Ok(())
    }

    fn add_angle_conversions(&mut self) {
        self.add_conversion::<Deg<f64>, Rad<f64>>();
        self.add_conversion::<Rad<f64>, Deg<f64>>();
    }

    fn add_conversion<F, T>(&mut self)
    where
        F: Exposed,
        T: Exposed + From<F>,
    {
        let from = TypeId::of::<F>();
        if self.conversions.iter().any(|c| c.from == from && c.to == T::NAME) {
            return;
        }
        debug!("implicit conversion {} -> {}", F::NAME, T::NAME);
        self.conversions.push(ImplicitConversion {
            from,
            to: T::NAME,
            convert: convert_via::<F, T>,
        });
    }

    pub fn is_implicitly_convertible(&self, from: &str, to: &str) -> bool {
        match self.get(from) {
            Some(d) => self.conversions.iter().any(|c| c.from == d.type_id && c.to == to),
            None => false,
        }
    }

    /// Converts `value` into the type registered as `target`. A value that
    /// already has the target type is cloned.
    pub fn convert_implicit(
        &self,
        value: &dyn ExposedObject,
        target: &str,
    ) -> Result<Box<dyn ExposedObject>> {
        if value.type_name() == target {
            return Ok(value.clone_boxed());
        }
        let from = value.as_any().type_id();
        self.conversions
            .iter()
            .filter(|c| c.from == from && c.to == target)
            .find_map(|c| (c.convert)(value))
            .ok_or_else(|| VectraError::NoConversion {
                from: value.type_name().to_string(),
                to: target.to_string(),
            })
    }

    /// Hands every descriptor to `binder`, in registration order. Stops at the
    /// first failure.
    pub fn bind_all<B: Binder + ?Sized>(&self, binder: &mut B) -> Result<()> {
        for descriptor in &self.descriptors {
            debug!("binding {}.{}", descriptor.namespace, descriptor.name);
            binder.bind(descriptor.namespace, descriptor)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.descriptors.iter().map(|d| d.name).collect::<Vec<_>>())
            .field("conversions", &self.conversions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposed::HostValue;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;
    use vectra_core::BufferFlags;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[derive(Default)]
    struct RecordingBinder {
        bound: Vec<String>,
        fail_on: Option<&'static str>,
    }

    impl Binder for RecordingBinder {
        fn bind(&mut self, namespace: &str, descriptor: &TypeDescriptor) -> Result<()> {
            if self.fail_on == Some(descriptor.name) {
                return Err(VectraError::Config(format!("cannot bind {}", descriptor.name)));
            }
            self.bound.push(format!("{}.{}", namespace, descriptor.name));
            Ok(())
        }
    }

    #[test]
    fn test_standard_registry_contents() {
        init_logging();
        let registry = Registry::standard();
        assert_eq!(registry.len(), 45);

        let names: HashSet<_> = registry.descriptors().iter().map(|d| d.name).collect();
        assert_eq!(names.len(), registry.len());
        for name in ["Deg", "BoolVector4", "Vector3ui", "Color4ub", "Quaterniond", "Matrix4x3d"] {
            assert!(names.contains(name), "{} missing", name);
        }

        let m = registry.get("Matrix2x3").unwrap();
        assert_eq!(m.family, Family::Matrix);
        assert_eq!(m.kind, Some(ScalarKind::F32));
        assert_eq!(m.size, 2);
        assert_eq!(m.shape, Some(ShapeDescriptor::Matrix { cols: 2, rows: 3 }));
        assert!(m.supports_buffer());

        let q = registry.descriptor_of::<Quaternion<f64>>().unwrap();
        assert_eq!(q.name, "Quaterniond");
        assert!(!q.supports_buffer());
        assert!(registry.get("Vector5").is_none());
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());
        registry.register(describe::<Deg<f64>>(NAMESPACE)).unwrap();
        let err = registry.register(describe::<Deg<f64>>("other")).unwrap_err();
        assert_eq!(err, VectraError::DuplicateType("Deg".into()));
    }

    #[test]
    fn test_create_and_zero_init() {
        let registry = Registry::standard();
        let m = registry.create("Matrix2x2d").unwrap();
        assert_eq!(m.downcast_ref::<Matrix2x2<f64>>(), Some(&Matrix2x2::identity()));

        let z = registry.get("Matrix2x2d").unwrap().zero_init();
        assert_eq!(z.downcast_ref::<Matrix2x2<f64>>(), Some(&Matrix2x2::zero()));

        let err = registry.create("Matrix5x5").unwrap_err();
        assert_eq!(err, VectraError::UnknownType("Matrix5x5".into()));
    }

    #[test]
    fn test_angle_conversions() {
        init_logging();
        let registry = Registry::standard();
        assert!(registry.is_implicitly_convertible("Deg", "Rad"));
        assert!(registry.is_implicitly_convertible("Rad", "Deg"));
        assert!(!registry.is_implicitly_convertible("Vector2", "Vector2d"));

        let rad = registry.convert_implicit(&Deg(180.0f64), "Rad").unwrap();
        let rad = rad.downcast_ref::<Rad<f64>>().unwrap();
        assert_relative_eq!(rad.0, std::f64::consts::PI);

        let same = registry.convert_implicit(&Deg(1.0f64), "Deg").unwrap();
        assert_eq!(same.downcast_ref::<Deg<f64>>(), Some(&Deg(1.0)));

        let err = registry.convert_implicit(&Vector2::new(1.0f32, 2.0), "Vector2d").unwrap_err();
        assert_eq!(
            err,
            VectraError::NoConversion { from: "Vector2".into(), to: "Vector2d".into() }
        );
    }

    #[test]
    fn test_wire_angle_conversions_needs_both_types() {
        let mut registry = Registry::new();
        registry.register(describe::<Deg<f64>>(NAMESPACE)).unwrap();
        let err = registry.wire_angle_conversions().unwrap_err();
        assert_eq!(err, VectraError::UnknownType("Rad".into()));

        registry.register(describe::<Rad<f64>>(NAMESPACE)).unwrap();
        registry.wire_angle_conversions().unwrap();
        registry.wire_angle_conversions().unwrap();
        assert!(registry.is_implicitly_convertible("Deg", "Rad"));
        assert_eq!(registry.conversions.len(), 2);
    }

    #[test]
    fn test_bind_all() {
        init_logging();
        let registry = Registry::standard();
        let mut binder = RecordingBinder::default();
        registry.bind_all(&mut binder).unwrap();
        assert_eq!(binder.bound.len(), registry.len());
        assert_eq!(binder.bound[0], "math.Deg");
        assert!(binder.bound.iter().all(|b| b.starts_with("math.")));

        let mut failing = RecordingBinder { fail_on: Some("Color3"), ..Default::default() };
        assert!(registry.bind_all(&mut failing).is_err());
        assert!(!failing.bound.iter().any(|b| b.ends_with(".Color3")));
        assert!(failing.bound.len() < registry.len());
    }

    #[test]
    fn test_buffer_round_trip_through_descriptors() {
        init_logging();
        let registry = Registry::standard();
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);

        for descriptor in registry.descriptors().iter().filter(|d| d.supports_buffer()) {
            let mut value = descriptor.instantiate();
            for i in 0..value.size() {
                let randomized = match value.get_item(i).unwrap() {
                    HostValue::Float(_) => HostValue::Float(rng.gen_range(-8.0..8.0f32) as f64),
                    HostValue::Int(_) => HostValue::Int(rng.gen_range(0..200)),
                    HostValue::Object(mut column) => {
                        for r in 0..column.size() {
                            let v = HostValue::Float(rng.gen_range(-8.0..8.0f32) as f64);
                            column.set_item(r, &v).unwrap();
                        }
                        HostValue::Object(column)
                    }
                    HostValue::Bool(b) => HostValue::Bool(b),
                };
                value.set_item(i, &randomized).unwrap();
            }

            let mut exported = value.clone_boxed();
            let mut view = exported.export_buffer(BufferFlags::FULL).unwrap();
            let raw = view.to_raw();
            let source = unsafe { ForeignBuffer::from_raw(&raw) }.unwrap();
            let imported = descriptor.from_buffer(&source).unwrap();
            assert!(imported.eq_dyn(value.as_ref()), "{} did not round-trip", descriptor.name);
        }
    }

    #[test]
    fn test_buffer_construction_unsupported() {
        let registry = Registry::standard();
        let data = [1.0f64, 0.0, 0.0, 0.0];
        let err = registry
            .get("Quaterniond")
            .unwrap()
            .from_buffer(&ForeignBuffer::from_slice(&data))
            .unwrap_err();
        assert!(matches!(err, VectraError::InvalidBuffer(_)));
    }
}
