/*!
Type descriptors: the shape information schema derivation walks.

Rust has no runtime reflection, so every type that appears in a route's
request or response position describes itself through [`Describe`]. The
derive macro in `elif-apidoc-derive` covers structs; the impls in this module
cover the standard library types that map onto schema kinds.
*/

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Types that can describe their own shape for schema derivation
pub trait Describe {
    /// Build the descriptor for this type
    fn describe() -> TypeDescriptor;
}

/// Declaring module path plus local name of a type
///
/// Both parts are empty for anonymous types (sequences, hand-built
/// anonymous structs).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TypeIdentity {
    pub path: String,
    pub name: String,
}

impl TypeIdentity {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    /// Identity of a type without a name
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.path, self.name)
    }
}

/// Scalar families that map directly onto a schema type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Integer,
    Number,
    String,
    Boolean,
}

/// Lazily resolved handle to a type descriptor
///
/// Resolution is deferred so that self-referential types (`Node { next:
/// Option<Box<Node>> }`) can be described without building an infinite tree.
#[derive(Clone, Copy)]
pub struct TypeRef(fn() -> TypeDescriptor);

impl TypeRef {
    pub fn new(describe: fn() -> TypeDescriptor) -> Self {
        Self(describe)
    }

    /// Handle to the descriptor of `T`
    pub fn of<T: Describe + ?Sized>() -> Self {
        Self(T::describe)
    }

    pub fn resolve(&self) -> TypeDescriptor {
        (self.0)()
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Identity only: printing the whole target recurses on cyclic types.
        let target = self.resolve();
        f.debug_tuple("TypeRef").field(&target.identity).finish()
    }
}

/// Shape of a described type
#[derive(Debug, Clone)]
pub enum TypeKind {
    Primitive(PrimitiveKind),
    /// Optional wrapper around another type
    Pointer(TypeRef),
    Sequence(TypeRef),
    /// Fields in declaration order
    Struct(Vec<FieldDescriptor>),
    /// A type with no structural description; only derivable through a
    /// known-type override
    Opaque,
}

/// One field of a struct descriptor
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Declared field identifier
    pub ident: String,
    /// Explicit serialization name, if the field is renamed on the wire
    pub serialized_name: Option<String>,
    pub ty: TypeRef,
    /// Only visible fields appear in the schema
    pub visible: bool,
    /// Embedded fields are flattened into the enclosing object
    pub embedded: bool,
}

impl FieldDescriptor {
    pub fn new(ident: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            ident: ident.into(),
            serialized_name: None,
            ty,
            visible: true,
            embedded: false,
        }
    }

    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.serialized_name = Some(name.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    /// Name the field is exposed under in the document
    pub fn exposed_name(&self) -> &str {
        match &self.serialized_name {
            Some(name) if !name.is_empty() => name,
            _ => &self.ident,
        }
    }
}

/// Shape and identity of a type
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub identity: TypeIdentity,
    pub kind: TypeKind,
}

impl TypeDescriptor {
    pub fn new(identity: TypeIdentity, kind: TypeKind) -> Self {
        Self { identity, kind }
    }

    pub fn primitive(name: &str, kind: PrimitiveKind) -> Self {
        Self::new(TypeIdentity::new("", name), TypeKind::Primitive(kind))
    }

    pub fn pointer(elem: TypeRef) -> Self {
        Self::new(TypeIdentity::anonymous(), TypeKind::Pointer(elem))
    }

    pub fn sequence(elem: TypeRef) -> Self {
        Self::new(TypeIdentity::anonymous(), TypeKind::Sequence(elem))
    }

    pub fn structure(path: &str, name: &str, fields: Vec<FieldDescriptor>) -> Self {
        Self::new(TypeIdentity::new(path, name), TypeKind::Struct(fields))
    }

    pub fn opaque(path: &str, name: &str) -> Self {
        Self::new(TypeIdentity::new(path, name), TypeKind::Opaque)
    }

    /// Short label of the kind, used in log events
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            TypeKind::Primitive(_) => "primitive",
            TypeKind::Pointer(_) => "pointer",
            TypeKind::Sequence(_) => "sequence",
            TypeKind::Struct(_) => "struct",
            TypeKind::Opaque => "opaque",
        }
    }
}

macro_rules! describe_primitive {
    ($kind:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::primitive(stringify!($ty), PrimitiveKind::$kind)
                }
            }
        )+
    };
}

describe_primitive!(Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
describe_primitive!(Number => f32, f64);
describe_primitive!(String => String, str, char);
describe_primitive!(Boolean => bool);

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::pointer(TypeRef::of::<T>())
    }
}

// Smart pointers are transparent on the wire.
impl<T: Describe + ?Sized> Describe for Box<T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

impl<T: Describe + ?Sized> Describe for Rc<T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

impl<T: Describe + ?Sized> Describe for Arc<T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

impl<T: Describe + ?Sized> Describe for &T {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

macro_rules! describe_sequence {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl<T: Describe> Describe for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::sequence(TypeRef::of::<T>())
                }
            }
        )+
    };
}

describe_sequence!(Vec<T>, VecDeque<T>, [T], HashSet<T>, BTreeSet<T>);

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::sequence(TypeRef::of::<T>())
    }
}

impl<K, V> Describe for HashMap<K, V> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::opaque("std::collections", "HashMap")
    }
}

impl<K, V> Describe for BTreeMap<K, V> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::opaque("std::collections", "BTreeMap")
    }
}

impl Describe for () {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::opaque("", "()")
    }
}
