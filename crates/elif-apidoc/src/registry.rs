use crate::{
    descriptor::{Describe, TypeIdentity},
    specification::{Schema, SchemaRef},
};
use std::collections::{BTreeMap, HashMap};

/// Component schemas registered during one generation call
///
/// A name, once present, always resolves to the same body: later visits of
/// the same type get a reference instead of a second derivation.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Schema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Body behind a reference, if the reference points into this registry
    pub fn resolve<'a>(&'a self, schema: &'a SchemaRef) -> Option<&'a Schema> {
        match schema {
            SchemaRef::Inline(body) => Some(&**body),
            SchemaRef::Ref(_) => schema.component_name().and_then(|name| self.get(name)),
        }
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Claim a name for a struct whose fields are about to be derived
    ///
    /// The placeholder is an empty object; [`SchemaRegistry::insert`]
    /// replaces it once the fields are known.
    pub fn reserve(&mut self, name: &str) {
        self.schemas
            .entry(name.to_string())
            .or_insert_with(|| Schema::object(BTreeMap::new()));
    }

    pub fn insert(&mut self, name: &str, schema: Schema) {
        self.schemas.insert(name.to_string(), schema);
    }

    pub fn reference(&self, name: &str) -> SchemaRef {
        SchemaRef::component(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn into_schemas(self) -> BTreeMap<String, Schema> {
        self.schemas
    }
}

/// Caller-supplied schemas for types that should not be derived
///
/// Typical entries are types with a custom wire format, such as timestamps
/// serialized as RFC 3339 strings. An entry takes precedence over structural
/// derivation.
#[derive(Debug, Clone, Default)]
pub struct KnownTypes {
    schemas: HashMap<TypeIdentity, Schema>,
}

impl KnownTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the override for a described type
    pub fn with<T: Describe + ?Sized>(self, schema: Schema) -> Self {
        self.with_identity(T::describe().identity, schema)
    }

    pub fn with_identity(mut self, identity: TypeIdentity, schema: Schema) -> Self {
        self.insert(identity, schema);
        self
    }

    pub fn insert(&mut self, identity: TypeIdentity, schema: Schema) {
        self.schemas.insert(identity, schema);
    }

    pub fn get(&self, identity: &TypeIdentity) -> Option<&Schema> {
        self.schemas.get(identity)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
