/*!
Schema derivation: turns type descriptors into component schemas.

Named structs and known-type overrides are registered once under their
normalized name and referenced everywhere else. Primitives and sequences are
inlined at their point of use. A struct claims its name before its fields are
walked, so a type that reaches itself through its own fields resolves to a
reference instead of recursing forever.
*/

use crate::{
    descriptor::{FieldDescriptor, TypeDescriptor, TypeIdentity, TypeKind},
    error::{OpenApiError, OpenApiResult},
    naming::NameNormalizer,
    registry::{KnownTypes, SchemaRegistry},
    specification::{Schema, SchemaRef},
};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// How a type was reached during derivation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeriveOptions {
    /// Reached through an optional wrapper
    pub optional: bool,
    /// Derived only to be flattened into an enclosing object
    pub embedded: bool,
}

impl DeriveOptions {
    pub fn embedded() -> Self {
        Self {
            optional: false,
            embedded: true,
        }
    }
}

/// Converts type descriptors into schemas for a single document
pub struct SchemaBuilder<'a> {
    registry: SchemaRegistry,
    /// Structs whose fields are being walked; their registry entry is still a placeholder
    in_progress: HashSet<String>,
    /// Structs currently being flattened into an enclosing object
    flattening: HashSet<String>,
    known_types: &'a KnownTypes,
    normalizer: &'a NameNormalizer,
}

impl<'a> SchemaBuilder<'a> {
    /// Create a builder with an empty registry
    pub fn new(known_types: &'a KnownTypes, normalizer: &'a NameNormalizer) -> Self {
        Self {
            registry: SchemaRegistry::new(),
            in_progress: HashSet::new(),
            flattening: HashSet::new(),
            known_types,
            normalizer,
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> SchemaRegistry {
        self.registry
    }

    /// Derive the schema of a top-level payload type
    pub fn schema_for(&mut self, ty: &TypeDescriptor) -> OpenApiResult<SchemaRef> {
        self.derive_schema(ty, DeriveOptions::default())
    }

    /// Derive the schema of a type, registering named structs on the way
    pub fn derive_schema(
        &mut self,
        ty: &TypeDescriptor,
        opts: DeriveOptions,
    ) -> OpenApiResult<SchemaRef> {
        let identity = Self::candidate_identity(ty);

        if !identity.is_anonymous() {
            let name = self.normalizer.normalize(&identity.path, &identity.name);

            // Already registered (or being registered further up the stack).
            // A placeholder has no properties to copy, so a struct flattened
            // while its own fields are still being walked is walked again.
            if self.registry.contains(&name) && !self.rewalk_for_flattening(&name, ty, opts) {
                return Ok(self.registry.reference(&name));
            }

            if let Some(known) = self.known_types.get(&identity) {
                debug!("Registering known type {} as {}", identity, name);
                self.registry.insert(&name, known.clone());
                return Ok(self.registry.reference(&name));
            }
        }

        match &ty.kind {
            TypeKind::Sequence(elem) => {
                let items = self.derive_schema(&elem.resolve(), DeriveOptions::default())?;
                Ok(SchemaRef::inline(Schema::array(items)))
            }
            TypeKind::Primitive(kind) => Ok(SchemaRef::inline(Schema::primitive(
                *kind,
                opts.optional,
            ))),
            // The pointer adds no schema layer; optionality lands on the pointee.
            TypeKind::Pointer(elem) => {
                let elem = elem.resolve();
                let opts = DeriveOptions {
                    optional: true,
                    embedded: opts.embedded && self.is_in_progress(&elem),
                };
                self.derive_schema(&elem, opts)
            }
            TypeKind::Struct(fields) => self.derive_struct(ty, fields, opts),
            TypeKind::Opaque => Err(OpenApiError::unsupported_type(
                &ty.identity.path,
                &ty.identity.name,
            )),
        }
    }

    fn derive_struct(
        &mut self,
        ty: &TypeDescriptor,
        fields: &[FieldDescriptor],
        opts: DeriveOptions,
    ) -> OpenApiResult<SchemaRef> {
        // Anonymous names depend on how many schemas exist when the type is
        // first reached, so they follow traversal order.
        let name = if ty.identity.is_anonymous() {
            format!("AnonymousType{}", self.registry.len())
        } else {
            self.normalizer.normalize(&ty.identity.path, &ty.identity.name)
        };

        if opts.embedded && !ty.identity.is_anonymous() && self.flattening.contains(&name) {
            warn!("Schema {} flattens itself; no properties to flatten", name);
            return Ok(SchemaRef::inline(Schema::object(BTreeMap::new())));
        }

        let tracking = if opts.embedded {
            &mut self.flattening
        } else {
            self.registry.reserve(&name);
            &mut self.in_progress
        };
        tracking.insert(name.clone());

        let properties = self.derive_properties(fields);

        if opts.embedded {
            self.flattening.remove(&name);
        } else {
            self.in_progress.remove(&name);
        }

        let body = Schema::object(properties?);
        if opts.embedded {
            return Ok(SchemaRef::inline(body));
        }

        debug!("Registered schema {} ({})", name, ty.identity);
        self.registry.insert(&name, body);
        Ok(self.registry.reference(&name))
    }

    fn derive_properties(
        &mut self,
        fields: &[FieldDescriptor],
    ) -> OpenApiResult<BTreeMap<String, SchemaRef>> {
        let mut properties = BTreeMap::new();
        for field in fields.iter().filter(|field| field.visible) {
            let field_ty = field.ty.resolve();

            if field.embedded {
                self.flatten_into(&mut properties, field, &field_ty)?;
                continue;
            }

            let schema = self.derive_schema(&field_ty, DeriveOptions::default())?;
            properties.insert(field.exposed_name().to_string(), schema);
        }
        Ok(properties)
    }

    /// Whether a struct reserved under `name` must be walked again to be flattened
    fn rewalk_for_flattening(&self, name: &str, ty: &TypeDescriptor, opts: DeriveOptions) -> bool {
        opts.embedded && matches!(ty.kind, TypeKind::Struct(_)) && self.in_progress.contains(name)
    }

    fn is_in_progress(&self, ty: &TypeDescriptor) -> bool {
        !ty.identity.is_anonymous()
            && self
                .in_progress
                .contains(&self.normalizer.normalize(&ty.identity.path, &ty.identity.name))
    }

    /// Copy the properties of an embedded field's type into `properties`
    fn flatten_into(
        &mut self,
        properties: &mut BTreeMap<String, SchemaRef>,
        field: &FieldDescriptor,
        field_ty: &TypeDescriptor,
    ) -> OpenApiResult<()> {
        let embedded = self.derive_schema(field_ty, DeriveOptions::embedded())?;

        // A reference means the type is registered on its own; copy from the
        // stored body.
        match self.registry.resolve(&embedded) {
            Some(Schema::Object(object)) => {
                for (name, schema) in &object.properties {
                    properties.insert(name.clone(), schema.clone());
                }
            }
            Some(other) => warn!(
                "Embedded field {} has {} schema; no properties to flatten",
                field.ident,
                other.type_name()
            ),
            None => warn!(
                "Embedded field {} references an unregistered schema",
                field.ident
            ),
        }
        Ok(())
    }

    /// Identity used for the memo and known-type lookups
    ///
    /// Optional wrappers share their pointee's path under a `Ptr` suffixed
    /// name, so they never collide with the pointee's own registration.
    fn candidate_identity(ty: &TypeDescriptor) -> TypeIdentity {
        match &ty.kind {
            TypeKind::Pointer(elem) => {
                let elem = elem.resolve();
                if elem.identity.is_anonymous() {
                    TypeIdentity::anonymous()
                } else {
                    TypeIdentity::new(elem.identity.path, format!("{}Ptr", elem.identity.name))
                }
            }
            _ => ty.identity.clone(),
        }
    }
}
