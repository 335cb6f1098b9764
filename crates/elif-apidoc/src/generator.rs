use crate::{
    config::OpenApiConfig,
    error::{GenerationFailure, OpenApiResult},
    finalize::DocumentFinalizer,
    registry::KnownTypes,
    routes::{Method, MethodSpec, Route},
    schema::SchemaBuilder,
    specification::*,
};
use axum::http::StatusCode;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Main OpenAPI document generator
///
/// Holds the read-only inputs shared across generation calls. Every call to
/// [`OpenApiGenerator::generate`] builds its own schema registry, so one
/// generator can serve several route tables concurrently.
#[derive(Debug, Clone, Default)]
pub struct OpenApiGenerator {
    /// Configuration
    config: OpenApiConfig,
    /// Schemas that bypass structural derivation
    known_types: KnownTypes,
}

impl OpenApiGenerator {
    /// Create a new OpenAPI generator
    pub fn new(config: OpenApiConfig) -> Self {
        Self {
            config,
            known_types: KnownTypes::new(),
        }
    }

    /// Use a table of known-type overrides
    pub fn with_known_types(mut self, known_types: KnownTypes) -> Self {
        self.known_types = known_types;
        self
    }

    pub fn config(&self) -> &OpenApiConfig {
        &self.config
    }

    pub fn known_types(&self) -> &KnownTypes {
        &self.known_types
    }

    /// Generate a validated document for a route table
    ///
    /// On failure the returned [`GenerationFailure`] carries the document as
    /// far as it was assembled.
    pub fn generate(&self, routes: &[Route]) -> Result<OpenApiSpec, GenerationFailure> {
        let normalizer = self.config.normalizer();
        let mut builder = SchemaBuilder::new(&self.known_types, &normalizer);
        let mut spec = self.new_spec();

        for route in routes {
            match self.create_path_item(&mut builder, route) {
                Ok(path_item) => {
                    if spec.paths.insert(route.path.clone(), path_item).is_some() {
                        warn!("Route {} registered twice; keeping the last one", route.path);
                    }
                }
                Err(error) => {
                    spec.components.schemas = builder.into_registry().into_schemas();
                    return Err(GenerationFailure::new(error, spec));
                }
            }
        }

        spec.components.schemas = builder.into_registry().into_schemas();
        DocumentFinalizer::new().finalize(spec)
    }

    fn new_spec(&self) -> OpenApiSpec {
        let mut spec = OpenApiSpec::new(&self.config.info.title, &self.config.info.version);
        spec.openapi = self.config.openapi_version.clone();
        spec.info.description = self.config.info.description.clone();
        spec
    }

    /// Assemble the operations of one route
    fn create_path_item(
        &self,
        builder: &mut SchemaBuilder<'_>,
        route: &Route,
    ) -> OpenApiResult<PathItem> {
        let mut path_item = PathItem::default();

        for method in Method::ALL {
            if let Some(method_spec) = route.methods.get(&method) {
                debug!("Assembling {} {}", method, route.path);
                let operation = self.create_operation(builder, method_spec)?;
                *path_item.operation_mut(method) = Some(operation);
            }
        }

        Ok(path_item)
    }

    /// Create an operation from a method's payload types
    fn create_operation(
        &self,
        builder: &mut SchemaBuilder<'_>,
        method_spec: &MethodSpec,
    ) -> OpenApiResult<Operation> {
        let request_body = match &method_spec.request {
            Some(request) => {
                let schema = builder.schema_for(&request.resolve())?;
                Some(RequestBody {
                    description: String::new(),
                    content: self.content(schema),
                })
            }
            None => None,
        };

        let mut responses = BTreeMap::new();
        for (status, ty) in &method_spec.responses {
            let schema = builder.schema_for(&ty.resolve())?;
            responses.insert(
                status.to_string(),
                Response {
                    description: Self::status_description(*status).to_string(),
                    content: self.content(schema),
                },
            );
        }

        Ok(Operation {
            request_body,
            responses,
        })
    }

    fn content(&self, schema: SchemaRef) -> BTreeMap<String, MediaType> {
        let mut content = BTreeMap::new();
        content.insert(
            self.config.media_type.clone(),
            MediaType {
                schema: Some(schema),
            },
        );
        content
    }

    /// Canonical reason phrase of a status code, empty when there is none
    fn status_description(status: u16) -> &'static str {
        StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("")
    }
}
