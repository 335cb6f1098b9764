/*!
# elif-apidoc

OpenAPI 3.0 document synthesis from route tables and described Rust types.

Types describe their own shape through the [`Describe`] trait, usually via
`#[derive(Describe)]`, which honours the `serde` attributes that shape the
wire format. A route table names, per path and HTTP method, an optional
request type and response types keyed by status code. The generator walks
those types into component schemas, assembles the operations, and validates
the finished document.

## Features

- Component schemas derived from Rust types, deduplicated by name
- Recursive types terminate through named references
- `#[serde(flatten)]` fields merge into the enclosing object
- Known-type overrides for types such as timestamps
- JSON and YAML export
- Swagger UI served over axum

## Usage

```rust,no_run
use elif_apidoc::{Describe, MethodSpec, OpenApiConfig, OpenApiGenerator, Route};

#[derive(Describe)]
struct User {
    #[serde(rename = "ID")]
    id: i64,
    #[serde(rename = "Name")]
    name: String,
}

let routes = vec![Route::new("/users")
    .get(MethodSpec::new().response::<User>(200))
    .post(MethodSpec::new().request::<User>().response::<User>(201))];

let generator = OpenApiGenerator::new(OpenApiConfig::new("Users", "1.0.0"));
let spec = generator.generate(&routes).unwrap();
println!("{}", spec.to_json(true).unwrap());
```
*/

// Re-export main types
pub use crate::{
    config::{ApiInfo, ExportConfig, OpenApiConfig},
    descriptor::{
        Describe, FieldDescriptor, PrimitiveKind, TypeDescriptor, TypeIdentity, TypeKind, TypeRef,
    },
    error::{GenerationFailure, OpenApiError, OpenApiResult},
    export::OutputFormat,
    finalize::DocumentFinalizer,
    generator::OpenApiGenerator,
    naming::NameNormalizer,
    registry::{KnownTypes, SchemaRegistry},
    routes::{Method, MethodSpec, Route},
    schema::{DeriveOptions, SchemaBuilder},
    specification::{OpenApiSpec, Schema, SchemaRef},
    swagger::SwaggerUi,
    validation::{DocumentValidator, ValidationReport, Violation},
};

// Re-export the derive macro from the proc-macro crate
pub use elif_apidoc_derive::Describe;

// Core modules
pub mod config;
pub mod error;
pub mod generator;
pub mod specification;

// Type description and schema derivation
pub mod descriptor;
pub mod naming;
pub mod registry;
pub mod schema;

// Route tables
pub mod routes;

// Finalization and validation
pub mod finalize;
pub mod validation;

// Export functionality
pub mod export;

// Interactive documentation
pub mod swagger;
