use crate::{descriptor::PrimitiveKind, routes::Method};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix of every component schema reference
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Complete OpenAPI 3.0 document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiSpec {
    /// OpenAPI specification version
    pub openapi: String,

    /// API metadata
    pub info: Info,

    /// Reusable components
    #[serde(default)]
    pub components: Components,

    /// API paths and operations
    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,
}

/// API metadata information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,

    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// API version
    pub version: String,
}

/// Reusable components
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    /// Registered schemas keyed by normalized type name
    #[serde(default)]
    pub schemas: BTreeMap<String, Schema>,
}

/// Operations available on a single path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
}

impl PathItem {
    /// Operation slot for a method
    pub fn operation(&self, method: Method) -> Option<&Operation> {
        match method {
            Method::Get => self.get.as_ref(),
            Method::Head => self.head.as_ref(),
            Method::Post => self.post.as_ref(),
            Method::Put => self.put.as_ref(),
            Method::Patch => self.patch.as_ref(),
            Method::Delete => self.delete.as_ref(),
            Method::Connect => self.connect.as_ref(),
            Method::Options => self.options.as_ref(),
            Method::Trace => self.trace.as_ref(),
        }
    }

    /// Mutable operation slot for a method
    pub fn operation_mut(&mut self, method: Method) -> &mut Option<Operation> {
        match method {
            Method::Get => &mut self.get,
            Method::Head => &mut self.head,
            Method::Post => &mut self.post,
            Method::Put => &mut self.put,
            Method::Patch => &mut self.patch,
            Method::Delete => &mut self.delete,
            Method::Connect => &mut self.connect,
            Method::Options => &mut self.options,
            Method::Trace => &mut self.trace,
        }
    }

    /// All defined operations, in method order
    pub fn operations(&self) -> impl Iterator<Item = (Method, &Operation)> {
        Method::ALL
            .into_iter()
            .filter_map(move |method| self.operation(method).map(|op| (method, op)))
    }
}

/// HTTP operation (GET, POST, etc.)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Request body
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,

    /// Possible responses keyed by status code
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
}

/// Request body specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub description: String,

    /// Media type content
    pub content: BTreeMap<String, MediaType>,
}

/// Response specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, MediaType>,
}

/// Media type specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaRef>,
}

/// A schema at its point of use: either a pointer into the components or an
/// inline body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaRef {
    Ref(Reference),
    Inline(Box<Schema>),
}

impl SchemaRef {
    /// Reference to a registered component schema
    pub fn component(name: &str) -> Self {
        Self::Ref(Reference {
            location: format!("{}{}", SCHEMA_REF_PREFIX, name),
        })
    }

    pub fn inline(schema: Schema) -> Self {
        Self::Inline(Box::new(schema))
    }

    /// Component name this reference points at, if it is a component reference
    pub fn component_name(&self) -> Option<&str> {
        match self {
            Self::Ref(reference) => reference.component_name(),
            Self::Inline(_) => None,
        }
    }

    pub fn as_inline(&self) -> Option<&Schema> {
        match self {
            Self::Inline(schema) => Some(&**schema),
            Self::Ref(_) => None,
        }
    }
}

/// `$ref` pointer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub location: String,
}

impl Reference {
    pub fn component_name(&self) -> Option<&str> {
        self.location.strip_prefix(SCHEMA_REF_PREFIX)
    }
}

/// Schema body, tagged by its `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Schema {
    Integer(PrimitiveSchema),
    Number(PrimitiveSchema),
    String(PrimitiveSchema),
    Boolean(PrimitiveSchema),
    Array(ArraySchema),
    Object(ObjectSchema),
}

/// Scalar schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,
}

/// Array schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArraySchema {
    pub items: Box<SchemaRef>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,
}

/// Object schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaRef>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Schema {
    pub fn primitive(kind: PrimitiveKind, nullable: bool) -> Self {
        let body = PrimitiveSchema {
            nullable,
            ..Default::default()
        };
        match kind {
            PrimitiveKind::Integer => Self::Integer(body),
            PrimitiveKind::Number => Self::Number(body),
            PrimitiveKind::String => Self::String(body),
            PrimitiveKind::Boolean => Self::Boolean(body),
        }
    }

    /// String schema with a format, the usual shape of a known-type override
    pub fn formatted_string(format: &str) -> Self {
        Self::String(PrimitiveSchema {
            format: Some(format.to_string()),
            ..Default::default()
        })
    }

    /// Arrays are always nullable: an absent sequence and an empty one are
    /// not distinguished.
    pub fn array(items: SchemaRef) -> Self {
        Self::Array(ArraySchema {
            items: Box::new(items),
            nullable: true,
        })
    }

    pub fn object(properties: BTreeMap<String, SchemaRef>) -> Self {
        Self::Object(ObjectSchema {
            description: None,
            properties,
        })
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Integer(p) | Self::Number(p) | Self::String(p) | Self::Boolean(p) => p.nullable,
            Self::Array(array) => array.nullable,
            Self::Object(_) => false,
        }
    }

    /// Value of the `type` keyword
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    pub fn properties(&self) -> Option<&BTreeMap<String, SchemaRef>> {
        match self {
            Self::Object(object) => Some(&object.properties),
            _ => None,
        }
    }
}

impl OpenApiSpec {
    /// Create an empty document
    pub fn new(title: &str, version: &str) -> Self {
        Self {
            openapi: "3.0.0".to_string(),
            info: Info {
                title: title.to_string(),
                description: None,
                version: version.to_string(),
            },
            components: Components::default(),
            paths: BTreeMap::new(),
        }
    }

    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.components.schemas.get(name)
    }
}
