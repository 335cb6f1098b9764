/*!
Structural validation of assembled documents.

Checks the rules an OpenAPI 3.0 loader enforces on the subset of the format
this crate produces: required info fields, path shape, non-empty responses,
status code keys, component names and reference targets.
*/

use crate::{
    error::{OpenApiError, OpenApiResult},
    specification::{MediaType, OpenApiSpec, Operation, Schema, SchemaRef, SCHEMA_REF_PREFIX},
};
use regex::Regex;
use std::fmt;

/// One structural problem in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON-pointer-like location of the problem
    pub location: String,
    pub message: String,
}

impl Violation {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// All violations found in a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    fn push(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation::new(location, message));
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.violations.iter().map(ToString::to_string).collect();
        f.write_str(&rendered.join("; "))
    }
}

/// Validates assembled documents
#[derive(Debug, Clone)]
pub struct DocumentValidator {
    /// Allowed shape of a component name
    component_name_regex: Regex,
}

impl DocumentValidator {
    /// Create a new validator
    pub fn new() -> OpenApiResult<Self> {
        Ok(Self {
            component_name_regex: Regex::new(r"^[a-zA-Z0-9._-]+$").map_err(|e| {
                OpenApiError::config_error(format!("Failed to compile regex: {}", e))
            })?,
        })
    }

    /// Collect every structural violation in the document
    pub fn validate(&self, spec: &OpenApiSpec) -> ValidationReport {
        let mut report = ValidationReport::default();

        if !spec.openapi.starts_with("3.0") {
            report.push(
                "/openapi",
                format!("unsupported OpenAPI version {}", spec.openapi),
            );
        }
        if spec.info.title.is_empty() {
            report.push("/info/title", "title is required but empty");
        }
        if spec.info.version.is_empty() {
            report.push("/info/version", "version is required but empty");
        }

        for (name, schema) in &spec.components.schemas {
            let location = format!("/components/schemas/{}", name);
            if !self.component_name_regex.is_match(name) {
                report.push(
                    location.clone(),
                    format!("component name {:?} contains unsupported characters", name),
                );
            }
            self.validate_schema(spec, schema, &location, &mut report);
        }

        for (path, item) in &spec.paths {
            let location = format!("/paths/{}", path.replace('/', "~1"));
            if !path.starts_with('/') {
                report.push(location.clone(), "path must start with '/'");
            }
            for (method, operation) in item.operations() {
                let location = format!("{}/{}", location, method.as_str().to_lowercase());
                self.validate_operation(spec, operation, &location, &mut report);
            }
        }

        report
    }

    fn validate_operation(
        &self,
        spec: &OpenApiSpec,
        operation: &Operation,
        location: &str,
        report: &mut ValidationReport,
    ) {
        if let Some(body) = &operation.request_body {
            let location = format!("{}/requestBody", location);
            if body.content.is_empty() {
                report.push(location.clone(), "request body must declare content");
            }
            for (media_type, content) in &body.content {
                let location = format!("{}/content/{}", location, media_type.replace('/', "~1"));
                self.validate_media_type(spec, content, &location, report);
            }
        }

        if operation.responses.is_empty() {
            report.push(
                format!("{}/responses", location),
                "operation must declare at least one response",
            );
        }

        for (status, response) in &operation.responses {
            let location = format!("{}/responses/{}", location, status);
            if !is_status_key(status) {
                report.push(location.clone(), format!("invalid status code {:?}", status));
            }
            for (media_type, content) in &response.content {
                let location = format!("{}/content/{}", location, media_type.replace('/', "~1"));
                self.validate_media_type(spec, content, &location, report);
            }
        }
    }

    fn validate_media_type(
        &self,
        spec: &OpenApiSpec,
        media_type: &MediaType,
        location: &str,
        report: &mut ValidationReport,
    ) {
        match &media_type.schema {
            Some(schema) => {
                self.validate_schema_ref(spec, schema, &format!("{}/schema", location), report)
            }
            None => report.push(location, "media type must declare a schema"),
        }
    }

    fn validate_schema_ref(
        &self,
        spec: &OpenApiSpec,
        schema: &SchemaRef,
        location: &str,
        report: &mut ValidationReport,
    ) {
        match schema {
            SchemaRef::Ref(reference) => match reference.component_name() {
                Some(name) if spec.components.schemas.contains_key(name) => {}
                Some(name) => report.push(
                    location,
                    format!("reference to undefined schema {:?}", name),
                ),
                None => report.push(
                    location,
                    format!(
                        "reference {:?} does not start with {}",
                        reference.location, SCHEMA_REF_PREFIX
                    ),
                ),
            },
            SchemaRef::Inline(body) => self.validate_schema(spec, body, location, report),
        }
    }

    fn validate_schema(
        &self,
        spec: &OpenApiSpec,
        schema: &Schema,
        location: &str,
        report: &mut ValidationReport,
    ) {
        match schema {
            Schema::Array(array) => {
                self.validate_schema_ref(spec, &array.items, &format!("{}/items", location), report)
            }
            Schema::Object(object) => {
                for (name, property) in &object.properties {
                    let location = format!("{}/properties/{}", location, name);
                    self.validate_schema_ref(spec, property, &location, report);
                }
            }
            Schema::Integer(_) | Schema::Number(_) | Schema::String(_) | Schema::Boolean(_) => {}
        }
    }
}

/// `default`, a concrete status code, or a range such as `4XX`
fn is_status_key(key: &str) -> bool {
    if key == "default" {
        return true;
    }
    if let Some(class) = key.strip_suffix("XX") {
        return matches!(class, "1" | "2" | "3" | "4" | "5");
    }
    matches!(key.parse::<u16>(), Ok(code) if (100..=599).contains(&code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PrimitiveKind;
    use crate::specification::{PathItem, Response};
    use std::collections::BTreeMap;

    fn json_content(schema: SchemaRef) -> BTreeMap<String, MediaType> {
        let mut content = BTreeMap::new();
        content.insert(
            "application/json".to_string(),
            MediaType {
                schema: Some(schema),
            },
        );
        content
    }

    fn spec_with_response(status: &str, schema: SchemaRef) -> OpenApiSpec {
        let mut spec = OpenApiSpec::new("Test API", "1.0.0");
        let mut operation = Operation::default();
        operation.responses.insert(
            status.to_string(),
            Response {
                description: "OK".to_string(),
                content: json_content(schema),
            },
        );
        spec.paths.insert(
            "/users".to_string(),
            PathItem {
                get: Some(operation),
                ..Default::default()
            },
        );
        spec
    }

    #[test]
    fn test_valid_document() {
        let mut spec = spec_with_response("200", SchemaRef::component("User"));
        spec.components
            .schemas
            .insert("User".to_string(), Schema::object(BTreeMap::new()));

        let report = DocumentValidator::new().unwrap().validate(&spec);
        assert!(report.is_valid(), "unexpected violations: {}", report);
    }

    #[test]
    fn test_dangling_reference() {
        let spec = spec_with_response("200", SchemaRef::component("Missing"));
        let report = DocumentValidator::new().unwrap().validate(&spec);
        assert_eq!(report.len(), 1);
        assert!(report.violations[0].message.contains("Missing"));
        assert_eq!(
            report.violations[0].location,
            "/paths/~1users/get/responses/200/content/application~1json/schema"
        );
    }

    #[test]
    fn test_invalid_status_code() {
        let spec = spec_with_response(
            "42",
            SchemaRef::inline(Schema::primitive(PrimitiveKind::String, false)),
        );
        let report = DocumentValidator::new().unwrap().validate(&spec);
        assert!(report
            .violations
            .iter()
            .any(|v| v.message.contains("invalid status code")));
    }

    #[test]
    fn test_operation_without_responses() {
        let mut spec = OpenApiSpec::new("Test API", "1.0.0");
        spec.paths.insert(
            "/health".to_string(),
            PathItem {
                head: Some(Operation::default()),
                ..Default::default()
            },
        );

        let report = DocumentValidator::new().unwrap().validate(&spec);
        assert_eq!(report.len(), 1);
        assert!(report.violations[0].location.ends_with("/head/responses"));
    }

    #[test]
    fn test_header_and_component_names() {
        let mut spec = OpenApiSpec::new("", "");
        spec.openapi = "2.0".to_string();
        spec.components
            .schemas
            .insert("bad name".to_string(), Schema::object(BTreeMap::new()));

        let report = DocumentValidator::new().unwrap().validate(&spec);
        let locations: Vec<&str> = report.violations.iter().map(|v| v.location.as_str()).collect();
        assert!(locations.contains(&"/openapi"));
        assert!(locations.contains(&"/info/title"));
        assert!(locations.contains(&"/info/version"));
        assert!(locations.contains(&"/components/schemas/bad name"));
    }

    #[test]
    fn test_status_keys() {
        assert!(is_status_key("200"));
        assert!(is_status_key("default"));
        assert!(is_status_key("4XX"));
        assert!(!is_status_key("600"));
        assert!(!is_status_key("abc"));
        assert!(!is_status_key("9XX"));
    }
}
