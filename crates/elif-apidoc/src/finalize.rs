use crate::{
    error::{GenerationFailure, OpenApiError},
    specification::OpenApiSpec,
    validation::DocumentValidator,
};
use tracing::info;

/// Round-trips an assembled document through JSON and validates it
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentFinalizer;

impl DocumentFinalizer {
    pub fn new() -> Self {
        Self
    }

    /// Serialize, reload and validate the document
    ///
    /// Every failure hands back the document in its latest form.
    pub fn finalize(&self, spec: OpenApiSpec) -> Result<OpenApiSpec, GenerationFailure> {
        let data = match serde_json::to_vec(&spec) {
            Ok(data) => data,
            Err(e) => return Err(GenerationFailure::new(OpenApiError::Serialization(e), spec)),
        };

        let loaded: OpenApiSpec = match serde_json::from_slice(&data) {
            Ok(loaded) => loaded,
            Err(e) => return Err(GenerationFailure::new(OpenApiError::Deserialization(e), spec)),
        };

        let validator = match DocumentValidator::new() {
            Ok(validator) => validator,
            Err(e) => return Err(GenerationFailure::new(e, loaded)),
        };

        let report = validator.validate(&loaded);
        if !report.is_valid() {
            return Err(GenerationFailure::new(OpenApiError::Validation(report), loaded));
        }

        info!(
            "Finalized document {} {}: {} paths, {} schemas",
            loaded.info.title,
            loaded.info.version,
            loaded.paths.len(),
            loaded.components.schemas.len()
        );
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specification::{MediaType, Operation, PathItem, Response, Schema, SchemaRef};
    use std::collections::BTreeMap;

    #[test]
    fn test_finalize_round_trips_document() {
        let mut spec = OpenApiSpec::new("Test API", "1.0.0");
        spec.components
            .schemas
            .insert("Empty".to_string(), Schema::object(BTreeMap::new()));

        let mut operation = Operation::default();
        let mut content = BTreeMap::new();
        content.insert(
            "application/json".to_string(),
            MediaType {
                schema: Some(SchemaRef::component("Empty")),
            },
        );
        operation.responses.insert(
            "200".to_string(),
            Response {
                description: "OK".to_string(),
                content,
            },
        );
        spec.paths.insert(
            "/empty".to_string(),
            PathItem {
                get: Some(operation),
                ..Default::default()
            },
        );

        let finalized = DocumentFinalizer::new().finalize(spec.clone()).unwrap();
        assert_eq!(finalized, spec);
    }

    #[test]
    fn test_finalize_reports_violations() {
        let mut spec = OpenApiSpec::new("Test API", "1.0.0");
        spec.paths.insert("no-slash".to_string(), PathItem::default());

        let failure = DocumentFinalizer::new().finalize(spec).unwrap_err();
        match &failure.error {
            OpenApiError::Validation(report) => {
                assert_eq!(report.violations[0].message, "path must start with '/'");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(failure.partial.unwrap().paths.contains_key("no-slash"));
    }
}
