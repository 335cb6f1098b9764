use crate::{
    error::{OpenApiError, OpenApiResult},
    naming::NameNormalizer,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for document generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenApiConfig {
    /// OpenAPI specification version written to the document
    pub openapi_version: String,

    /// API information
    pub info: ApiInfo,

    /// Module path prefixes omitted from component names
    pub strip_pkg_paths: Vec<String>,

    /// Media type request and response bodies are documented under
    pub media_type: String,

    /// Export settings
    pub export: ExportConfig,
}

/// API information section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiInfo {
    /// API title
    pub title: String,

    /// API description
    #[serde(default)]
    pub description: Option<String>,

    /// API version
    pub version: String,
}

/// Export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Pretty print JSON output
    pub pretty_print: bool,
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            openapi_version: "3.0.0".to_string(),
            info: ApiInfo {
                title: "API".to_string(),
                description: None,
                version: "0.0.0".to_string(),
            },
            strip_pkg_paths: Vec::new(),
            media_type: "application/json".to_string(),
            export: ExportConfig::default(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { pretty_print: true }
    }
}

impl OpenApiConfig {
    /// Create a new configuration with custom API info
    pub fn new(title: &str, version: &str) -> Self {
        let mut config = Self::default();
        config.info.title = title.to_string();
        config.info.version = version.to_string();
        config
    }

    /// Set the API description
    pub fn with_description(mut self, description: &str) -> Self {
        self.info.description = Some(description.to_string());
        self
    }

    /// Omit a module path prefix from component names
    pub fn with_strip_pkg_path(mut self, prefix: &str) -> Self {
        self.strip_pkg_paths.push(prefix.to_string());
        self
    }

    /// Set the media type used for bodies
    pub fn with_media_type(mut self, media_type: &str) -> Self {
        self.media_type = media_type.to_string();
        self
    }

    /// Name normalizer for the configured strip prefixes
    pub fn normalizer(&self) -> NameNormalizer {
        NameNormalizer::new(self.strip_pkg_paths.iter().cloned())
    }

    /// Parse a configuration from TOML
    pub fn from_toml_str(content: &str) -> OpenApiResult<Self> {
        toml::from_str(content)
            .map_err(|e| OpenApiError::config_error(format!("Invalid configuration: {}", e)))
    }

    /// Load a configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> OpenApiResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OpenApiConfig::default();
        assert_eq!(config.openapi_version, "3.0.0");
        assert_eq!(config.media_type, "application/json");
        assert!(config.strip_pkg_paths.is_empty());
        assert!(config.export.pretty_print);
    }

    #[test]
    fn test_builder_methods() {
        let config = OpenApiConfig::new("Users API", "1.2.0")
            .with_description("User management")
            .with_strip_pkg_path("app::")
            .with_media_type("application/vnd.api+json");

        assert_eq!(config.info.title, "Users API");
        assert_eq!(config.info.version, "1.2.0");
        assert_eq!(config.info.description.as_deref(), Some("User management"));
        assert_eq!(config.media_type, "application/vnd.api+json");
        assert_eq!(config.normalizer().normalize("app::models", "User"), "User");
    }

    #[test]
    fn test_from_toml() {
        let config = OpenApiConfig::from_toml_str(
            r#"
            strip_pkg_paths = ["pkg/internal"]

            [info]
            title = "Inventory"
            version = "2.0.0"
            "#,
        )
        .unwrap();

        assert_eq!(config.info.title, "Inventory");
        assert_eq!(config.strip_pkg_paths, vec!["pkg/internal".to_string()]);
        // Unspecified sections keep their defaults
        assert_eq!(config.openapi_version, "3.0.0");
        assert_eq!(config.media_type, "application/json");
    }

    #[test]
    fn test_invalid_toml() {
        let err = OpenApiConfig::from_toml_str("info = 3").unwrap_err();
        assert!(matches!(err, OpenApiError::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apidoc.toml");
        std::fs::write(&path, "[info]\ntitle = \"Files\"\nversion = \"0.1.0\"\n").unwrap();

        let config = OpenApiConfig::from_file(&path).unwrap();
        assert_eq!(config.info.title, "Files");

        let missing = OpenApiConfig::from_file(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(OpenApiError::Io(_))));
    }
}
