/*!
Rendering of finished documents to JSON and YAML.
*/

use crate::{
    config::OpenApiConfig,
    error::{OpenApiError, OpenApiResult},
    specification::OpenApiSpec,
};
use std::fs;
use std::path::Path;

/// Output format for a saved document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    /// Pick a format from a file extension, defaulting to JSON
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

impl OpenApiSpec {
    /// Render the document as JSON
    pub fn to_json(&self, pretty: bool) -> OpenApiResult<String> {
        let rendered = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        rendered.map_err(OpenApiError::Serialization)
    }

    /// Render the document as YAML
    pub fn to_yaml(&self) -> OpenApiResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write the document to a file
    pub fn save_to_file<P: AsRef<Path>>(
        &self,
        path: P,
        format: OutputFormat,
        pretty: bool,
    ) -> OpenApiResult<()> {
        let content = match format {
            OutputFormat::Json => self.to_json(pretty)?,
            OutputFormat::Yaml => self.to_yaml()?,
        };

        fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Write the document using the configured export settings
    ///
    /// The format follows the file extension.
    pub fn save_with_config<P: AsRef<Path>>(
        &self,
        path: P,
        config: &OpenApiConfig,
    ) -> OpenApiResult<()> {
        let format = OutputFormat::from_path(&path);
        self.save_to_file(path, format, config.export.pretty_print)
    }

    /// Load a document previously written by [`OpenApiSpec::save_to_file`]
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> OpenApiResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;

        match OutputFormat::from_path(&path) {
            OutputFormat::Json => {
                serde_json::from_str(&content).map_err(OpenApiError::Deserialization)
            }
            OutputFormat::Yaml => Ok(serde_yaml::from_str(&content)?),
        }
    }
}
