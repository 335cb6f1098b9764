use crate::{specification::OpenApiSpec, validation::ValidationReport};
use thiserror::Error;

/// Result type for document generation
pub type OpenApiResult<T> = Result<T, OpenApiError>;

/// Errors that can occur during document generation
#[derive(Debug, Error)]
pub enum OpenApiError {
    /// A type kind outside the supported set was reached
    #[error("unsupported type: {path}/{name}")]
    UnsupportedType { path: String, name: String },

    /// A method token outside the nine documented methods
    #[error("unknown HTTP method: {0}")]
    UnknownMethod(String),

    /// The assembled document could not be serialized
    #[error("failed to marshal spec to JSON: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The serialized document could not be loaded back
    #[error("failed to load spec from JSON: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The document failed structural validation
    #[error("failed validation: {0}")]
    Validation(ValidationReport),

    /// YAML export error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O error (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document server error
    #[error("Server error: {0}")]
    Server(String),
}

impl OpenApiError {
    /// Create a new unsupported type error
    pub fn unsupported_type<P: ToString, N: ToString>(path: P, name: N) -> Self {
        Self::UnsupportedType {
            path: path.to_string(),
            name: name.to_string(),
        }
    }

    /// Create a new configuration error
    pub fn config_error<T: ToString>(msg: T) -> Self {
        Self::Config(msg.to_string())
    }

    /// Create a new server error
    pub fn server_error<T: ToString>(msg: T) -> Self {
        Self::Server(msg.to_string())
    }
}

/// A failed generation, with the document as far as it was assembled
#[derive(Debug, Error)]
#[error("{error}")]
pub struct GenerationFailure {
    #[source]
    pub error: OpenApiError,
    /// Partially assembled document, for diagnostics only
    pub partial: Option<Box<OpenApiSpec>>,
}

impl GenerationFailure {
    pub fn new(error: OpenApiError, partial: OpenApiSpec) -> Self {
        Self {
            error,
            partial: Some(Box::new(partial)),
        }
    }

    pub fn into_error(self) -> OpenApiError {
        self.error
    }
}

impl From<OpenApiError> for GenerationFailure {
    fn from(error: OpenApiError) -> Self {
        Self {
            error,
            partial: None,
        }
    }
}
