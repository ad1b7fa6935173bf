//! Error types for the version reporter

use thiserror::Error;

/// Result type alias for version reporter operations
pub type Result<T> = std::result::Result<T, VersionInfoError>;

/// Which side of the report an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The package could not be resolved locally
    Local,
    /// The package index lookup failed
    Remote,
    /// Anything outside the two resolvers (config, output, host)
    Other,
}

/// Main error type for the version reporter
#[derive(Error, Debug)]
pub enum VersionInfoError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML serialization failed
    #[error("YAML serialization failed: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The Python interpreter could not be queried
    #[error("Interpreter '{program}' failed: {message}")]
    InterpreterError { program: String, message: String },

    /// The module is not importable from any search path
    #[error("No module named '{module}' (searched {searched} paths)")]
    PackageNotInstalled { module: String, searched: usize },

    /// A metadata file could not be read
    #[error("Failed to read metadata file {path}: {source}")]
    MetadataError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Package does not exist on the index
    #[error("Package '{0}' not found on the package index")]
    PackageNotPublished(String),

    /// Invalid package name
    #[error("Invalid package name: '{0}'. {1}")]
    InvalidPackageName(String, &'static str),

    /// API rate limit exceeded
    #[error("Package index rate limit exceeded. Please try again later")]
    RateLimitExceeded,

    /// Unexpected status from the package index
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Service unavailable
    #[error("Service temporarily unavailable: {0}")]
    ServiceUnavailable(String),

    /// The host editor cannot receive the report
    #[error("Host editor unavailable: {0}")]
    HostUnavailable(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl VersionInfoError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::ValidationError(message.into())
    }

    /// Create a new host error
    pub fn host<S: Into<String>>(message: S) -> Self {
        Self::HostUnavailable(message.into())
    }

    /// Create a new interpreter error
    pub fn interpreter<P: Into<String>, S: Into<String>>(program: P, message: S) -> Self {
        Self::InterpreterError {
            program: program.into(),
            message: message.into(),
        }
    }

    /// Classify the error by the resolver it belongs to
    pub fn kind(&self) -> FailureClass {
        match self {
            Self::InterpreterError { .. }
            | Self::PackageNotInstalled { .. }
            | Self::MetadataError { .. } => FailureClass::Local,
            Self::HttpError(_)
            | Self::JsonError(_)
            | Self::PackageNotPublished(_)
            | Self::InvalidPackageName(_, _)
            | Self::RateLimitExceeded
            | Self::ServerError { .. }
            | Self::ServiceUnavailable(_) => FailureClass::Remote,
            _ => FailureClass::Other,
        }
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::PackageNotInstalled { module, .. } => {
                format!(
                    "The module '{}' is not installed for this interpreter",
                    module
                )
            }
            Self::PackageNotPublished(name) => {
                format!("The package '{}' does not exist on the package index", name)
            }
            Self::RateLimitExceeded => {
                "You've exceeded the package index rate limit. Please wait a moment before trying again."
                    .to_string()
            }
            Self::HttpError(e) if e.is_timeout() => {
                "The package index did not answer in time.".to_string()
            }
            Self::ServiceUnavailable(_) => {
                "The package index is temporarily unavailable. Please try again later."
                    .to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Convert reqwest status codes to appropriate errors
impl From<reqwest::StatusCode> for VersionInfoError {
    fn from(status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            429 => Self::RateLimitExceeded,
            500..=599 => Self::ServiceUnavailable(format!("Server error: {}", status)),
            _ => Self::ServerError {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            },
        }
    }
}
