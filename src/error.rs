//! Error types for flux-builder.

use thiserror::Error;

/// The main error type for query building.
#[derive(Debug, Error)]
pub enum FluxError {
    /// A required value was absent, empty or malformed.
    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    /// The value has no Flux representation.
    #[error("Unsupported value kind: {0}")]
    UnsupportedKind(String),

    /// Failed to scan Flux literal notation.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FluxError {
    /// Create an invalid argument error for the named parameter.
    pub fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create the error raised when an absent value reaches a converter.
    pub fn null_value(name: impl Into<String>) -> Self {
        Self::invalid(name, "Cannot convert a null value to Flux.")
    }

    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }
}

/// Result type alias for flux-builder operations.
pub type FluxResult<T> = Result<T, FluxError>;
