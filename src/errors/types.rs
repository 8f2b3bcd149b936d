//! # Error Types
//!
//! Error types for the TravelBook client using `thiserror`.

use std::fmt;

use crate::forms::ValidationResult;

/// Custom result type for TravelBook operations
pub type Result<T> = std::result::Result<T, TravelBookError>;

/// Main error type for the TravelBook client
#[derive(thiserror::Error, Debug)]
pub enum TravelBookError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },

    /// Single-field validation errors raised outside a form
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },

    /// A form failed client-side validation and was not submitted
    #[error("Form validation failed: {} field(s) invalid", .0.errors.len())]
    InvalidForm(ValidationResult),

    /// A field path did not resolve inside the form state
    #[error("Invalid field path '{path}': {message}")]
    FieldPath { path: String, message: String },

    /// The API rejected the stored credentials; they have been cleared
    #[error("Authentication error: {message}")]
    Unauthorized { message: String, error_type: AuthErrorType },

    /// Non-success response from the remote API
    #[error("API error: {message} (status: {status})")]
    Api { message: String, status: u16 },

    /// The request never produced a response
    #[error("Transport error: {context}")]
    Transport {
        #[source]
        source: reqwest::Error,
        context: String,
    },

    /// Internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Authentication error subtypes
#[derive(Debug, Clone, PartialEq)]
pub enum AuthErrorType {
    InvalidToken,
    MissingToken,
    InsufficientPermissions,
}

impl fmt::Display for AuthErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthErrorType::InvalidToken => write!(f, "invalid_token"),
            AuthErrorType::MissingToken => write!(f, "missing_token"),
            AuthErrorType::InsufficientPermissions => write!(f, "insufficient_permissions"),
        }
    }
}

impl TravelBookError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// Create a field path resolution error
    pub fn field_path<P: fmt::Display, S: Into<String>>(path: P, message: S) -> Self {
        Self::FieldPath { path: path.to_string(), message: message.into() }
    }

    /// Create an authentication error
    pub fn unauthorized<S: Into<String>>(message: S, error_type: AuthErrorType) -> Self {
        Self::Unauthorized { message: message.into(), error_type }
    }

    /// Create an API error
    pub fn api<S: Into<String>>(message: S, status: u16) -> Self {
        Self::Api { message: message.into(), status }
    }

    /// Create a transport error
    pub fn transport<S: Into<String>>(source: reqwest::Error, context: S) -> Self {
        Self::Transport { source, context: context.into() }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal { message: message.into() }
    }

    /// The HTTP status associated with this error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TravelBookError::Api { status, .. } => Some(*status),
            TravelBookError::Unauthorized { .. } => Some(401),
            TravelBookError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the caller has to log in again before retrying
    pub fn requires_login(&self) -> bool {
        matches!(self, TravelBookError::Unauthorized { .. })
    }

    /// Text suitable for a transient user-facing notification
    pub fn user_message(&self) -> String {
        match self {
            TravelBookError::InvalidForm(_) => "Please fix the errors in the form".to_string(),
            TravelBookError::Unauthorized { message, .. } => message.clone(),
            TravelBookError::Api { message, .. } => message.clone(),
            TravelBookError::Transport { context, .. } => context.clone(),
            TravelBookError::Validation { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Field errors carried by an [`TravelBookError::InvalidForm`]
    pub fn form_errors(&self) -> Option<&ValidationResult> {
        match self {
            TravelBookError::InvalidForm(result) => Some(result),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TravelBookError {
    fn from(error: std::io::Error) -> Self {
        Self::Io { source: error, context: "I/O operation failed".to_string() }
    }
}

impl From<serde_json::Error> for TravelBookError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization { source: error, context: "JSON serialization failed".to_string() }
    }
}

impl From<reqwest::Error> for TravelBookError {
    fn from(error: reqwest::Error) -> Self {
        let context = if error.is_timeout() {
            "The request timed out".to_string()
        } else if error.is_connect() {
            "Unable to reach the TravelBook API".to_string()
        } else {
            "Request failed".to_string()
        };
        Self::Transport { source: error, context }
    }
}

impl From<validator::ValidationErrors> for TravelBookError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::validation(format!("Validation failed: {}", message))
    }
}
