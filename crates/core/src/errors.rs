//! Error types for promptdeck
//!
//! Every fallible operation in the crate returns [`DeckError`]. Nothing in
//! this layer is fatal: callers turn errors into notices via
//! [`DeckError::user_message`] and carry on.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Result type alias for promptdeck operations
pub type Result<T> = std::result::Result<T, DeckError>;

/// Main error type for promptdeck
#[derive(Debug, Error)]
pub enum DeckError {
    /// Locally detected input problems, keyed by field
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    /// Failure reported by the identity or persistence collaborator
    #[error("{code}: {message}")]
    Collaborator { code: String, message: String },

    /// Record or profile does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Caller does not own the record it tried to change
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Operation needs a signed-in user
    #[error("Not signed in")]
    Unauthenticated,

    /// A previous request of the same kind has not completed yet
    #[error("Another request is still in progress")]
    Busy,

    /// Command not found in registry
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Invalid command arguments
    #[error("Invalid arguments for command '{command}': {reason}")]
    InvalidArgs { command: String, reason: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error (catch-all)
    #[error("{0}")]
    Other(String),
}

impl DeckError {
    /// Build a collaborator error from an error code and message
    pub fn collaborator(code: impl Into<String>, message: impl Into<String>) -> Self {
        DeckError::Collaborator {
            code:    code.into(),
            message: message.into(),
        }
    }

    /// Get user-friendly error message for a transient notice
    pub fn user_message(&self) -> String {
        match self {
            DeckError::Validation(errors) => {
                format!("Please fix the highlighted fields: {}", errors)
            },
            DeckError::Collaborator { message, .. } => message.clone(),
            DeckError::NotFound { entity, .. } => {
                format!("That {} no longer exists", entity)
            },
            DeckError::PermissionDenied(_) => {
                "You don't have permission to do that".to_string()
            },
            DeckError::Unauthenticated => "You must be logged in to do that".to_string(),
            DeckError::DatabaseError(err) => {
                format!("Database error: {}", err)
            },
            _ => self.to_string(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            DeckError::Validation(_) => "validation",
            DeckError::Collaborator { .. } => "collaborator",
            DeckError::NotFound { .. } => "not_found",
            DeckError::PermissionDenied(_) => "permission",
            DeckError::Unauthenticated => "auth",
            DeckError::Busy => "busy",
            DeckError::CommandNotFound(_) => "command",
            DeckError::InvalidArgs { .. } => "arguments",
            DeckError::SerdeError(_) => "serialization",
            DeckError::DatabaseError(_) => "database",
            DeckError::IoError(_) => "io",
            DeckError::ConfigError(_) => "config",
            DeckError::Other(_) => "other",
        }
    }

    /// Collaborator error code, if this error came from a collaborator
    pub fn code(&self) -> Option<&str> {
        match self {
            DeckError::Collaborator { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for DeckError {
    fn from(err: anyhow::Error) -> Self {
        DeckError::Other(err.to_string())
    }
}

impl From<String> for DeckError {
    fn from(err: String) -> Self {
        DeckError::Other(err)
    }
}

impl From<&str> for DeckError {
    fn from(err: &str) -> Self {
        DeckError::Other(err.to_string())
    }
}

impl From<FieldErrors> for DeckError {
    fn from(errors: FieldErrors) -> Self {
        DeckError::Validation(errors)
    }
}

/// Inline validation messages keyed by form field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`; the first message per field wins
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Drop the message for `field`, typically once the user edits it
    pub fn clear(&mut self, field: &str) {
        self.0.remove(field);
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}
