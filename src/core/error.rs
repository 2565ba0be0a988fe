//! Error types for the logging core

use super::priority::Priority;

pub type Result<T> = std::result::Result<T, GripError>;

#[derive(Debug, thiserror::Error)]
pub enum GripError {
    /// A priority that is not one of the named levels
    #[error("invalid priority: {0}")]
    InvalidPriority(Priority),

    /// Level configuration with an invalid default or threshold
    #[error("invalid level configuration (default={default}, threshold={threshold})")]
    InvalidLevel {
        default: Priority,
        threshold: Priority,
    },

    /// Attempted to install an absent sender
    #[error("cannot set the sender to nil")]
    NilSender,

    /// Annotation key collides with an existing key
    #[error("annotation key '{key}' already exists")]
    DuplicateKey { key: String },

    /// Several failures collected from one operation
    #[error("{}", join_errors(.0))]
    Aggregate(Vec<GripError>),

    /// Operation on a sender that has been closed
    #[error("sender '{name}' is closed")]
    SenderClosed { name: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

fn join_errors(errors: &[GripError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(";\n")
}

impl GripError {
    pub fn invalid_level(default: Priority, threshold: Priority) -> Self {
        GripError::InvalidLevel { default, threshold }
    }

    pub fn duplicate_key(key: impl Into<String>) -> Self {
        GripError::DuplicateKey { key: key.into() }
    }

    pub fn sender_closed(name: impl Into<String>) -> Self {
        GripError::SenderClosed { name: name.into() }
    }

    /// Collapse a list of errors: `None` when empty, the error itself when
    /// there is exactly one, an `Aggregate` otherwise.
    pub fn aggregate(mut errors: Vec<GripError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(GripError::Aggregate(errors)),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        GripError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        GripError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn other<S: Into<String>>(msg: S) -> Self {
        GripError::Other(msg.into())
    }
}
