//! Error-wrapping message

use super::{Base, Composer};
use crate::core::error::Result;
use crate::core::fields::FieldValue;
use crate::core::priority::Priority;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Error value shared between clones of a message.
pub type SharedError = Arc<dyn Error + Send + Sync>;

const ERROR_KEY: &str = "error";

/// Wraps an optional error. Without an error the message is not loggable,
/// which lets callers log the outcome of fallible calls unconditionally.
#[derive(Clone)]
pub struct ErrorMessage {
    base: Base,
    error: Option<SharedError>,
}

impl ErrorMessage {
    pub fn new<E>(priority: Priority, error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::from_shared(priority, Some(Arc::new(error)))
    }

    pub fn from_shared(priority: Priority, error: Option<SharedError>) -> Self {
        Self {
            base: Base::new(priority),
            error,
        }
    }

    /// The wrapped error, if any.
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.error.as_deref()
    }
}

impl fmt::Debug for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorMessage")
            .field("priority", &self.base.priority)
            .field("error", &self.error.as_ref().map(|e| e.to_string()))
            .field("context", &self.base.context)
            .finish()
    }
}

impl Composer for ErrorMessage {
    fn string(&self) -> String {
        let Some(error) = &self.error else {
            return String::new();
        };

        if self.base.context.is_empty() {
            error.to_string()
        } else {
            format!("{} {}", error, self.base.context)
        }
    }

    fn raw(&self) -> serde_json::Value {
        let error = self
            .error
            .as_ref()
            .map(|e| serde_json::Value::String(e.to_string()))
            .unwrap_or(serde_json::Value::Null);
        self.base.raw(ERROR_KEY, error)
    }

    fn loggable(&self) -> bool {
        self.error.is_some()
    }

    fn priority(&self) -> Priority {
        self.base.priority
    }

    fn set_priority(&mut self, priority: Priority) -> Result<()> {
        self.base.set_priority(priority)
    }

    fn annotate(&mut self, key: &str, value: FieldValue) -> Result<()> {
        self.base.annotate(ERROR_KEY, key, value)
    }
}
