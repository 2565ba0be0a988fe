//! Structured field-map message

use super::Composer;
use crate::core::error::{GripError, Result};
use crate::core::fields::{FieldValue, Fields};
use crate::core::priority::Priority;

/// A message whose content is a map of fields. Annotations are merged into
/// the same map.
#[derive(Debug, Clone)]
pub struct FieldsMessage {
    priority: Priority,
    fields: Fields,
}

impl FieldsMessage {
    pub fn new(priority: Priority, fields: Fields) -> Self {
        Self { priority, fields }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}

impl Composer for FieldsMessage {
    fn string(&self) -> String {
        self.fields.to_string()
    }

    fn raw(&self) -> serde_json::Value {
        self.fields.to_json()
    }

    fn loggable(&self) -> bool {
        !self.fields.is_empty()
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn set_priority(&mut self, priority: Priority) -> Result<()> {
        if !priority.is_valid() {
            return Err(GripError::InvalidPriority(priority));
        }
        self.priority = priority;
        Ok(())
    }

    fn annotate(&mut self, key: &str, value: FieldValue) -> Result<()> {
        self.fields.insert_unique(key, value)
    }
}
