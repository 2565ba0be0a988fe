//! Conditionally loggable message

use super::{Composer, Message};
use crate::core::error::Result;
use crate::core::fields::FieldValue;
use crate::core::priority::Priority;

/// Wraps a message so it is only loggable when `condition` holds.
///
/// A false condition short-circuits every content accessor, so a lazy inner
/// message is never produced.
#[derive(Debug, Clone)]
pub struct ConditionalMessage {
    condition: bool,
    message: Box<Message>,
}

impl ConditionalMessage {
    pub fn new(condition: bool, message: Message) -> Self {
        Self {
            condition,
            message: Box::new(message),
        }
    }

    pub fn condition(&self) -> bool {
        self.condition
    }

    pub fn inner(&self) -> &Message {
        &self.message
    }

    pub fn into_inner(self) -> Message {
        *self.message
    }
}

impl Composer for ConditionalMessage {
    fn string(&self) -> String {
        if self.condition {
            self.message.string()
        } else {
            String::new()
        }
    }

    fn raw(&self) -> serde_json::Value {
        if self.condition {
            self.message.raw()
        } else {
            serde_json::Value::Null
        }
    }

    fn loggable(&self) -> bool {
        self.condition && self.message.loggable()
    }

    fn priority(&self) -> Priority {
        self.message.priority()
    }

    fn set_priority(&mut self, priority: Priority) -> Result<()> {
        self.message.set_priority(priority)
    }

    fn annotate(&mut self, key: &str, value: FieldValue) -> Result<()> {
        if !self.condition {
            return Ok(());
        }
        self.message.annotate(key, value)
    }
}
