//! Composite of several messages

use super::{Composer, Message};
use crate::core::error::{GripError, Result};
use crate::core::fields::FieldValue;
use crate::core::priority::Priority;

/// A group of messages delivered as one.
///
/// The group is loggable when any member is; rendering only includes the
/// loggable members.
#[derive(Debug, Clone, Default)]
pub struct GroupMessage {
    priority: Priority,
    messages: Vec<Message>,
}

impl GroupMessage {
    /// The group takes the highest priority among its members.
    pub fn new(messages: Vec<Message>) -> Self {
        let priority = messages
            .iter()
            .map(Composer::priority)
            .max()
            .unwrap_or(Priority::Invalid);
        Self { priority, messages }
    }

    pub fn push(&mut self, message: Message) {
        if message.priority() > self.priority {
            self.priority = message.priority();
        }
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Composer for GroupMessage {
    fn string(&self) -> String {
        self.messages
            .iter()
            .filter(|m| m.loggable())
            .map(Composer::string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn raw(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.messages
                .iter()
                .filter(|m| m.loggable())
                .map(Composer::raw)
                .collect(),
        )
    }

    fn loggable(&self) -> bool {
        self.messages.iter().any(Composer::loggable)
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    /// Sets the group's own priority, and the priority of members that have
    /// none of their own.
    fn set_priority(&mut self, priority: Priority) -> Result<()> {
        if !priority.is_valid() {
            return Err(GripError::InvalidPriority(priority));
        }
        self.priority = priority;
        for message in &mut self.messages {
            if !message.priority().is_valid() {
                message.set_priority(priority)?;
            }
        }
        Ok(())
    }

    fn annotate(&mut self, key: &str, value: FieldValue) -> Result<()> {
        let errors = self
            .messages
            .iter_mut()
            .filter_map(|m| m.annotate(key, value.clone()).err())
            .collect();

        match GripError::aggregate(errors) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
