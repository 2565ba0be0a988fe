//! Text-like messages: plain strings, formatted text, joined arguments and
//! byte payloads.

use super::{Base, Composer};
use crate::core::error::Result;
use crate::core::fields::{FieldValue, MESSAGE_KEY};
use crate::core::priority::Priority;
use std::fmt;

/// Plain string message.
#[derive(Debug, Clone)]
pub struct StringMessage {
    base: Base,
    text: String,
}

impl StringMessage {
    pub fn new(priority: Priority, text: impl Into<String>) -> Self {
        Self {
            base: Base::new(priority),
            text: text.into(),
        }
    }
}

impl Composer for StringMessage {
    fn string(&self) -> String {
        self.text.clone()
    }

    fn raw(&self) -> serde_json::Value {
        self.base
            .raw(MESSAGE_KEY, serde_json::Value::String(self.text.clone()))
    }

    fn loggable(&self) -> bool {
        !self.text.is_empty()
    }

    fn priority(&self) -> Priority {
        self.base.priority
    }

    fn set_priority(&mut self, priority: Priority) -> Result<()> {
        self.base.set_priority(priority)
    }

    fn annotate(&mut self, key: &str, value: FieldValue) -> Result<()> {
        self.base.annotate(MESSAGE_KEY, key, value)
    }
}

/// Message rendered from format arguments.
///
/// Rendering happens at construction; callers that want to skip the work
/// for filtered messages check the threshold first (the logger's `*f`
/// methods do).
#[derive(Debug, Clone)]
pub struct FormattedMessage {
    base: Base,
    text: String,
}

impl FormattedMessage {
    pub fn new(priority: Priority, args: fmt::Arguments<'_>) -> Self {
        let text = match args.as_str() {
            Some(s) => s.to_string(),
            None => fmt::format(args),
        };
        Self {
            base: Base::new(priority),
            text,
        }
    }

    /// Render any displayable value.
    pub fn display<T: fmt::Display + ?Sized>(priority: Priority, value: &T) -> Self {
        Self::new(priority, format_args!("{}", value))
    }
}

impl Composer for FormattedMessage {
    fn string(&self) -> String {
        self.text.clone()
    }

    fn raw(&self) -> serde_json::Value {
        self.base
            .raw(MESSAGE_KEY, serde_json::Value::String(self.text.clone()))
    }

    fn loggable(&self) -> bool {
        !self.text.is_empty()
    }

    fn priority(&self) -> Priority {
        self.base.priority
    }

    fn set_priority(&mut self, priority: Priority) -> Result<()> {
        self.base.set_priority(priority)
    }

    fn annotate(&mut self, key: &str, value: FieldValue) -> Result<()> {
        self.base.annotate(MESSAGE_KEY, key, value)
    }
}

/// Arguments joined by single spaces, in the manner of `println`.
#[derive(Debug, Clone)]
pub struct LineMessage {
    base: Base,
    parts: Vec<String>,
}

impl LineMessage {
    pub fn new(priority: Priority, args: &[&dyn fmt::Display]) -> Self {
        Self::from_strings(priority, args.iter().map(|arg| arg.to_string()))
    }

    pub fn from_strings<I, S>(priority: Priority, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base: Base::new(priority),
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    fn render(&self) -> String {
        self.parts
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Composer for LineMessage {
    fn string(&self) -> String {
        self.render()
    }

    fn raw(&self) -> serde_json::Value {
        self.base
            .raw(MESSAGE_KEY, serde_json::Value::String(self.render()))
    }

    fn loggable(&self) -> bool {
        self.parts.iter().any(|part| !part.trim().is_empty())
    }

    fn priority(&self) -> Priority {
        self.base.priority
    }

    fn set_priority(&mut self, priority: Priority) -> Result<()> {
        self.base.set_priority(priority)
    }

    fn annotate(&mut self, key: &str, value: FieldValue) -> Result<()> {
        self.base.annotate(MESSAGE_KEY, key, value)
    }
}

/// Raw byte payload, rendered as lossy UTF-8.
#[derive(Debug, Clone)]
pub struct BytesMessage {
    base: Base,
    data: Vec<u8>,
}

impl BytesMessage {
    pub fn new(priority: Priority, data: impl Into<Vec<u8>>) -> Self {
        Self {
            base: Base::new(priority),
            data: data.into(),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Composer for BytesMessage {
    fn string(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }

    fn raw(&self) -> serde_json::Value {
        self.base
            .raw(MESSAGE_KEY, serde_json::Value::String(self.string()))
    }

    fn loggable(&self) -> bool {
        !self.data.is_empty()
    }

    fn priority(&self) -> Priority {
        self.base.priority
    }

    fn set_priority(&mut self, priority: Priority) -> Result<()> {
        self.base.set_priority(priority)
    }

    fn annotate(&mut self, key: &str, value: FieldValue) -> Result<()> {
        self.base.annotate(MESSAGE_KEY, key, value)
    }
}
