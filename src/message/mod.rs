//! Message composers
//!
//! Every logging call produces exactly one [`Message`]. The set of shapes a
//! message can take is closed: plain text, formatted text, joined lines,
//! bytes, structured fields, errors, groups, lazy producers and conditional
//! wrappers. All of them expose the same [`Composer`] surface, which is the
//! only thing senders rely on.
//!
//! Lazy variants defer the work of building their content until a sender
//! actually inspects it, so a message filtered out by priority costs nothing
//! beyond its construction.
//!
//! # Example
//!
//! ```
//! use rust_grip::message::{convert, Composer, FieldsProducer};
//! use rust_grip::{Fields, Priority};
//!
//! let message = convert(Priority::Info, "hello world");
//! assert_eq!(message.string(), "hello world");
//!
//! let lazy = convert(
//!     Priority::Debug,
//!     FieldsProducer::new(|| Fields::new().with_field("expensive", 42)),
//! );
//! assert!(lazy.loggable());
//! ```

mod conditional;
mod convert;
mod error;
mod group;
mod lazy;
mod simple;
mod structured;

pub use conditional::ConditionalMessage;
pub use convert::{convert, convert_with_level, AsDebug, IntoComposer};
pub use error::{ErrorMessage, SharedError};
pub use group::GroupMessage;
pub use lazy::{ComposerProducer, ErrorProducer, FieldsProducer, LazyKind, LazyMessage, Producer};
pub use simple::{BytesMessage, FormattedMessage, LineMessage, StringMessage};
pub use structured::FieldsMessage;

use crate::core::error::{GripError, Result};
use crate::core::fields::{FieldValue, Fields};
use crate::core::priority::Priority;
use std::fmt;

/// Uniform surface of a log message.
pub trait Composer {
    /// Text rendering of the message.
    fn string(&self) -> String;

    /// Structured rendering, for senders that emit JSON or similar.
    fn raw(&self) -> serde_json::Value;

    /// Whether the message has content worth sending.
    fn loggable(&self) -> bool;

    fn priority(&self) -> Priority;

    /// Rejects `Priority::Invalid`.
    fn set_priority(&mut self, priority: Priority) -> Result<()>;

    /// Attach a key/value pair to the structured form. Fails if the key
    /// is already present.
    fn annotate(&mut self, key: &str, value: FieldValue) -> Result<()>;
}

/// Priority and annotations shared by the text-like messages.
#[derive(Debug, Clone, Default)]
pub(crate) struct Base {
    pub(crate) priority: Priority,
    pub(crate) context: Fields,
}

impl Base {
    pub(crate) fn new(priority: Priority) -> Self {
        Self {
            priority,
            context: Fields::new(),
        }
    }

    pub(crate) fn set_priority(&mut self, priority: Priority) -> Result<()> {
        if !priority.is_valid() {
            return Err(GripError::InvalidPriority(priority));
        }
        self.priority = priority;
        Ok(())
    }

    /// `reserved` is the key the message itself uses in its raw form.
    pub(crate) fn annotate(&mut self, reserved: &str, key: &str, value: FieldValue) -> Result<()> {
        if key == reserved {
            return Err(GripError::duplicate_key(key));
        }
        self.context.insert_unique(key, value)
    }

    pub(crate) fn raw(&self, key: &str, value: serde_json::Value) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        object.insert(key.to_string(), value);
        self.context.extend_json(&mut object);
        serde_json::Value::Object(object)
    }
}

/// A single log message.
#[derive(Debug, Clone)]
pub enum Message {
    String(StringMessage),
    Formatted(FormattedMessage),
    Lines(LineMessage),
    Bytes(BytesMessage),
    Fields(FieldsMessage),
    Error(ErrorMessage),
    Group(GroupMessage),
    Lazy(LazyMessage),
    Conditional(ConditionalMessage),
}

macro_rules! dispatch {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            Message::String($inner) => $body,
            Message::Formatted($inner) => $body,
            Message::Lines($inner) => $body,
            Message::Bytes($inner) => $body,
            Message::Fields($inner) => $body,
            Message::Error($inner) => $body,
            Message::Group($inner) => $body,
            Message::Lazy($inner) => $body,
            Message::Conditional($inner) => $body,
        }
    };
}

impl Composer for Message {
    fn string(&self) -> String {
        dispatch!(self, m => m.string())
    }

    fn raw(&self) -> serde_json::Value {
        dispatch!(self, m => m.raw())
    }

    fn loggable(&self) -> bool {
        dispatch!(self, m => m.loggable())
    }

    fn priority(&self) -> Priority {
        dispatch!(self, m => m.priority())
    }

    fn set_priority(&mut self, priority: Priority) -> Result<()> {
        dispatch!(self, m => m.set_priority(priority))
    }

    fn annotate(&mut self, key: &str, value: FieldValue) -> Result<()> {
        dispatch!(self, m => m.annotate(key, value))
    }
}

impl Message {
    pub fn string_message(priority: Priority, text: impl Into<String>) -> Self {
        Message::String(StringMessage::new(priority, text))
    }

    pub fn formatted(priority: Priority, args: fmt::Arguments<'_>) -> Self {
        Message::Formatted(FormattedMessage::new(priority, args))
    }

    pub fn lines(priority: Priority, args: &[&dyn fmt::Display]) -> Self {
        Message::Lines(LineMessage::new(priority, args))
    }

    pub fn bytes(priority: Priority, data: impl Into<Vec<u8>>) -> Self {
        Message::Bytes(BytesMessage::new(priority, data))
    }

    pub fn fields(priority: Priority, fields: Fields) -> Self {
        Message::Fields(FieldsMessage::new(priority, fields))
    }

    pub fn error<E>(priority: Priority, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Message::Error(ErrorMessage::new(priority, error))
    }

    pub fn group(messages: Vec<Message>) -> Self {
        Message::Group(GroupMessage::new(messages))
    }

    pub fn lazy(priority: Priority, producer: impl Into<Producer>) -> Self {
        Message::Lazy(LazyMessage::new(priority, producer))
    }

    /// Wrap `message` so that it is only loggable when `condition` holds.
    pub fn when(condition: bool, message: Message) -> Self {
        Message::Conditional(ConditionalMessage::new(condition, message))
    }

    /// A message with no content. Never loggable.
    pub fn empty(priority: Priority) -> Self {
        Message::Lines(LineMessage::new(priority, &[]))
    }

    /// Lazily produce an error and attach `fields` to it once it exists.
    pub fn wrap_error_fn(producer: ErrorProducer, fields: Fields) -> Self {
        Message::Lazy(LazyMessage::new(
            Priority::Invalid,
            ComposerProducer::new(move || {
                producer.call().map(|error| {
                    let mut message = ErrorMessage::from_shared(Priority::Invalid, Some(error));
                    for (key, value) in fields.iter() {
                        // keys come from a map, so they cannot collide with each other
                        let _ = message.annotate(key, value.clone());
                    }
                    Message::Error(message)
                })
            }),
        ))
    }

    /// False when the text form already carries all of the content.
    pub fn is_structured(&self) -> bool {
        match self {
            Message::String(_) | Message::Formatted(_) | Message::Lines(_) | Message::Bytes(_) => {
                false
            }
            Message::Fields(_) | Message::Error(_) | Message::Group(_) => true,
            Message::Lazy(m) => m.with_resolved(Message::is_structured),
            Message::Conditional(m) => m.inner().is_structured(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string())
    }
}

macro_rules! from_variant {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Message {
                fn from(message: $ty) -> Self {
                    Message::$variant(message)
                }
            }
        )*
    };
}

from_variant!(
    String(StringMessage),
    Formatted(FormattedMessage),
    Lines(LineMessage),
    Bytes(BytesMessage),
    Fields(FieldsMessage),
    Error(ErrorMessage),
    Group(GroupMessage),
    Lazy(LazyMessage),
    Conditional(ConditionalMessage),
);
