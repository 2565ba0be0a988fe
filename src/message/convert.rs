//! Conversion of arbitrary values into messages
//!
//! Every logging entry point accepts anything implementing [`IntoComposer`].
//! Conversion never fails and never runs a producer: closures wrapped in
//! [`FieldsProducer`], [`ComposerProducer`] or [`ErrorProducer`] become lazy
//! messages and only run if a sender looks at their content.
//!
//! Two policies exist for values that already are messages. [`convert`]
//! always applies the caller's priority. [`convert_with_level`] keeps a
//! priority the message already carries and only fills in a missing one.

use super::{
    BytesMessage, ComposerProducer, Composer, ErrorMessage, ErrorProducer, FieldsMessage,
    FieldsProducer, FormattedMessage, GroupMessage, LazyMessage, LineMessage, Message,
    StringMessage,
};
use super::{ConditionalMessage, SharedError};
use crate::core::error::GripError;
use crate::core::fields::{FieldValue, Fields};
use crate::core::priority::Priority;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt;
use std::io;
use std::sync::Arc;

/// Values that can be turned into a [`Message`] at a given priority.
pub trait IntoComposer {
    /// Convert, applying `priority` to the result.
    fn into_composer(self, priority: Priority) -> Message;

    /// Convert, keeping any priority the value already carries.
    ///
    /// Only values that are already messages carry a priority, so the
    /// default is plain conversion.
    fn into_composer_with_level(self, priority: Priority) -> Message
    where
        Self: Sized,
    {
        self.into_composer(priority)
    }
}

/// Convert `value`, always applying `priority`.
pub fn convert<T: IntoComposer>(priority: Priority, value: T) -> Message {
    value.into_composer(priority)
}

/// Convert `value`, applying `priority` only where the value has none.
pub fn convert_with_level<T: IntoComposer>(priority: Priority, value: T) -> Message {
    value.into_composer_with_level(priority)
}

/// Formats any `Debug` value with `{:?}`. This is the fallback for types
/// with no dedicated conversion.
#[derive(Debug, Clone, Copy)]
pub struct AsDebug<T>(pub T);

impl<T: fmt::Debug> IntoComposer for AsDebug<T> {
    fn into_composer(self, priority: Priority) -> Message {
        Message::formatted(priority, format_args!("{:?}", self.0))
    }
}

impl IntoComposer for Message {
    fn into_composer(mut self, priority: Priority) -> Message {
        let _ = self.set_priority(priority);
        self
    }

    fn into_composer_with_level(mut self, priority: Priority) -> Message {
        if !self.priority().is_valid() {
            let _ = self.set_priority(priority);
        }
        self
    }
}

macro_rules! message_struct {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoComposer for $ty {
                fn into_composer(self, priority: Priority) -> Message {
                    Message::from(self).into_composer(priority)
                }

                fn into_composer_with_level(self, priority: Priority) -> Message {
                    Message::from(self).into_composer_with_level(priority)
                }
            }
        )*
    };
}

message_struct!(
    StringMessage,
    FormattedMessage,
    LineMessage,
    BytesMessage,
    FieldsMessage,
    ErrorMessage,
    GroupMessage,
    LazyMessage,
    ConditionalMessage,
);

/// A slice of messages becomes a group. Members keep their own priority;
/// only members without one take `priority`.
impl IntoComposer for Vec<Message> {
    fn into_composer(self, priority: Priority) -> Message {
        let mut group = GroupMessage::new(self);
        let _ = group.set_priority(priority);
        Message::Group(group)
    }
}

impl IntoComposer for &str {
    fn into_composer(self, priority: Priority) -> Message {
        Message::string_message(priority, self)
    }
}

impl IntoComposer for String {
    fn into_composer(self, priority: Priority) -> Message {
        Message::string_message(priority, self)
    }
}

impl IntoComposer for &String {
    fn into_composer(self, priority: Priority) -> Message {
        Message::string_message(priority, self.as_str())
    }
}

impl IntoComposer for fmt::Arguments<'_> {
    fn into_composer(self, priority: Priority) -> Message {
        Message::formatted(priority, self)
    }
}

impl IntoComposer for GripError {
    fn into_composer(self, priority: Priority) -> Message {
        Message::error(priority, self)
    }
}

impl IntoComposer for io::Error {
    fn into_composer(self, priority: Priority) -> Message {
        Message::error(priority, self)
    }
}

impl IntoComposer for Box<dyn Error + Send + Sync> {
    fn into_composer(self, priority: Priority) -> Message {
        Message::Error(ErrorMessage::from_shared(priority, Some(SharedError::from(self))))
    }
}

impl IntoComposer for SharedError {
    fn into_composer(self, priority: Priority) -> Message {
        Message::Error(ErrorMessage::from_shared(priority, Some(self)))
    }
}

/// `Ok` converts to an error message with no error, which is never
/// loggable.
impl<E> IntoComposer for std::result::Result<(), E>
where
    E: Error + Send + Sync + 'static,
{
    fn into_composer(self, priority: Priority) -> Message {
        let error = self.err().map(|e| Arc::new(e) as SharedError);
        Message::Error(ErrorMessage::from_shared(priority, error))
    }
}

impl IntoComposer for Fields {
    fn into_composer(self, priority: Priority) -> Message {
        Message::fields(priority, self)
    }
}

impl IntoComposer for HashMap<String, FieldValue> {
    fn into_composer(self, priority: Priority) -> Message {
        Message::fields(priority, Fields::from(self))
    }
}

impl IntoComposer for BTreeMap<String, FieldValue> {
    fn into_composer(self, priority: Priority) -> Message {
        Message::fields(priority, Fields::from(self))
    }
}

impl IntoComposer for Vec<u8> {
    fn into_composer(self, priority: Priority) -> Message {
        Message::bytes(priority, self)
    }
}

impl IntoComposer for &[u8] {
    fn into_composer(self, priority: Priority) -> Message {
        Message::bytes(priority, self)
    }
}

impl IntoComposer for Vec<String> {
    fn into_composer(self, priority: Priority) -> Message {
        Message::Lines(LineMessage::from_strings(priority, self))
    }
}

impl IntoComposer for Vec<&str> {
    fn into_composer(self, priority: Priority) -> Message {
        Message::Lines(LineMessage::from_strings(priority, self))
    }
}

impl IntoComposer for &[&dyn fmt::Display] {
    fn into_composer(self, priority: Priority) -> Message {
        Message::lines(priority, self)
    }
}

impl IntoComposer for FieldsProducer {
    fn into_composer(self, priority: Priority) -> Message {
        Message::lazy(priority, self)
    }
}

impl IntoComposer for ComposerProducer {
    fn into_composer(self, priority: Priority) -> Message {
        Message::lazy(priority, self)
    }
}

impl IntoComposer for ErrorProducer {
    fn into_composer(self, priority: Priority) -> Message {
        Message::lazy(priority, self)
    }
}

/// Collections of the above become groups with one member per element.
macro_rules! group_of {
    ($($ty:ty => $build:expr),* $(,)?) => {
        $(
            impl IntoComposer for Vec<$ty> {
                fn into_composer(self, priority: Priority) -> Message {
                    let build: fn(Priority, $ty) -> Message = $build;
                    Message::group(self.into_iter().map(|item| build(priority, item)).collect())
                }
            }
        )*
    };
}

group_of!(
    Fields => Message::fields,
    HashMap<String, FieldValue> => |p, map| Message::fields(p, Fields::from(map)),
    Vec<u8> => |p, data| Message::bytes(p, data),
    Vec<String> => |p, parts| Message::Lines(LineMessage::from_strings(p, parts)),
    FieldsProducer => |p, producer| Message::lazy(p, producer),
    ComposerProducer => |p, producer| Message::lazy(p, producer),
    ErrorProducer => |p, producer| Message::lazy(p, producer),
);

/// `None` converts to an empty message that is never loggable.
impl<T: IntoComposer> IntoComposer for Option<T> {
    fn into_composer(self, priority: Priority) -> Message {
        match self {
            Some(value) => value.into_composer(priority),
            None => Message::empty(priority),
        }
    }

    fn into_composer_with_level(self, priority: Priority) -> Message {
        match self {
            Some(value) => value.into_composer_with_level(priority),
            None => Message::empty(priority),
        }
    }
}

impl IntoComposer for () {
    fn into_composer(self, priority: Priority) -> Message {
        Message::empty(priority)
    }
}

macro_rules! display_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoComposer for $ty {
                fn into_composer(self, priority: Priority) -> Message {
                    Message::Formatted(FormattedMessage::display(priority, &self))
                }
            }
        )*
    };
}

display_primitive!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char);
