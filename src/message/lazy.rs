//! Lazily produced messages
//!
//! A producer is a closure that builds message content on demand. The
//! closure runs at most once, on the first call to `string`, `raw`,
//! `loggable` or `annotate`, and never if the message is discarded before
//! any of those. Changing the priority does not run it.

use super::error::SharedError;
use super::{Composer, ErrorMessage, FieldsMessage, Message};
use crate::core::error::{GripError, Result};
use crate::core::fields::{FieldValue, Fields};
use crate::core::priority::Priority;
use parking_lot::{Mutex, MutexGuard};
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

type FieldsFn = Box<dyn FnOnce() -> Fields + Send>;
type ComposerFn = Box<dyn FnOnce() -> Option<Message> + Send>;
type ErrorFn = Box<dyn FnOnce() -> Option<SharedError> + Send>;

/// Produces a structured field map.
pub struct FieldsProducer(Option<FieldsFn>);

impl FieldsProducer {
    pub fn new<F>(producer: F) -> Self
    where
        F: FnOnce() -> Fields + Send + 'static,
    {
        Self(Some(Box::new(producer)))
    }

    /// Adapt a closure that builds a plain map.
    pub fn from_map<F>(producer: F) -> Self
    where
        F: FnOnce() -> HashMap<String, FieldValue> + Send + 'static,
    {
        Self::new(move || Fields::from(producer()))
    }

    pub fn from_btree<F>(producer: F) -> Self
    where
        F: FnOnce() -> BTreeMap<String, FieldValue> + Send + 'static,
    {
        Self::new(move || Fields::from(producer()))
    }

    /// A producer with no function. Messages built from it are never
    /// loggable.
    pub fn absent() -> Self {
        Self(None)
    }

    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }
}

/// Produces another message. Returning `None` yields an empty message.
pub struct ComposerProducer(Option<ComposerFn>);

impl ComposerProducer {
    pub fn new<F, M>(producer: F) -> Self
    where
        F: FnOnce() -> M + Send + 'static,
        M: Into<Option<Message>>,
    {
        Self(Some(Box::new(move || producer().into())))
    }

    pub fn absent() -> Self {
        Self(None)
    }

    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }
}

/// Produces the outcome of a fallible operation. `Ok` yields a message
/// that is never loggable, so `close`-style calls can be logged without
/// checking their result first.
pub struct ErrorProducer(Option<ErrorFn>);

impl ErrorProducer {
    pub fn new<F, E>(producer: F) -> Self
    where
        F: FnOnce() -> std::result::Result<(), E> + Send + 'static,
        E: Error + Send + Sync + 'static,
    {
        Self(Some(Box::new(move || {
            producer().err().map(|e| Arc::new(e) as SharedError)
        })))
    }

    pub fn absent() -> Self {
        Self(None)
    }

    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    /// Run the producer. An absent producer yields no error.
    pub(crate) fn call(self) -> Option<SharedError> {
        self.0.and_then(|producer| producer())
    }
}

macro_rules! producer_debug {
    ($($ty:ident),*) => {
        $(
            impl fmt::Debug for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_struct(stringify!($ty))
                        .field("absent", &self.is_absent())
                        .finish()
                }
            }
        )*
    };
}

producer_debug!(FieldsProducer, ComposerProducer, ErrorProducer);

/// Which kind of producer backs a [`LazyMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LazyKind {
    Fields,
    Composer,
    Error,
}

#[derive(Debug)]
pub enum Producer {
    Fields(FieldsProducer),
    Composer(ComposerProducer),
    Error(ErrorProducer),
}

impl Producer {
    pub fn kind(&self) -> LazyKind {
        match self {
            Producer::Fields(_) => LazyKind::Fields,
            Producer::Composer(_) => LazyKind::Composer,
            Producer::Error(_) => LazyKind::Error,
        }
    }

    fn is_absent(&self) -> bool {
        match self {
            Producer::Fields(p) => p.is_absent(),
            Producer::Composer(p) => p.is_absent(),
            Producer::Error(p) => p.is_absent(),
        }
    }
}

impl From<FieldsProducer> for Producer {
    fn from(producer: FieldsProducer) -> Self {
        Producer::Fields(producer)
    }
}

impl From<ComposerProducer> for Producer {
    fn from(producer: ComposerProducer) -> Self {
        Producer::Composer(producer)
    }
}

impl From<ErrorProducer> for Producer {
    fn from(producer: ErrorProducer) -> Self {
        Producer::Error(producer)
    }
}

struct LazyState {
    producer: Option<Producer>,
    resolved: Option<Box<Message>>,
}

/// A message whose content comes from a [`Producer`].
pub struct LazyMessage {
    priority: Priority,
    kind: LazyKind,
    absent: bool,
    state: Mutex<LazyState>,
}

impl LazyMessage {
    pub fn new(priority: Priority, producer: impl Into<Producer>) -> Self {
        let producer = producer.into();
        Self {
            priority,
            kind: producer.kind(),
            absent: producer.is_absent(),
            state: Mutex::new(LazyState {
                producer: Some(producer),
                resolved: None,
            }),
        }
    }

    pub fn kind(&self) -> LazyKind {
        self.kind
    }

    pub fn is_resolved(&self) -> bool {
        self.state.lock().resolved.is_some()
    }

    /// Run `f` against the produced message, producing it first if needed.
    pub fn with_resolved<R>(&self, f: impl FnOnce(&Message) -> R) -> R {
        let state = self.resolve();
        match state.resolved.as_deref() {
            Some(message) => f(message),
            None => f(&Message::empty(self.priority)),
        }
    }

    fn with_resolved_mut<R>(&self, f: impl FnOnce(&mut Message) -> R) -> R {
        let mut state = self.resolve();
        match state.resolved.as_deref_mut() {
            Some(message) => f(message),
            None => f(&mut Message::empty(self.priority)),
        }
    }

    fn resolve(&self) -> MutexGuard<'_, LazyState> {
        let mut state = self.state.lock();
        if state.resolved.is_none() {
            let message = self.produce(state.producer.take());
            state.resolved = Some(Box::new(message));
        }
        state
    }

    fn produce(&self, producer: Option<Producer>) -> Message {
        let priority = self.priority;
        let empty = || Message::fields(priority, Fields::new());

        match producer {
            Some(Producer::Fields(FieldsProducer(Some(f)))) => {
                Message::Fields(FieldsMessage::new(priority, f()))
            }
            Some(Producer::Composer(ComposerProducer(Some(f)))) => match f() {
                Some(mut message) => {
                    if priority.is_valid() {
                        let _ = message.set_priority(priority);
                    }
                    message
                }
                None => empty(),
            },
            Some(Producer::Error(ErrorProducer(Some(f)))) => {
                Message::Error(ErrorMessage::from_shared(priority, f()))
            }
            _ => empty(),
        }
    }
}

impl Composer for LazyMessage {
    fn string(&self) -> String {
        self.with_resolved(Composer::string)
    }

    fn raw(&self) -> serde_json::Value {
        self.with_resolved(Composer::raw)
    }

    fn loggable(&self) -> bool {
        if self.absent {
            return false;
        }
        self.with_resolved(Composer::loggable)
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn set_priority(&mut self, priority: Priority) -> Result<()> {
        if !priority.is_valid() {
            return Err(GripError::InvalidPriority(priority));
        }
        self.priority = priority;

        match self.state.get_mut().resolved.as_deref_mut() {
            Some(message) => message.set_priority(priority),
            None => Ok(()),
        }
    }

    fn annotate(&mut self, key: &str, value: FieldValue) -> Result<()> {
        self.with_resolved_mut(|message| message.annotate(key, value))
    }
}

impl Clone for LazyMessage {
    /// Cloning resolves the original; the clone shares the produced content.
    fn clone(&self) -> Self {
        let resolved = self.with_resolved(|message| message.clone());
        Self {
            priority: self.priority,
            kind: self.kind,
            absent: self.absent,
            state: Mutex::new(LazyState {
                producer: None,
                resolved: Some(Box::new(resolved)),
            }),
        }
    }
}

impl fmt::Debug for LazyMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyMessage")
            .field("priority", &self.priority)
            .field("kind", &self.kind)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_fields(counter: &Arc<AtomicUsize>) -> FieldsProducer {
        let counter = Arc::clone(counter);
        FieldsProducer::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Fields::new().with_field("message", "computed")
        })
    }

    #[test]
    fn test_producer_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut message = LazyMessage::new(Priority::Info, counting_fields(&calls));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(message.loggable());
        assert_eq!(message.string(), "[message='computed']");
        assert_eq!(message.raw()["message"], "computed");
        message.annotate("extra", 1.into()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_priority_does_not_resolve() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut message = LazyMessage::new(Priority::Info, counting_fields(&calls));

        message.set_priority(Priority::Error).unwrap();
        assert_eq!(message.priority(), Priority::Error);
        assert!(message.set_priority(Priority::Invalid).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!message.is_resolved());
    }

    #[test]
    fn test_priority_propagates_after_resolution() {
        let mut message = LazyMessage::new(
            Priority::Info,
            ComposerProducer::new(|| Message::string_message(Priority::Debug, "inner")),
        );
        assert_eq!(message.string(), "inner");
        assert_eq!(message.with_resolved(Composer::priority), Priority::Info);

        message.set_priority(Priority::Critical).unwrap();
        assert_eq!(message.with_resolved(Composer::priority), Priority::Critical);
    }

    #[test]
    fn test_absent_producers_not_loggable() {
        let fields = LazyMessage::new(Priority::Info, FieldsProducer::absent());
        let composer = LazyMessage::new(Priority::Info, ComposerProducer::absent());
        let error = LazyMessage::new(Priority::Info, ErrorProducer::absent());

        for message in [&fields, &composer, &error] {
            assert!(!message.loggable());
            assert!(!message.is_resolved());
        }
        assert_eq!(fields.string(), "[]");
    }

    #[test]
    fn test_composer_producer_returning_none() {
        let message = LazyMessage::new(Priority::Info, ComposerProducer::new(|| None::<Message>));
        assert!(!message.loggable());
        assert_eq!(message.kind(), LazyKind::Composer);
    }

    #[test]
    fn test_error_producer() {
        let failed = LazyMessage::new(
            Priority::Error,
            ErrorProducer::new(|| Err(io::Error::new(io::ErrorKind::Other, "close failed"))),
        );
        assert!(failed.loggable());
        assert_eq!(failed.string(), "close failed");

        let succeeded = LazyMessage::new(Priority::Error, ErrorProducer::new(|| Ok::<(), io::Error>(())));
        assert!(!succeeded.loggable());
    }

    #[test]
    fn test_clone_resolves_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let message = LazyMessage::new(Priority::Info, counting_fields(&calls));

        let copy = message.clone();
        assert_eq!(copy.string(), message.string());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_map_producer() {
        let message = LazyMessage::new(
            Priority::Info,
            FieldsProducer::from_map(|| {
                let mut map = HashMap::new();
                map.insert("k".to_string(), FieldValue::from("v"));
                map
            }),
        );
        assert_eq!(message.raw()["k"], "v");
    }
}
