//! Sender trait for log output destinations
//!
//! A sender owns a name, a [`LevelInfo`] and an error handler, and delivers
//! messages that pass its level check. Senders are shared by reference
//! (`Arc<dyn Sender>`), so every method takes `&self` and implementations
//! keep their state behind locks.
//!
//! Delivery failures never reach the caller of [`Sender::send`]; they go to
//! the sender's [`ErrorHandler`].

use super::{
    error::{GripError, Result},
    level_info::LevelInfo,
    priority::Priority,
};
use crate::message::{Composer, Message};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Callback for delivery failures.
pub type ErrorHandler = Arc<dyn Fn(&GripError, &Message) + Send + Sync>;

/// Handler that writes a diagnostic line to stderr and carries on.
pub fn default_error_handler() -> ErrorHandler {
    Arc::new(|err: &GripError, message: &Message| {
        eprintln!("[GRIP ERROR] {} (message: {:?})", err, message.string());
    })
}

pub trait Sender: Send + Sync {
    fn name(&self) -> String;

    fn set_name(&self, name: &str);

    fn level(&self) -> LevelInfo;

    /// Rejects a level with an invalid default or threshold.
    fn set_level(&self, level: LevelInfo) -> Result<()>;

    /// Whether a message at `priority` could have any effect on this
    /// sender. Callers use it to skip building messages nobody will see.
    ///
    /// Senders that act on messages below their threshold must return
    /// `true`; wrappers that forward everything ask their inner sender.
    fn accepts(&self, priority: Priority) -> bool {
        self.level().enabled(priority)
    }

    /// Deliver `message` if it passes the level check.
    ///
    /// Implementations check [`LevelInfo::should_log`] themselves, since
    /// wrappers forward without filtering.
    fn send(&self, message: Message);

    /// Drain any buffered messages.
    fn flush(&self) -> Result<()>;

    /// Release backend resources. Calling it again is harmless.
    fn close(&self) -> Result<()>;

    fn error_handler(&self) -> ErrorHandler;

    fn set_error_handler(&self, handler: ErrorHandler) -> Result<()>;
}

struct BaseState {
    name: String,
    level: LevelInfo,
    error_handler: ErrorHandler,
}

/// Name, level, error handler and closed flag shared by concrete senders.
pub struct SenderBase {
    state: RwLock<BaseState>,
    closed: AtomicBool,
}

impl SenderBase {
    pub fn new(name: impl Into<String>, level: LevelInfo) -> Self {
        Self {
            state: RwLock::new(BaseState {
                name: name.into(),
                level,
                error_handler: default_error_handler(),
            }),
            closed: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> String {
        self.state.read().name.clone()
    }

    pub fn set_name(&self, name: &str) {
        self.state.write().name = name.to_string();
    }

    pub fn level(&self) -> LevelInfo {
        self.state.read().level
    }

    pub fn set_level(&self, level: LevelInfo) -> Result<()> {
        let level = level.validate()?;
        self.state.write().level = level;
        Ok(())
    }

    pub fn error_handler(&self) -> ErrorHandler {
        Arc::clone(&self.state.read().error_handler)
    }

    pub fn set_error_handler(&self, handler: ErrorHandler) -> Result<()> {
        if self.is_closed() {
            return Err(GripError::sender_closed(self.name()));
        }
        self.state.write().error_handler = handler;
        Ok(())
    }

    pub fn should_log(&self, message: &Message) -> bool {
        self.level().should_log(message)
    }

    /// Route `err` to the configured handler.
    pub fn handle_error(&self, err: &GripError, message: &Message) {
        let handler = self.error_handler();
        handler(err, message);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Mark the sender closed. Returns `true` only for the call that closed
    /// it.
    pub fn mark_closed(&self) -> bool {
        !self.closed.swap(true, Ordering::AcqRel)
    }
}

impl std::fmt::Debug for SenderBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("SenderBase")
            .field("name", &state.name)
            .field("level", &state.level)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Implements the name, level and error handler methods of [`Sender`] by
/// forwarding to a `base: SenderBase` field.
macro_rules! delegate_base {
    () => {
        fn name(&self) -> String {
            self.base.name()
        }

        fn set_name(&self, name: &str) {
            self.base.set_name(name)
        }

        fn level(&self) -> $crate::core::level_info::LevelInfo {
            self.base.level()
        }

        fn set_level(
            &self,
            level: $crate::core::level_info::LevelInfo,
        ) -> $crate::core::error::Result<()> {
            self.base.set_level(level)
        }

        fn error_handler(&self) -> $crate::core::sender::ErrorHandler {
            self.base.error_handler()
        }

        fn set_error_handler(
            &self,
            handler: $crate::core::sender::ErrorHandler,
        ) -> $crate::core::error::Result<()> {
            self.base.set_error_handler(handler)
        }
    };
}

/// Implements every [`Sender`] method except `send` by forwarding to an
/// inner `sender: Arc<dyn Sender>` field.
macro_rules! delegate_inner {
    () => {
        fn name(&self) -> String {
            self.sender.name()
        }

        fn set_name(&self, name: &str) {
            self.sender.set_name(name)
        }

        fn level(&self) -> $crate::core::level_info::LevelInfo {
            self.sender.level()
        }

        fn set_level(
            &self,
            level: $crate::core::level_info::LevelInfo,
        ) -> $crate::core::error::Result<()> {
            self.sender.set_level(level)
        }

        fn flush(&self) -> $crate::core::error::Result<()> {
            self.sender.flush()
        }

        fn close(&self) -> $crate::core::error::Result<()> {
            self.sender.close()
        }

        fn error_handler(&self) -> $crate::core::sender::ErrorHandler {
            self.sender.error_handler()
        }

        fn set_error_handler(
            &self,
            handler: $crate::core::sender::ErrorHandler,
        ) -> $crate::core::error::Result<()> {
            self.sender.set_error_handler(handler)
        }
    };
}

pub(crate) use delegate_base;
pub(crate) use delegate_inner;
