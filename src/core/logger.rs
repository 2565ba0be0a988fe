//! Logger façade
//!
//! A [`Grip`] binds a name to one active [`Sender`] and exposes the leveled
//! logging surface on top of it. Every entry point converts its argument
//! into a [`Message`] and hands it to the sender, which does the filtering.
//!
//! # Example
//!
//! ```
//! use rust_grip::senders::InternalSender;
//! use rust_grip::{Grip, LevelInfo, Priority};
//! use std::sync::Arc;
//!
//! let sender = Arc::new(InternalSender::new("app", LevelInfo::default()));
//! let logger = Grip::with_sender(sender.clone());
//!
//! logger.debug("filtered");
//! logger.infof(format_args!("{} items", 3));
//! assert_eq!(sender.rendered(), vec!["3 items"]);
//! ```

use super::{
    error::{GripError, Result},
    level_info::LevelInfo,
    priority::Priority,
    sender::Sender,
};
use crate::message::{convert, Composer, IntoComposer, Message};
use crate::senders::StreamSender;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

struct GripState {
    sender: Arc<dyn Sender>,
    default_level: Priority,
}

/// Leveled logger bound to a single sender.
///
/// The sender reference sits behind a reader/writer lock: logging calls take
/// the shared side, reconfiguration takes the exclusive side. Swapping the
/// sender closes the old one and installs the new one under the same
/// exclusive lock, so no logging call ever sees a closed sender in place.
pub struct Grip {
    state: RwLock<GripState>,
}

macro_rules! level_methods {
    ($( $priority:ident => $plain:ident, $formatted:ident, $lines:ident, $when:ident; )+) => {
        $(
            #[inline]
            pub fn $plain<T: IntoComposer>(&self, value: T) {
                self.dispatch(convert(Priority::$priority, value));
            }

            #[inline]
            pub fn $formatted(&self, args: fmt::Arguments<'_>) {
                self.logf(Priority::$priority, args);
            }

            #[inline]
            pub fn $lines(&self, args: &[&dyn fmt::Display]) {
                self.logln(Priority::$priority, args);
            }

            #[inline]
            pub fn $when<T: IntoComposer>(&self, condition: bool, value: T) {
                self.log_when(condition, Priority::$priority, value);
            }
        )+
    };
}

impl Grip {
    /// Logger writing to the console, accepting every priority.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let sender = StreamSender::new(name, LevelInfo::new(Priority::Trace, Priority::Trace));
        Self::with_sender(Arc::new(sender))
    }

    /// Logger on top of an existing sender. The logger's name is the
    /// sender's name.
    #[must_use]
    pub fn with_sender(sender: Arc<dyn Sender>) -> Self {
        Self {
            state: RwLock::new(GripState {
                sender,
                default_level: Priority::Info,
            }),
        }
    }

    #[must_use]
    pub fn builder() -> GripBuilder {
        GripBuilder::new()
    }

    pub fn name(&self) -> String {
        self.state.read().sender.name()
    }

    pub fn set_name(&self, name: &str) {
        self.state.write().sender.set_name(name);
    }

    /// Update the sender's level. Invalid fields of `level` keep the
    /// sender's current values.
    pub fn set_level(&self, level: LevelInfo) -> Result<()> {
        let state = self.state.write();
        let merged = level.merge(state.sender.level());
        state.sender.set_level(merged)
    }

    pub fn level(&self) -> LevelInfo {
        self.state.read().sender.level()
    }

    /// Whether a message at `priority` would reach anything. Wrappers that
    /// observe filtered messages make this true below the threshold.
    pub fn accepts(&self, priority: Priority) -> bool {
        self.state.read().sender.accepts(priority)
    }

    /// The active sender. Share it with another logger through
    /// [`Grip::set_sender`] to back both with the same output.
    pub fn get_sender(&self) -> Arc<dyn Sender> {
        Arc::clone(&self.state.read().sender)
    }

    /// Replace the active sender.
    ///
    /// The new sender takes the current sender's level and name, and the
    /// current sender is closed. `None` is rejected and leaves the logger
    /// untouched, as does installing the sender already in place.
    pub fn set_sender(&self, sender: Option<Arc<dyn Sender>>) -> Result<()> {
        let sender = sender.ok_or(GripError::NilSender)?;

        let mut state = self.state.write();
        if std::ptr::addr_eq(Arc::as_ptr(&state.sender), Arc::as_ptr(&sender)) {
            return Ok(());
        }

        sender.set_level(state.sender.level())?;
        state.sender.close()?;
        sender.set_name(&state.sender.name());
        state.sender = sender;
        Ok(())
    }

    /// Priority used by [`Grip::send`].
    pub fn default_level(&self) -> Priority {
        self.state.read().default_level
    }

    pub fn set_default_level(&self, priority: Priority) -> Result<()> {
        if !priority.is_valid() {
            return Err(GripError::InvalidPriority(priority));
        }
        self.state.write().default_level = priority;
        Ok(())
    }

    /// Log `value` at the logger's default priority.
    pub fn send<T: IntoComposer>(&self, value: T) {
        let state = self.state.read();
        state.sender.send(convert(state.default_level, value));
    }

    pub fn log<T: IntoComposer>(&self, priority: Priority, value: T) {
        self.dispatch(convert(priority, value));
    }

    /// Log preformatted arguments, usually built with `format_args!`.
    ///
    /// Formatting is skipped entirely when the sender does not accept
    /// `priority`.
    pub fn logf(&self, priority: Priority, args: fmt::Arguments<'_>) {
        let state = self.state.read();
        if state.sender.accepts(priority) {
            state.sender.send(Message::formatted(priority, args));
        }
    }

    /// Log the arguments joined by single spaces.
    pub fn logln(&self, priority: Priority, args: &[&dyn fmt::Display]) {
        let state = self.state.read();
        if state.sender.accepts(priority) {
            state.sender.send(Message::lines(priority, args));
        }
    }

    /// Log `value` only if `condition` holds. A false condition makes the
    /// message unloggable before anything inspects its content, so lazy
    /// producers never run.
    pub fn log_when<T: IntoComposer>(&self, condition: bool, priority: Priority, value: T) {
        self.dispatch(Message::when(condition, convert(priority, value)));
    }

    level_methods! {
        Emergency => emergency, emergencyf, emergencyln, emergency_when;
        Alert => alert, alertf, alertln, alert_when;
        Critical => critical, criticalf, criticalln, critical_when;
        Error => error, errorf, errorln, error_when;
        Warning => warning, warningf, warningln, warning_when;
        Notice => notice, noticef, noticeln, notice_when;
        Info => info, infof, infoln, info_when;
        Debug => debug, debugf, debugln, debug_when;
        Trace => trace, tracef, traceln, trace_when;
    }

    /// Log at `Emergency`, then panic with the message text.
    ///
    /// The message reaches the sender before the panic starts. Nothing
    /// happens if the sender would not accept the message. Only call this
    /// from a program's entry point.
    pub fn emergency_panic<T: IntoComposer>(&self, value: T) {
        if let Some(text) = self.dispatch_checked(convert(Priority::Emergency, value)) {
            panic!("{}", text);
        }
    }

    /// Log at `Emergency`, flush the sender, then exit the process with
    /// status 1.
    ///
    /// Nothing happens if the sender would not accept the message. Only
    /// call this from a program's entry point.
    pub fn emergency_fatal<T: IntoComposer>(&self, value: T) {
        if self.dispatch_checked(convert(Priority::Emergency, value)).is_some() {
            if let Err(e) = self.flush() {
                eprintln!("[GRIP ERROR] Failed to flush before exit: {}", e);
            }
            std::process::exit(1);
        }
    }

    pub fn flush(&self) -> Result<()> {
        self.state.read().sender.flush()
    }

    /// Close the active sender. Later messages go to its error handler.
    pub fn close(&self) -> Result<()> {
        self.state.read().sender.close()
    }

    #[inline]
    fn dispatch(&self, message: Message) {
        self.state.read().sender.send(message);
    }

    /// Send `message`, returning its text if it passes the sender's level.
    /// The read lock is released before the caller escalates.
    fn dispatch_checked(&self, message: Message) -> Option<String> {
        let state = self.state.read();
        let text = state
            .sender
            .level()
            .should_log(&message)
            .then(|| message.string());
        state.sender.send(message);
        text
    }
}

impl fmt::Debug for Grip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Grip")
            .field("name", &state.sender.name())
            .field("level", &state.sender.level())
            .field("default_level", &state.default_level)
            .finish()
    }
}

/// Builder for [`Grip`]
pub struct GripBuilder {
    name: Option<String>,
    level: Option<LevelInfo>,
    default_level: Priority,
    sender: Option<Arc<dyn Sender>>,
}

impl GripBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: None,
            level: None,
            default_level: Priority::Info,
            sender: None,
        }
    }

    /// Name applied to the sender. Without a sender, also the name of the
    /// console sender built in its place.
    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LevelInfo) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn default_level(mut self, priority: Priority) -> Self {
        self.default_level = priority;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sender(mut self, sender: Arc<dyn Sender>) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Build the logger. Fails on an invalid level or default priority.
    pub fn build(self) -> Result<Grip> {
        let sender = match self.sender {
            Some(sender) => {
                if let Some(name) = &self.name {
                    sender.set_name(name);
                }
                sender
            }
            None => Arc::new(StreamSender::new(
                self.name.unwrap_or_else(|| "grip".to_string()),
                LevelInfo::new(Priority::Trace, Priority::Trace),
            )),
        };

        if let Some(level) = self.level {
            sender.set_level(level.merge(sender.level()))?;
        }

        let logger = Grip::with_sender(sender);
        logger.set_default_level(self.default_level)?;
        Ok(logger)
    }
}

impl Default for GripBuilder {
    fn default() -> Self {
        Self::new()
    }
}
