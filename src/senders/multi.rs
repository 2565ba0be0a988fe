//! Fan-out sender

use crate::core::error::{GripError, Result};
use crate::core::level_info::LevelInfo;
use crate::core::sender::{ErrorHandler, Sender, SenderBase};
use crate::message::Message;
use parking_lot::RwLock;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Fans every accepted message out to several senders.
///
/// Configuration set on the multi sender (name, level, error handler) is
/// pushed down to every member. Each member still applies its own level
/// check, so members may be more selective than the group.
pub struct MultiSender {
    base: SenderBase,
    senders: RwLock<Vec<Arc<dyn Sender>>>,
}

impl MultiSender {
    pub fn new(name: impl Into<String>, level: LevelInfo, senders: Vec<Arc<dyn Sender>>) -> Self {
        let multi = Self {
            base: SenderBase::new(name, level),
            senders: RwLock::new(Vec::new()),
        };
        for sender in senders {
            multi.add(sender);
        }
        multi
    }

    /// Add a member. It takes the group's name and level.
    pub fn add(&self, sender: Arc<dyn Sender>) {
        sender.set_name(&self.base.name());
        if let Err(e) = sender.set_level(self.base.level()) {
            eprintln!("[GRIP WARNING] could not apply level to member sender: {}", e);
        }
        self.senders.write().push(sender);
    }

    pub fn len(&self) -> usize {
        self.senders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.read().is_empty()
    }

    fn for_each<F>(&self, mut operation: F) -> Result<()>
    where
        F: FnMut(&dyn Sender) -> Result<()>,
    {
        let errors = self
            .senders
            .read()
            .iter()
            .filter_map(|sender| operation(sender.as_ref()).err())
            .collect();

        match GripError::aggregate(errors) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Sender for MultiSender {
    fn name(&self) -> String {
        self.base.name()
    }

    fn set_name(&self, name: &str) {
        self.base.set_name(name);
        for sender in self.senders.read().iter() {
            sender.set_name(name);
        }
    }

    fn level(&self) -> LevelInfo {
        self.base.level()
    }

    fn set_level(&self, level: LevelInfo) -> Result<()> {
        self.base.set_level(level)?;
        self.for_each(|sender| sender.set_level(level))
    }

    fn send(&self, message: Message) {
        if !self.base.should_log(&message) {
            return;
        }

        let senders = self.senders.read();
        for (idx, sender) in senders.iter().enumerate() {
            let outcome = catch_unwind(AssertUnwindSafe(|| sender.send(message.clone())));
            if let Err(panic_info) = outcome {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };
                self.base.handle_error(
                    &GripError::other(format!("member sender #{} panicked: {}", idx, panic_msg)),
                    &message,
                );
            }
        }
    }

    fn flush(&self) -> Result<()> {
        self.for_each(|sender| sender.flush())
    }

    fn close(&self) -> Result<()> {
        if !self.base.mark_closed() {
            return Ok(());
        }
        self.for_each(|sender| sender.close())
    }

    fn error_handler(&self) -> ErrorHandler {
        self.base.error_handler()
    }

    fn set_error_handler(&self, handler: ErrorHandler) -> Result<()> {
        self.base.set_error_handler(Arc::clone(&handler))?;
        self.for_each(|sender| sender.set_error_handler(Arc::clone(&handler)))
    }
}
