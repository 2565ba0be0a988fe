//! In-memory sender
//!
//! Keeps every accepted message in a queue so tests (and callers that want
//! to inspect output) can read it back.

use crate::core::error::{GripError, Result};
use crate::core::level_info::LevelInfo;
use crate::core::priority::Priority;
use crate::core::sender::{delegate_base, Sender, SenderBase};
use crate::message::{Composer, Message};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A message captured by [`InternalSender`].
#[derive(Debug, Clone)]
pub struct InternalMessage {
    pub message: Message,
    /// Effective priority the message was accepted at.
    pub priority: Priority,
    pub rendered: String,
}

#[derive(Debug)]
pub struct InternalSender {
    base: SenderBase,
    queue: Mutex<VecDeque<InternalMessage>>,
    close_calls: AtomicUsize,
}

impl InternalSender {
    pub fn new(name: impl Into<String>, level: LevelInfo) -> Self {
        Self {
            base: SenderBase::new(name, level),
            queue: Mutex::new(VecDeque::new()),
            close_calls: AtomicUsize::new(0),
        }
    }

    /// Remove and return the oldest captured message.
    pub fn get_message(&self) -> Option<InternalMessage> {
        self.queue.lock().pop_front()
    }

    /// Remove and return every captured message.
    pub fn drain(&self) -> Vec<InternalMessage> {
        self.queue.lock().drain(..).collect()
    }

    /// Rendered text of every captured message, oldest first.
    pub fn rendered(&self) -> Vec<String> {
        self.queue.lock().iter().map(|m| m.rendered.clone()).collect()
    }

    pub fn has_message(&self) -> bool {
        !self.queue.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of times `close` has been called.
    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.base.is_closed()
    }
}

impl Sender for InternalSender {
    delegate_base!();

    fn send(&self, message: Message) {
        let level = self.base.level();
        if !level.should_log(&message) {
            return;
        }
        if self.base.is_closed() {
            self.base
                .handle_error(&GripError::sender_closed(self.base.name()), &message);
            return;
        }

        let captured = InternalMessage {
            priority: level.effective_priority(&message),
            rendered: message.string(),
            message,
        };
        self.queue.lock().push_back(captured);
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.base.mark_closed();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> InternalSender {
        InternalSender::new("internal", LevelInfo::new(Priority::Info, Priority::Info))
    }

    #[test]
    fn test_captures_accepted_messages() {
        let sender = sender();
        sender.send(Message::string_message(Priority::Debug, "dropped"));
        sender.send(Message::string_message(Priority::Warning, "kept"));
        sender.send(Message::string_message(Priority::Invalid, "defaulted"));

        assert_eq!(sender.len(), 2);
        let first = sender.get_message().unwrap();
        assert_eq!(first.rendered, "kept");
        assert_eq!(first.priority, Priority::Warning);

        let second = sender.get_message().unwrap();
        assert_eq!(second.priority, Priority::Info);
        assert!(!sender.has_message());
    }

    #[test]
    fn test_non_loggable_not_captured() {
        let sender = sender();
        sender.send(Message::string_message(Priority::Alert, ""));
        assert!(sender.is_empty());
    }

    #[test]
    fn test_send_after_close_reports_error() {
        use parking_lot::Mutex;
        use std::sync::Arc;

        let sender = sender();
        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&errors);
        sender
            .set_error_handler(Arc::new(move |err: &GripError, _: &Message| {
                sink.lock().push(err.to_string())
            }))
            .unwrap();

        sender.close().unwrap();
        sender.close().unwrap();
        sender.send(Message::string_message(Priority::Error, "late"));

        assert_eq!(sender.close_calls(), 2);
        assert!(sender.is_closed());
        assert!(sender.is_empty());
        assert_eq!(errors.lock().len(), 1);
    }
}
