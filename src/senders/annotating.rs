//! Sender wrapper that attaches fixed annotations

use crate::core::error::GripError;
use crate::core::fields::Fields;
use crate::core::priority::Priority;
use crate::core::sender::{delegate_inner, Sender};
use crate::message::{Composer, Message};
use std::sync::Arc;

/// Adds a fixed set of annotations to every message before forwarding it.
///
/// Annotation conflicts do not stop delivery: the failures are collected
/// into one error for the inner sender's error handler and the message is
/// sent anyway. Messages below the inner threshold are forwarded untouched
/// so lazy content is not produced for them.
pub struct AnnotatingSender {
    sender: Arc<dyn Sender>,
    annotations: Fields,
}

impl AnnotatingSender {
    pub fn new(sender: Arc<dyn Sender>, annotations: Fields) -> Self {
        Self {
            sender,
            annotations,
        }
    }

    pub fn annotations(&self) -> &Fields {
        &self.annotations
    }
}

impl Sender for AnnotatingSender {
    delegate_inner!();

    fn accepts(&self, priority: Priority) -> bool {
        self.sender.accepts(priority)
    }

    fn send(&self, mut message: Message) {
        if !self.sender.level().enabled(message.priority()) {
            self.sender.send(message);
            return;
        }

        let errors = self
            .annotations
            .iter()
            .filter_map(|(key, value)| message.annotate(key, value.clone()).err())
            .collect();

        if let Some(err) = GripError::aggregate(errors) {
            let handler = self.sender.error_handler();
            handler(&err, &message);
        }

        self.sender.send(message);
    }
}
