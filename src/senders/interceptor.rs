//! Sender wrapper that observes every message

use crate::core::priority::Priority;
use crate::core::sender::{delegate_inner, Sender};
use crate::message::Message;
use std::sync::Arc;

/// Side-effect run on every message an [`InterceptorSender`] receives.
pub type Interceptor = Arc<dyn Fn(&Message) + Send + Sync>;

/// Runs a callback on every message, whether or not the inner sender will
/// accept it, then forwards the message unchanged.
pub struct InterceptorSender {
    sender: Arc<dyn Sender>,
    interceptor: Interceptor,
}

impl InterceptorSender {
    pub fn new<F>(sender: Arc<dyn Sender>, interceptor: F) -> Self
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        Self {
            sender,
            interceptor: Arc::new(interceptor),
        }
    }
}

impl Sender for InterceptorSender {
    delegate_inner!();

    /// The interceptor sees messages the inner sender would drop.
    fn accepts(&self, _priority: Priority) -> bool {
        true
    }

    fn send(&self, message: Message) {
        (self.interceptor)(&message);
        self.sender.send(message);
    }
}
