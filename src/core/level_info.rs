//! Default/threshold priority pairs and the should-log decision

use super::error::{GripError, Result};
use super::priority::Priority;
use crate::message::Composer;
use serde::{Deserialize, Serialize};

/// Level configuration of a sender.
///
/// `default` is substituted for messages whose own priority is unset;
/// `threshold` is the lowest priority the sender accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub default: Priority,
    pub threshold: Priority,
}

impl LevelInfo {
    pub const fn new(default: Priority, threshold: Priority) -> Self {
        Self { default, threshold }
    }

    pub fn is_valid(&self) -> bool {
        self.default.is_valid() && self.threshold.is_valid()
    }

    /// Return `self` if valid, otherwise an `InvalidLevel` error.
    pub fn validate(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(GripError::invalid_level(self.default, self.threshold))
        }
    }

    /// Fill invalid fields of `self` from `fallback`.
    #[must_use]
    pub fn merge(self, fallback: LevelInfo) -> Self {
        Self {
            default: if self.default.is_valid() {
                self.default
            } else {
                fallback.default
            },
            threshold: if self.threshold.is_valid() {
                self.threshold
            } else {
                fallback.threshold
            },
        }
    }

    #[inline]
    pub fn effective(&self, priority: Priority) -> Priority {
        if priority.is_valid() {
            priority
        } else {
            self.default
        }
    }

    /// Priority a message is judged at: its own, or the default when unset.
    #[inline]
    pub fn effective_priority<C: Composer + ?Sized>(&self, message: &C) -> Priority {
        self.effective(message.priority())
    }

    /// Threshold check alone. Emergency always passes.
    #[inline]
    pub fn enabled(&self, priority: Priority) -> bool {
        let priority = self.effective(priority);
        priority.is_valid() && (priority == Priority::Emergency || priority >= self.threshold)
    }

    /// The single filtering gate shared by every sender.
    ///
    /// The threshold is checked before loggability, so lazy messages below
    /// the threshold are never resolved.
    pub fn should_log<C: Composer + ?Sized>(&self, message: &C) -> bool {
        self.enabled(message.priority()) && message.loggable()
    }
}

impl Default for LevelInfo {
    fn default() -> Self {
        Self::new(Priority::Info, Priority::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{FieldsProducer, Message, StringMessage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_validity() {
        assert!(LevelInfo::default().is_valid());
        assert!(!LevelInfo::new(Priority::Invalid, Priority::Info).is_valid());
        assert!(!LevelInfo::new(Priority::Info, Priority::Invalid).is_valid());
        assert!(LevelInfo::new(Priority::Info, Priority::Invalid).validate().is_err());
    }

    #[test]
    fn test_merge_partial() {
        let current = LevelInfo::new(Priority::Notice, Priority::Warning);
        let update = LevelInfo::new(Priority::Invalid, Priority::Debug);

        let merged = update.merge(current);
        assert_eq!(merged, LevelInfo::new(Priority::Notice, Priority::Debug));
    }

    #[test]
    fn test_threshold() {
        let info = LevelInfo::new(Priority::Info, Priority::Warning);

        for p in Priority::ALL {
            let message = Message::from(StringMessage::new(p, "hello"));
            let expected = p >= Priority::Warning;
            assert_eq!(info.should_log(&message), expected, "priority {}", p);
        }
    }

    #[test]
    fn test_emergency_bypasses_threshold() {
        // no threshold sits above Emergency, but the bypass is explicit
        let info = LevelInfo::new(Priority::Info, Priority::Emergency);
        assert!(info.enabled(Priority::Emergency));
        assert!(!info.enabled(Priority::Alert));
    }

    #[test]
    fn test_invalid_priority_takes_default() {
        let info = LevelInfo::new(Priority::Error, Priority::Warning);
        let message = Message::from(StringMessage::new(Priority::Invalid, "hello"));

        assert_eq!(info.effective_priority(&message), Priority::Error);
        assert!(info.should_log(&message));

        let quiet = LevelInfo::new(Priority::Debug, Priority::Warning);
        assert!(!quiet.should_log(&message));
    }

    #[test]
    fn test_not_loggable_rejected() {
        let info = LevelInfo::new(Priority::Info, Priority::Trace);
        let message = Message::from(StringMessage::new(Priority::Emergency, ""));
        assert!(!info.should_log(&message));
    }

    #[test]
    fn test_below_threshold_never_resolves() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let message = Message::lazy(
            Priority::Debug,
            FieldsProducer::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                crate::Fields::new().with_field("k", "v")
            }),
        );

        let info = LevelInfo::new(Priority::Info, Priority::Info);
        assert!(!info.should_log(&message));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
