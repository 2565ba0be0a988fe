//! Formatting macros for [`Grip`](crate::Grip) loggers.
//!
//! Each macro takes a logger followed by `format!`-style arguments. The
//! arguments are only formatted if the logger's sender accepts the priority.
//!
//! # Examples
//!
//! ```
//! use rust_grip::senders::InternalSender;
//! use rust_grip::{info, warning, Grip, LevelInfo};
//! use std::sync::Arc;
//!
//! let sender = Arc::new(InternalSender::new("app", LevelInfo::default()));
//! let logger = Grip::with_sender(sender.clone());
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! warning!(logger, "Retry attempt {} of {}", 3, 5);
//! assert_eq!(sender.len(), 2);
//! ```

/// Log at an explicit priority.
///
/// ```
/// # use rust_grip::{Grip, Priority};
/// # let logger = Grip::new("doc");
/// use rust_grip::log;
/// log!(logger, Priority::Notice, "Simple message");
/// log!(logger, Priority::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $priority:expr, $($arg:tt)+) => {
        $logger.logf($priority, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Priority::Trace, $($arg)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Priority::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Priority::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! notice {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Priority::Notice, $($arg)+)
    };
}

#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Priority::Warning, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Priority::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Priority::Critical, $($arg)+)
    };
}

#[macro_export]
macro_rules! alert {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Priority::Alert, $($arg)+)
    };
}

/// Log at `Emergency`. Unlike [`Grip::emergency_panic`](crate::Grip::emergency_panic)
/// this never aborts.
#[macro_export]
macro_rules! emergency {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Priority::Emergency, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Grip, LevelInfo, Priority, Sender};
    use crate::senders::InternalSender;
    use std::sync::Arc;

    fn setup() -> (Arc<InternalSender>, Grip) {
        let sender = Arc::new(InternalSender::new(
            "macros",
            LevelInfo::new(Priority::Trace, Priority::Trace),
        ));
        (sender.clone(), Grip::with_sender(sender))
    }

    #[test]
    fn test_log_macro() {
        let (sender, logger) = setup();
        log!(logger, Priority::Info, "Test message");
        log!(logger, Priority::Info, "Formatted: {}", 42);
        assert_eq!(sender.rendered(), vec!["Test message", "Formatted: 42"]);
    }

    #[test]
    fn test_level_macros() {
        let (sender, logger) = setup();
        trace!(logger, "t");
        debug!(logger, "d {}", 1);
        info!(logger, "i");
        notice!(logger, "n");
        warning!(logger, "w");
        error!(logger, "e");
        critical!(logger, "c");
        alert!(logger, "a");
        emergency!(logger, "em");

        let priorities: Vec<Priority> = sender.drain().into_iter().map(|m| m.priority).collect();
        assert_eq!(priorities, Priority::ALL.to_vec());
    }

    #[test]
    fn test_filtered_macros_still_reach_interceptor() {
        use crate::senders::InterceptorSender;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let (sender, _) = setup();
        sender
            .set_level(LevelInfo::new(Priority::Info, Priority::Error))
            .unwrap();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let interceptor = InterceptorSender::new(sender.clone(), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let logger = Grip::with_sender(Arc::new(interceptor));

        debug!(logger, "d {}", 1);
        warning!(logger, "w");
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert!(sender.is_empty());
    }

    #[test]
    fn test_below_threshold_not_formatted() {
        use std::fmt;

        struct Loud;
        impl fmt::Display for Loud {
            fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
                panic!("formatted below threshold");
            }
        }

        let (sender, logger) = setup();
        sender
            .set_level(LevelInfo::new(Priority::Info, Priority::Error))
            .unwrap();
        debug!(logger, "{}", Loud);
        assert!(sender.is_empty());
    }
}
