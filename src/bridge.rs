//! Bridge from the `log` facade
//!
//! [`GripLog`] implements [`log::Log`] on top of a [`Grip`] logger, so
//! libraries logging through `log::info!` and friends end up in the same
//! sender as the rest of the program.
//!
//! ```no_run
//! use rust_grip::{bridge, Priority};
//!
//! // every `log` record becomes a Notice on the default logger
//! bridge::set_default_standard_logger(Priority::Notice).unwrap();
//! log::warn!("routed through grip");
//! ```

use crate::core::error::{GripError, Result};
use crate::core::global::default_journaler;
use crate::core::logger::Grip;
use crate::core::priority::Priority;
use crate::message::{Composer, Message};
use log::{Level, LevelFilter, Metadata, Record};
use std::sync::Arc;

/// Field holding the `log` target of a bridged record.
pub const TARGET_KEY: &str = "target";

/// `log::Log` implementation forwarding to a [`Grip`] logger.
pub struct GripLog {
    logger: Arc<Grip>,
    priority: Option<Priority>,
}

impl GripLog {
    /// Bridge that maps each record's `log::Level` to a priority.
    pub fn new(logger: Arc<Grip>) -> Self {
        Self {
            logger,
            priority: None,
        }
    }

    /// Bridge that logs every record at `priority`.
    pub fn pinned(logger: Arc<Grip>, priority: Priority) -> Self {
        Self {
            logger,
            priority: Some(priority),
        }
    }

    pub fn priority_for(&self, level: Level) -> Priority {
        self.priority.unwrap_or_else(|| map_level(level))
    }
}

pub fn map_level(level: Level) -> Priority {
    match level {
        Level::Error => Priority::Error,
        Level::Warn => Priority::Warning,
        Level::Info => Priority::Info,
        Level::Debug => Priority::Debug,
        Level::Trace => Priority::Trace,
    }
}

impl log::Log for GripLog {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.logger.accepts(self.priority_for(metadata.level()))
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let priority = self.priority_for(record.level());
        let mut message = Message::formatted(priority, *record.args());
        if !record.target().is_empty() {
            // a fresh message carries no fields yet
            let _ = message.annotate(TARGET_KEY, record.target().into());
        }
        self.logger.log(priority, message);
    }

    fn flush(&self) {
        if let Err(e) = self.logger.flush() {
            eprintln!("[GRIP ERROR] Failed to flush bridged logger: {}", e);
        }
    }
}

/// Install `bridge` as the global `log` logger. Fails if a logger was
/// already installed.
pub fn set_standard_logger(bridge: GripLog) -> Result<()> {
    log::set_boxed_logger(Box::new(bridge))
        .map(|()| log::set_max_level(LevelFilter::Trace))
        .map_err(|e| GripError::config("log bridge", e.to_string()))
}

/// Route the `log` facade into the default logger, every record at
/// `priority`.
pub fn set_default_standard_logger(priority: Priority) -> Result<()> {
    set_standard_logger(GripLog::pinned(default_journaler(), priority))
}
