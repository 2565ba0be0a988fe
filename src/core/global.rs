//! Process-wide default logger
//!
//! The default logger is created on first use, named after the running
//! program and writing to the console. [`set_default_journaler`] replaces it;
//! call it during start-up, before other threads log through the default.

use super::{error::Result, level_info::LevelInfo, logger::Grip, sender::Sender};
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

/// Name used when the program name cannot be determined.
pub const FALLBACK_NAME: &str = "grip";

static DEFAULT: OnceLock<RwLock<Arc<Grip>>> = OnceLock::new();

fn program_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|path| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

fn slot() -> &'static RwLock<Arc<Grip>> {
    DEFAULT.get_or_init(|| RwLock::new(Arc::new(Grip::new(program_name()))))
}

/// The current default logger.
pub fn default_journaler() -> Arc<Grip> {
    Arc::clone(&slot().read())
}

/// Replace the default logger. The previous logger is returned and left
/// open; loggers that share its sender keep working.
pub fn set_default_journaler(logger: Arc<Grip>) -> Arc<Grip> {
    std::mem::replace(&mut *slot().write(), logger)
}

pub fn name() -> String {
    default_journaler().name()
}

pub fn set_name(name: &str) {
    default_journaler().set_name(name)
}

pub fn set_level(level: LevelInfo) -> Result<()> {
    default_journaler().set_level(level)
}

pub fn get_sender() -> Arc<dyn Sender> {
    default_journaler().get_sender()
}

pub fn set_sender(sender: Option<Arc<dyn Sender>>) -> Result<()> {
    default_journaler().set_sender(sender)
}
