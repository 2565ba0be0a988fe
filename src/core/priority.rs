//! Message priority definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered message priority.
///
/// `Invalid` is the unset value: messages carrying it take the default
/// priority of whichever sender receives them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Priority {
    #[default]
    Invalid = 0,
    Trace = 20,
    Debug = 30,
    Info = 40,
    Notice = 50,
    Warning = 60,
    Error = 70,
    Critical = 80,
    Alert = 90,
    Emergency = 100,
}

impl Priority {
    /// Every valid priority, lowest first.
    pub const ALL: [Priority; 9] = [
        Priority::Trace,
        Priority::Debug,
        Priority::Info,
        Priority::Notice,
        Priority::Warning,
        Priority::Error,
        Priority::Critical,
        Priority::Alert,
        Priority::Emergency,
    ];

    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Priority::Invalid
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            Priority::Invalid => "INVALID",
            Priority::Trace => "TRACE",
            Priority::Debug => "DEBUG",
            Priority::Info => "INFO",
            Priority::Notice => "NOTICE",
            Priority::Warning => "WARNING",
            Priority::Error => "ERROR",
            Priority::Critical => "CRITICAL",
            Priority::Alert => "ALERT",
            Priority::Emergency => "EMERGENCY",
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Priority::Invalid | Priority::Trace => BrightBlack,
            Priority::Debug => Blue,
            Priority::Info => Green,
            Priority::Notice => Cyan,
            Priority::Warning => Yellow,
            Priority::Error => Red,
            Priority::Critical | Priority::Alert => BrightRed,
            Priority::Emergency => Magenta,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(Priority::Trace),
            "DEBUG" => Ok(Priority::Debug),
            "INFO" => Ok(Priority::Info),
            "NOTICE" => Ok(Priority::Notice),
            "WARN" | "WARNING" => Ok(Priority::Warning),
            "ERR" | "ERROR" => Ok(Priority::Error),
            "CRIT" | "CRITICAL" => Ok(Priority::Critical),
            "ALERT" => Ok(Priority::Alert),
            "EMERG" | "EMERGENCY" => Ok(Priority::Emergency),
            _ => Err(format!("Invalid priority: '{}'", s)),
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, String> {
        Priority::ALL
            .iter()
            .copied()
            .find(|p| *p as u8 == value)
            .ok_or_else(|| format!("Invalid priority value: {}", value))
    }
}
