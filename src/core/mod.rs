//! Core logger types and traits

pub mod error;
pub mod fields;
pub mod global;
pub mod level_info;
pub mod logger;
pub mod output_format;
pub mod priority;
pub mod sender;
pub mod timestamp;

pub use error::{GripError, Result};
pub use fields::{FieldValue, Fields};
pub use global::{default_journaler, set_default_journaler};
pub use level_info::LevelInfo;
pub use logger::{Grip, GripBuilder};
pub use output_format::{OutputFormat, Record};
pub use priority::Priority;
pub use sender::{default_error_handler, ErrorHandler, Sender, SenderBase};
pub use timestamp::TimestampFormat;
