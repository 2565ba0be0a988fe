//! # Rust Grip
//!
//! A leveled logging façade with lazily composed messages and composable
//! senders.
//!
//! ## Features
//!
//! - **Leveled logging**: nine priorities from `Trace` to `Emergency`, with
//!   plain, formatted, joined and conditional entry points for each
//! - **Lazy messages**: producers run only if a sender accepts the message
//! - **Composable senders**: annotate, intercept, buffer, fan out and sample
//!   around any backend
//! - **Thread safe**: loggers and senders are shared across threads freely
//!
//! ## Example
//!
//! ```
//! use rust_grip::prelude::*;
//! use std::sync::Arc;
//!
//! let sender = Arc::new(InternalSender::new("app", LevelInfo::default()));
//! let logger = Grip::with_sender(sender.clone());
//!
//! logger.info("service started");
//! logger.error(Fields::new().with_field("message", "lookup failed").with_field("id", 7));
//! logger.debug_when(true, "below the threshold");
//!
//! assert_eq!(sender.len(), 2);
//! ```

pub mod bridge;
pub mod core;
pub mod macros;
pub mod message;
pub mod senders;

pub mod prelude {
    pub use crate::core::{
        default_journaler, set_default_journaler, FieldValue, Fields, Grip, GripBuilder,
        GripError, LevelInfo, OutputFormat, Priority, Result, Sender, TimestampFormat,
    };
    pub use crate::message::{
        convert, convert_with_level, AsDebug, Composer, ComposerProducer, ErrorProducer,
        FieldsProducer, IntoComposer, Message,
    };
    pub use crate::senders::{
        AnnotatingSender, BufferedSender, FileSender, InterceptorSender, InternalSender,
        MultiSender, SamplingConfig, SamplingSender, StreamSender, WriterSender,
    };
}

pub use crate::core::{
    default_error_handler, default_journaler, set_default_journaler, ErrorHandler, FieldValue,
    Fields, Grip, GripBuilder, GripError, LevelInfo, OutputFormat, Priority, Result, Sender,
    SenderBase, TimestampFormat,
};
pub use crate::message::{Composer, IntoComposer, Message};
