//! Sender implementations
//!
//! Concrete backends write messages somewhere; wrappers hold another sender
//! and add one behavior on the way through.

pub mod annotating;
pub mod buffered;
pub mod file;
pub mod interceptor;
pub mod internal;
pub mod multi;
pub mod sampling;
pub mod stream;
pub mod writer;

pub use annotating::AnnotatingSender;
pub use buffered::BufferedSender;
pub use file::FileSender;
pub use interceptor::{Interceptor, InterceptorSender};
pub use internal::{InternalMessage, InternalSender};
pub use multi::MultiSender;
pub use sampling::{Sampler, SamplerMetrics, SamplingConfig, SamplingSender};
pub use stream::StreamSender;
pub use writer::WriterSender;

pub use crate::core::sender::{default_error_handler, ErrorHandler, Sender, SenderBase};
