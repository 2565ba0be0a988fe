//! Console and writer-backed stream sender

use crate::core::error::{GripError, Result};
use crate::core::level_info::LevelInfo;
use crate::core::output_format::{text_body, OutputFormat, Record};
use crate::core::priority::Priority;
use crate::core::sender::{delegate_base, Sender, SenderBase};
use crate::core::timestamp::TimestampFormat;
use crate::message::Message;
use parking_lot::Mutex;
use std::io::{self, Write};

enum Target {
    /// stdout, with Error and above on stderr
    Console,
    Writer(Mutex<Box<dyn Write + Send>>),
}

/// Writes one line per accepted message.
///
/// The default target is the console: messages at `Error` or above go to
/// stderr, everything else to stdout. [`StreamSender::with_writer`] sends
/// everything to a single writer instead.
pub struct StreamSender {
    base: SenderBase,
    target: Target,
    use_colors: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl StreamSender {
    /// Console sender.
    pub fn new(name: impl Into<String>, level: LevelInfo) -> Self {
        Self {
            base: SenderBase::new(name, level),
            target: Target::Console,
            use_colors: cfg!(feature = "console"),
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        }
    }

    pub fn with_writer(
        name: impl Into<String>,
        level: LevelInfo,
        writer: impl Write + Send + 'static,
    ) -> Self {
        Self {
            target: Target::Writer(Mutex::new(Box::new(writer))),
            use_colors: false,
            ..Self::new(name, level)
        }
    }

    /// Colors only apply to text output on the console.
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// ```
    /// use rust_grip::senders::StreamSender;
    /// use rust_grip::{LevelInfo, OutputFormat};
    ///
    /// let sender = StreamSender::new("app", LevelInfo::default())
    ///     .with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    fn render(&self, record: &Record<'_>) -> String {
        if self.use_colors && self.output_format == OutputFormat::Text {
            if let Target::Console = self.target {
                return colored_text(record, &self.timestamp_format);
            }
        }
        self.output_format.format(record, &self.timestamp_format)
    }

    fn write_line(&self, priority: Priority, line: &str) -> io::Result<()> {
        match &self.target {
            Target::Console if priority >= Priority::Error => {
                writeln!(io::stderr().lock(), "{}", line)
            }
            Target::Console => writeln!(io::stdout().lock(), "{}", line),
            Target::Writer(writer) => writeln!(writer.lock(), "{}", line),
        }
    }
}

#[cfg(feature = "console")]
fn colored_text(record: &Record<'_>, timestamp_format: &TimestampFormat) -> String {
    use colored::Colorize;

    format!(
        "[{}] [{}] {}",
        timestamp_format.format(&record.timestamp),
        record.priority.to_str().color(record.priority.color_code()),
        text_body(record)
    )
}

#[cfg(not(feature = "console"))]
fn colored_text(record: &Record<'_>, timestamp_format: &TimestampFormat) -> String {
    OutputFormat::Text.format(record, timestamp_format)
}

impl Sender for StreamSender {
    delegate_base!();

    fn send(&self, message: Message) {
        let level = self.base.level();
        if !level.should_log(&message) {
            return;
        }
        if self.base.is_closed() {
            self.base
                .handle_error(&GripError::sender_closed(self.base.name()), &message);
            return;
        }

        let name = self.base.name();
        let priority = level.effective_priority(&message);
        let line = self.render(&Record::new(&name, priority, &message));

        if let Err(e) = self.write_line(priority, &line) {
            let detail = e.to_string();
            self.base.handle_error(
                &GripError::io_operation(format!("writing to '{}'", name), detail, e),
                &message,
            );
        }
    }

    fn flush(&self) -> Result<()> {
        match &self.target {
            Target::Console => {
                io::stdout().flush()?;
                io::stderr().flush()?;
            }
            Target::Writer(writer) => writer.lock().flush()?,
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        if self.base.mark_closed() {
            self.flush()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for StreamSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSender")
            .field("base", &self.base)
            .field("output_format", &self.output_format)
            .field("timestamp_format", &self.timestamp_format)
            .finish()
    }
}
