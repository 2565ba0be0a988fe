//! Append-only file sender

use crate::core::error::{GripError, Result};
use crate::core::level_info::LevelInfo;
use crate::core::output_format::{OutputFormat, Record};
use crate::core::sender::{delegate_base, Sender, SenderBase};
use crate::core::timestamp::TimestampFormat;
use crate::message::Message;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct FileSender {
    base: SenderBase,
    path: PathBuf,
    writer: Mutex<Option<BufWriter<File>>>,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl FileSender {
    /// Open `path` for appending, creating it if needed.
    ///
    /// ```no_run
    /// use rust_grip::senders::FileSender;
    /// use rust_grip::{LevelInfo, TimestampFormat};
    ///
    /// let sender = FileSender::new("app", "/var/log/app.log", LevelInfo::default())
    ///     .unwrap()
    ///     .with_timestamp_format(TimestampFormat::Rfc3339);
    /// ```
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, level: LevelInfo) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                GripError::io_operation(
                    "opening log file",
                    format!("{}: {}", path.display(), e),
                    e,
                )
            })?;

        Ok(Self {
            base: SenderBase::new(name, level),
            path,
            writer: Mutex::new(Some(BufWriter::new(file))),
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        })
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sender for FileSender {
    delegate_base!();

    fn send(&self, message: Message) {
        let level = self.base.level();
        if !level.should_log(&message) {
            return;
        }

        let name = self.base.name();
        let line = self.output_format.format(
            &Record::new(&name, level.effective_priority(&message), &message),
            &self.timestamp_format,
        );

        let mut writer = self.writer.lock();
        let Some(writer) = writer.as_mut() else {
            self.base
                .handle_error(&GripError::sender_closed(name), &message);
            return;
        };

        if let Err(e) = writeln!(writer, "{}", line) {
            let detail = format!("{}: {}", self.path.display(), e);
            self.base.handle_error(
                &GripError::io_operation("writing log file", detail, e),
                &message,
            );
        }
    }

    fn flush(&self) -> Result<()> {
        if let Some(writer) = self.writer.lock().as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    /// Flushes and releases the file handle.
    fn close(&self) -> Result<()> {
        self.base.mark_closed();
        if let Some(mut writer) = self.writer.lock().take() {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for FileSender {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl std::fmt::Debug for FileSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSender")
            .field("base", &self.base)
            .field("path", &self.path)
            .finish()
    }
}
