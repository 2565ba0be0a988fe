//! `io::Write` adapter over a sender

use crate::core::priority::Priority;
use crate::core::sender::Sender;
use crate::message::Message;
use std::io::{self, Write};
use std::sync::Arc;

/// `io::Write` adapter: every complete line written becomes one message at
/// a fixed priority. A trailing partial line is sent on `flush` or drop.
///
/// Useful for pointing code that expects a writer (a child process's
/// output, a third-party library) at a sender.
pub struct WriterSender {
    sender: Arc<dyn Sender>,
    priority: Priority,
    buffer: Vec<u8>,
}

impl WriterSender {
    pub fn new(sender: Arc<dyn Sender>, priority: Priority) -> Self {
        Self {
            sender,
            priority,
            buffer: Vec::new(),
        }
    }

    fn send_line(&self, line: &[u8]) {
        let line = String::from_utf8_lossy(line);
        let line = line.trim_end_matches(['\r', '\n']);
        if !line.is_empty() {
            self.sender
                .send(Message::string_message(self.priority, line));
        }
    }
}

impl Write for WriterSender {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.send_line(&line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            self.send_line(&rest);
        }
        self.sender
            .flush()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

impl Drop for WriterSender {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
