//! Batching sender with a background worker
//!
//! Accepted messages are queued to a worker thread that forwards them to
//! the inner sender in batches: whenever `count` messages have collected,
//! and on every `interval` tick for whatever is pending. A batch of more
//! than one message is delivered as a single group message.

use crate::core::error::{GripError, Result};
use crate::core::sender::{ErrorHandler, Sender};
use crate::core::level_info::LevelInfo;
use crate::message::Message;
use crossbeam_channel::{self as channel, select};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// How long `close` and `flush` wait for the worker before giving up.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

pub const DEFAULT_BUFFER_INTERVAL: Duration = Duration::from_secs(1);

pub const DEFAULT_BUFFER_COUNT: usize = 100;

enum Command {
    Message(Message),
    Flush(channel::Sender<()>),
}

pub struct BufferedSender {
    sender: Arc<dyn Sender>,
    queue: Mutex<Option<channel::Sender<Command>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    closed: AtomicBool,
}

impl BufferedSender {
    /// Wrap `sender`. A zero `interval` or `count` falls back to the
    /// defaults.
    pub fn new(sender: Arc<dyn Sender>, interval: Duration, count: usize) -> Self {
        let interval = if interval.is_zero() {
            DEFAULT_BUFFER_INTERVAL
        } else {
            interval
        };
        let count = if count == 0 { DEFAULT_BUFFER_COUNT } else { count };

        let (queue, commands) = channel::unbounded();
        let inner = Arc::clone(&sender);
        let worker = thread::spawn(move || run_worker(inner, commands, interval, count));

        Self {
            sender,
            queue: Mutex::new(Some(queue)),
            worker: Mutex::new(Some(worker)),
            closed: AtomicBool::new(false),
        }
    }

    /// Stop the worker, delivering whatever is still queued. Returns `false`
    /// if the worker did not finish within `timeout`.
    fn shutdown(&self, timeout: Duration) -> bool {
        drop(self.queue.lock().take());

        let Some(handle) = self.worker.lock().take() else {
            return true;
        };

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!("[GRIP ERROR] Buffered sender worker panicked: {:?}", e);
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[GRIP WARNING] Buffered sender worker did not finish within {:?}. \
                     Some messages may be lost.",
                    timeout
                );
                return false;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}

fn run_worker(
    sender: Arc<dyn Sender>,
    commands: channel::Receiver<Command>,
    interval: Duration,
    count: usize,
) {
    let ticker = channel::tick(interval);
    let mut buffer: Vec<Message> = Vec::with_capacity(count);

    loop {
        select! {
            recv(commands) -> command => match command {
                Ok(Command::Message(message)) => {
                    buffer.push(message);
                    if buffer.len() >= count {
                        deliver(sender.as_ref(), &mut buffer);
                    }
                }
                Ok(Command::Flush(ack)) => {
                    deliver(sender.as_ref(), &mut buffer);
                    if let Err(e) = sender.flush() {
                        eprintln!("[GRIP ERROR] Buffered sender flush failed: {}", e);
                    }
                    let _ = ack.send(());
                }
                Err(_) => {
                    deliver(sender.as_ref(), &mut buffer);
                    break;
                }
            },
            recv(ticker) -> _ => deliver(sender.as_ref(), &mut buffer),
        }
    }
}

fn deliver(sender: &dyn Sender, buffer: &mut Vec<Message>) {
    match buffer.len() {
        0 => {}
        1 => {
            if let Some(message) = buffer.pop() {
                sender.send(message);
            }
        }
        _ => sender.send(Message::group(std::mem::take(buffer))),
    }
}

impl Sender for BufferedSender {
    fn name(&self) -> String {
        self.sender.name()
    }

    fn set_name(&self, name: &str) {
        self.sender.set_name(name)
    }

    fn level(&self) -> LevelInfo {
        self.sender.level()
    }

    fn set_level(&self, level: LevelInfo) -> Result<()> {
        self.sender.set_level(level)
    }

    /// Filtering happens on the caller's thread, so lazy messages below the
    /// threshold never reach the queue.
    fn send(&self, message: Message) {
        if !self.sender.level().should_log(&message) {
            return;
        }

        let rejected = match self.queue.lock().as_ref() {
            Some(queue) => queue
                .send(Command::Message(message))
                .err()
                .map(channel::SendError::into_inner),
            None => Some(Command::Message(message)),
        };

        if let Some(Command::Message(message)) = rejected {
            let handler = self.sender.error_handler();
            handler(&GripError::sender_closed(self.sender.name()), &message);
        }
    }

    /// Deliver everything queued so far, then flush the inner sender.
    fn flush(&self) -> Result<()> {
        let (ack, done) = channel::bounded(1);
        let queued = match self.queue.lock().as_ref() {
            Some(queue) => queue.send(Command::Flush(ack)).is_ok(),
            None => false,
        };

        if !queued {
            return self.sender.flush();
        }

        done.recv_timeout(DEFAULT_SHUTDOWN_TIMEOUT).map_err(|_| {
            GripError::other(format!(
                "timed out flushing buffered sender '{}'",
                self.sender.name()
            ))
        })
    }

    /// Delivers pending messages, stops the worker and closes the inner
    /// sender.
    fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        self.sender.close()
    }

    fn error_handler(&self) -> ErrorHandler {
        self.sender.error_handler()
    }

    fn set_error_handler(&self, handler: ErrorHandler) -> Result<()> {
        self.sender.set_error_handler(handler)
    }
}

impl Drop for BufferedSender {
    fn drop(&mut self) {
        // the inner sender may be shared, so it is left open
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}
