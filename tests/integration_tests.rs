//! Integration tests for the logger façade and sender stack
//!
//! These tests verify:
//! - Level filtering through the logger
//! - Lazy messages and conditional logging
//! - Sender swapping and partial level updates
//! - Wrapper composition (annotate, intercept, multi, buffered, sampling)
//! - File output in every format

use rust_grip::message::{ComposerProducer, ErrorProducer, FieldsProducer};
use rust_grip::prelude::*;
use rust_grip::senders::{InternalSender, SamplingConfig};
use std::fs;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn capture(default: Priority, threshold: Priority) -> (Arc<InternalSender>, Grip) {
    let sender = Arc::new(InternalSender::new(
        "integration",
        LevelInfo::new(default, threshold),
    ));
    let logger = Grip::with_sender(sender.clone());
    (sender, logger)
}

#[test]
fn test_threshold_scenario() {
    let (sender, logger) = capture(Priority::Info, Priority::Info);

    logger.debug("x");
    assert!(!sender.has_message());

    logger.info("x");
    let captured = sender.drain();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].rendered, "x");
}

#[test]
fn test_emergency_formatted_at_any_threshold() {
    let (sender, logger) = capture(Priority::Info, Priority::Emergency);

    logger.logf(Priority::Emergency, format_args!("{}: {}", "a", 3));
    logger.alertf(format_args!("filtered"));

    assert_eq!(sender.rendered(), vec!["a: 3"]);
}

#[test]
fn test_lazy_producer_runs_once() {
    let (sender, logger) = capture(Priority::Info, Priority::Info);
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    logger.debug(FieldsProducer::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Fields::new().with_field("message", "debug")
    }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let counter = Arc::clone(&calls);
    logger.info(FieldsProducer::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Fields::new().with_field("message", "computed").with_field("n", 3)
    }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let captured = sender.get_message().unwrap();
    assert!(captured.rendered.contains("computed"));
    assert_eq!(captured.message.raw()["n"], 3);
    // rendering again reuses the resolved content
    let _ = captured.message.string();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_nil_values_not_logged() {
    let (sender, logger) = capture(Priority::Info, Priority::Info);

    logger.error(None::<String>);
    logger.error(Ok::<(), std::io::Error>(()));
    logger.error(FieldsProducer::absent());
    logger.error(ComposerProducer::absent());
    logger.error(ErrorProducer::new(|| Ok::<(), std::io::Error>(())));

    assert!(sender.is_empty());
}

#[test]
fn test_error_values() {
    let (sender, logger) = capture(Priority::Info, Priority::Info);
    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config missing");

    logger.critical(err);
    logger.error(ErrorProducer::new(|| {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "late failure"))
    }));

    assert_eq!(sender.rendered(), vec!["config missing", "late failure"]);
}

#[test]
fn test_when_variants() {
    let (sender, logger) = capture(Priority::Info, Priority::Info);

    logger.log_when(true, Priority::Notice, "yes");
    logger.log_when(false, Priority::Notice, "no");
    logger.warning_when(false, ComposerProducer::new(|| -> Message {
        panic!("resolved a suppressed message")
    }));

    assert_eq!(sender.rendered(), vec!["yes"]);
}

#[test]
fn test_set_sender_swap() {
    let (old, logger) = capture(Priority::Notice, Priority::Warning);
    let new = Arc::new(InternalSender::new("replacement", LevelInfo::default()));

    logger
        .set_sender(Some(new.clone() as Arc<dyn Sender>))
        .unwrap();

    assert_eq!(new.name(), "integration");
    assert_eq!(new.level(), LevelInfo::new(Priority::Notice, Priority::Warning));
    assert_eq!(old.close_calls(), 1);
    assert!(std::ptr::addr_eq(
        Arc::as_ptr(&logger.get_sender()),
        Arc::as_ptr(&new)
    ));

    assert!(matches!(logger.set_sender(None), Err(GripError::NilSender)));
    assert_eq!(old.close_calls(), 1);
}

#[test]
fn test_shared_sender_between_loggers() {
    let (sender, first) = capture(Priority::Info, Priority::Info);
    let second = Grip::with_sender(first.get_sender());

    first.info("one");
    second.info("two");
    assert_eq!(sender.rendered(), vec!["one", "two"]);
}

#[test]
fn test_annotating_conflict_scenario() {
    let inner = Arc::new(InternalSender::new("inner", LevelInfo::default()));
    let errors = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&errors);
    inner
        .set_error_handler(Arc::new(move |err: &GripError, _: &Message| {
            sink.lock().push(err.to_string())
        }))
        .unwrap();

    let annotating = Arc::new(AnnotatingSender::new(
        inner.clone(),
        Fields::new().with_field("k", "v"),
    ));
    let logger = Grip::with_sender(annotating);

    logger.info(Fields::new().with_field("message", "m").with_field("k", "old"));

    assert_eq!(inner.len(), 1);
    let errors = errors.lock();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("k"));
}

#[test]
fn test_interceptor_counts_scenario() {
    let inner = Arc::new(InternalSender::new(
        "inner",
        LevelInfo::new(Priority::Info, Priority::Info),
    ));
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let sender = InterceptorSender::new(inner.clone(), move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    sender.send(Message::string_message(Priority::Info, "kept"));
    sender.send(Message::string_message(Priority::Debug, "dropped"));

    assert_eq!(count.load(Ordering::SeqCst), 2);
    assert_eq!(inner.len(), 1);
}

#[test]
fn test_interceptor_sees_every_entry_point() {
    let inner = Arc::new(InternalSender::new(
        "inner",
        LevelInfo::new(Priority::Info, Priority::Info),
    ));
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let interceptor = Arc::new(InterceptorSender::new(inner.clone(), move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    let annotated = Arc::new(AnnotatingSender::new(
        interceptor,
        Fields::new().with_field("host", "db1"),
    ));
    let logger = Grip::with_sender(annotated);

    logger.debug("plain");
    logger.debugf(format_args!("formatted {}", 1));
    logger.debugln(&[&"joined", &2]);
    rust_grip::debug!(logger, "macro {}", 3);
    rust_grip::log!(logger, Priority::Trace, "generic");
    logger.debug_when(true, "conditional");

    assert_eq!(count.load(Ordering::SeqCst), 6);
    assert!(inner.is_empty());
}

#[test]
fn test_wrapper_stack() {
    let a = Arc::new(InternalSender::new("a", LevelInfo::default()));
    let b = Arc::new(InternalSender::new("b", LevelInfo::default()));
    let multi = Arc::new(MultiSender::new(
        "stack",
        LevelInfo::new(Priority::Info, Priority::Info),
        vec![a.clone() as Arc<dyn Sender>, b.clone()],
    ));
    let annotated = Arc::new(AnnotatingSender::new(
        multi,
        Fields::new().with_field("host", "db1"),
    ));
    let logger = Grip::with_sender(annotated);

    logger.notice("replicated");
    logger.debug("filtered");

    for member in [&a, &b] {
        let captured = member.drain();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].message.raw()["host"], "db1");
        assert_eq!(member.name(), "stack");
    }
}

#[test]
fn test_buffered_logger_flush() {
    let inner = Arc::new(InternalSender::new("inner", LevelInfo::default()));
    let buffered = Arc::new(BufferedSender::new(
        inner.clone(),
        Duration::from_secs(60),
        1000,
    ));
    let logger = Grip::with_sender(buffered);

    for i in 0..10 {
        logger.infof(format_args!("message {}", i));
    }
    logger.flush().unwrap();

    let captured = inner.drain();
    let lines: usize = captured
        .iter()
        .map(|m| m.rendered.lines().count())
        .sum();
    assert_eq!(lines, 10);

    logger.close().unwrap();
    assert_eq!(inner.close_calls(), 1);
}

#[test]
fn test_sampling_keeps_errors() {
    let inner = Arc::new(InternalSender::new("inner", LevelInfo::default()));
    let sampling = Arc::new(SamplingSender::new(inner.clone(), SamplingConfig::new(0.0)));
    let logger = Grip::with_sender(sampling);

    for _ in 0..20 {
        logger.info("sampled away");
    }
    logger.error("kept");
    logger.emergency("kept");

    assert_eq!(inner.rendered(), vec!["kept", "kept"]);
}

#[test]
fn test_file_sender_formats() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    for (format, check) in [
        (OutputFormat::Text, "[INFO] files - plain" as &str),
        (OutputFormat::Json, "\"message\":\"plain\""),
        (OutputFormat::Logfmt, "message=\"plain\""),
    ] {
        let path = temp_dir.path().join(format!("{:?}.log", format));
        let sender = FileSender::new("files", path.clone(), LevelInfo::default())
            .expect("Failed to create file sender")
            .with_output_format(format)
            .with_timestamp_format(TimestampFormat::UnixMillis);
        let logger = Grip::with_sender(Arc::new(sender));

        logger.info("plain");
        logger.debug("filtered");
        logger.close().unwrap();

        let content = fs::read_to_string(&path).expect("Failed to read log file");
        assert_eq!(content.lines().count(), 1, "{:?}: {}", format, content);
        assert!(content.contains(check), "{:?}: {}", format, content);
    }
}

#[test]
fn test_writer_sender_feeds_logger_output() {
    let (sender, logger) = capture(Priority::Info, Priority::Info);
    let mut writer = WriterSender::new(logger.get_sender(), Priority::Notice);

    writeln!(writer, "from a writer").unwrap();
    write!(writer, "tail").unwrap();
    drop(writer);

    assert_eq!(sender.rendered(), vec!["from a writer", "tail"]);
}

#[test]
fn test_group_message() {
    let (sender, logger) = capture(Priority::Info, Priority::Info);
    logger.warning(vec![
        Message::string_message(Priority::Invalid, "first"),
        Message::string_message(Priority::Error, "second"),
    ]);

    let captured = sender.get_message().unwrap();
    assert_eq!(captured.rendered, "first\nsecond");
    assert_eq!(captured.priority, Priority::Warning);
}

#[test]
fn test_builder_and_partial_level() {
    let sender = Arc::new(InternalSender::new("x", LevelInfo::default()));
    let logger = Grip::builder()
        .name("built")
        .sender(sender.clone())
        .build()
        .unwrap();

    logger
        .set_level(LevelInfo::new(Priority::Invalid, Priority::Debug))
        .unwrap();
    assert_eq!(sender.level(), LevelInfo::new(Priority::Info, Priority::Debug));

    logger.debug("visible now");
    assert_eq!(sender.rendered(), vec!["visible now"]);
}
