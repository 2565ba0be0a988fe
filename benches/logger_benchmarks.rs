//! Criterion benchmarks for rust_grip

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_grip::message::FieldsProducer;
use rust_grip::prelude::*;
use rust_grip::senders::Sampler;
use rust_grip::{ErrorHandler, SenderBase};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Sender that filters and renders like a real backend, then discards, so
/// the benchmarks measure the façade.
struct SinkSender {
    base: SenderBase,
}

fn discard(threshold: Priority) -> Arc<dyn Sender> {
    Arc::new(SinkSender {
        base: SenderBase::new("bench", LevelInfo::new(Priority::Info, threshold)),
    })
}

impl Sender for SinkSender {
    fn name(&self) -> String {
        self.base.name()
    }

    fn set_name(&self, name: &str) {
        self.base.set_name(name)
    }

    fn level(&self) -> LevelInfo {
        self.base.level()
    }

    fn set_level(&self, level: LevelInfo) -> Result<()> {
        self.base.set_level(level)
    }

    fn send(&self, message: Message) {
        if self.base.should_log(&message) {
            black_box(message.string());
        }
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }

    fn error_handler(&self) -> ErrorHandler {
        self.base.error_handler()
    }

    fn set_error_handler(&self, handler: ErrorHandler) -> Result<()> {
        self.base.set_error_handler(handler)
    }
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    let logger = Grip::with_sender(discard(Priority::Trace));

    group.bench_function("info_str", |b| {
        b.iter(|| logger.info(black_box("Info message")));
    });

    group.bench_function("infof", |b| {
        b.iter(|| logger.infof(format_args!("request {} took {}ms", black_box(42), 7)));
    });

    group.bench_function("infoln", |b| {
        b.iter(|| logger.infoln(&[&"request", &black_box(42), &"done"]));
    });

    group.bench_function("fields", |b| {
        b.iter(|| {
            logger.info(
                Fields::new()
                    .with_field("message", "request")
                    .with_field("id", black_box(42))
                    .with_field("ok", true),
            )
        });
    });

    group.finish();
}

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let logger = Grip::with_sender(discard(Priority::Error));

    group.bench_function("filtered_str", |b| {
        b.iter(|| logger.debug(black_box("Debug message")));
    });

    group.bench_function("filtered_formatted", |b| {
        b.iter(|| logger.debugf(format_args!("value {}", black_box(42))));
    });

    group.bench_function("filtered_lazy", |b| {
        b.iter(|| {
            logger.debug(FieldsProducer::new(|| {
                Fields::new().with_field("expensive", black_box(42))
            }))
        });
    });

    group.bench_function("when_false", |b| {
        b.iter(|| logger.error_when(black_box(false), "never"));
    });

    group.finish();
}

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");
    group.measurement_time(Duration::from_secs(5));

    for threads in [2usize, 4, 8] {
        group.throughput(Throughput::Elements((threads * 100) as u64));
        group.bench_function(format!("{}_threads", threads), |b| {
            let logger = Arc::new(Grip::with_sender(discard(Priority::Trace)));
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let logger = Arc::clone(&logger);
                        thread::spawn(move || {
                            for i in 0..100 {
                                logger.infof(format_args!("message {}", i));
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    let _ = handle.join();
                }
            });
        });
    }

    group.finish();
}

fn bench_sampler_direct(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampler");
    group.throughput(Throughput::Elements(1));

    let sampler = Sampler::new(SamplingConfig::new(0.5));
    group.bench_function("should_sample", |b| {
        b.iter(|| sampler.should_sample(black_box(Priority::Info), None));
    });

    let categorized = Sampler::new(SamplingConfig::new(0.5).with_category_rate("db", 0.1));
    group.bench_function("should_sample_category", |b| {
        b.iter(|| categorized.should_sample(black_box(Priority::Info), Some("db")));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_logging,
    bench_level_filtering,
    bench_concurrent_logging,
    bench_sampler_direct,
);
criterion_main!(benches);
