//! Probabilistic sampling for high-volume senders
//!
//! A [`SamplingSender`] forwards only a fraction of the messages its inner
//! sender would accept. Configured priorities (by default `Error` and
//! above) always pass, and `Emergency` can never be sampled away.
//!
//! ```
//! use rust_grip::senders::{InternalSender, SamplingConfig, SamplingSender};
//! use rust_grip::{LevelInfo, Priority};
//! use std::sync::Arc;
//!
//! let inner = Arc::new(InternalSender::new("app", LevelInfo::default()));
//! let sender = SamplingSender::new(
//!     inner,
//!     SamplingConfig::new(0.1).with_category_rate("database", 0.01),
//! );
//! ```

use crate::core::priority::Priority;
use crate::core::sender::{delegate_inner, Sender};
use crate::message::{Composer, Message};
use rand::Rng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Field holding a message's sampling category.
pub const CATEGORY_KEY: &str = "category";

#[derive(Debug, Clone)]
pub struct SamplingConfig {
    /// Fraction of messages kept, between 0.0 and 1.0.
    pub rate: f64,
    /// Priorities that bypass sampling.
    pub always_sample: Vec<Priority>,
    /// Rates for messages whose `category` field matches.
    pub category_rates: HashMap<String, f64>,
    /// Scale the rate down when throughput exceeds `adaptive_threshold`
    /// messages per second.
    pub adaptive: bool,
    pub adaptive_threshold: usize,
    /// Floor for the adaptive rate.
    pub adaptive_min_rate: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            rate: 1.0,
            always_sample: vec![
                Priority::Error,
                Priority::Critical,
                Priority::Alert,
                Priority::Emergency,
            ],
            category_rates: HashMap::new(),
            adaptive: false,
            adaptive_threshold: 10_000,
            adaptive_min_rate: 0.01,
        }
    }
}

impl SamplingConfig {
    /// `rate` is clamped to `0.0..=1.0`.
    pub fn new(rate: f64) -> Self {
        Self {
            rate: rate.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_always_sample(mut self, priorities: Vec<Priority>) -> Self {
        self.always_sample = priorities;
        self
    }

    #[must_use]
    pub fn with_category_rate(mut self, category: impl Into<String>, rate: f64) -> Self {
        self.category_rates
            .insert(category.into(), rate.clamp(0.0, 1.0));
        self
    }

    #[must_use]
    pub fn with_adaptive(mut self, threshold: usize, min_rate: f64) -> Self {
        self.adaptive = true;
        self.adaptive_threshold = threshold;
        self.adaptive_min_rate = min_rate.clamp(0.0, 1.0);
        self
    }
}

/// Counters of sampling decisions.
#[derive(Debug, Default)]
pub struct SamplerMetrics {
    sampled: AtomicU64,
    dropped: AtomicU64,
}

impl SamplerMetrics {
    pub fn sampled_count(&self) -> u64 {
        self.sampled.load(Ordering::Relaxed)
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn total_count(&self) -> u64 {
        self.sampled_count() + self.dropped_count()
    }

    /// Observed fraction kept; 1.0 before any decision.
    pub fn effective_sample_rate(&self) -> f64 {
        match self.total_count() {
            0 => 1.0,
            total => self.sampled_count() as f64 / total as f64,
        }
    }

    fn record(&self, sampled: bool) -> bool {
        let counter = if sampled { &self.sampled } else { &self.dropped };
        counter.fetch_add(1, Ordering::Relaxed);
        sampled
    }
}

/// Messages per second since the sampler was created.
#[derive(Debug)]
struct Throughput {
    started: Instant,
    seen: AtomicU64,
}

impl Throughput {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            seen: AtomicU64::new(0),
        }
    }

    fn record(&self) -> f64 {
        let seen = self.seen.fetch_add(1, Ordering::Relaxed) + 1;
        let elapsed = self.started.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            seen as f64 / elapsed
        } else {
            0.0
        }
    }
}

/// Sampling decisions for one configuration.
#[derive(Debug)]
pub struct Sampler {
    config: SamplingConfig,
    metrics: SamplerMetrics,
    throughput: Throughput,
}

impl Sampler {
    pub fn new(config: SamplingConfig) -> Self {
        Self {
            config,
            metrics: SamplerMetrics::default(),
            throughput: Throughput::new(),
        }
    }

    pub fn should_sample(&self, priority: Priority, category: Option<&str>) -> bool {
        if priority == Priority::Emergency || self.config.always_sample.contains(&priority) {
            return self.metrics.record(true);
        }

        let rate = self.rate_for(category);
        let sampled = if rate >= 1.0 {
            true
        } else if rate <= 0.0 {
            false
        } else {
            rand::thread_rng().gen::<f64>() < rate
        };
        self.metrics.record(sampled)
    }

    fn rate_for(&self, category: Option<&str>) -> f64 {
        if let Some(rate) = category.and_then(|c| self.config.category_rates.get(c)) {
            return *rate;
        }

        if self.config.adaptive {
            let throughput = self.throughput.record();
            let threshold = self.config.adaptive_threshold as f64;
            if throughput > threshold {
                return (self.config.rate * threshold / throughput)
                    .max(self.config.adaptive_min_rate);
            }
        }

        self.config.rate
    }

    pub fn metrics(&self) -> &SamplerMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }
}

/// Forwards a sampled subset of the messages its inner sender accepts.
pub struct SamplingSender {
    sender: Arc<dyn Sender>,
    sampler: Sampler,
}

impl SamplingSender {
    pub fn new(sender: Arc<dyn Sender>, config: SamplingConfig) -> Self {
        Self {
            sender,
            sampler: Sampler::new(config),
        }
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    fn category(&self, message: &Message) -> Option<String> {
        if self.sampler.config.category_rates.is_empty() {
            return None;
        }
        message
            .raw()
            .get(CATEGORY_KEY)
            .and_then(|value| value.as_str())
            .map(str::to_string)
    }
}

impl Sender for SamplingSender {
    delegate_inner!();

    fn send(&self, message: Message) {
        let level = self.sender.level();
        if !level.should_log(&message) {
            return;
        }

        let category = self.category(&message);
        if self
            .sampler
            .should_sample(level.effective_priority(&message), category.as_deref())
        {
            self.sender.send(message);
        }
    }
}
