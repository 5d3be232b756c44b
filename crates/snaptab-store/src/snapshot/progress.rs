//! Progress reporting for long snapshot passes

use snaptab_core_types::schema::EVENT_PROGRESS;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Default number of records between progress log lines
pub const DEFAULT_INTERVAL: u64 = 1000;

/// Receives one notification per yielded record
///
/// Purely observational: implementations must not influence iteration.
pub trait ProgressSink {
    fn record(&mut self, increment: u64);
}

impl<F: FnMut(u64)> ProgressSink for F {
    fn record(&mut self, increment: u64) {
        self(increment)
    }
}

/// Counts records and logs every `interval` of them
///
/// Clones share the counter, so a caller can hand one clone to an iterator
/// and read the total from another.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    label: String,
    interval: u64,
    count: Arc<AtomicU64>,
}

impl ProgressReporter {
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_interval(label, DEFAULT_INTERVAL)
    }

    /// An interval of zero is treated as one.
    pub fn with_interval(label: impl Into<String>, interval: u64) -> Self {
        Self {
            label: label.into(),
            interval: interval.max(1),
            count: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn summary(&self) -> String {
        format!("{}: processed {} records", self.label, self.count())
    }
}

impl ProgressSink for ProgressReporter {
    fn record(&mut self, increment: u64) {
        let before = self.count.fetch_add(increment, Ordering::Relaxed);
        let after = before + increment;
        if after / self.interval > before / self.interval {
            tracing::info!(
                component = module_path!(),
                op = "progress",
                event = EVENT_PROGRESS,
                label = self.label.as_str(),
                records = after,
                "{}",
                self.summary()
            );
        }
    }
}
