//! Counters describing what the logging core has done
//!
//! The core never logs about its own failures; sink write errors on the
//! logging path and rejected configurations are counted here instead.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logging core observability
///
/// # Example
///
/// ```
/// use rust_logspec::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_written();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.records_written(), 1);
/// assert_eq!(metrics.records_filtered(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records rendered and accepted by the sink
    records_written: AtomicU64,

    /// Records rejected by the level gate
    records_filtered: AtomicU64,

    /// Records the sink failed to accept
    write_failures: AtomicU64,

    /// Configurations applied
    applies: AtomicU64,

    /// Configurations rejected by validation
    rejected_applies: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            records_written: AtomicU64::new(0),
            records_filtered: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            applies: AtomicU64::new(0),
            rejected_applies: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_filtered(&self) -> u64 {
        self.records_filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn applies(&self) -> u64 {
        self.applies.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected_applies(&self) -> u64 {
        self.rejected_applies.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.records_written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.records_filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_apply(&self) -> u64 {
        self.applies.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected_apply(&self) -> u64 {
        self.rejected_applies.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of emitted records the sink failed to accept, as a percentage
    ///
    /// Returns 0.0 if nothing has been emitted.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.write_failures() as f64;
        let total = self.records_written() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.records_written.store(0, Ordering::Relaxed);
        self.records_filtered.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
        self.applies.store(0, Ordering::Relaxed);
        self.rejected_applies.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            records_written: AtomicU64::new(self.records_written()),
            records_filtered: AtomicU64::new(self.records_filtered()),
            write_failures: AtomicU64::new(self.write_failures()),
            applies: AtomicU64::new(self.applies()),
            rejected_applies: AtomicU64::new(self.rejected_applies()),
        }
    }
}
