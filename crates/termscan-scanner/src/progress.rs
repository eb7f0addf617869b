//! Reusable rate/throughput counter.
//!
//! Tracks named counters against elapsed wall-clock time and emits a status
//! line at most once per second, plus once unconditionally at construction
//! and at [`ProgressTracker::end`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Minimum interval between periodic status emissions.
const EMIT_INTERVAL: Duration = Duration::from_secs(1);

/// A named-counter throughput tracker.
#[derive(Debug)]
pub struct ProgressTracker {
    fields: Vec<&'static str>,
    counters: HashMap<&'static str, u64>,
    prev_counters: HashMap<&'static str, u64>,
    start: Instant,
    next_emit: Instant,
}

impl ProgressTracker {
    /// Create a tracker over the given counter fields and emit an initial
    /// status line.
    #[must_use]
    pub fn new(fields: &[&'static str]) -> Self {
        let start = Instant::now();
        let mut tracker = Self {
            fields: fields.to_vec(),
            counters: HashMap::new(),
            prev_counters: HashMap::new(),
            start,
            next_emit: start,
        };
        tracker.message(true);
        tracker
    }

    /// Increment `field` by one.
    pub fn increment(&mut self, field: &'static str) {
        self.add(field, 1);
    }

    /// Increment `field` by `value`.
    pub fn add(&mut self, field: &'static str, value: u64) {
        debug_assert!(self.fields.contains(&field), "unknown field {field}");
        *self.counters.entry(field).or_insert(0) += value;
    }

    /// Current total for `field`.
    #[must_use]
    pub fn total(&self, field: &'static str) -> u64 {
        self.counters.get(field).copied().unwrap_or(0)
    }

    /// Emit a final status line.
    pub fn end(&mut self) {
        self.message(true);
    }

    /// Emit a status line when forced (and something changed) or when the
    /// periodic interval has elapsed.
    pub fn message(&mut self, force: bool) {
        let now = Instant::now();
        if !((force && self.prev_counters != self.counters) || now >= self.next_emit) {
            return;
        }
        self.next_emit = now + EMIT_INTERVAL;

        let seconds = self.start.elapsed().as_secs_f64().max(1e-9);
        let stats: Vec<String> = self
            .fields
            .iter()
            .map(|field| {
                let total = self.counters.get(field).copied().unwrap_or(0);
                let prev = self.prev_counters.get(field).copied().unwrap_or(0);
                let ave = total as f64 / seconds;
                let delta = total - prev;
                format!("{field} - total: {total:6} ave/second: {ave:6.1} delta: {delta:4}")
            })
            .collect();

        tracing::info!("Secs: {:6.1} - {}", seconds, stats.join("; "));
        self.prev_counters = self.counters.clone();
    }
}
