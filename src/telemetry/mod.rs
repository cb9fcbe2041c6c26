//! Stats recorder seam.
//!
//! The handler emits timings and counters through `StatsRecorder` so the
//! host decides where they go. `LogStats` writes them to the log at debug
//! level; `NoopStats` drops them.

use log::debug;
use std::time::Duration;

pub trait StatsRecorder: Send + Sync {
    fn timing(&self, name: &str, value: Duration);

    fn count(&self, name: &str, value: u64);
}

/// Records stats as debug log lines
#[derive(Debug, Clone, Copy, Default)]
pub struct LogStats;

impl StatsRecorder for LogStats {
    fn timing(&self, name: &str, value: Duration) {
        debug!("stat timing {} {}ms", name, value.as_millis());
    }

    fn count(&self, name: &str, value: u64) {
        debug!("stat count {} {}", name, value);
    }
}

/// Discards all stats
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStats;

impl StatsRecorder for NoopStats {
    fn timing(&self, _name: &str, _value: Duration) {}

    fn count(&self, _name: &str, _value: u64) {}
}
