//! Cancellation and deadline for one delivery.

use crate::utils::error::ReportError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Ambient context a delivery observes before every attempt
#[derive(Debug, Clone, Default)]
pub struct ReportContext {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl ReportContext {
    /// Context without a deadline
    pub fn new() -> Self {
        Self::default()
    }

    /// Context that expires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            ..Self::default()
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Time left before the deadline, `None` when unbounded
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Fail fast when the delivery should not start another attempt
    ///
    /// # Errors
    /// * `ReportError::Cancelled` - the context was cancelled
    /// * `ReportError::DeadlineExceeded` - no time left
    pub fn check(&self) -> Result<(), ReportError> {
        if self.is_cancelled() {
            return Err(ReportError::Cancelled);
        }
        if self.remaining() == Some(Duration::ZERO) {
            return Err(ReportError::DeadlineExceeded);
        }
        Ok(())
    }

    /// `timeout` capped by the time left before the deadline
    pub fn bound(&self, timeout: Duration) -> Duration {
        match self.remaining() {
            Some(remaining) => remaining.min(timeout),
            None => timeout,
        }
    }
}
