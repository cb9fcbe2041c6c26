//! Downstream delivery of produced records.
//!
//! The handler only sees the `Reporter` trait. `HttpReporter` is the
//! production implementation; tests and embedders can supply their own.

pub mod client;
pub mod context;

use crate::output::schema::OutputRecord;
use crate::utils::error::ReportError;
use std::str::FromStr;

pub use client::{HttpReporter, ReporterConfig};
pub use context::ReportContext;

/// Delivery capability for produced records
pub trait Reporter: Send + Sync {
    /// Deliver one record
    fn report(&self, ctx: &ReportContext, record: &OutputRecord) -> Result<(), ReportError>;

    /// Deliver several records in one call
    ///
    /// Defaults to one `report` call per record, stopping at the first failure.
    fn report_batch(
        &self,
        ctx: &ReportContext,
        records: &[OutputRecord],
    ) -> Result<(), ReportError> {
        for record in records {
            self.report(ctx, record)?;
        }
        Ok(())
    }
}

/// How produced records are handed to the reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// One `report` call per record
    #[default]
    PerRecord,
    /// One `report_batch` call with every record
    Batch,
}

impl ReportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportMode::PerRecord => "per-record",
            ReportMode::Batch => "batch",
        }
    }
}

impl FromStr for ReportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per-record" => Ok(ReportMode::PerRecord),
            "batch" => Ok(ReportMode::Batch),
            other => Err(format!(
                "unknown report mode '{}', expected per-record or batch",
                other
            )),
        }
    }
}
