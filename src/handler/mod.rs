//! Dispatch controller.
//!
//! Decodes one inbound event, selects the transformer for its resource
//! kind and change kind, attaches tag changes and reports the outcome
//! through the stats recorder. `handle_and_report` additionally hands the
//! records to a `Reporter`.

use crate::diff::extract_tag_changes;
use crate::output::schema::{ChangeFact, ChangeType, OutputRecord};
use crate::parser::{base_record, decode_envelope, Input};
use crate::reporter::{ReportContext, ReportMode, Reporter};
use crate::telemetry::{LogStats, StatsRecorder};
use crate::transformers::ResourceKind;
use crate::utils::config::{METRIC_ERROR, METRIC_EVENT_DELAY, METRIC_RECORDS};
use crate::utils::error::{HandlerError, TransformError};
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;

/// Transforms AWS Config change events into network change records
#[derive(Clone)]
pub struct Handler {
    stats: Arc<dyn StatsRecorder>,
}

impl Default for Handler {
    fn default() -> Self {
        Self::new(Arc::new(LogStats))
    }
}

impl Handler {
    pub fn new(stats: Arc<dyn StatsRecorder>) -> Self {
        Self { stats }
    }

    /// Transform one inbound event
    ///
    /// **Public** - main entry point of the library
    ///
    /// # Arguments
    /// * `input` - event as delivered by the notification topic
    ///
    /// # Returns
    /// The produced records. Unsupported resource types, NONE notifications
    /// and rejected interfaces all yield an empty list.
    ///
    /// # Errors
    /// Any `TransformError`; nothing is returned alongside an error
    pub fn handle(&self, input: &Input) -> Result<Vec<OutputRecord>, TransformError> {
        self.record_delay(input);

        match self.transform(input) {
            Ok(records) => {
                self.stats.count(METRIC_RECORDS, records.len() as u64);
                Ok(records)
            }
            Err(e) => {
                error!("transform-error: reason={}", e);
                self.stats.count(METRIC_ERROR, 1);
                Err(e)
            }
        }
    }

    /// Transform one inbound event and deliver the records
    ///
    /// # Errors
    /// * `HandlerError::Transform` - the event could not be transformed
    /// * `HandlerError::Report` - delivery failed; earlier records of a
    ///   per-record delivery may already have been accepted
    pub fn handle_and_report(
        &self,
        ctx: &ReportContext,
        input: &Input,
        reporter: &dyn Reporter,
        mode: ReportMode,
    ) -> Result<Vec<OutputRecord>, HandlerError> {
        let records = self.handle(input)?;

        let delivered = match mode {
            ReportMode::PerRecord => records
                .iter()
                .try_for_each(|record| reporter.report(ctx, record)),
            ReportMode::Batch if records.is_empty() => Ok(()),
            ReportMode::Batch => reporter.report_batch(ctx, &records),
        };

        if let Err(e) = delivered {
            error!("report-error: mode={} reason={}", mode.as_str(), e);
            self.stats.count(METRIC_ERROR, 1);
            return Err(e.into());
        }

        debug!("Reported {} records ({})", records.len(), mode.as_str());
        Ok(records)
    }

    fn transform(&self, input: &Input) -> Result<Vec<OutputRecord>, TransformError> {
        let envelope = decode_envelope(&input.message)?;
        let base = base_record(&envelope.configuration_item)?;

        let Some(kind) = ResourceKind::from_resource_type(&base.resource_type) else {
            info!("unsupported-resource: {}", base.resource_type);
            return Ok(Vec::new());
        };

        let change_kind = envelope.change_kind();
        let Some(transformed) = kind.transform(change_kind, &envelope, &base)? else {
            debug!("Nothing to transform for {} {}", kind.as_str(), change_kind.as_str());
            return Ok(Vec::new());
        };

        if transformed.reject {
            debug!(
                "rejected-resource: {} {}",
                base.resource_type,
                envelope.configuration_item.resource_id
            );
            return Ok(Vec::new());
        }

        let mut records = transformed.records;
        let tag_changes = extract_tag_changes(&envelope.diff_index())?;
        if !tag_changes.is_empty() {
            let change_type = if envelope.is_deletion() {
                ChangeType::Deleted
            } else {
                ChangeType::Added
            };
            for record in &mut records {
                record
                    .changes
                    .push(ChangeFact::tags(change_type, tag_changes.clone()));
            }
        }

        debug!(
            "Transformed {} {} into {} records",
            kind.as_str(),
            change_kind.as_str(),
            records.len()
        );
        Ok(records)
    }

    /// Time since an upstream service emitted the event, when it says so
    fn record_delay(&self, input: &Input) {
        let Some(processed) = input.processed_timestamp.as_deref() else {
            return;
        };
        if let Ok(ts) = DateTime::parse_from_rfc3339(processed) {
            let delay = Utc::now()
                .signed_duration_since(ts)
                .to_std()
                .unwrap_or(Duration::ZERO);
            self.stats.timing(METRIC_EVENT_DELAY, delay);
        }
    }
}
