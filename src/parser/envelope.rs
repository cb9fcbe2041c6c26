//! Envelope decoding.
//!
//! Turns the raw notification text into a typed `ChangeEnvelope` and derives
//! the base record every transformer starts from.

use super::schema::{ChangeEnvelope, ChangeKind, ConfigurationItem};
use crate::diff::DiffIndex;
use crate::output::schema::OutputRecord;
use crate::utils::error::TransformError;
use log::debug;
use serde::de::DeserializeOwned;

/// Parse the embedded notification
///
/// **Public** - first step of every invocation
///
/// # Errors
/// * `TransformError::Decode` - the message is not a valid change event
pub fn decode_envelope(message: &str) -> Result<ChangeEnvelope, TransformError> {
    let envelope: ChangeEnvelope = serde_json::from_str(message)?;
    debug!(
        "Decoded {} notification for {} ({} changed properties)",
        envelope.configuration_item_diff.change_type.as_str(),
        envelope.configuration_item.resource_type,
        envelope.configuration_item_diff.changed_properties.len()
    );
    Ok(envelope)
}

/// Derive the validated base record from the identity section
///
/// **Public** - the capture time becomes the record's change time
///
/// # Errors
/// * `TransformError::MissingField` - first missing of AWSAccountID, AWSRegion,
///   ConfigurationItemCaptureTime, ResourceType
pub fn base_record(item: &ConfigurationItem) -> Result<OutputRecord, TransformError> {
    let record = OutputRecord {
        change_time: item.configuration_item_capture_time.clone(),
        resource_type: item.resource_type.clone(),
        account_id: item.aws_account_id.clone(),
        region: item.aws_region.clone(),
        arn: item.arn.clone(),
        tags: item.tags.clone(),
        changes: Vec::new(),
    };
    record.validate()?;
    Ok(record)
}

impl ChangeEnvelope {
    /// Prefix-filtered view over the changed properties
    pub fn diff_index(&self) -> DiffIndex<'_> {
        DiffIndex::new(&self.configuration_item_diff.changed_properties)
    }

    /// Change kind of the notification as a whole
    pub fn change_kind(&self) -> ChangeKind {
        self.configuration_item_diff.change_type
    }

    /// True when the notification reports the resource going away
    pub fn is_deletion(&self) -> bool {
        self.change_kind() == ChangeKind::Delete
            || self.message_type.eq_ignore_ascii_case(ChangeKind::Delete.as_str())
    }

    /// Decode the current resource configuration into `T`
    ///
    /// # Errors
    /// * `TransformError::MissingField` - no configuration payload at all
    /// * `TransformError::Decode` - payload does not have the shape of `T`
    pub fn decode_configuration<T: DeserializeOwned>(&self) -> Result<T, TransformError> {
        let raw = self
            .configuration_item
            .configuration
            .as_ref()
            .ok_or(TransformError::MissingField("Configuration"))?;
        Ok(serde_json::from_str(raw.get())?)
    }
}
