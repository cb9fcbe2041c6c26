//! Load-balancer transformer.
//!
//! Covers the classic and v2 resource types. The only network fact is the
//! DNS name, which cannot change, so updates carry no facts.

use super::{previous_configuration, ResourceTransformer, Transformed};
use crate::output::schema::{ChangeFact, ChangeType, OutputRecord, Tag};
use crate::parser::schema::{nullable, ChangeEnvelope};
use crate::utils::config::{CHANGE_TIME_FORMAT, SUPPLEMENTARY_TAGS_KEY};
use crate::utils::error::TransformError;
use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;

/// Creation time as stored by either load-balancer generation
///
/// Classic load balancers store epoch milliseconds, v2 an ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CreatedTime {
    Millis(i64),
    Text(String),
}

impl CreatedTime {
    /// Normalize to `YYYY-MM-DDTHH:MM:SS.mmmZ` in UTC
    ///
    /// # Returns
    /// `None` for an empty string
    ///
    /// # Errors
    /// * `TransformError::InvalidTimestamp` - out-of-range millis or an unparseable string
    pub fn normalize(&self) -> Result<Option<String>, TransformError> {
        let instant: DateTime<Utc> = match self {
            CreatedTime::Millis(millis) => DateTime::from_timestamp_millis(*millis)
                .ok_or_else(|| TransformError::InvalidTimestamp(millis.to_string()))?,
            CreatedTime::Text(text) if text.is_empty() => return Ok(None),
            CreatedTime::Text(text) => DateTime::parse_from_rfc3339(text)
                .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z"))
                .map_err(|_| TransformError::InvalidTimestamp(text.clone()))?
                .with_timezone(&Utc),
        };
        Ok(Some(instant.format(CHANGE_TIME_FORMAT).to_string()))
    }
}

/// The parts of a load-balancer configuration we read
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerConfiguration {
    #[serde(
        rename = "dnsname",
        alias = "dNSName",
        alias = "DNSName",
        alias = "dnsName",
        default,
        deserialize_with = "nullable"
    )]
    pub dns_name: String,

    #[serde(default)]
    pub created_time: Option<CreatedTime>,
}

impl LoadBalancerConfiguration {
    pub fn facts(&self, change_type: ChangeType) -> ChangeFact {
        let mut fact = ChangeFact::new(change_type);
        if !self.dns_name.is_empty() {
            fact.hostnames.push(self.dns_name.clone());
        }
        fact
    }

    /// Normalized creation time, if the configuration carries one
    pub fn created_at(&self) -> Result<Option<String>, TransformError> {
        match &self.created_time {
            Some(created) => created.normalize(),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ElbTransformer;

impl ResourceTransformer for ElbTransformer {
    fn create(
        &self,
        envelope: &ChangeEnvelope,
        base: &OutputRecord,
    ) -> Result<Transformed, TransformError> {
        let config: LoadBalancerConfiguration = envelope.decode_configuration()?;
        let change_time = config
            .created_at()?
            .unwrap_or_else(|| base.change_time.clone());

        debug!("Load balancer {} created at {}", config.dns_name, change_time);
        Ok(Transformed::single(base.derive(
            change_time,
            vec![config.facts(ChangeType::Added)],
        )))
    }

    fn update(
        &self,
        _envelope: &ChangeEnvelope,
        base: &OutputRecord,
    ) -> Result<Transformed, TransformError> {
        Ok(Transformed::single(base.clone()))
    }

    fn delete(
        &self,
        envelope: &ChangeEnvelope,
        base: &OutputRecord,
    ) -> Result<Transformed, TransformError> {
        let previous: LoadBalancerConfiguration = previous_configuration(envelope)?;

        let mut record = base.clone();
        record.changes.push(previous.facts(ChangeType::Deleted));

        // tags are gone from the item itself once the resource is deleted
        if let Some(entry) = envelope
            .diff_index()
            .get::<Vec<Tag>>(SUPPLEMENTARY_TAGS_KEY)?
        {
            if let Some(tags) = &entry.previous_value {
                record.merge_tags(tags);
            }
        }

        Ok(Transformed::single(record))
    }
}
