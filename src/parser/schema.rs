//! Inbound schema definitions for AWS Config change notifications.
//!
//! The notification is documented at
//! https://docs.aws.amazon.com/config/latest/developerguide/example-sns-notification.html
//!
//! Resource-specific payloads (`configuration`, every `changedProperties`
//! value) are kept as raw JSON and decoded on demand by the transformer that
//! knows their shape.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use std::collections::BTreeMap;

/// Event handed to us by the invocation adapter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Input {
    /// The stringified AWS Config change notification
    #[serde(default)]
    pub message: String,

    /// Time at which the notification was published
    #[serde(default)]
    pub timestamp: String,

    /// Time at which an upstream service emitted this event (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_timestamp: Option<String>,
}

/// Kind of mutation a diff (or a single diff entry) describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Create,
    Update,
    Delete,
    #[default]
    None,
    #[serde(other)]
    Unknown,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Create => "CREATE",
            ChangeKind::Update => "UPDATE",
            ChangeKind::Delete => "DELETE",
            ChangeKind::None => "NONE",
            ChangeKind::Unknown => "UNKNOWN",
        }
    }
}

/// The decoded notification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEnvelope {
    #[serde(default, deserialize_with = "nullable")]
    pub configuration_item_diff: ConfigurationItemDiff,

    #[serde(default, deserialize_with = "nullable")]
    pub configuration_item: ConfigurationItem,

    #[serde(default, deserialize_with = "nullable")]
    pub notification_creation_time: String,

    #[serde(default, deserialize_with = "nullable")]
    pub message_type: String,

    #[serde(default, deserialize_with = "nullable")]
    pub record_version: String,
}

/// Path-keyed before/after view of the change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationItemDiff {
    #[serde(default, deserialize_with = "nullable")]
    pub changed_properties: BTreeMap<String, Box<RawValue>>,

    #[serde(default, deserialize_with = "nullable")]
    pub change_type: ChangeKind,
}

/// Identity and current configuration of the changed resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Box<RawValue>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplementary_configuration: Option<Box<RawValue>>,

    #[serde(default, deserialize_with = "nullable")]
    pub tags: BTreeMap<String, String>,

    #[serde(default, deserialize_with = "nullable")]
    pub related_events: Vec<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub relationships: Vec<Relationship>,

    #[serde(default, deserialize_with = "nullable")]
    pub configuration_item_version: String,

    #[serde(default, deserialize_with = "nullable")]
    pub configuration_item_capture_time: String,

    #[serde(default)]
    pub configuration_state_id: Option<i64>,

    #[serde(default, deserialize_with = "nullable")]
    pub aws_account_id: String,

    #[serde(default, deserialize_with = "nullable")]
    pub configuration_item_status: String,

    #[serde(default, deserialize_with = "nullable")]
    pub resource_type: String,

    #[serde(default, deserialize_with = "nullable")]
    pub resource_id: String,

    /// Observed as both a string and null; kept raw
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<Box<RawValue>>,

    #[serde(rename = "ARN", alias = "arn", default, deserialize_with = "nullable")]
    pub arn: String,

    #[serde(default, deserialize_with = "nullable")]
    pub aws_region: String,

    #[serde(default, deserialize_with = "nullable")]
    pub availability_zone: String,

    #[serde(default, deserialize_with = "nullable")]
    pub configuration_state_md5_hash: String,

    #[serde(default, deserialize_with = "nullable")]
    pub resource_creation_time: String,
}

/// Relationship to another resource as listed by AWS Config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    #[serde(default, deserialize_with = "nullable")]
    pub resource_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<Box<RawValue>>,

    #[serde(default, deserialize_with = "nullable")]
    pub resource_type: String,

    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
}

/// One `changedProperties` value, decoded into a resource-specific shape
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffEntry<T> {
    pub previous_value: Option<T>,

    pub updated_value: Option<T>,

    #[serde(default, deserialize_with = "nullable")]
    pub change_type: ChangeKind,
}

impl<T> Default for DiffEntry<T> {
    fn default() -> Self {
        Self {
            previous_value: None,
            updated_value: None,
            change_type: ChangeKind::None,
        }
    }
}

/// Treat an explicit JSON null like a missing field
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
