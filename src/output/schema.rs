//! Output JSON schema definitions for network change records.
//!
//! These are the structures handed to the downstream reporter. Field names
//! follow the stream's camelCase contract; empty lists are omitted.

use crate::utils::error::TransformError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Direction of a single change fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    Added,
    Deleted,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Added => "ADDED",
            ChangeType::Deleted => "DELETED",
        }
    }
}

/// A single resource tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default, alias = "Key")]
    pub key: String,

    #[serde(default, alias = "Value")]
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Modification, addition or removal of one tag
///
/// At least one side is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_value: Option<Tag>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_value: Option<Tag>,
}

impl TagChange {
    /// Build a tag change, rejecting one with neither side
    ///
    /// # Errors
    /// * `TransformError::MalformedTagChange` - both sides absent; `source`
    ///   names the diff path the pair came from
    pub fn new(
        previous_value: Option<Tag>,
        updated_value: Option<Tag>,
        source: &str,
    ) -> Result<Self, TransformError> {
        if previous_value.is_none() && updated_value.is_none() {
            return Err(TransformError::MalformedTagChange(source.to_string()));
        }
        Ok(Self {
            updated_value,
            previous_value,
        })
    }
}

/// Network facts observed for one direction of change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeFact {
    /// Changed public IP addresses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub public_ip_addresses: Vec<String>,

    /// Changed private IP addresses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub private_ip_addresses: Vec<String>,

    /// Changed public DNS names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hostnames: Vec<String>,

    /// CIDR block of a subnet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr_block: Option<String>,

    /// Related resource identifiers (owning load balancer, VPC)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_resources: Vec<String>,

    /// Tag mutations carried alongside network facts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_changes: Vec<TagChange>,

    pub change_type: ChangeType,
}

impl ChangeFact {
    pub fn new(change_type: ChangeType) -> Self {
        Self {
            public_ip_addresses: Vec::new(),
            private_ip_addresses: Vec::new(),
            hostnames: Vec::new(),
            cidr_block: None,
            related_resources: Vec::new(),
            tag_changes: Vec::new(),
            change_type,
        }
    }

    /// A fact carrying only tag changes
    pub fn tags(change_type: ChangeType, tag_changes: Vec<TagChange>) -> Self {
        Self {
            tag_changes,
            ..Self::new(change_type)
        }
    }

    /// Append the address lists of `other` onto this fact, skipping repeats
    pub fn absorb(&mut self, other: ChangeFact) {
        append_unique(&mut self.private_ip_addresses, other.private_ip_addresses);
        append_unique(&mut self.public_ip_addresses, other.public_ip_addresses);
        append_unique(&mut self.hostnames, other.hostnames);
    }

    /// True when none of the three address lists holds anything
    pub fn has_no_addresses(&self) -> bool {
        self.private_ip_addresses.is_empty()
            && self.public_ip_addresses.is_empty()
            && self.hostnames.is_empty()
    }
}

fn append_unique(into: &mut Vec<String>, items: Vec<String>) {
    for item in items {
        if !into.contains(&item) {
            into.push(item);
        }
    }
}

/// One normalized network change record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    /// Time at which the change occurred (required)
    pub change_time: String,

    /// AWS resource type (required)
    pub resource_type: String,

    /// 12-digit AWS account id (required)
    pub account_id: String,

    /// AWS region (required)
    pub region: String,

    /// Amazon Resource Name, may be empty
    #[serde(default)]
    pub arn: String,

    /// Tags set on the resource, may be empty
    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    /// Network related changes on the resource
    #[serde(default)]
    pub changes: Vec<ChangeFact>,
}

impl OutputRecord {
    /// Check the required identity fields
    ///
    /// Fields are checked in a fixed order and only the first missing one is
    /// reported, named after the configuration item field it comes from.
    pub fn validate(&self) -> Result<(), TransformError> {
        if self.account_id.is_empty() {
            return Err(TransformError::MissingField("AWSAccountID"));
        }
        if self.region.is_empty() {
            return Err(TransformError::MissingField("AWSRegion"));
        }
        if self.change_time.is_empty() {
            return Err(TransformError::MissingField("ConfigurationItemCaptureTime"));
        }
        if self.resource_type.is_empty() {
            return Err(TransformError::MissingField("ResourceType"));
        }
        Ok(())
    }

    /// Copy of this record with a different change time and the given facts
    pub fn derive(&self, change_time: impl Into<String>, changes: Vec<ChangeFact>) -> Self {
        Self {
            change_time: change_time.into(),
            changes,
            ..self.clone()
        }
    }

    /// Merge recovered tags over the current ones
    pub fn merge_tags<'a>(&mut self, tags: impl IntoIterator<Item = &'a Tag>) {
        for tag in tags {
            self.tags.insert(tag.key.clone(), tag.value.clone());
        }
    }
}
