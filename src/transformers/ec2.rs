//! Compute-instance transformer.
//!
//! Network facts of an instance live on its network interfaces. Creates
//! report each interface at its own attachment time, updates diff the
//! interface entries, and deletes read the previous configuration.

use super::network::{address_facts, Association, PrivateIpBlock};
use super::{previous_configuration, ResourceTransformer, Transformed};
use crate::diff::{partition, reduce, AttachmentTimes};
use crate::output::schema::{ChangeFact, ChangeType, OutputRecord, Tag};
use crate::parser::schema::{nullable, ChangeEnvelope, ChangeKind};
use crate::utils::config::NETWORK_INTERFACES_PREFIX;
use crate::utils::error::TransformError;
use log::debug;
use serde::Deserialize;

/// The parts of an instance configuration we read
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ec2Configuration {
    #[serde(default, deserialize_with = "nullable")]
    pub instance_id: String,

    #[serde(default, deserialize_with = "nullable")]
    pub network_interfaces: Vec<NetworkInterface>,

    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<Tag>,
}

impl Ec2Configuration {
    /// Facts of every interface merged into one
    pub fn facts(&self, change_type: ChangeType) -> ChangeFact {
        let mut fact = ChangeFact::new(change_type);
        for interface in &self.network_interfaces {
            fact.absorb(interface.facts(change_type));
        }
        fact
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    #[serde(default, deserialize_with = "nullable")]
    pub network_interface_id: String,

    #[serde(default)]
    pub association: Option<Association>,

    #[serde(default, deserialize_with = "nullable")]
    pub private_ip_addresses: Vec<PrivateIpBlock>,

    #[serde(default)]
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(default, deserialize_with = "nullable")]
    pub attach_time: String,
}

impl NetworkInterface {
    pub fn facts(&self, change_type: ChangeType) -> ChangeFact {
        address_facts(
            &self.private_ip_addresses,
            self.association.as_ref(),
            change_type,
        )
    }

    /// Attachment time, when the interface reports one
    pub fn attach_time(&self) -> Option<&str> {
        self.attachment
            .as_ref()
            .map(|a| a.attach_time.as_str())
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Ec2Transformer;

impl ResourceTransformer for Ec2Transformer {
    fn create(
        &self,
        envelope: &ChangeEnvelope,
        base: &OutputRecord,
    ) -> Result<Transformed, TransformError> {
        let config: Ec2Configuration = envelope.decode_configuration()?;

        let records = config
            .network_interfaces
            .iter()
            .map(|interface| {
                let change_time = interface
                    .attach_time()
                    .unwrap_or(base.change_time.as_str());
                base.derive(change_time, vec![interface.facts(ChangeType::Added)])
            })
            .collect::<Vec<_>>();

        debug!(
            "Instance {} created with {} network interfaces",
            config.instance_id,
            records.len()
        );
        Ok(Transformed::records(records))
    }

    fn update(
        &self,
        envelope: &ChangeEnvelope,
        base: &OutputRecord,
    ) -> Result<Transformed, TransformError> {
        let mut added = ChangeFact::new(ChangeType::Added);
        let mut removed = ChangeFact::new(ChangeType::Deleted);
        let mut times = AttachmentTimes::default();

        let entries = envelope
            .diff_index()
            .entries::<NetworkInterface>(NETWORK_INTERFACES_PREFIX)?;

        for (_, entry) in entries {
            if entry.change_type == ChangeKind::Delete {
                if let Some(previous) = &entry.previous_value {
                    removed.absorb(previous.facts(ChangeType::Deleted));
                }
                continue;
            }
            if let Some(updated) = &entry.updated_value {
                debug!(
                    "Interface {} attached at {:?}",
                    updated.network_interface_id,
                    updated.attach_time()
                );
                let facts = updated.facts(ChangeType::Added);
                times.record(&facts, updated.attach_time());
                added.absorb(facts);
            }
            if entry.change_type == ChangeKind::Update {
                if let Some(previous) = &entry.previous_value {
                    removed.absorb(previous.facts(ChangeType::Deleted));
                }
            }
        }

        reduce(&mut added, &mut removed);

        let mut records: Vec<OutputRecord> = partition(&added, &times)
            .into_iter()
            .map(|(time, fact)| {
                let change_time = time.unwrap_or_else(|| base.change_time.clone());
                base.derive(change_time, vec![fact])
            })
            .collect();

        if !removed.has_no_addresses() {
            records.push(base.derive(base.change_time.clone(), vec![removed]));
        }

        if records.is_empty() {
            // tag changes still need a record to ride on
            records.push(base.clone());
        }
        Ok(Transformed::records(records))
    }

    fn delete(
        &self,
        envelope: &ChangeEnvelope,
        base: &OutputRecord,
    ) -> Result<Transformed, TransformError> {
        let previous: Ec2Configuration = previous_configuration(envelope)?;

        let mut record = base.clone();
        record.merge_tags(&previous.tags);
        record.changes.push(previous.facts(ChangeType::Deleted));

        Ok(Transformed::single(record))
    }
}
