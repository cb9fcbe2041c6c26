//! Network-interface transformer.
//!
//! Only interfaces the load-balancing service manages on our behalf are
//! reported. Everything else is rejected without error. The owning load
//! balancer has no structured link on the interface; it is recovered from
//! the free-text description.

use super::network::{address_facts, Association, PrivateIpBlock};
use super::{previous_configuration, ResourceTransformer, Transformed};
use crate::diff::reduce;
use crate::output::schema::{ChangeFact, ChangeType, OutputRecord};
use crate::parser::schema::{nullable, ChangeEnvelope, ChangeKind};
use crate::utils::config::{ELB_REQUESTER_ID, LOAD_BALANCER_TYPE_SEGMENTS, PRIVATE_IP_ADDRESSES_PREFIX};
use crate::utils::error::TransformError;
use log::debug;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceConfiguration {
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,

    #[serde(default, deserialize_with = "nullable")]
    pub private_ip_addresses: Vec<PrivateIpBlock>,

    #[serde(default)]
    pub association: Option<Association>,

    #[serde(default, deserialize_with = "nullable")]
    pub requester_id: String,

    #[serde(default, deserialize_with = "nullable")]
    pub requester_managed: bool,
}

impl InterfaceConfiguration {
    /// True for interfaces owned by the load-balancing service
    pub fn is_load_balancer_managed(&self) -> bool {
        self.requester_managed && self.requester_id == ELB_REQUESTER_ID
    }

    pub fn facts(&self, change_type: ChangeType) -> ChangeFact {
        let mut fact = address_facts(
            &self.private_ip_addresses,
            self.association.as_ref(),
            change_type,
        );
        fact.related_resources
            .extend(related_resource(&self.description));
        fact
    }
}

/// Best-effort owner name from an interface description
///
/// Observed formats end in the load balancer's identity:
/// `ELB app/<name>/<id>`, `ELB net/<name>/<id>` or `ELB <classic-name>`.
/// The last whitespace token is taken, and for typed identities only the
/// name segment is kept.
pub fn related_resource(description: &str) -> Option<String> {
    let token = description.split_whitespace().last()?;
    for segment in LOAD_BALANCER_TYPE_SEGMENTS {
        if let Some(rest) = token.strip_prefix(segment) {
            return rest
                .split('/')
                .next()
                .filter(|name| !name.is_empty())
                .map(str::to_string);
        }
    }
    Some(token.to_string())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EniTransformer;

impl EniTransformer {
    fn reject(config: &InterfaceConfiguration, base: &OutputRecord) -> Transformed {
        debug!(
            "Interface not managed by the load balancer service (requester {:?})",
            config.requester_id
        );
        Transformed::rejected(base)
    }
}

impl ResourceTransformer for EniTransformer {
    fn create(
        &self,
        envelope: &ChangeEnvelope,
        base: &OutputRecord,
    ) -> Result<Transformed, TransformError> {
        let config: InterfaceConfiguration = envelope.decode_configuration()?;
        if !config.is_load_balancer_managed() {
            return Ok(Self::reject(&config, base));
        }
        Ok(Transformed::single(base.derive(
            base.change_time.clone(),
            vec![config.facts(ChangeType::Added)],
        )))
    }

    fn update(
        &self,
        envelope: &ChangeEnvelope,
        base: &OutputRecord,
    ) -> Result<Transformed, TransformError> {
        let mut related = None;
        if envelope.configuration_item.configuration.is_some() {
            let config: InterfaceConfiguration = envelope.decode_configuration()?;
            if !config.is_load_balancer_managed() {
                return Ok(Self::reject(&config, base));
            }
            related = related_resource(&config.description);
        }

        let mut added = ChangeFact::new(ChangeType::Added);
        let mut removed = ChangeFact::new(ChangeType::Deleted);

        let entries = envelope
            .diff_index()
            .entries::<PrivateIpBlock>(PRIVATE_IP_ADDRESSES_PREFIX)?;

        for (_, entry) in entries {
            if entry.change_type == ChangeKind::Delete {
                if let Some(previous) = &entry.previous_value {
                    previous.collect_into(&mut removed);
                }
                continue;
            }
            if let Some(updated) = &entry.updated_value {
                updated.collect_into(&mut added);
            }
            if entry.change_type == ChangeKind::Update {
                if let Some(previous) = &entry.previous_value {
                    previous.collect_into(&mut removed);
                }
            }
        }

        reduce(&mut added, &mut removed);

        let mut records = Vec::new();
        for mut fact in [added, removed] {
            if fact.has_no_addresses() {
                continue;
            }
            fact.related_resources.extend(related.clone());
            records.push(base.derive(base.change_time.clone(), vec![fact]));
        }

        if records.is_empty() {
            records.push(base.clone());
        }
        Ok(Transformed::records(records))
    }

    fn delete(
        &self,
        envelope: &ChangeEnvelope,
        base: &OutputRecord,
    ) -> Result<Transformed, TransformError> {
        let previous: InterfaceConfiguration = previous_configuration(envelope)?;
        if !previous.is_load_balancer_managed() {
            return Ok(Self::reject(&previous, base));
        }
        Ok(Transformed::single(base.derive(
            base.change_time.clone(),
            vec![previous.facts(ChangeType::Deleted)],
        )))
    }
}
