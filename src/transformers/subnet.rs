//! Subnet transformer: a CIDR block and the owning VPC.

use super::{previous_configuration, ResourceTransformer, Transformed};
use crate::output::schema::{ChangeFact, ChangeType, OutputRecord};
use crate::parser::schema::{nullable, ChangeEnvelope};
use crate::utils::error::TransformError;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetConfiguration {
    #[serde(default, deserialize_with = "nullable")]
    pub cidr_block: String,

    #[serde(default, deserialize_with = "nullable")]
    pub vpc_id: String,
}

impl SubnetConfiguration {
    pub fn facts(&self, change_type: ChangeType) -> ChangeFact {
        let mut fact = ChangeFact::new(change_type);
        if !self.cidr_block.is_empty() {
            fact.cidr_block = Some(self.cidr_block.clone());
        }
        if !self.vpc_id.is_empty() {
            fact.related_resources.push(self.vpc_id.clone());
        }
        fact
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SubnetTransformer;

impl ResourceTransformer for SubnetTransformer {
    fn create(
        &self,
        envelope: &ChangeEnvelope,
        base: &OutputRecord,
    ) -> Result<Transformed, TransformError> {
        let config: SubnetConfiguration = envelope.decode_configuration()?;
        let mut record = base.clone();
        record.changes.push(config.facts(ChangeType::Added));
        Ok(Transformed::single(record))
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
        let previous: SubnetConfiguration = previous_configuration(envelope)?;
        let mut record = base.clone();
        record.changes.push(previous.facts(ChangeType::Deleted));
        Ok(Transformed::single(record))
    }
}
