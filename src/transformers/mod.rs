//! Per-resource-kind transformers.
//!
//! Every supported kind implements `ResourceTransformer`. The set is closed:
//! `ResourceKind` names each kind and dispatches to its transformer, so the
//! handler never works with an open-ended trait object.

pub mod ec2;
pub mod elb;
pub mod eni;
pub mod network;
pub mod subnet;

use crate::output::schema::OutputRecord;
use crate::parser::schema::{ChangeEnvelope, ChangeKind};
use crate::utils::config::{
    CONFIGURATION_KEY, RESOURCE_TYPE_EC2_INSTANCE, RESOURCE_TYPE_ELB, RESOURCE_TYPE_ELBV2,
    RESOURCE_TYPE_NETWORK_INTERFACE, RESOURCE_TYPE_SUBNET,
};
use crate::utils::error::TransformError;
use serde::de::DeserializeOwned;

pub use ec2::Ec2Transformer;
pub use elb::ElbTransformer;
pub use eni::EniTransformer;
pub use subnet::SubnetTransformer;

/// Output of one transformer operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transformed {
    pub records: Vec<OutputRecord>,

    /// Valid input that intentionally yields no network facts
    pub reject: bool,
}

impl Transformed {
    pub fn records(records: Vec<OutputRecord>) -> Self {
        Self {
            records,
            reject: false,
        }
    }

    pub fn single(record: OutputRecord) -> Self {
        Self::records(vec![record])
    }

    /// Keep the identity record but mark it as carrying nothing to report
    pub fn rejected(base: &OutputRecord) -> Self {
        Self {
            records: vec![base.clone()],
            reject: true,
        }
    }
}

/// Create / Update / Delete over one decoded notification
///
/// Each operation receives the validated base record derived from the
/// notification's identity section and builds its output from it.
pub trait ResourceTransformer {
    fn create(
        &self,
        envelope: &ChangeEnvelope,
        base: &OutputRecord,
    ) -> Result<Transformed, TransformError>;

    fn update(
        &self,
        envelope: &ChangeEnvelope,
        base: &OutputRecord,
    ) -> Result<Transformed, TransformError>;

    fn delete(
        &self,
        envelope: &ChangeEnvelope,
        base: &OutputRecord,
    ) -> Result<Transformed, TransformError>;
}

/// Supported resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    ComputeInstance,
    LoadBalancer,
    NetworkInterface,
    Subnet,
}

impl ResourceKind {
    /// Resolve an AWS resource type string, `None` when unsupported
    pub fn from_resource_type(resource_type: &str) -> Option<Self> {
        match resource_type {
            RESOURCE_TYPE_EC2_INSTANCE => Some(ResourceKind::ComputeInstance),
            RESOURCE_TYPE_ELB | RESOURCE_TYPE_ELBV2 => Some(ResourceKind::LoadBalancer),
            RESOURCE_TYPE_NETWORK_INTERFACE => Some(ResourceKind::NetworkInterface),
            RESOURCE_TYPE_SUBNET => Some(ResourceKind::Subnet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::ComputeInstance => "compute-instance",
            ResourceKind::LoadBalancer => "load-balancer",
            ResourceKind::NetworkInterface => "network-interface",
            ResourceKind::Subnet => "subnet",
        }
    }

    /// Run the operation matching `change_kind`
    ///
    /// **Public** - the handler's single entry into the transformers
    ///
    /// # Returns
    /// `None` for a NONE notification, which carries nothing to transform
    ///
    /// # Errors
    /// * `TransformError::UnsupportedChangeKind` - any kind other than
    ///   CREATE, UPDATE, DELETE or NONE
    /// * any error raised by the selected operation
    pub fn transform(
        &self,
        change_kind: ChangeKind,
        envelope: &ChangeEnvelope,
        base: &OutputRecord,
    ) -> Result<Option<Transformed>, TransformError> {
        let transformed = match change_kind {
            ChangeKind::Create => self.create(envelope, base)?,
            ChangeKind::Update => self.update(envelope, base)?,
            ChangeKind::Delete => self.delete(envelope, base)?,
            ChangeKind::None => return Ok(None),
            ChangeKind::Unknown => {
                return Err(TransformError::UnsupportedChangeKind(
                    change_kind.as_str().to_string(),
                ))
            }
        };
        Ok(Some(transformed))
    }
}

impl ResourceTransformer for ResourceKind {
    fn create(
        &self,
        envelope: &ChangeEnvelope,
        base: &OutputRecord,
    ) -> Result<Transformed, TransformError> {
        match self {
            ResourceKind::ComputeInstance => Ec2Transformer.create(envelope, base),
            ResourceKind::LoadBalancer => ElbTransformer.create(envelope, base),
            ResourceKind::NetworkInterface => EniTransformer.create(envelope, base),
            ResourceKind::Subnet => SubnetTransformer.create(envelope, base),
        }
    }

    fn update(
        &self,
        envelope: &ChangeEnvelope,
        base: &OutputRecord,
    ) -> Result<Transformed, TransformError> {
        match self {
            ResourceKind::ComputeInstance => Ec2Transformer.update(envelope, base),
            ResourceKind::LoadBalancer => ElbTransformer.update(envelope, base),
            ResourceKind::NetworkInterface => EniTransformer.update(envelope, base),
            ResourceKind::Subnet => SubnetTransformer.update(envelope, base),
        }
    }

    fn delete(
        &self,
        envelope: &ChangeEnvelope,
        base: &OutputRecord,
    ) -> Result<Transformed, TransformError> {
        match self {
            ResourceKind::ComputeInstance => Ec2Transformer.delete(envelope, base),
            ResourceKind::LoadBalancer => ElbTransformer.delete(envelope, base),
            ResourceKind::NetworkInterface => EniTransformer.delete(envelope, base),
            ResourceKind::Subnet => SubnetTransformer.delete(envelope, base),
        }
    }
}

/// Previous value of the `Configuration` diff entry, decoded into `T`
///
/// Deletions no longer carry a current configuration, so everything a delete
/// reports comes from here.
///
/// # Errors
/// * `TransformError::MissingDiffKey` - no `Configuration` entry
/// * `TransformError::MissingPreviousValue` - entry present without a previous value
/// * `TransformError::Decode` - previous value does not have the shape of `T`
pub(crate) fn previous_configuration<T: DeserializeOwned>(
    envelope: &ChangeEnvelope,
) -> Result<T, TransformError> {
    envelope
        .diff_index()
        .get::<T>(CONFIGURATION_KEY)?
        .ok_or_else(|| TransformError::MissingDiffKey(CONFIGURATION_KEY.to_string()))?
        .previous_value
        .ok_or_else(|| TransformError::MissingPreviousValue(CONFIGURATION_KEY.to_string()))
}
