//! Address shapes shared by the instance and interface transformers.

use crate::output::schema::{ChangeFact, ChangeType};
use crate::parser::schema::nullable;
use serde::Deserialize;

/// Public address bound to an interface or to one of its private addresses
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Association {
    #[serde(default, deserialize_with = "nullable", alias = "PublicIp")]
    pub public_ip: String,

    #[serde(default, deserialize_with = "nullable", alias = "PublicDnsName")]
    pub public_dns_name: String,
}

/// One private address plus its optional public association
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateIpBlock {
    #[serde(default, deserialize_with = "nullable", alias = "PrivateIpAddress")]
    pub private_ip_address: String,

    #[serde(default, alias = "Association")]
    pub association: Option<Association>,
}

impl PrivateIpBlock {
    /// Add this block's addresses to `fact`
    pub fn collect_into(&self, fact: &mut ChangeFact) {
        if !self.private_ip_address.is_empty() {
            fact.private_ip_addresses
                .push(self.private_ip_address.clone());
        }
        if let Some(association) = &self.association {
            association.collect_into(fact);
        }
    }
}

impl Association {
    /// Add the public address and name to `fact`, skipping empty or repeated ones
    pub fn collect_into(&self, fact: &mut ChangeFact) {
        if !self.public_ip.is_empty() && !fact.public_ip_addresses.contains(&self.public_ip) {
            fact.public_ip_addresses.push(self.public_ip.clone());
        }
        if !self.public_dns_name.is_empty() && !fact.hostnames.contains(&self.public_dns_name) {
            fact.hostnames.push(self.public_dns_name.clone());
        }
    }
}

/// Facts for a list of private address blocks plus an interface-level association
pub fn address_facts(
    blocks: &[PrivateIpBlock],
    association: Option<&Association>,
    change_type: ChangeType,
) -> ChangeFact {
    let mut fact = ChangeFact::new(change_type);
    for block in blocks {
        block.collect_into(&mut fact);
    }
    if let Some(association) = association {
        association.collect_into(&mut fact);
    }
    fact
}
