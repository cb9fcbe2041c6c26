//! Attachment-time partitioning of added network facts.
//!
//! When several interfaces attach to an instance inside one update, each
//! attachment is reported as its own change at its own time instead of one
//! merged change at capture time.

use crate::output::schema::{ChangeFact, ChangeType};
use std::collections::{BTreeMap, HashMap};

/// Attachment time recorded per address, one map per address kind
#[derive(Debug, Clone, Default)]
pub struct AttachmentTimes {
    pub private_ip_addresses: HashMap<String, String>,
    pub public_ip_addresses: HashMap<String, String>,
    pub hostnames: HashMap<String, String>,
}

impl AttachmentTimes {
    /// Remember `attach_time` for every address in `fact`
    ///
    /// The first time seen for an address wins.
    pub fn record(&mut self, fact: &ChangeFact, attach_time: Option<&str>) {
        let Some(time) = attach_time.filter(|t| !t.is_empty()) else {
            return;
        };
        remember(&mut self.private_ip_addresses, &fact.private_ip_addresses, time);
        remember(&mut self.public_ip_addresses, &fact.public_ip_addresses, time);
        remember(&mut self.hostnames, &fact.hostnames, time);
    }
}

fn remember(times: &mut HashMap<String, String>, items: &[String], time: &str) {
    for item in items {
        times
            .entry(item.clone())
            .or_insert_with(|| time.to_string());
    }
}

/// Split an added fact into one fact per attachment time
///
/// **Public** - used by the compute-instance update path
///
/// # Returns
/// `(attachment time, fact)` pairs in ascending time order. Items with no
/// recorded time land in the `None` group, which sorts first. An input
/// without addresses yields no groups.
pub fn partition(added: &ChangeFact, times: &AttachmentTimes) -> Vec<(Option<String>, ChangeFact)> {
    let mut groups: BTreeMap<Option<String>, ChangeFact> = BTreeMap::new();

    for ip in &added.private_ip_addresses {
        group_for(&mut groups, times.private_ip_addresses.get(ip))
            .private_ip_addresses
            .push(ip.clone());
    }
    for ip in &added.public_ip_addresses {
        group_for(&mut groups, times.public_ip_addresses.get(ip))
            .public_ip_addresses
            .push(ip.clone());
    }
    for host in &added.hostnames {
        group_for(&mut groups, times.hostnames.get(host))
            .hostnames
            .push(host.clone());
    }

    groups.into_iter().collect()
}

fn group_for<'g>(
    groups: &'g mut BTreeMap<Option<String>, ChangeFact>,
    time: Option<&String>,
) -> &'g mut ChangeFact {
    groups
        .entry(time.cloned())
        .or_insert_with(|| ChangeFact::new(ChangeType::Added))
}
