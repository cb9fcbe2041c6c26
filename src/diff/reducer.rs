//! Symmetric-difference reduction of added/removed buckets.
//!
//! An address that both appears and disappears inside one update is churn,
//! not a change. Both buckets lose every element the other one holds.

use crate::output::schema::ChangeFact;
use std::collections::HashSet;

/// Cancel addresses present in both buckets
///
/// Comparison is against the original contents of both sides, so an element
/// is dropped from each bucket regardless of which side is filtered first.
/// Remaining elements keep their order.
pub fn reduce(added: &mut ChangeFact, removed: &mut ChangeFact) {
    cancel(
        &mut added.private_ip_addresses,
        &mut removed.private_ip_addresses,
    );
    cancel(
        &mut added.public_ip_addresses,
        &mut removed.public_ip_addresses,
    );
    cancel(&mut added.hostnames, &mut removed.hostnames);
}

fn cancel(a: &mut Vec<String>, b: &mut Vec<String>) {
    let in_a: HashSet<String> = a.iter().cloned().collect();
    let in_b: HashSet<String> = b.iter().cloned().collect();
    a.retain(|v| !in_b.contains(v));
    b.retain(|v| !in_a.contains(v));
}
