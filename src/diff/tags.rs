//! Tag-change extraction.
//!
//! Tag mutations show up under several path prefixes depending on the
//! resource type. They are collected independently of the resource kind.

use super::index::DiffIndex;
use crate::output::schema::{Tag, TagChange};
use crate::utils::config::TAG_PREFIXES;
use crate::utils::error::TransformError;
use log::debug;

/// Collect every tag change in the diff
///
/// **Public** - run by the handler after the resource transformer
///
/// # Errors
/// * `TransformError::Decode` - a tag entry is not a `{key, value}` pair
/// * `TransformError::MalformedTagChange` - a tag entry has neither side
pub fn extract_tag_changes(index: &DiffIndex<'_>) -> Result<Vec<TagChange>, TransformError> {
    let mut changes = Vec::new();

    for prefix in TAG_PREFIXES {
        for (key, entry) in index.entries::<Tag>(prefix)? {
            changes.push(TagChange::new(
                entry.previous_value,
                entry.updated_value,
                key,
            )?);
        }
    }

    debug!("Extracted {} tag changes", changes.len());
    Ok(changes)
}
