//! Prefix-filtered access to `changedProperties`.
//!
//! Keys look like `Configuration.NetworkInterfaces.0` or `TagSet.3`. The map
//! carries no ordering of its own, so entries under a prefix are ordered by
//! the positional index that follows the prefix. Keys without a numeric
//! position come last, in key order.

use crate::parser::schema::DiffEntry;
use crate::utils::error::TransformError;
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use std::collections::BTreeMap;

/// Borrowed view over one notification's changed properties
#[derive(Debug, Clone, Copy)]
pub struct DiffIndex<'a> {
    properties: &'a BTreeMap<String, Box<RawValue>>,
}

impl<'a> DiffIndex<'a> {
    pub fn new(properties: &'a BTreeMap<String, Box<RawValue>>) -> Self {
        Self { properties }
    }

    /// Decode the entry stored under exactly `key`
    ///
    /// # Errors
    /// * `TransformError::Decode` - the entry does not have the shape of `T`
    pub fn get<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<DiffEntry<T>>, TransformError> {
        self.properties
            .get(key)
            .map(|raw| decode_entry(raw))
            .transpose()
    }

    /// Keys starting with `prefix`, in positional order
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<&'a str> {
        let mut keys: Vec<(bool, u64, &'a str)> = self
            .properties
            .keys()
            .filter(|k| k.starts_with(prefix))
            .map(|k| {
                let position = position_after(k, prefix);
                (position.is_none(), position.unwrap_or(0), k.as_str())
            })
            .collect();
        keys.sort_unstable();
        keys.into_iter().map(|(_, _, k)| k).collect()
    }

    /// Decode every entry under `prefix`, paired with its key
    ///
    /// # Errors
    /// * `TransformError::Decode` - any matching entry does not have the shape of `T`
    pub fn entries<T: DeserializeOwned>(
        &self,
        prefix: &str,
    ) -> Result<Vec<(&'a str, DiffEntry<T>)>, TransformError> {
        let keys = self.keys_with_prefix(prefix);
        debug!("{} changed properties under {}", keys.len(), prefix);

        keys.into_iter()
            .map(|key| decode_entry(&self.properties[key]).map(|entry| (key, entry)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Decode one raw diff value; a JSON null is an entry with neither side
fn decode_entry<T: DeserializeOwned>(raw: &RawValue) -> Result<DiffEntry<T>, TransformError> {
    if raw.get().trim() == "null" {
        return Ok(DiffEntry::default());
    }
    Ok(serde_json::from_str(raw.get())?)
}

/// Positional index in the first path segment after `prefix`
fn position_after(key: &str, prefix: &str) -> Option<u64> {
    key.strip_prefix(prefix)?
        .split('.')
        .next()
        .and_then(|segment| segment.parse().ok())
}
