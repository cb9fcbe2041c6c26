//! Diff access and reduction.
//!
//! This module covers everything that works on `changedProperties` without
//! knowing the resource kind:
//! - prefix-filtered, positionally ordered decoding (`DiffIndex`)
//! - cancelling churn between added and removed buckets (`reduce`)
//! - splitting added facts by attachment time (`partition`)
//! - collecting tag mutations (`extract_tag_changes`)

mod index;
mod partition;
mod reducer;
mod tags;

// Public API exports
pub use index::DiffIndex;
pub use partition::{partition, AttachmentTimes};
pub use reducer::reduce;
pub use tags::extract_tag_changes;
