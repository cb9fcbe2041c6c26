//! Change notification parsing and schema definitions.
//!
//! This module handles:
//! - Parsing the embedded AWS Config notification
//! - Deriving and validating the base output record
//! - Defining the inbound schema

pub mod envelope;
pub mod schema;

// Re-export main types
pub use envelope::{base_record, decode_envelope};
pub use schema::{
    ChangeEnvelope, ChangeKind, ConfigurationItem, ConfigurationItemDiff, DiffEntry, Input,
};
