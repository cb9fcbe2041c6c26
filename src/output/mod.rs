//! Output record schema and writers.
//!
//! This module handles:
//! - The normalized record shape handed to the reporter
//! - Writing record arrays as JSON

pub mod json;
pub mod schema;

// Re-export main types and functions
pub use json::{read_records, records_to_string, write_records};
pub use schema::{ChangeFact, ChangeType, OutputRecord, Tag, TagChange};
