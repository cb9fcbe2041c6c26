//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the library components to perform user tasks.

pub mod transform;

// Re-export main command functions
pub use transform::{execute_transform, validate_args, TransformArgs};
