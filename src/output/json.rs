//! JSON record output writer.
//!
//! Writes transformed record arrays to JSON files or strings.

use super::schema::OutputRecord;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write records to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `records` - Records produced by the handler
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let records = handler.handle(&input)?;
/// write_records(&records, "records.json")?;
/// ```
pub fn write_records(
    records: &[OutputRecord],
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing {} records to: {}", records.len(), output_path.display());

    // Validate path
    validate_output_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    // Open file for writing
    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    // Serialize to JSON with pretty printing
    serde_json::to_writer_pretty(writer, records).map_err(OutputError::SerializationFailed)?;

    Ok(())
}

/// Serialize records to a pretty JSON string
///
/// **Public** - used for stdout output and tests
pub fn records_to_string(records: &[OutputRecord]) -> Result<String, OutputError> {
    serde_json::to_string_pretty(records).map_err(OutputError::SerializationFailed)
}

/// Read records back from a JSON file
///
/// **Public** - useful for validation and testing
pub fn read_records(input_path: impl AsRef<Path>) -> Result<Vec<OutputRecord>, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading records from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let records: Vec<OutputRecord> =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    Ok(records)
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
