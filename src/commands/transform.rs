//! Transform command implementation.
//!
//! The transform command:
//! 1. Reads an inbound event from a file or stdin
//! 2. Transforms it into network change records
//! 3. Reports the records when an endpoint is configured
//! 4. Writes the records as JSON

use crate::handler::Handler;
use crate::output::{records_to_string, write_records, OutputRecord};
use crate::parser::Input;
use crate::reporter::{HttpReporter, ReportContext, ReportMode};
use anyhow::{Context, Result};
use log::{debug, info};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Path that selects stdin as the input
pub const STDIN_PATH: &str = "-";

/// Arguments for the transform command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct TransformArgs {
    /// Inbound event JSON, or `-` for stdin
    pub input: PathBuf,

    /// Where to write the records (stdout when absent)
    pub output: Option<PathBuf>,

    /// Stream endpoint; records are only reported when set
    pub endpoint: Option<String>,

    /// Per-record or batched delivery
    pub mode: ReportMode,

    /// Overall delivery deadline
    pub timeout: Duration,
}

impl Default for TransformArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from(STDIN_PATH),
            output: None,
            endpoint: None,
            mode: ReportMode::PerRecord,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Execute the transform command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Transform command arguments
///
/// # Returns
/// The produced records
///
/// # Errors
/// * Input read or parse failures
/// * Transformation errors
/// * Delivery failures when an endpoint is configured
/// * File write errors
///
/// # Example
/// ```ignore
/// let args = TransformArgs {
///     input: PathBuf::from("event.json"),
///     output: Some(PathBuf::from("records.json")),
///     endpoint: Some("http://localhost:8080/events".to_string()),
///     ..Default::default()
/// };
/// let records = execute_transform(args)?;
/// ```
pub fn execute_transform(args: TransformArgs) -> Result<Vec<OutputRecord>> {
    let start_time = Instant::now();

    // Step 1: Read the inbound event
    info!("Reading event from: {}", args.input.display());
    let raw = read_input(&args.input).context("Failed to read input event")?;
    let input: Input = serde_json::from_str(&raw).context("Input is not a valid event document")?;

    // Step 2: Transform, reporting when an endpoint is set
    let handler = Handler::default();
    let records = match &args.endpoint {
        Some(endpoint) => {
            info!("Reporting to {} ({})", endpoint, args.mode.as_str());
            let reporter =
                HttpReporter::new(endpoint.as_str()).context("Failed to create reporter")?;
            let ctx = ReportContext::with_timeout(args.timeout);
            handler
                .handle_and_report(&ctx, &input, &reporter, args.mode)
                .context("Failed to transform and report event")?
        }
        None => handler
            .handle(&input)
            .context("Failed to transform event")?,
    };

    debug!("Produced {} records", records.len());

    // Step 3: Write records
    match &args.output {
        Some(path) => {
            write_records(&records, path).context("Failed to write records JSON")?;
            info!("✓ Records written to: {}", path.display());
        }
        None => {
            println!("{}", records_to_string(&records)?);
        }
    }

    info!(
        "Transform completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(records)
}

/// Read the whole input from a file or stdin
///
/// **Private** - internal helper for execute_transform
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == STDIN_PATH {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))
}

/// Validate transform arguments
///
/// **Public** - can be called before execute_transform for early validation
///
/// # Arguments
/// * `args` - Arguments to validate
///
/// # Returns
/// Ok if arguments are valid, Err with message if not
pub fn validate_args(args: &TransformArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if let Some(endpoint) = &args.endpoint {
        if endpoint.is_empty() {
            anyhow::bail!("Endpoint cannot be empty");
        }
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            anyhow::bail!("Endpoint must start with http:// or https://");
        }
    }

    if args.timeout.is_zero() {
        anyhow::bail!("Timeout must be greater than 0");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_defaults() {
        assert!(validate_args(&TransformArgs::default()).is_ok());
    }

    #[test]
    fn test_validate_args_empty_input() {
        let args = TransformArgs {
            input: PathBuf::new(),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_invalid_endpoint_scheme() {
        let args = TransformArgs {
            endpoint: Some("ftp://stream.internal".to_string()),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_https_endpoint() {
        let args = TransformArgs {
            endpoint: Some("https://stream.internal/v1/events".to_string()),
            ..Default::default()
        };
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_zero_timeout() {
        let args = TransformArgs {
            timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }
}
