//! AWS Config Transformer CLI
//!
//! Transforms AWS Config change notifications into network change records
//! and optionally reports them to a stream endpoint.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;
use std::time::Duration;

use awsconfig_transformer::commands::{execute_transform, validate_args, TransformArgs};
use awsconfig_transformer::reporter::ReportMode;
use awsconfig_transformer::utils::config::{REPORT_MODE_ENV, SCHEMA_VERSION, STREAM_ENDPOINT_ENV};

/// AWS Config Transformer - network change records from config diffs
#[derive(Parser, Debug)]
#[command(name = "awsconfig-transform")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Transform one change event
    Transform {
        /// Path to the inbound event JSON ("-" for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Output path for records JSON (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stream endpoint to report records to
        #[arg(short, long, env = STREAM_ENDPOINT_ENV)]
        endpoint: Option<String>,

        /// Delivery mode: per-record or batch
        #[arg(short, long, env = REPORT_MODE_ENV, default_value = "per-record")]
        mode: ReportMode,

        /// Delivery deadline in seconds
        #[arg(long, default_value = "30")]
        timeout_secs: u64,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Transform {
            input,
            output,
            endpoint,
            mode,
            timeout_secs,
        } => {
            let args = TransformArgs {
                input,
                output,
                endpoint,
                mode,
                timeout: Duration::from_secs(timeout_secs),
            };

            // Validate args first
            validate_args(&args)?;

            execute_transform(args)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Display schema information
///
/// **Private** - internal command implementation
fn display_schema(show_details: bool) {
    println!("AWS Config Transformer Record Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure (array of records):");
        println!("  changeTime: string        - When the change occurred (ISO 8601)");
        println!("  resourceType: string      - AWS resource type");
        println!("  accountId: string         - 12-digit AWS account id");
        println!("  region: string            - AWS region");
        println!("  arn: string               - Amazon Resource Name (may be empty)");
        println!("  tags: object              - Resource tags (key -> value)");
        println!("  changes: array            - Network changes");
        println!("    publicIpAddresses: array?  - Changed public IPs");
        println!("    privateIpAddresses: array? - Changed private IPs");
        println!("    hostnames: array?          - Changed public DNS names");
        println!("    cidrBlock: string?         - Subnet CIDR block");
        println!("    relatedResources: array?   - Owning load balancer or VPC");
        println!("    tagChanges: array?         - {{updatedValue?, previousValue?}} tag pairs");
        println!("    changeType: string         - ADDED or DELETED");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("AWS Config Transformer v{}", env!("CARGO_PKG_VERSION"));
    println!("Record Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Transforms AWS Config change notifications into network change records.");
}
