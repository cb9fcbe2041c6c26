//! AWS Config Transformer
//!
//! Turns AWS Config change notifications into normalized network change
//! records: added and removed addresses, DNS names, CIDR blocks, related
//! resources and tag mutations for instances, load balancers, network
//! interfaces and subnets.
//!
//! This crate provides the core implementation for the
//! `awsconfig-transform` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! awsconfig-transform transform --input event.json
//! STREAM_APPLIANCE_ENDPOINT=http://localhost:8080 awsconfig-transform transform --input -
//! ```
//!
//! Library users construct a [`Handler`] and call [`Handler::handle`].

pub mod commands;
pub mod diff;
pub mod handler;
pub mod output;
pub mod parser;
pub mod reporter;
pub mod telemetry;
pub mod transformers;
pub mod utils;

pub use handler::Handler;
