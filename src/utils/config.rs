//! Configuration and constants for the transformer.

use std::time::Duration;

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// AWS Config resource types we know how to transform
pub const RESOURCE_TYPE_EC2_INSTANCE: &str = "AWS::EC2::Instance";
pub const RESOURCE_TYPE_ELB: &str = "AWS::ElasticLoadBalancing::LoadBalancer";
pub const RESOURCE_TYPE_ELBV2: &str = "AWS::ElasticLoadBalancingV2::LoadBalancer";
pub const RESOURCE_TYPE_NETWORK_INTERFACE: &str = "AWS::EC2::NetworkInterface";
pub const RESOURCE_TYPE_SUBNET: &str = "AWS::EC2::Subnet";

// Keys and prefixes inside configurationItemDiff.changedProperties
pub const CONFIGURATION_KEY: &str = "Configuration";
pub const SUPPLEMENTARY_TAGS_KEY: &str = "SupplementaryConfiguration.Tags";
pub const NETWORK_INTERFACES_PREFIX: &str = "Configuration.NetworkInterfaces.";
pub const PRIVATE_IP_ADDRESSES_PREFIX: &str = "Configuration.PrivateIpAddresses.";
pub const TAG_PREFIXES: &[&str] = &[
    "Configuration.Tags.",
    "Configuration.TagSet.",
    "SupplementaryConfiguration.Tags.",
    "SupplementaryConfiguration.TagSet.",
    "TagSet.",
];

/// Requester id stamped on interfaces the load-balancing service manages
pub const ELB_REQUESTER_ID: &str = "amazon-elb";

/// Load balancer type segments that precede the name in an interface description
pub const LOAD_BALANCER_TYPE_SEGMENTS: &[&str] = &["app/", "net/", "gwy/"];

/// RFC 3339 with exactly three fractional digits, always UTC
pub const CHANGE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

// Metric names
pub const METRIC_EVENT_DELAY: &str = "event.awsconfig.transformer.event.delay";
pub const METRIC_RECORDS: &str = "event.awsconfig.transformer.records";
pub const METRIC_ERROR: &str = "event.awsconfig.transformer.error";

// Reporter defaults
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(50);
pub const RETRYABLE_STATUS_CODES: &[u16] = &[500, 502, 503];
pub const DEFAULT_CLIENT_TTL: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_CLIENT_TTL_JITTER: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_IDLE_PER_HOST: usize = 100;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// Environment fallbacks for CLI flags
pub const STREAM_ENDPOINT_ENV: &str = "STREAM_APPLIANCE_ENDPOINT";
pub const REPORT_MODE_ENV: &str = "REPORT_MODE";
