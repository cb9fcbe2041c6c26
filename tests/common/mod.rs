//! Shared builders for integration tests.

#![allow(dead_code)]

use awsconfig_transformer::output::{ChangeFact, ChangeType, OutputRecord};
use awsconfig_transformer::parser::{base_record, decode_envelope, ChangeEnvelope, Input};
use awsconfig_transformer::telemetry::{NoopStats, StatsRecorder};
use awsconfig_transformer::utils::TransformError;
use awsconfig_transformer::Handler;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ACCOUNT_ID: &str = "123456789012";
pub const REGION: &str = "us-west-2";
pub const CAPTURE_TIME: &str = "2019-02-22T20:43:10.208Z";

/// Identity section of a configuration item
pub fn item(resource_type: &str, arn: &str, configuration: Value) -> Value {
    json!({
        "configurationItemVersion": "1.3",
        "configurationItemCaptureTime": CAPTURE_TIME,
        "configurationStateId": 1550868190208_i64,
        "awsAccountId": ACCOUNT_ID,
        "configurationItemStatus": "OK",
        "resourceType": resource_type,
        "resourceId": "resource-1",
        "resourceName": null,
        "ARN": arn,
        "awsRegion": REGION,
        "availabilityZone": "us-west-2a",
        "tags": {"business_unit": "Security", "service_name": "net-monitor"},
        "relatedEvents": [],
        "relationships": [],
        "configuration": configuration,
        "supplementaryConfiguration": {}
    })
}

/// Wrap a configuration item and diff into an inbound event
pub fn event(change_type: &str, item: Value, changed_properties: Value) -> Input {
    event_with_message_type(change_type, "ConfigurationItemChangeNotification", item, changed_properties)
}

pub fn event_with_message_type(
    change_type: &str,
    message_type: &str,
    item: Value,
    changed_properties: Value,
) -> Input {
    let message = json!({
        "configurationItemDiff": {
            "changedProperties": changed_properties,
            "changeType": change_type
        },
        "configurationItem": item,
        "notificationCreationTime": "2019-02-22T20:43:11.412Z",
        "messageType": message_type,
        "recordVersion": "1.3"
    });
    Input {
        message: message.to_string(),
        timestamp: "2019-02-22T20:43:11.470Z".to_string(),
        processed_timestamp: None,
    }
}

/// Base record every transformer starts from for `item`
pub fn base(resource_type: &str, arn: &str) -> OutputRecord {
    let mut tags = BTreeMap::new();
    tags.insert("business_unit".to_string(), "Security".to_string());
    tags.insert("service_name".to_string(), "net-monitor".to_string());
    OutputRecord {
        change_time: CAPTURE_TIME.to_string(),
        resource_type: resource_type.to_string(),
        account_id: ACCOUNT_ID.to_string(),
        region: REGION.to_string(),
        arn: arn.to_string(),
        tags,
        changes: Vec::new(),
    }
}

/// Fact with the given address lists
pub fn fact(change_type: ChangeType, private: &[&str], public: &[&str], hosts: &[&str]) -> ChangeFact {
    let mut f = ChangeFact::new(change_type);
    f.private_ip_addresses = strings(private);
    f.public_ip_addresses = strings(public);
    f.hostnames = strings(hosts);
    f
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Decoded envelope and base record, for calling a transformer directly
pub fn decoded(input: &Input) -> (ChangeEnvelope, OutputRecord) {
    let envelope = decode_envelope(&input.message).expect("envelope should decode");
    let base = base_record(&envelope.configuration_item).expect("base record should be valid");
    (envelope, base)
}

pub fn handler() -> Handler {
    Handler::new(Arc::new(NoopStats))
}

pub fn transform(input: &Input) -> Vec<OutputRecord> {
    handler().handle(input).expect("transform should succeed")
}

pub fn transform_err(input: &Input) -> TransformError {
    handler()
        .handle(input)
        .expect_err("transform should fail")
}

/// Stats recorder that keeps everything it is given
#[derive(Default)]
pub struct RecordingStats {
    pub counts: Mutex<Vec<(String, u64)>>,
    pub timings: Mutex<Vec<(String, Duration)>>,
}

impl RecordingStats {
    pub fn count_of(&self, name: &str) -> u64 {
        self.counts
            .lock()
            .unwrap()
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v)
            .sum()
    }
}

impl StatsRecorder for RecordingStats {
    fn timing(&self, name: &str, value: Duration) {
        self.timings.lock().unwrap().push((name.to_string(), value));
    }

    fn count(&self, name: &str, value: u64) {
        self.counts.lock().unwrap().push((name.to_string(), value));
    }
}
