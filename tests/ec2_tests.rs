mod common;

use awsconfig_transformer::output::{ChangeType, OutputRecord};
use awsconfig_transformer::utils::TransformError;
use common::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const EC2: &str = "AWS::EC2::Instance";
const ARN: &str = "arn:aws:ec2:us-west-2:123456789012:instance/i-0a763ac3ee37d8d2b";

const ATTACH_EARLY: &str = "2019-02-22T20:39:47.000Z";
const ATTACH_LATE: &str = "2019-02-22T20:41:02.000Z";

fn interface(attach_time: &str, blocks: Value) -> Value {
    json!({
        "networkInterfaceId": "eni-0cd5d7a0d0e2bd6e1",
        "subnetId": "subnet-7b600d22",
        "vpcId": "vpc-8af6d7ef",
        "description": "",
        "ownerId": "123456789012",
        "status": "in-use",
        "privateDnsName": "ip-172-31-30-79.us-west-2.compute.internal",
        "attachment": {"attachTime": attach_time, "deviceIndex": 0, "status": "attached"},
        "privateIpAddresses": blocks
    })
}

fn public_block(private: &str, public: &str, host: &str) -> Value {
    json!({
        "privateIpAddress": private,
        "primary": true,
        "association": {"publicIp": public, "publicDnsName": host, "ipOwnerId": "amazon"}
    })
}

fn private_block(private: &str) -> Value {
    json!({"privateIpAddress": private, "primary": false, "association": null})
}

fn instance_config(interfaces: Value) -> Value {
    json!({
        "instanceId": "i-0a763ac3ee37d8d2b",
        "state": {"code": 16, "name": "running"},
        "instanceType": "t2.micro",
        "networkInterfaces": interfaces,
        "tags": [{"key": "business_unit", "value": "Security"}]
    })
}

fn ec2_item(configuration: Value) -> Value {
    item(EC2, ARN, configuration)
}

fn record(change_time: &str, changes: Vec<awsconfig_transformer::output::ChangeFact>) -> OutputRecord {
    OutputRecord {
        change_time: change_time.to_string(),
        changes,
        ..base(EC2, ARN)
    }
}

#[test]
fn test_create_emits_one_record_per_interface() {
    let config = instance_config(json!([
        interface(
            ATTACH_EARLY,
            json!([public_block("172.31.30.79", "34.219.72.29", "ec2-34-219-72-29.us-west-2.compute.amazonaws.com")])
        ),
        interface(ATTACH_LATE, json!([private_block("172.31.30.80")])),
    ]));

    let records = transform(&event("CREATE", ec2_item(config), json!({})));

    assert_eq!(
        records,
        vec![
            record(
                ATTACH_EARLY,
                vec![fact(
                    ChangeType::Added,
                    &["172.31.30.79"],
                    &["34.219.72.29"],
                    &["ec2-34-219-72-29.us-west-2.compute.amazonaws.com"],
                )]
            ),
            record(
                ATTACH_LATE,
                vec![fact(ChangeType::Added, &["172.31.30.80"], &[], &[])]
            ),
        ]
    );
}

#[test]
fn test_create_without_interfaces_produces_nothing() {
    let records = transform(&event("CREATE", ec2_item(instance_config(json!([]))), json!({})));
    assert!(records.is_empty());
}

#[test]
fn test_create_without_attachment_uses_capture_time() {
    let mut ni = interface(ATTACH_EARLY, json!([private_block("10.0.0.4")]));
    ni["attachment"] = Value::Null;

    let records = transform(&event("CREATE", ec2_item(instance_config(json!([ni]))), json!({})));

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].change_time, CAPTURE_TIME);
}

#[test]
fn test_update_cancels_churn_and_splits_by_direction() {
    let previous = interface(
        ATTACH_EARLY,
        json!([public_block("172.31.30.79", "34.219.72.29", "ec2-34-219-72-29.compute.amazonaws.com")]),
    );
    let updated = interface(
        ATTACH_EARLY,
        json!([
            public_block("172.31.30.79", "34.219.72.29", "ec2-34-219-72-29.compute.amazonaws.com"),
            private_block("172.31.30.90")
        ]),
    );
    let detached = interface(ATTACH_LATE, json!([private_block("172.31.40.5")]));

    let changed = json!({
        "Configuration.NetworkInterfaces.0": {
            "previousValue": previous,
            "updatedValue": updated,
            "changeType": "UPDATE"
        },
        "Configuration.NetworkInterfaces.1": {
            "previousValue": detached,
            "updatedValue": null,
            "changeType": "DELETE"
        },
        "Configuration.State.Name": {
            "previousValue": "pending",
            "updatedValue": "running",
            "changeType": "UPDATE"
        }
    });

    let records = transform(&event("UPDATE", ec2_item(instance_config(json!([updated]))), changed));

    assert_eq!(
        records,
        vec![
            record(
                ATTACH_EARLY,
                vec![fact(ChangeType::Added, &["172.31.30.90"], &[], &[])]
            ),
            record(
                CAPTURE_TIME,
                vec![fact(ChangeType::Deleted, &["172.31.40.5"], &[], &[])]
            ),
        ]
    );
}

#[test]
fn test_update_partitions_added_interfaces_by_attach_time() {
    let changed = json!({
        "Configuration.NetworkInterfaces.1": {
            "updatedValue": interface(ATTACH_LATE, json!([private_block("10.0.1.1")])),
            "changeType": "CREATE"
        },
        "Configuration.NetworkInterfaces.0": {
            "updatedValue": interface(ATTACH_EARLY, json!([private_block("10.0.0.1")])),
            "changeType": "CREATE"
        }
    });

    let records = transform(&event("UPDATE", ec2_item(instance_config(json!([]))), changed));

    assert_eq!(
        records,
        vec![
            record(ATTACH_EARLY, vec![fact(ChangeType::Added, &["10.0.0.1"], &[], &[])]),
            record(ATTACH_LATE, vec![fact(ChangeType::Added, &["10.0.1.1"], &[], &[])]),
        ]
    );
}

#[test]
fn test_update_with_only_flap_returns_base_record() {
    let ni = interface(ATTACH_EARLY, json!([private_block("10.0.0.1")]));
    let changed = json!({
        "Configuration.NetworkInterfaces.0": {
            "previousValue": ni,
            "updatedValue": ni,
            "changeType": "UPDATE"
        }
    });

    let records = transform(&event("UPDATE", ec2_item(instance_config(json!([ni]))), changed));

    assert_eq!(records, vec![base(EC2, ARN)]);
}

#[test]
fn test_delete_reads_previous_configuration_and_tags() {
    let previous = json!({
        "instanceId": "i-0a763ac3ee37d8d2b",
        "networkInterfaces": [
            interface(ATTACH_EARLY, json!([public_block("172.31.30.79", "34.219.72.29", "ec2-34.compute.amazonaws.com")])),
            interface(ATTACH_LATE, json!([private_block("172.31.30.80")]))
        ],
        "tags": [
            {"key": "service_name", "value": "legacy-name"},
            {"key": "owner", "value": "netops"}
        ]
    });
    let changed = json!({
        "Configuration": {"previousValue": previous, "updatedValue": null, "changeType": "DELETE"}
    });

    let mut identity = ec2_item(Value::Null);
    identity["tags"] = json!({});
    let records = transform(&event("DELETE", identity, changed));

    let mut expected = record(
        CAPTURE_TIME,
        vec![fact(
            ChangeType::Deleted,
            &["172.31.30.79", "172.31.30.80"],
            &["34.219.72.29"],
            &["ec2-34.compute.amazonaws.com"],
        )],
    );
    expected.tags.clear();
    expected.tags.insert("service_name".to_string(), "legacy-name".to_string());
    expected.tags.insert("owner".to_string(), "netops".to_string());

    assert_eq!(records, vec![expected]);
}

#[test]
fn test_delete_tags_merge_over_base_tags() {
    let previous = json!({
        "networkInterfaces": [],
        "tags": [{"key": "service_name", "value": "from-diff"}]
    });
    let changed = json!({"Configuration": {"previousValue": previous, "changeType": "DELETE"}});

    let records = transform(&event("DELETE", ec2_item(Value::Null), changed));

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].tags.get("service_name").map(String::as_str), Some("from-diff"));
    assert_eq!(records[0].tags.get("business_unit").map(String::as_str), Some("Security"));
}

#[test]
fn test_delete_without_configuration_entry_fails() {
    let err = transform_err(&event("DELETE", ec2_item(Value::Null), json!({})));
    assert!(matches!(err, TransformError::MissingDiffKey(ref key) if key == "Configuration"));
}

#[test]
fn test_delete_without_previous_value_fails() {
    let changed = json!({"Configuration": {"previousValue": null, "changeType": "DELETE"}});
    let err = transform_err(&event("DELETE", ec2_item(Value::Null), changed));
    assert!(matches!(err, TransformError::MissingPreviousValue(_)));
}

#[test]
fn test_malformed_interface_entry_is_decode_error() {
    let changed = json!({
        "Configuration.NetworkInterfaces.0": {"updatedValue": "not-an-interface", "changeType": "CREATE"}
    });
    let err = transform_err(&event("UPDATE", ec2_item(instance_config(json!([]))), changed));
    assert!(matches!(err, TransformError::Decode(_)));
}
