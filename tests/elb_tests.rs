mod common;

use awsconfig_transformer::output::{ChangeType, OutputRecord};
use awsconfig_transformer::utils::TransformError;
use common::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const ELB: &str = "AWS::ElasticLoadBalancing::LoadBalancer";
const ALB: &str = "AWS::ElasticLoadBalancingV2::LoadBalancer";
const ELB_ARN: &str = "arn:aws:elasticloadbalancing:us-west-2:123456789012:loadbalancer/config-test-elb";
const ALB_ARN: &str =
    "arn:aws:elasticloadbalancing:us-west-2:123456789012:loadbalancer/app/config-test-alb/5be197427c282f61";
const ELB_DNS: &str = "internal-config-test-elb-67410663.us-west-2.elb.amazonaws.com";
const ALB_DNS: &str = "internal-config-test-alb-1234567890.us-west-2.elb.amazonaws.com";

fn classic_config() -> Value {
    json!({
        "loadBalancerName": "config-test-elb",
        "availabilityZones": ["us-west-2a", "us-west-2b"],
        "subnets": ["subnet-24b88c41", "subnet-7b600d22"],
        "createdTime": 1553713467830_i64,
        "scheme": "internal",
        "dnsname": ELB_DNS,
        "vpcid": "vpc-8af6d7ef"
    })
}

fn v2_config() -> Value {
    json!({
        "loadBalancerArn": ALB_ARN,
        "dNSName": ALB_DNS,
        "canonicalHostedZoneId": "Z1H1FL5HABSF5",
        "createdTime": "2019-03-27T19:04:27.830Z",
        "loadBalancerName": "config-test-alb",
        "scheme": "internal",
        "vpcId": "vpc-8af6d7ef",
        "type": "application"
    })
}

fn hostname(change_type: ChangeType, host: &str) -> awsconfig_transformer::output::ChangeFact {
    fact(change_type, &[], &[], &[host])
}

#[test]
fn test_classic_create_normalizes_epoch_millis() {
    let records = transform(&event("CREATE", item(ELB, ELB_ARN, classic_config()), json!({})));

    assert_eq!(
        records,
        vec![OutputRecord {
            change_time: "2019-03-27T19:04:27.830Z".to_string(),
            changes: vec![hostname(ChangeType::Added, ELB_DNS)],
            ..base(ELB, ELB_ARN)
        }]
    );
}

#[test]
fn test_v2_create_reads_iso_created_time() {
    let records = transform(&event("CREATE", item(ALB, ALB_ARN, v2_config()), json!({})));

    assert_eq!(
        records,
        vec![OutputRecord {
            change_time: "2019-03-27T19:04:27.830Z".to_string(),
            changes: vec![hostname(ChangeType::Added, ALB_DNS)],
            ..base(ALB, ALB_ARN)
        }]
    );
}

#[test]
fn test_create_without_created_time_uses_capture_time() {
    let mut config = v2_config();
    config.as_object_mut().unwrap().remove("createdTime");

    let records = transform(&event("CREATE", item(ALB, ALB_ARN, config), json!({})));

    assert_eq!(records[0].change_time, CAPTURE_TIME);
}

#[test]
fn test_unparseable_created_time_fails() {
    let mut config = v2_config();
    config["createdTime"] = json!("last tuesday");

    let err = transform_err(&event("CREATE", item(ALB, ALB_ARN, config), json!({})));

    assert!(matches!(err, TransformError::InvalidTimestamp(ref t) if t == "last tuesday"));
}

#[test]
fn test_update_is_base_record_only() {
    let changed = json!({
        "Configuration.SecurityGroups.0": {"previousValue": "sg-1", "updatedValue": "sg-2", "changeType": "UPDATE"}
    });
    let records = transform(&event("UPDATE", item(ELB, ELB_ARN, classic_config()), changed));
    assert_eq!(records, vec![base(ELB, ELB_ARN)]);
}

#[test]
fn test_delete_merges_supplementary_tags() {
    let changed = json!({
        "Configuration": {"previousValue": classic_config(), "updatedValue": null, "changeType": "DELETE"},
        "SupplementaryConfiguration.Tags": {
            "previousValue": [
                {"key": "business_unit", "value": "CISO-Security"},
                {"key": "service_name", "value": "config-test"}
            ],
            "updatedValue": null,
            "changeType": "DELETE"
        }
    });
    let mut identity = item(ELB, ELB_ARN, Value::Null);
    identity["tags"] = json!({});

    let records = transform(&event("DELETE", identity, changed));

    let mut expected = OutputRecord {
        changes: vec![hostname(ChangeType::Deleted, ELB_DNS)],
        ..base(ELB, ELB_ARN)
    };
    expected.tags.insert("business_unit".to_string(), "CISO-Security".to_string());
    expected.tags.insert("service_name".to_string(), "config-test".to_string());
    assert_eq!(records, vec![expected]);
}

#[test]
fn test_delete_without_supplementary_tags_is_tolerated() {
    let changed = json!({
        "Configuration": {"previousValue": v2_config(), "changeType": "DELETE"}
    });

    let records = transform(&event("DELETE", item(ALB, ALB_ARN, Value::Null), changed));

    assert_eq!(
        records,
        vec![OutputRecord {
            changes: vec![hostname(ChangeType::Deleted, ALB_DNS)],
            ..base(ALB, ALB_ARN)
        }]
    );
}

#[test]
fn test_delete_without_configuration_entry_fails() {
    let err = transform_err(&event("DELETE", item(ELB, ELB_ARN, Value::Null), json!({})));
    assert_eq!(err.to_string(), "invalid configuration diff: no Configuration entry");
}
