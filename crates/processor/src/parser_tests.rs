// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

const MESSAGE_ID: &str = "aws.ssm.cmd-42.i-0123456789";
const INSTANCE: &str = "i-0123456789";

// Raw literal: plugin order in the payload text is the execution order the
// parser must preserve.
fn send_payload() -> String {
    r#"{
        "CommandId": "cmd-42",
        "DocumentName": "AWS-RunShellScript",
        "OutputS3BucketName": "bucket",
        "OutputS3KeyPrefix": "prefix",
        "DocumentContent": {
            "schemaVersion": "1.2",
            "runtimeConfig": {
                "aws:runShellScript": {
                    "properties": [{"runCommand": ["echo hello"]}]
                },
                "aws:runPowerShellScript": {
                    "properties": [{"runCommand": ["Write-Output hello"]}]
                }
            }
        }
    }"#
    .to_string()
}

fn message(payload: String) -> MdsMessage {
    MdsMessage {
        message_id: Some(MESSAGE_ID.to_string()),
        topic: Some("aws.ssm.sendCommand.test".to_string()),
        payload: Some(payload),
        destination: Some(INSTANCE.to_string()),
        created_date: Some("2016-04-01T10:00:00Z".to_string()),
    }
}

fn parser() -> CommandMessageParser {
    CommandMessageParser::new(InstanceIdentity::new(INSTANCE))
}

#[test]
fn send_command_parses_into_ordered_plugin_states() {
    let doc = parser()
        .parse_send_command(&message(send_payload()), Path::new("/var/lib/agent/orch"))
        .unwrap();

    assert_eq!(doc.document_type, DocumentType::SendCommand);
    assert_eq!(doc.info.command_id, "cmd-42");
    assert_eq!(doc.info.message_id, MESSAGE_ID);
    assert_eq!(doc.info.destination, INSTANCE);
    assert_eq!(doc.info.document_name, "AWS-RunShellScript");
    assert_eq!(doc.info.document_status, ResultStatus::InProgress);
    assert_eq!(doc.info.run_count, 0);

    let names: Vec<_> = doc.plugins.keys().cloned().collect();
    assert_eq!(names, vec!["aws:runShellScript", "aws:runPowerShellScript"]);
    for state in doc.plugins.values() {
        assert!(!state.has_executed);
    }
}

#[test]
fn plugin_configurations_carry_paths_and_ids() {
    let doc = parser()
        .parse_send_command(&message(send_payload()), Path::new("/var/lib/agent/orch"))
        .unwrap();

    let config = &doc.plugins["aws:runShellScript"].configuration;
    assert_eq!(config.message_id, MESSAGE_ID);
    assert_eq!(config.book_keeping_file_name, "cmd-42");
    assert_eq!(config.output_s3_bucket_name, "bucket");
    assert_eq!(
        config.output_s3_key_prefix,
        "prefix/cmd-42/i-0123456789/aws:runShellScript"
    );
    assert_eq!(
        config.orchestration_directory,
        "/var/lib/agent/orch/cmd-42/aws:runShellScript"
    );
    assert_eq!(config.plugin_name, "aws:runShellScript");
}

#[test]
fn empty_s3_prefix_segments_are_skipped() {
    let payload = json!({
        "CommandId": "cmd-42",
        "DocumentName": "AWS-RunShellScript",
        "DocumentContent": {
            "runtimeConfig": {"aws:runShellScript": {"properties": []}}
        }
    })
    .to_string();

    let doc = parser()
        .parse_send_command(&message(payload), Path::new("/orch"))
        .unwrap();
    let config = &doc.plugins["aws:runShellScript"].configuration;
    assert_eq!(
        config.output_s3_key_prefix,
        "cmd-42/i-0123456789/aws:runShellScript"
    );
}

#[test]
fn malformed_payload_is_a_parse_error() {
    let err = parser()
        .parse_send_command(&message("{not json".to_string()), Path::new("/orch"))
        .unwrap_err();
    assert!(matches!(err, ParseError::Payload(_)));
}

#[test]
fn message_id_without_command_segment_is_rejected() {
    let mut msg = message(send_payload());
    msg.message_id = Some("aws.ssm".to_string());
    let err = parser()
        .parse_send_command(&msg, Path::new("/orch"))
        .unwrap_err();
    assert!(matches!(err, ParseError::BadMessageId(_)));
}

#[test]
fn managed_instance_rewrites_metadata_references_in_listed_documents() {
    let payload = json!({
        "CommandId": "cmd-42",
        "DocumentName": "AWS-ListWindowsInventory",
        "DocumentContent": {
            "runtimeConfig": {
                "aws:runPowerShellScript": {
                    "properties": [{
                        "runCommand": [
                            "Invoke-RestMethod http://169.254.169.254/latest/meta-data/instance-id"
                        ]
                    }]
                }
            }
        }
    })
    .to_string();

    let managed = CommandMessageParser::new(InstanceIdentity::managed("mi-0123456789"));
    let doc = managed
        .parse_send_command(&message(payload), Path::new("/orch"))
        .unwrap();

    let properties = serde_json::to_string(
        &doc.plugins["aws:runPowerShellScript"].configuration.properties,
    )
    .unwrap();
    assert!(!properties.contains("169.254.169.254"));
    assert!(properties.contains("mi-0123456789"));
}

#[test]
fn unlisted_documents_are_left_alone_on_managed_instances() {
    let payload = json!({
        "CommandId": "cmd-42",
        "DocumentName": "AWS-RunShellScript",
        "DocumentContent": {
            "runtimeConfig": {
                "aws:runShellScript": {
                    "properties": [{
                        "runCommand": [
                            "curl http://169.254.169.254/latest/meta-data/instance-id"
                        ]
                    }]
                }
            }
        }
    })
    .to_string();

    let managed = CommandMessageParser::new(InstanceIdentity::managed("mi-0123456789"));
    let doc = managed
        .parse_send_command(&message(payload), Path::new("/orch"))
        .unwrap();

    let properties =
        serde_json::to_string(&doc.plugins["aws:runShellScript"].configuration.properties).unwrap();
    assert!(properties.contains("169.254.169.254"));
}

#[test]
fn cancel_command_parses_target_ids() {
    let payload = json!({
        "CancelMessageId": "aws.ssm.cmd-7.i-0123456789"
    })
    .to_string();
    let mut msg = message(payload);
    msg.message_id = Some("aws.ssm.cancel-1.i-0123456789".to_string());
    msg.topic = Some("aws.ssm.cancelCommand.test".to_string());

    let doc = parser().parse_cancel_command(&msg).unwrap();
    assert_eq!(doc.document_type, DocumentType::CancelCommand);
    assert!(doc.plugins.is_empty());

    let cancel = doc.cancel.unwrap();
    assert_eq!(cancel.cancel_message_id, "aws.ssm.cmd-7.i-0123456789");
    assert_eq!(cancel.cancel_command_id, "cmd-7");
    assert!(cancel.debug_info.is_empty());
}

#[test]
fn cancel_command_honors_explicit_command_id() {
    let payload = json!({
        "CancelMessageId": "aws.ssm.cmd-7.i-0123456789",
        "CancelCommandId": "cmd-7-explicit"
    })
    .to_string();
    let mut msg = message(payload);
    msg.message_id = Some("aws.ssm.cancel-1.i-0123456789".to_string());

    let doc = parser().parse_cancel_command(&msg).unwrap();
    assert_eq!(doc.cancel.unwrap().cancel_command_id, "cmd-7-explicit");
}

#[test]
fn missing_payload_is_rejected() {
    let mut msg = message(send_payload());
    msg.payload = None;
    let err = parser()
        .parse_send_command(&msg, Path::new("/orch"))
        .unwrap_err();
    assert!(matches!(err, ParseError::MissingField("Payload")));
}
