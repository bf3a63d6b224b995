// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::payload::PluginConfig;

fn plugin(executed: bool, status: ResultStatus) -> PluginState {
    PluginState {
        configuration: PluginConfig {
            plugin_name: "aws:runScript".to_string(),
            ..Default::default()
        },
        has_executed: executed,
        result: PluginResult {
            status,
            code: 0,
            output: String::new(),
        },
    }
}

fn document() -> DocumentState {
    let mut plugins = IndexMap::new();
    plugins.insert("aws:first".to_string(), plugin(true, ResultStatus::Success));
    plugins.insert("aws:second".to_string(), plugin(false, ResultStatus::Pending));
    DocumentState {
        document_type: DocumentType::SendCommand,
        info: DocumentInfo {
            command_id: CommandId::new("cmd-1"),
            message_id: MessageId::new("aws.ssm.cmd-1.i-001"),
            document_name: "AWS-RunShellScript".to_string(),
            destination: "i-001".to_string(),
            created_date: "2016-03-01T00:00:00Z".to_string(),
            document_status: ResultStatus::InProgress,
            run_count: 0,
            ..Default::default()
        },
        plugins,
        cancel: None,
    }
}

#[test]
fn json_round_trip_is_lossless() {
    let doc = document();
    let json = serde_json::to_string_pretty(&doc).unwrap();
    let back: DocumentState = serde_json::from_str(&json).unwrap();
    assert_eq!(back.document_type, doc.document_type);
    assert_eq!(back.info, doc.info);
    assert_eq!(back.plugins, doc.plugins);
    assert_eq!(back.cancel, doc.cancel);
}

#[test]
fn plugin_order_survives_serialization() {
    let doc = document();
    let json = serde_json::to_string(&doc).unwrap();
    let back: DocumentState = serde_json::from_str(&json).unwrap();
    let names: Vec<_> = back.plugins.keys().cloned().collect();
    assert_eq!(names, vec!["aws:first", "aws:second"]);
}

#[test]
fn pending_configurations_skip_executed_plugins() {
    let doc = document();
    let pending = doc.pending_plugin_configurations();
    assert_eq!(pending.len(), 1);
    assert!(pending.contains_key("aws:second"));
}

#[test]
fn plugin_outputs_cover_every_slot() {
    let doc = document();
    let outputs = doc.plugin_outputs();
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs["aws:first"].status, ResultStatus::Success);
    assert_eq!(outputs["aws:second"].status, ResultStatus::Pending);
}

#[test]
fn association_documents_are_recognized() {
    let mut doc = document();
    assert!(!doc.is_association());
    doc.document_type = DocumentType::Association;
    assert!(doc.is_association());
}

#[test]
fn cancel_information_round_trips() {
    let mut doc = document();
    doc.document_type = DocumentType::CancelCommand;
    doc.cancel = Some(CancelInfo {
        cancel_message_id: MessageId::new("aws.ssm.cmd-0.i-001"),
        cancel_command_id: CommandId::new("cmd-0"),
        debug_info: String::new(),
    });
    let json = serde_json::to_string(&doc).unwrap();
    let back: DocumentState = serde_json::from_str(&json).unwrap();
    assert_eq!(back.cancel, doc.cancel);
}
