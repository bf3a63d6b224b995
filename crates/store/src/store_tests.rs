// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use drover_core::{
    CommandId, DocumentType, PluginResult, PluginState, ResultStatus,
};
use indexmap::IndexMap;
use tempfile::tempdir;

const INSTANCE: &str = "i-0123456789";

fn document(message_id: &str) -> DocumentState {
    let command_id = CommandId::from_message_id(&MessageId::new(message_id)).unwrap();
    let mut plugins = IndexMap::new();
    plugins.insert(
        "aws:runShellScript".to_string(),
        PluginState {
            has_executed: false,
            ..Default::default()
        },
    );
    DocumentState {
        document_type: DocumentType::SendCommand,
        info: DocumentInfo {
            command_id,
            message_id: MessageId::new(message_id),
            destination: INSTANCE.to_string(),
            document_status: ResultStatus::InProgress,
            ..Default::default()
        },
        plugins,
        cancel: None,
    }
}

#[test]
fn persist_then_read_yields_same_record() {
    let dir = tempdir().unwrap();
    let store = CommandStore::new(dir.path());
    let doc = document("aws.ssm.cmd-1.i-0123456789");

    store.persist(&doc, Folder::Pending).unwrap();
    let back = store
        .interim_state(INSTANCE, &doc.info.message_id, Folder::Pending)
        .unwrap();

    assert_eq!(back, doc);
}

#[test]
fn record_lands_at_exact_layout_path() {
    let dir = tempdir().unwrap();
    let store = CommandStore::new(dir.path());
    let doc = document("aws.ssm.cmd-1.i-0123456789");

    store.persist(&doc, Folder::Current).unwrap();

    let expected = dir
        .path()
        .join(INSTANCE)
        .join("document")
        .join("state")
        .join("current")
        .join("aws.ssm.cmd-1.i-0123456789");
    assert!(expected.is_file());
}

#[test]
fn no_temp_file_left_behind() {
    let dir = tempdir().unwrap();
    let store = CommandStore::new(dir.path());
    let doc = document("aws.ssm.cmd-1.i-0123456789");

    store.persist(&doc, Folder::Pending).unwrap();

    let folder = dir
        .path()
        .join(INSTANCE)
        .join("document")
        .join("state")
        .join("pending");
    let leftovers: Vec<_> = std::fs::read_dir(folder)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn persist_document_info_keeps_plugin_states() {
    let dir = tempdir().unwrap();
    let store = CommandStore::new(dir.path());
    let mut doc = document("aws.ssm.cmd-1.i-0123456789");
    doc.plugins.get_mut("aws:runShellScript").unwrap().has_executed = true;
    doc.plugins.get_mut("aws:runShellScript").unwrap().result = PluginResult {
        status: ResultStatus::Success,
        code: 0,
        output: "done".to_string(),
    };
    store.persist(&doc, Folder::Current).unwrap();

    let mut info = doc.info.clone();
    info.document_status = ResultStatus::Success;
    info.document_trace_output = "trace".to_string();
    store.persist_document_info(&info, Folder::Current).unwrap();

    let back = store
        .interim_state(INSTANCE, &doc.info.message_id, Folder::Current)
        .unwrap();
    assert_eq!(back.info.document_status, ResultStatus::Success);
    assert_eq!(back.info.document_trace_output, "trace");
    let plugin = &back.plugins["aws:runShellScript"];
    assert!(plugin.has_executed);
    assert_eq!(plugin.result.output, "done");
}

#[test]
fn document_info_reads_only_document_level_fields() {
    let dir = tempdir().unwrap();
    let store = CommandStore::new(dir.path());
    let mut doc = document("aws.ssm.cmd-1.i-0123456789");
    doc.info.run_count = 2;
    store.persist(&doc, Folder::Current).unwrap();

    let info = store
        .document_info(INSTANCE, &doc.info.message_id, Folder::Current)
        .unwrap();
    assert_eq!(info, doc.info);
}

#[test]
fn move_state_transfers_between_folders() {
    let dir = tempdir().unwrap();
    let store = CommandStore::new(dir.path());
    let doc = document("aws.ssm.cmd-1.i-0123456789");
    store.persist(&doc, Folder::Pending).unwrap();

    store
        .move_state(INSTANCE, &doc.info.message_id, Folder::Pending, Folder::Current)
        .unwrap();

    assert!(store
        .interim_state(INSTANCE, &doc.info.message_id, Folder::Pending)
        .is_err());
    let moved = store
        .interim_state(INSTANCE, &doc.info.message_id, Folder::Current)
        .unwrap();
    assert_eq!(moved, doc);
}

#[test]
fn move_state_of_missing_record_is_not_found() {
    let dir = tempdir().unwrap();
    let store = CommandStore::new(dir.path());
    let err = store
        .move_state(
            INSTANCE,
            &MessageId::new("aws.ssm.ghost.i-0123456789"),
            Folder::Pending,
            Folder::Current,
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn read_of_missing_record_is_not_found() {
    let dir = tempdir().unwrap();
    let store = CommandStore::new(dir.path());
    let err = store
        .interim_state(INSTANCE, &MessageId::new("aws.ssm.ghost.i-1"), Folder::Current)
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn list_returns_sorted_ids_and_ignores_temp_files() {
    let dir = tempdir().unwrap();
    let store = CommandStore::new(dir.path());
    store
        .persist(&document("aws.ssm.cmd-b.i-0123456789"), Folder::Pending)
        .unwrap();
    store
        .persist(&document("aws.ssm.cmd-a.i-0123456789"), Folder::Pending)
        .unwrap();

    let folder = dir
        .path()
        .join(INSTANCE)
        .join("document")
        .join("state")
        .join("pending");
    std::fs::write(folder.join("aws.ssm.cmd-c.i-0123456789.tmp"), b"partial").unwrap();

    let names = store.list(INSTANCE, Folder::Pending).unwrap();
    assert_eq!(
        names,
        vec!["aws.ssm.cmd-a.i-0123456789", "aws.ssm.cmd-b.i-0123456789"]
    );
}

#[test]
fn list_of_missing_folder_is_empty() {
    let dir = tempdir().unwrap();
    let store = CommandStore::new(dir.path());
    assert!(store.list(INSTANCE, Folder::Completed).unwrap().is_empty());
}

#[test]
fn overwrite_replaces_existing_record() {
    let dir = tempdir().unwrap();
    let store = CommandStore::new(dir.path());
    let mut doc = document("aws.ssm.cmd-1.i-0123456789");
    store.persist(&doc, Folder::Current).unwrap();

    doc.info.run_count = 3;
    store.persist(&doc, Folder::Current).unwrap();

    let back = store
        .interim_state(INSTANCE, &doc.info.message_id, Folder::Current)
        .unwrap();
    assert_eq!(back.info.run_count, 3);
}
