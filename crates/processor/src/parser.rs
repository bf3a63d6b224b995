// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message parsing: raw MDS messages into command documents.

use drover_adapters::MdsMessage;
use drover_core::{
    CancelInfo, CancelPayload, CommandId, DocumentInfo, DocumentState, DocumentType,
    InstanceIdentity, MessageId, PluginConfig, PluginResult, PluginState, ResultStatus,
    SendCommandPayload,
};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Errors from message parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("message is missing required field {0}")]
    MissingField(&'static str),
    #[error("message id {0} carries no command id")]
    BadMessageId(String),
    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("unexpected topic {0}")]
    UnexpectedTopic(String),
}

/// Converts raw messages into documents. Constructor-injected so tests can
/// substitute parsing without touching the dispatcher.
pub trait MessageParser: Send + Sync + 'static {
    fn parse_send_command(
        &self,
        msg: &MdsMessage,
        orchestration_root: &Path,
    ) -> Result<DocumentState, ParseError>;

    fn parse_cancel_command(&self, msg: &MdsMessage) -> Result<DocumentState, ParseError>;
}

/// Instance-metadata endpoint some public documents query for the instance
/// id; unreachable on managed instances.
const INSTANCE_METADATA_INSTANCE_ID_URL: &str =
    "http://169.254.169.254/latest/meta-data/instance-id";

/// Public documents known to query instance metadata and therefore
/// incompatible with managed instances as shipped.
fn incompatible_documents() -> &'static HashSet<&'static str> {
    static DOCS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    DOCS.get_or_init(|| {
        HashSet::from([
            "AWS-ConfigureWindowsUpdate",
            "AWS-FindWindowsUpdates",
            "AWS-InstallMissingWindowsUpdates",
            "AWS-InstallSpecificWindowsUpdates",
            "AWS-ListWindowsInventory",
        ])
    })
}

/// Production parser for send- and cancel-command messages.
#[derive(Debug, Clone)]
pub struct CommandMessageParser {
    identity: InstanceIdentity,
}

impl CommandMessageParser {
    pub fn new(identity: InstanceIdentity) -> Self {
        Self { identity }
    }
}

impl MessageParser for CommandMessageParser {
    fn parse_send_command(
        &self,
        msg: &MdsMessage,
        orchestration_root: &Path,
    ) -> Result<DocumentState, ParseError> {
        let message_id = MessageId::new(required(&msg.message_id, "MessageId")?);
        let destination = required(&msg.destination, "Destination")?.to_string();
        let payload = required(&msg.payload, "Payload")?;
        let command_id = CommandId::from_message_id(&message_id)
            .ok_or_else(|| ParseError::BadMessageId(message_id.to_string()))?;

        debug!(message_id = %message_id, "parsing send command message");
        let mut parsed: SendCommandPayload = serde_json::from_str(payload)?;

        if self.identity.managed_instance && incompatible_documents().contains(parsed.document_name.as_str())
        {
            debug!(
                document = %parsed.document_name,
                "rewriting instance metadata references for managed instance"
            );
            for entry in parsed.document_content.runtime_config.values_mut() {
                rewrite_metadata_references(&mut entry.properties, &self.identity.instance_id);
            }
        }

        let s3_key_prefix = join_key(&[
            &parsed.output_s3_key_prefix,
            &parsed.command_id,
            &destination,
        ]);
        let orchestration_dir = orchestration_root.join(command_id.as_str());

        let mut plugins = IndexMap::new();
        for (name, entry) in &parsed.document_content.runtime_config {
            let configuration = PluginConfig {
                settings: entry.settings.clone(),
                properties: entry.properties.clone(),
                output_s3_bucket_name: parsed.output_s3_bucket_name.clone(),
                output_s3_key_prefix: join_key(&[&s3_key_prefix, name]),
                orchestration_directory: orchestration_dir.join(name).display().to_string(),
                message_id: message_id.to_string(),
                book_keeping_file_name: command_id.to_string(),
                plugin_name: name.clone(),
            };
            plugins.insert(
                name.clone(),
                PluginState {
                    configuration,
                    has_executed: false,
                    result: PluginResult::default(),
                },
            );
        }

        Ok(DocumentState {
            document_type: DocumentType::SendCommand,
            info: DocumentInfo {
                command_id,
                message_id,
                document_name: parsed.document_name.clone(),
                destination,
                created_date: msg.created_date.clone().unwrap_or_default(),
                document_status: ResultStatus::InProgress,
                ..Default::default()
            },
            plugins,
            cancel: None,
        })
    }

    fn parse_cancel_command(&self, msg: &MdsMessage) -> Result<DocumentState, ParseError> {
        let message_id = MessageId::new(required(&msg.message_id, "MessageId")?);
        let destination = required(&msg.destination, "Destination")?.to_string();
        let payload = required(&msg.payload, "Payload")?;
        let command_id = CommandId::from_message_id(&message_id)
            .ok_or_else(|| ParseError::BadMessageId(message_id.to_string()))?;

        debug!(message_id = %message_id, "parsing cancel command message");
        let parsed: CancelPayload = serde_json::from_str(payload)?;

        let cancel_message_id = MessageId::new(parsed.cancel_message_id);
        let cancel_command_id = if parsed.cancel_command_id.is_empty() {
            CommandId::from_message_id(&cancel_message_id)
                .ok_or_else(|| ParseError::BadMessageId(cancel_message_id.to_string()))?
        } else {
            CommandId::new(parsed.cancel_command_id)
        };

        Ok(DocumentState {
            document_type: DocumentType::CancelCommand,
            info: DocumentInfo {
                command_id,
                message_id,
                destination,
                created_date: msg.created_date.clone().unwrap_or_default(),
                document_status: ResultStatus::InProgress,
                ..Default::default()
            },
            plugins: IndexMap::new(),
            cancel: Some(CancelInfo {
                cancel_message_id,
                cancel_command_id,
                debug_info: String::new(),
            }),
        })
    }
}

fn required<'a>(field: &'a Option<String>, name: &'static str) -> Result<&'a str, ParseError> {
    field
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(ParseError::MissingField(name))
}

/// Join non-empty segments with `/` (S3 key style).
fn join_key(segments: &[&str]) -> String {
    segments
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/")
}

/// Replace instance-metadata endpoint references anywhere in a plugin's
/// properties with the literal instance id.
fn rewrite_metadata_references(value: &mut Value, instance_id: &str) {
    match value {
        Value::String(s) => {
            if s.contains(INSTANCE_METADATA_INSTANCE_ID_URL) {
                *s = s.replace(INSTANCE_METADATA_INSTANCE_ID_URL, instance_id);
            }
        }
        Value::Array(items) => {
            for item in items {
                rewrite_metadata_references(item, instance_id);
            }
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                rewrite_metadata_references(item, instance_id);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
