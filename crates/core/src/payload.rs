// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire payloads of send-command and cancel-command messages.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Parsed payload of a send-command message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendCommandPayload {
    pub command_id: String,
    pub document_name: String,
    pub document_content: DocumentContent,
    #[serde(default)]
    pub output_s3_bucket_name: String,
    #[serde(default)]
    pub output_s3_key_prefix: String,
    #[serde(default)]
    pub parameters: HashMap<String, Value>,
}

/// Command document body; `runtime_config` maps plugin name to its raw
/// configuration, in execution order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentContent {
    #[serde(default)]
    pub schema_version: String,
    #[serde(default)]
    pub description: String,
    pub runtime_config: IndexMap<String, RuntimeConfigEntry>,
}

/// Raw per-plugin section of a command document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfigEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    #[serde(default)]
    pub properties: Value,
}

/// Parsed payload of a cancel-command message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CancelPayload {
    pub cancel_message_id: String,
    #[serde(default)]
    pub cancel_command_id: String,
}

/// Configuration handed to the plugin runtime for one plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PluginConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    #[serde(default)]
    pub properties: Value,
    #[serde(default)]
    pub output_s3_bucket_name: String,
    #[serde(default)]
    pub output_s3_key_prefix: String,
    /// Working directory for this plugin's orchestration files.
    #[serde(default)]
    pub orchestration_directory: String,
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub book_keeping_file_name: String,
    #[serde(default)]
    pub plugin_name: String,
}
