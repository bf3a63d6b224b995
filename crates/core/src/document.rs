// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted command document state.
//!
//! `DocumentState` is the single unit of persistence and scheduling: one
//! record per delivered message, serialized as UTF-8 JSON in exactly one
//! lifecycle folder at a time.

use crate::id::{CommandId, MessageId};
use crate::payload::PluginConfig;
use crate::reply::PluginRuntimeStatus;
use crate::status::{DocumentType, ResultStatus};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Document-level fields of a command record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DocumentInfo {
    pub command_id: CommandId,
    pub message_id: MessageId,
    #[serde(default)]
    pub document_name: String,
    /// Target instance identifier.
    pub destination: String,
    #[serde(default)]
    pub created_date: String,
    pub document_status: ResultStatus,
    /// Incremented each time recovery re-attempts this document.
    #[serde(default)]
    pub run_count: u32,
    #[serde(default)]
    pub additional_info: crate::reply::AdditionalInfo,
    #[serde(default)]
    pub document_trace_output: String,
    #[serde(default)]
    pub runtime_status: IndexMap<String, PluginRuntimeStatus>,
}

/// Result of a single plugin execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PluginResult {
    #[serde(default)]
    pub status: ResultStatus,
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub output: String,
}

/// Per-plugin slot of a command record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PluginState {
    pub configuration: PluginConfig,
    #[serde(default)]
    pub has_executed: bool,
    #[serde(default)]
    pub result: PluginResult,
}

/// Cancellation details carried by cancel-command documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CancelInfo {
    pub cancel_message_id: MessageId,
    pub cancel_command_id: CommandId,
    #[serde(default)]
    pub debug_info: String,
}

/// A command document on its way through the lifecycle folders.
///
/// Plugin insertion order in `plugins` defines execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DocumentState {
    pub document_type: DocumentType,
    #[serde(rename = "DocumentInformation")]
    pub info: DocumentInfo,
    #[serde(rename = "PluginsInformation", default)]
    pub plugins: IndexMap<String, PluginState>,
    #[serde(
        rename = "CancelInformation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cancel: Option<CancelInfo>,
}

impl DocumentState {
    /// Whether this record belongs to the association processor.
    pub fn is_association(&self) -> bool {
        self.document_type == DocumentType::Association
    }

    /// Configurations of plugins that have not executed yet, in order.
    pub fn pending_plugin_configurations(&self) -> IndexMap<String, PluginConfig> {
        self.plugins
            .iter()
            .filter(|(_, state)| !state.has_executed)
            .map(|(name, state)| (name.clone(), state.configuration.clone()))
            .collect()
    }

    /// Results of every plugin slot, in order.
    pub fn plugin_outputs(&self) -> crate::reply::PluginOutputs {
        self.plugins
            .iter()
            .map(|(name, state)| (name.clone(), state.result.clone()))
            .collect()
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
