// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Document-level reply material.
//!
//! The wire schema of reply envelopes is owned by the reply builder; these
//! types model only the fields the processor persists back into the record.

use crate::document::PluginResult;
use crate::status::ResultStatus;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordered plugin-name to result mapping reported in replies.
pub type PluginOutputs = IndexMap<String, PluginResult>;

/// Reporting metadata attached to a document-level reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdditionalInfo {
    #[serde(default)]
    pub date_time: String,
    #[serde(default)]
    pub runtime_status_counts: HashMap<String, u32>,
}

/// Per-plugin slice of a reply's runtime status section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PluginRuntimeStatus {
    #[serde(default)]
    pub status: ResultStatus,
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub output: String,
}

impl From<&PluginResult> for PluginRuntimeStatus {
    fn from(result: &PluginResult) -> Self {
        Self {
            status: result.status,
            code: result.code,
            output: result.output.clone(),
        }
    }
}

/// Document-level fields produced by the reply builder. The executor copies
/// them into `DocumentInfo` before deciding how the lifecycle ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    pub additional_info: AdditionalInfo,
    pub document_status: ResultStatus,
    pub document_trace_output: String,
    pub runtime_status: IndexMap<String, PluginRuntimeStatus>,
}
