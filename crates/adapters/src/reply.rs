// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reply envelope builder.

use chrono::Utc;
use drover_core::{AdditionalInfo, PluginOutputs, PluginRuntimeStatus, Reply, ResultStatus};
use std::collections::HashMap;

/// Adapter producing the reply envelope for plugin-level (non-empty name)
/// and document-level (empty name) reports. The wire schema is owned by the
/// implementation; the processor only consumes the document-level fields.
pub trait ReplyBuilder: Send + Sync + 'static {
    fn build(&self, plugin_name: &str, outputs: &PluginOutputs) -> Reply;
}

/// Default builder: aggregates plugin results into a document status and
/// per-status counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateReplyBuilder;

impl ReplyBuilder for AggregateReplyBuilder {
    fn build(&self, _plugin_name: &str, outputs: &PluginOutputs) -> Reply {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for result in outputs.values() {
            *counts.entry(result.status.to_string()).or_default() += 1;
        }

        let runtime_status = outputs
            .iter()
            .map(|(name, result)| (name.clone(), PluginRuntimeStatus::from(result)))
            .collect();

        Reply {
            additional_info: AdditionalInfo {
                date_time: Utc::now().to_rfc3339(),
                runtime_status_counts: counts,
            },
            document_status: aggregate_status(outputs),
            document_trace_output: String::new(),
            runtime_status,
        }
    }
}

/// Fold plugin results into one document status. Results of plugins that
/// never ran don't participate; a document with nothing executed reads as
/// vacuously successful.
fn aggregate_status(outputs: &PluginOutputs) -> ResultStatus {
    let mut status = ResultStatus::Success;
    for result in outputs.values().filter(|r| r.status.is_executed()) {
        status = match (status, result.status) {
            (_, ResultStatus::Failed) | (ResultStatus::Failed, _) => ResultStatus::Failed,
            (_, ResultStatus::TimedOut) | (ResultStatus::TimedOut, _) => ResultStatus::TimedOut,
            (_, ResultStatus::Cancelled) | (ResultStatus::Cancelled, _) => ResultStatus::Cancelled,
            (_, ResultStatus::SuccessAndReboot) | (ResultStatus::SuccessAndReboot, _) => {
                ResultStatus::SuccessAndReboot
            }
            _ => ResultStatus::Success,
        };
    }
    status
}

#[cfg(test)]
#[path = "reply_tests.rs"]
mod tests;
