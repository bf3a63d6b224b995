// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plugin runtime adapter

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePluginRunner, RunnerCall};

use crate::responder::Responder;
use async_trait::async_trait;
use drover_core::{CancelFlag, MessageId, PluginConfig, PluginOutputs};
use indexmap::IndexMap;

/// Adapter for the plugin runtime.
///
/// The runner executes `configurations` sequentially in map order and owns
/// durable per-plugin progress: after each plugin it persists the result and
/// the `has_executed` mark through the state store, then emits a
/// plugin-level reply via `responder`. It observes `cancel` between plugins
/// (and between discrete steps within a plugin) and stops executing once a
/// plugin reports that the host must reboot. Plugin-internal failures are
/// captured in the returned results, never surfaced as runner errors.
#[async_trait]
pub trait PluginRunner: Send + Sync + 'static {
    async fn run(
        &self,
        message_id: &MessageId,
        configurations: IndexMap<String, PluginConfig>,
        responder: &dyn Responder,
        cancel: CancelFlag,
    ) -> PluginOutputs;
}
