// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake plugin runner for testing

use super::PluginRunner;
use crate::responder::Responder;
use async_trait::async_trait;
use drover_core::{CancelFlag, MessageId, PluginConfig, PluginOutputs, PluginResult, ResultStatus};
use drover_store::{CommandStore, Folder};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;

/// Recorded `run` invocation
#[derive(Debug, Clone)]
pub struct RunnerCall {
    pub message_id: MessageId,
    pub plugin_names: Vec<String>,
}

struct Gate {
    plugin: String,
    reached: Arc<Notify>,
    release: Arc<Notify>,
}

struct FakeRunnerState {
    results: Mutex<HashMap<String, PluginResult>>,
    calls: Mutex<Vec<RunnerCall>>,
    gate: Mutex<Option<Gate>>,
}

/// Fake plugin runner honoring the real runner's contract: sequential
/// execution in map order, per-plugin durable progress through the store,
/// plugin-level replies, cooperative cancellation, stop-on-reboot.
#[derive(Clone)]
pub struct FakePluginRunner {
    store: Arc<CommandStore>,
    destination: String,
    inner: Arc<FakeRunnerState>,
}

impl FakePluginRunner {
    pub fn new(store: Arc<CommandStore>, destination: impl Into<String>) -> Self {
        Self {
            store,
            destination: destination.into(),
            inner: Arc::new(FakeRunnerState {
                results: Mutex::new(HashMap::new()),
                calls: Mutex::new(Vec::new()),
                gate: Mutex::new(None),
            }),
        }
    }

    /// Script the result of one plugin; unscripted plugins succeed.
    pub fn set_result(&self, plugin_name: impl Into<String>, result: PluginResult) {
        self.inner.results.lock().insert(plugin_name.into(), result);
    }

    /// Pause before executing `plugin_name`. Returns `(reached, release)`:
    /// the runner signals `reached` when it arrives at the plugin and waits
    /// for `release` before continuing.
    pub fn pause_at(&self, plugin_name: impl Into<String>) -> (Arc<Notify>, Arc<Notify>) {
        let reached = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        *self.inner.gate.lock() = Some(Gate {
            plugin: plugin_name.into(),
            reached: reached.clone(),
            release: release.clone(),
        });
        (reached, release)
    }

    /// Get all recorded invocations
    pub fn calls(&self) -> Vec<RunnerCall> {
        self.inner.calls.lock().clone()
    }

    fn result_for(&self, plugin_name: &str) -> PluginResult {
        self.inner
            .results
            .lock()
            .get(plugin_name)
            .cloned()
            .unwrap_or_else(|| PluginResult {
                status: ResultStatus::Success,
                code: 0,
                output: format!("{plugin_name} ok"),
            })
    }

    fn persist_progress(&self, message_id: &MessageId, plugin_name: &str, result: &PluginResult) {
        if let Ok(mut doc) =
            self.store
                .interim_state(&self.destination, message_id, Folder::Current)
        {
            if let Some(slot) = doc.plugins.get_mut(plugin_name) {
                slot.result = result.clone();
                slot.has_executed = true;
            }
            let _ = self.store.persist(&doc, Folder::Current);
        }
    }
}

#[async_trait]
impl PluginRunner for FakePluginRunner {
    async fn run(
        &self,
        message_id: &MessageId,
        configurations: IndexMap<String, PluginConfig>,
        responder: &dyn Responder,
        cancel: CancelFlag,
    ) -> PluginOutputs {
        self.inner.calls.lock().push(RunnerCall {
            message_id: message_id.clone(),
            plugin_names: configurations.keys().cloned().collect(),
        });

        let mut outputs = PluginOutputs::new();
        for name in configurations.keys() {
            let gate = {
                let guard = self.inner.gate.lock();
                guard
                    .as_ref()
                    .filter(|g| g.plugin == *name)
                    .map(|g| (g.reached.clone(), g.release.clone()))
            };
            if let Some((reached, release)) = gate {
                reached.notify_one();
                release.notified().await;
            }

            let result = if cancel.is_cancelled() {
                PluginResult {
                    status: ResultStatus::Cancelled,
                    code: 1,
                    output: "execution cancelled".to_string(),
                }
            } else {
                self.result_for(name)
            };

            self.persist_progress(message_id, name, &result);
            outputs.insert(name.clone(), result.clone());
            responder.send(message_id, name, &outputs);

            if result.status == ResultStatus::SuccessAndReboot {
                break;
            }
        }
        outputs
    }
}
