// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reply emission adapter.
//!
//! The processor reports progress through a `Responder`: one call per
//! completed plugin (plugin name set) and exactly one document-level call at
//! the end of the lifecycle (plugin name empty). `send_status` carries the
//! accept-time `InProgress` signal before any plugin has run.

use drover_core::{MessageId, PluginOutputs, ResultStatus};

/// Adapter for emitting replies back to the service.
pub trait Responder: Send + Sync + 'static {
    /// Plugin-level (non-empty `plugin_name`) or document-level completion
    /// reply carrying the outputs accumulated so far.
    fn send(&self, message_id: &MessageId, plugin_name: &str, outputs: &PluginOutputs);

    /// Document-level status-only reply.
    fn send_status(&self, message_id: &MessageId, status: ResultStatus);
}

/// Responder that drops every reply. Placeholder wiring for contexts that
/// report through another channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpResponder;

impl Responder for NoOpResponder {
    fn send(&self, _message_id: &MessageId, _plugin_name: &str, _outputs: &PluginOutputs) {}

    fn send_status(&self, _message_id: &MessageId, _status: ResultStatus) {}
}

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::Responder;
    use drover_core::{MessageId, PluginOutputs, ResultStatus};
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Recorded `send` call
    #[derive(Debug, Clone)]
    pub struct ReplyCall {
        pub message_id: MessageId,
        /// Empty for document-level replies.
        pub plugin_name: String,
        pub outputs: PluginOutputs,
    }

    /// Recorded `send_status` call
    #[derive(Debug, Clone)]
    pub struct StatusCall {
        pub message_id: MessageId,
        pub status: ResultStatus,
    }

    #[derive(Default)]
    struct FakeResponderState {
        replies: Vec<ReplyCall>,
        statuses: Vec<StatusCall>,
    }

    /// Fake responder recording every emitted reply.
    #[derive(Clone, Default)]
    pub struct FakeResponder {
        inner: Arc<Mutex<FakeResponderState>>,
    }

    impl FakeResponder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn replies(&self) -> Vec<ReplyCall> {
            self.inner.lock().replies.clone()
        }

        /// Document-level completion replies for one message id.
        pub fn document_replies_of(&self, message_id: &MessageId) -> Vec<ReplyCall> {
            self.inner
                .lock()
                .replies
                .iter()
                .filter(|c| c.plugin_name.is_empty() && &c.message_id == message_id)
                .cloned()
                .collect()
        }

        pub fn statuses(&self) -> Vec<StatusCall> {
            self.inner.lock().statuses.clone()
        }
    }

    impl Responder for FakeResponder {
        fn send(&self, message_id: &MessageId, plugin_name: &str, outputs: &PluginOutputs) {
            self.inner.lock().replies.push(ReplyCall {
                message_id: message_id.clone(),
                plugin_name: plugin_name.to_string(),
                outputs: outputs.clone(),
            });
        }

        fn send_status(&self, message_id: &MessageId, status: ResultStatus) {
            self.inner.lock().statuses.push(StatusCall {
                message_id: message_id.clone(),
                status,
            });
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeResponder, ReplyCall, StatusCall};
