// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Processor facade wiring the pools, the store, and the adapters.

use crate::parser::MessageParser;
use crate::pool::TaskPool;
use crate::stop_policy::StopPolicy;
use drover_adapters::{FailureReason, MdsError, MdsService, PluginRunner, ReplyBuilder, Responder};
use drover_core::{MessageId, ProcessorConfig};
use drover_store::CommandStore;
use std::sync::Arc;
use tracing::error;

/// Adapter bundle for constructing a [`Processor`].
pub struct ProcessorDeps<M, R, P, B, D> {
    pub mds: M,
    pub runner: R,
    pub parser: P,
    pub reply_builder: B,
    pub responder: D,
    pub store: Arc<CommandStore>,
}

pub(crate) struct Inner<M, R, P, B, D> {
    pub(crate) config: ProcessorConfig,
    pub(crate) mds: M,
    pub(crate) runner: R,
    pub(crate) parser: P,
    pub(crate) reply_builder: B,
    pub(crate) responder: D,
    pub(crate) store: Arc<CommandStore>,
    pub(crate) send_pool: TaskPool,
    pub(crate) cancel_pool: TaskPool,
    pub(crate) stop_policy: StopPolicy,
}

/// The command dispatch core.
///
/// Cheap to clone; pool jobs capture a clone to drive their document's
/// lifecycle. Construct inside a tokio runtime (worker tasks spawn
/// immediately), call [`recover_saved_work`](Processor::recover_saved_work)
/// once, then feed messages through
/// [`process_message`](Processor::process_message).
pub struct Processor<M, R, P, B, D> {
    pub(crate) inner: Arc<Inner<M, R, P, B, D>>,
}

impl<M, R, P, B, D> Clone for Processor<M, R, P, B, D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<M, R, P, B, D> Processor<M, R, P, B, D>
where
    M: MdsService,
    R: PluginRunner,
    P: MessageParser,
    B: ReplyBuilder,
    D: Responder,
{
    pub fn new(config: ProcessorConfig, deps: ProcessorDeps<M, R, P, B, D>) -> Self {
        let send_pool = TaskPool::new("send-command", config.send_workers, config.submit_timeout);
        let cancel_pool = TaskPool::new(
            "cancel-command",
            config.cancel_workers,
            config.submit_timeout,
        );
        let stop_policy = StopPolicy::new(config.stop_policy_threshold);

        Self {
            inner: Arc::new(Inner {
                config,
                mds: deps.mds,
                runner: deps.runner,
                parser: deps.parser,
                reply_builder: deps.reply_builder,
                responder: deps.responder,
                store: deps.store,
                send_pool,
                cancel_pool,
                stop_policy,
            }),
        }
    }

    pub(crate) fn store(&self) -> &CommandStore {
        &self.inner.store
    }

    pub(crate) fn config(&self) -> &ProcessorConfig {
        &self.inner.config
    }

    /// Whether the MDS stop policy still allows polling.
    pub fn is_healthy(&self) -> bool {
        self.inner.stop_policy.is_healthy()
    }

    /// Close both pools and wait for in-flight documents to finish.
    pub async fn shutdown(&self) {
        self.inner.send_pool.shutdown().await;
        self.inner.cancel_pool.shutdown().await;
    }

    /// Route an MDS transport error through the stop policy.
    pub(crate) fn handle_mds_error(&self, err: MdsError) {
        let errors = self.inner.stop_policy.record_error();
        error!(error = %err, consecutive_errors = errors, "MDS transport error");
    }

    /// Fail a message back to the service, tracking transport health.
    pub(crate) async fn fail_message(&self, message_id: &MessageId, reason: FailureReason) {
        match self.inner.mds.fail(message_id, reason).await {
            Ok(()) => self.inner.stop_policy.record_success(),
            Err(e) => self.handle_mds_error(e),
        }
    }
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
