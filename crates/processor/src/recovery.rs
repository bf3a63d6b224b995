// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup recovery: resubmit work persisted by a previous run.
//!
//! Runs once, before the ingress dispatcher accepts new work, so recovery
//! resubmits never race fresh submissions for the same message id.

use crate::parser::MessageParser;
use crate::processor::Processor;
use drover_adapters::{MdsService, PluginRunner, ReplyBuilder, Responder};
use drover_core::{DocumentState, MessageId, PluginOutputs, ResultStatus};
use drover_store::Folder;
use std::collections::HashSet;
use tracing::{debug, error, info};

impl<M, R, P, B, D> Processor<M, R, P, B, D>
where
    M: MdsService,
    R: PluginRunner,
    P: MessageParser,
    B: ReplyBuilder,
    D: Responder,
{
    /// Rehydrate documents left in `pending` and `current` by a previous
    /// run of the agent.
    pub async fn recover_saved_work(&self) {
        info!("processing messages persisted from a previous run");
        let submitted = self.recover_pending().await;
        self.recover_current(&submitted).await;
    }

    /// Documents that were acked but never started. Returns the ids handed
    /// to a pool, so the current pass won't re-process records that just
    /// moved to `current`.
    async fn recover_pending(&self) -> HashSet<String> {
        let mut submitted = HashSet::new();
        let instance_id = self.config().identity.instance_id.clone();
        let names = match self.store().list(&instance_id, Folder::Pending) {
            Ok(names) => names,
            Err(e) => {
                error!(error = %e, "failed to read pending folder, skipping pass");
                return submitted;
            }
        };
        if names.is_empty() {
            debug!("no pending messages to process");
            return submitted;
        }

        for name in names {
            debug!(message_id = %name, "processing an older pending message");
            let message_id = MessageId::new(name);
            let doc = match self
                .store()
                .interim_state(&instance_id, &message_id, Folder::Pending)
            {
                Ok(doc) => doc,
                Err(e) => {
                    error!(error = %e, message_id = %message_id, "skipping unreadable pending record");
                    continue;
                }
            };

            // Association records belong to the association processor; it
            // owns the remainder of this pass.
            if doc.is_association() {
                break;
            }

            if let Err(e) = self.submit_for_execution(doc).await {
                error!(error = %e, "submit failed, aborting pending recovery pass");
                break;
            }
            submitted.insert(message_id.to_string());
        }
        submitted
    }

    /// Documents that were mid-execution when the process died.
    async fn recover_current(&self, already_submitted: &HashSet<String>) {
        let instance_id = self.config().identity.instance_id.clone();
        let retry_limit = self.config().command_retry_limit;
        let names = match self.store().list(&instance_id, Folder::Current) {
            Ok(names) => names,
            Err(e) => {
                error!(error = %e, "failed to read current folder, skipping pass");
                return;
            }
        };
        if names.is_empty() {
            debug!("no in-progress messages to process");
            return;
        }

        for name in names {
            if already_submitted.contains(&name) {
                debug!(message_id = %name, "submitted by the pending pass, skipping");
                continue;
            }
            debug!(message_id = %name, "processing a previously unexecuted message");
            let message_id = MessageId::new(name);
            let mut doc = match self
                .store()
                .interim_state(&instance_id, &message_id, Folder::Current)
            {
                Ok(doc) => doc,
                Err(e) => {
                    error!(error = %e, message_id = %message_id, "skipping unreadable in-progress record");
                    continue;
                }
            };

            if doc.is_association() {
                break;
            }

            if doc.info.run_count >= retry_limit {
                debug!(
                    message_id = %message_id,
                    run_count = doc.info.run_count,
                    "retry limit reached, skipping poisoned document"
                );
                continue;
            }
            doc.info.run_count += 1;

            self.resume_rebooted_plugins(&mut doc);

            if let Err(e) = self.store().persist(&doc, Folder::Current) {
                error!(error = %e, message_id = %message_id, "failed to persist resumed record, skipping");
                continue;
            }

            let processor = self.clone();
            let resumed = doc.clone();
            let submitted = self
                .inner
                .send_pool
                .submit(
                    message_id.as_str(),
                    Box::new(move |cancel| {
                        Box::pin(async move { processor.run_send_command(resumed, cancel).await })
                    }),
                )
                .await;
            if let Err(e) = submitted {
                error!(error = %e, "resume submit failed, aborting current recovery pass");
                break;
            }
        }
    }

    /// Reboot resume: plugins whose reboot completed are re-stamped to
    /// `Success`, each with a plugin-level reply so the service learns the
    /// reboot finished before execution continues.
    fn resume_rebooted_plugins(&self, doc: &mut DocumentState) {
        let message_id = doc.info.message_id.clone();
        let mut outputs = PluginOutputs::new();
        for (name, plugin) in doc.plugins.iter_mut() {
            if plugin.has_executed && plugin.result.status == ResultStatus::SuccessAndReboot {
                debug!(plugin = %name, "plugin completed a reboot, setting status to Success");
                plugin.result.status = ResultStatus::Success;
                outputs.insert(name.clone(), plugin.result.clone());
                self.inner.responder.send(&message_id, name, &outputs);
            }
        }
    }
}
