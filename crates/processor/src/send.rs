// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Send-command executor.
//!
//! One path serves both fresh dispatch and recovery resume: plugins that
//! already executed are filtered out, then the document is finalized from
//! whatever the durable record says after the runner returns.

use crate::parser::MessageParser;
use crate::processor::Processor;
use drover_adapters::{MdsService, PluginRunner, ReplyBuilder, Responder};
use drover_core::{CancelFlag, DocumentState, ResultStatus, UPDATE_AGENT_PLUGIN_NAME};
use drover_store::Folder;
use tracing::{debug, error, info_span, Instrument};

impl<M, R, P, B, D> Processor<M, R, P, B, D>
where
    M: MdsService,
    R: PluginRunner,
    P: MessageParser,
    B: ReplyBuilder,
    D: Responder,
{
    pub(crate) async fn run_send_command(&self, doc: DocumentState, cancel: CancelFlag) {
        let message_id = doc.info.message_id.clone();
        let destination = doc.info.destination.clone();
        let span = info_span!("send_command", message_id = %message_id);

        async {
            let pending = doc.pending_plugin_configurations();
            let ran_update_plugin = pending.contains_key(UPDATE_AGENT_PLUGIN_NAME);

            if pending.is_empty() {
                debug!("all plugins already executed, finalizing");
            } else {
                debug!(plugins = ?pending.keys().collect::<Vec<_>>(), "running plugins");
                self.inner
                    .runner
                    .run(&message_id, pending, &self.inner.responder, cancel)
                    .await;
            }

            // The runner persisted per-plugin progress; the durable record
            // is the source of truth for the final reply.
            let current = match self
                .store()
                .interim_state(&destination, &message_id, Folder::Current)
            {
                Ok(doc) => doc,
                Err(e) => {
                    error!(error = %e, "failed to re-read interim state, aborting finalization");
                    return;
                }
            };
            let outputs = current.plugin_outputs();

            let reply = self.inner.reply_builder.build("", &outputs);
            let mut info = current.info.clone();
            info.additional_info = reply.additional_info;
            info.document_status = reply.document_status;
            info.document_trace_output = reply.document_trace_output;
            info.runtime_status = reply.runtime_status;

            if let Err(e) = self.store().persist_document_info(&info, Folder::Current) {
                error!(error = %e, "failed to persist final document info");
            }

            // A reboot keeps the record in `current` with no reply and no
            // deletion; the next boot's recovery pass resumes it.
            if info.document_status == ResultStatus::SuccessAndReboot {
                debug!("document requires a reboot, holding reply until resume");
                return;
            }

            debug!(status = %info.document_status, "sending reply on message completion");
            self.inner.responder.send(&message_id, "", &outputs);

            if let Err(e) =
                self.store()
                    .move_state(&destination, &message_id, Folder::Current, Folder::Completed)
            {
                error!(error = %e, "failed to move record to completed");
            }

            if ran_update_plugin {
                debug!("message deletion left to the agent updater");
            } else {
                match self.inner.mds.delete(&message_id).await {
                    Ok(()) => self.inner.stop_policy.record_success(),
                    Err(e) => self.handle_mds_error(e),
                }
            }
        }
        .instrument(span)
        .await
    }
}
