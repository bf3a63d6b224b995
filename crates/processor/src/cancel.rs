// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cancel-command executor.

use crate::parser::MessageParser;
use crate::processor::Processor;
use drover_adapters::{MdsService, PluginRunner, ReplyBuilder, Responder};
use drover_core::{DocumentState, ResultStatus};
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
    pub(crate) async fn run_cancel_command(&self, mut doc: DocumentState) {
        let message_id = doc.info.message_id.clone();
        let span = info_span!("cancel_command", message_id = %message_id);

        async {
            let Some(cancel) = doc.cancel.clone() else {
                error!("cancel document without cancel information, dropping");
                return;
            };

            debug!(cancel_target = %cancel.cancel_message_id, "cancelling command");
            let found = self.inner.send_pool.cancel(cancel.cancel_message_id.as_str());

            let debug_info = if found {
                doc.info.document_status = ResultStatus::Success;
                format!("Command {} cancelled", cancel.cancel_command_id)
            } else {
                // Cancel arrived after the target already completed.
                debug!(cancel_target = %cancel.cancel_message_id, "command not found (possibly completed)");
                doc.info.document_status = ResultStatus::Failed;
                format!("Command {} couldn't be cancelled", cancel.cancel_command_id)
            };
            if let Some(info) = doc.cancel.as_mut() {
                info.debug_info = debug_info;
            }

            if let Err(e) = self.store().persist(&doc, Folder::Current) {
                error!(error = %e, "failed to persist cancel outcome");
            }
            if let Err(e) = self.store().move_state(
                &doc.info.destination,
                &message_id,
                Folder::Current,
                Folder::Completed,
            ) {
                error!(error = %e, "failed to move record to completed");
            }

            match self.inner.mds.delete(&message_id).await {
                Ok(()) => self.inner.stop_policy.record_success(),
                Err(e) => self.handle_mds_error(e),
            }
        }
        .instrument(span)
        .await
    }
}
