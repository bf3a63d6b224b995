// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ingress dispatcher: one delivered message through validate → parse →
//! persist → ack → report → dispatch.

use crate::parser::{MessageParser, ParseError};
use crate::pool::PoolError;
use crate::processor::Processor;
use drover_adapters::{FailureReason, MdsMessage, MdsService, PluginRunner, ReplyBuilder, Responder};
use drover_core::{DocumentState, DocumentType, MessageId, ResultStatus};
use drover_store::Folder;
use tracing::{debug, error, info_span, Instrument};

/// Topic prefix of send-command messages.
pub const SEND_COMMAND_TOPIC_PREFIX: &str = "aws.ssm.sendCommand.";
/// Topic prefix of cancel-command messages.
pub const CANCEL_COMMAND_TOPIC_PREFIX: &str = "aws.ssm.cancelCommand.";

struct ValidMessage<'a> {
    message_id: &'a str,
    topic: &'a str,
}

/// Structural validation. An invalid message is ignored without a fail
/// call; the service redelivers it.
fn validate(msg: &MdsMessage) -> Result<ValidMessage<'_>, ParseError> {
    let message_id = present(&msg.message_id, "MessageId")?;
    let topic = present(&msg.topic, "Topic")?;
    present(&msg.payload, "Payload")?;
    present(&msg.destination, "Destination")?;
    Ok(ValidMessage { message_id, topic })
}

fn present<'a>(field: &'a Option<String>, name: &'static str) -> Result<&'a str, ParseError> {
    field
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(ParseError::MissingField(name))
}

impl<M, R, P, B, D> Processor<M, R, P, B, D>
where
    M: MdsService,
    R: PluginRunner,
    P: MessageParser,
    B: ReplyBuilder,
    D: Responder,
{
    /// Handle one message pulled from MDS. Safe to call concurrently for
    /// distinct message ids.
    pub async fn process_message(&self, msg: &MdsMessage) {
        let valid = match validate(msg) {
            Ok(v) => v,
            Err(e) => {
                error!(error = %e, "message not valid, ignoring");
                return;
            }
        };
        let message_id = MessageId::new(valid.message_id);
        let span = info_span!("message", message_id = %message_id);

        async {
            let parsed = if valid.topic.starts_with(SEND_COMMAND_TOPIC_PREFIX) {
                self.inner
                    .parser
                    .parse_send_command(msg, &self.inner.config.orchestration_root)
            } else if valid.topic.starts_with(CANCEL_COMMAND_TOPIC_PREFIX) {
                self.inner.parser.parse_cancel_command(msg)
            } else {
                Err(ParseError::UnexpectedTopic(valid.topic.to_string()))
            };

            let doc = match parsed {
                Ok(doc) => doc,
                Err(e) => {
                    error!(error = %e, "received message has invalid format");
                    self.fail_message(&message_id, FailureReason::InternalHandlerException)
                        .await;
                    return;
                }
            };

            if let Err(e) = self.store().persist(&doc, Folder::Pending) {
                error!(error = %e, "failed to persist accepted message, leaving it for redelivery");
                return;
            }

            if let Err(e) = self.inner.mds.acknowledge(&message_id).await {
                self.handle_mds_error(e);
                return;
            }
            self.inner.stop_policy.record_success();
            debug!("message acknowledged");

            self.inner
                .responder
                .send_status(&message_id, ResultStatus::InProgress);

            if let Err(e) = self.submit_for_execution(doc).await {
                error!(error = %e, "failed to submit document for execution");
            }
        }
        .instrument(span)
        .await
    }

    /// Move a parsed document to `current` and hand it to the pool matching
    /// its type.
    pub(crate) async fn submit_for_execution(
        &self,
        doc: DocumentState,
    ) -> Result<(), PoolError> {
        let message_id = doc.info.message_id.clone();
        if let Err(e) = self.store().move_state(
            &doc.info.destination,
            &message_id,
            Folder::Pending,
            Folder::Current,
        ) {
            error!(error = %e, message_id = %message_id, "failed to move record to current, skipping document");
            return Ok(());
        }

        match doc.document_type {
            DocumentType::SendCommand => {
                let processor = self.clone();
                self.inner
                    .send_pool
                    .submit(
                        message_id.as_str(),
                        Box::new(move |cancel| {
                            Box::pin(async move { processor.run_send_command(doc, cancel).await })
                        }),
                    )
                    .await
            }
            DocumentType::CancelCommand => {
                let processor = self.clone();
                self.inner
                    .cancel_pool
                    .submit(
                        message_id.as_str(),
                        Box::new(move |_cancel| {
                            Box::pin(async move { processor.run_cancel_command(doc).await })
                        }),
                    )
                    .await
            }
            DocumentType::Association => {
                error!(message_id = %message_id, "unexpected document type, dropping");
                Ok(())
            }
        }
    }
}
