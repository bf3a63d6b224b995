// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message delivery service transport adapter

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeMdsService, MdsCall};

use async_trait::async_trait;
use drover_core::MessageId;
use std::fmt;
use thiserror::Error;

/// Errors from MDS transport operations
#[derive(Debug, Error)]
pub enum MdsError {
    #[error("transport error: {0}")]
    Transport(String),
}

/// Reason reported when a message is failed back to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    InternalHandlerException,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::InternalHandlerException => write!(f, "InternalHandlerException"),
        }
    }
}

/// Raw message pulled from the delivery service. Fields arrive optional on
/// the wire; the dispatcher validates presence before routing.
#[derive(Debug, Clone, Default)]
pub struct MdsMessage {
    pub message_id: Option<String>,
    pub topic: Option<String>,
    pub payload: Option<String>,
    pub destination: Option<String>,
    pub created_date: Option<String>,
}

/// Adapter for the cloud message-delivery service.
///
/// The transport client behind this trait is shared across workers and must
/// be internally thread-safe.
#[async_trait]
pub trait MdsService: Send + Sync + 'static {
    /// Claim ownership of a delivered message.
    async fn acknowledge(&self, message_id: &MessageId) -> Result<(), MdsError>;

    /// Report a message the processor cannot handle.
    async fn fail(&self, message_id: &MessageId, reason: FailureReason) -> Result<(), MdsError>;

    /// Terminal deletion; at most once per message.
    async fn delete(&self, message_id: &MessageId) -> Result<(), MdsError>;
}
