// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake MDS transport for testing

use super::{FailureReason, MdsError, MdsService};
use async_trait::async_trait;
use drover_core::MessageId;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Recorded transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MdsCall {
    Acknowledge(MessageId),
    Fail(MessageId, FailureReason),
    Delete(MessageId),
}

struct FakeMdsState {
    calls: Vec<MdsCall>,
}

/// Fake MDS transport that records calls and supports error injection.
#[derive(Clone)]
pub struct FakeMdsService {
    inner: Arc<Mutex<FakeMdsState>>,
    fail_acknowledge: Arc<AtomicBool>,
    fail_delete: Arc<AtomicBool>,
}

impl Default for FakeMdsService {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeMdsState { calls: Vec::new() })),
            fail_acknowledge: Arc::new(AtomicBool::new(false)),
            fail_delete: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl FakeMdsService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<MdsCall> {
        self.inner.lock().calls.clone()
    }

    /// Recorded `Delete` calls for one message id
    pub fn deletes_of(&self, message_id: &MessageId) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, MdsCall::Delete(id) if id == message_id))
            .count()
    }

    pub fn set_fail_acknowledge(&self, fail: bool) {
        self.fail_acknowledge.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl MdsService for FakeMdsService {
    async fn acknowledge(&self, message_id: &MessageId) -> Result<(), MdsError> {
        if self.fail_acknowledge.load(Ordering::SeqCst) {
            return Err(MdsError::Transport("injected acknowledge failure".into()));
        }
        self.inner
            .lock()
            .calls
            .push(MdsCall::Acknowledge(message_id.clone()));
        Ok(())
    }

    async fn fail(&self, message_id: &MessageId, reason: FailureReason) -> Result<(), MdsError> {
        self.inner
            .lock()
            .calls
            .push(MdsCall::Fail(message_id.clone(), reason));
        Ok(())
    }

    async fn delete(&self, message_id: &MessageId) -> Result<(), MdsError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(MdsError::Transport("injected delete failure".into()));
        }
        self.inner
            .lock()
            .calls
            .push(MdsCall::Delete(message_id.clone()));
        Ok(())
    }
}
