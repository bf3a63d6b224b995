// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Document and plugin result statuses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a persisted command document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    SendCommand,
    CancelCommand,
    /// Recurring-command documents owned by the association processor.
    /// Never dispatched here; the recovery scanner recognizes and avoids them.
    Association,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::SendCommand => write!(f, "SendCommand"),
            DocumentType::CancelCommand => write!(f, "CancelCommand"),
            DocumentType::Association => write!(f, "Association"),
        }
    }
}

/// Execution status of a document or a single plugin.
///
/// `SuccessAndReboot` is terminal-for-now: the host must reboot before
/// execution continues, and the record stays in the `current` folder until
/// the post-reboot recovery pass resumes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultStatus {
    #[default]
    Pending,
    InProgress,
    Success,
    SuccessAndReboot,
    Failed,
    Cancelled,
    TimedOut,
}

impl ResultStatus {
    /// Whether this status reflects a plugin that has actually run.
    pub fn is_executed(&self) -> bool {
        !matches!(self, ResultStatus::Pending | ResultStatus::InProgress)
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultStatus::Pending => write!(f, "Pending"),
            ResultStatus::InProgress => write!(f, "InProgress"),
            ResultStatus::Success => write!(f, "Success"),
            ResultStatus::SuccessAndReboot => write!(f, "SuccessAndReboot"),
            ResultStatus::Failed => write!(f, "Failed"),
            ResultStatus::Cancelled => write!(f, "Cancelled"),
            ResultStatus::TimedOut => write!(f, "TimedOut"),
        }
    }
}
