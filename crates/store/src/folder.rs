// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle folders of the command state tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three on-disk lifecycle folders. A message id exists in at most one
/// of them at any time; `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Folder {
    /// Accepted and parsed, not yet started.
    Pending,
    /// Owned by a pool worker (or abandoned by a crash, awaiting recovery).
    Current,
    /// Finished; never re-executed.
    Completed,
}

impl Folder {
    /// Directory name under `<instance>/<command-root>/state/`.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Folder::Pending => "pending",
            Folder::Current => "current",
            Folder::Completed => "completed",
        }
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}
