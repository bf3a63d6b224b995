// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem-backed repository of per-command document records.
//!
//! Layout (exact):
//!
//! ```text
//! <data_root>/<instance_id>/document/state/{pending|current|completed}/<message_id>
//! ```
//!
//! Every write is crash-safe: serialize to a sibling temp file, sync, then
//! rename over the destination. Moves between folders are single renames.
//! The store is the exclusive owner of these files; executors work on
//! snapshot copies and route every update back through this API.

use crate::folder::Folder;
use drover_core::{DocumentInfo, DocumentState, MessageId};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Directory name of the command subtree under the instance root.
const COMMAND_ROOT_DIR: &str = "document";
/// Directory name holding the lifecycle folders.
const STATE_DIR: &str = "state";

/// Errors from state store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no record for {message_id} in {folder}")]
    NotFound { message_id: String, folder: Folder },
}

/// Repository of `DocumentState` records, one JSON file per message id.
#[derive(Debug, Clone)]
pub struct CommandStore {
    data_root: PathBuf,
}

impl CommandStore {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
        }
    }

    fn folder_path(&self, destination: &str, folder: Folder) -> PathBuf {
        self.data_root
            .join(destination)
            .join(COMMAND_ROOT_DIR)
            .join(STATE_DIR)
            .join(folder.dir_name())
    }

    fn record_path(&self, destination: &str, message_id: &MessageId, folder: Folder) -> PathBuf {
        self.folder_path(destination, folder).join(message_id.as_str())
    }

    /// Write or overwrite the record for `doc` in `folder`.
    pub fn persist(&self, doc: &DocumentState, folder: Folder) -> Result<(), StoreError> {
        let path = self.record_path(&doc.info.destination, &doc.info.message_id, folder);
        atomic_write(&path, doc)
    }

    /// Merge document-level fields into the existing record without
    /// disturbing its plugin states. The record must already exist.
    pub fn persist_document_info(
        &self,
        info: &DocumentInfo,
        folder: Folder,
    ) -> Result<(), StoreError> {
        let mut doc = self.interim_state(&info.destination, &info.message_id, folder)?;
        doc.info = info.clone();
        self.persist(&doc, folder)
    }

    /// Read back the current on-disk record.
    pub fn interim_state(
        &self,
        destination: &str,
        message_id: &MessageId,
        folder: Folder,
    ) -> Result<DocumentState, StoreError> {
        let path = self.record_path(destination, message_id, folder);
        let file = File::open(&path).map_err(|e| not_found(e, message_id, folder))?;
        let doc = serde_json::from_reader(BufReader::new(file))?;
        Ok(doc)
    }

    /// Read only the document-level fields of a record.
    pub fn document_info(
        &self,
        destination: &str,
        message_id: &MessageId,
        folder: Folder,
    ) -> Result<DocumentInfo, StoreError> {
        Ok(self.interim_state(destination, message_id, folder)?.info)
    }

    /// Atomically move a record between lifecycle folders.
    pub fn move_state(
        &self,
        destination: &str,
        message_id: &MessageId,
        from: Folder,
        to: Folder,
    ) -> Result<(), StoreError> {
        let source = self.record_path(destination, message_id, from);
        if !source.exists() {
            return Err(StoreError::NotFound {
                message_id: message_id.to_string(),
                folder: from,
            });
        }
        let target = self.record_path(destination, message_id, to);
        fs::create_dir_all(self.folder_path(destination, to))?;
        fs::rename(&source, &target)?;
        Ok(())
    }

    /// Sorted message ids present in `folder`. A missing folder reads as
    /// empty; stale temp files from interrupted writes are not listed.
    pub fn list(&self, destination: &str, folder: Folder) -> Result<Vec<String>, StoreError> {
        let dir = self.folder_path(destination, folder);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(folder = %folder, error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".tmp") {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }
}

fn not_found(err: std::io::Error, message_id: &MessageId, folder: Folder) -> StoreError {
    if err.kind() == std::io::ErrorKind::NotFound {
        StoreError::NotFound {
            message_id: message_id.to_string(),
            folder,
        }
    } else {
        StoreError::Io(err)
    }
}

/// Write-temp, sync, rename. Message ids contain dots, so the temp name is
/// built by suffixing the full file name rather than swapping an extension.
fn atomic_write(path: &Path, doc: &DocumentState) -> Result<(), StoreError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = parent.join(format!("{file_name}.tmp"));

    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, doc)?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
