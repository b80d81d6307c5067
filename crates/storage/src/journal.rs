// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only journal of a single JSON document
//!
//! ## Lifecycle
//!
//! ```text
//! open ──→ replay(snapshot + update sets) ──→ document handed to caller
//!   │
//!   ├── append(updates)  → one line, fsync'd
//!   ├── checkpoint(doc)  → temp file, fsync, rename over journal
//!   └── close
//! ```
//!
//! ## Durability guarantees
//!
//! - `append` and `checkpoint` fsync before returning
//! - A torn trailing update set (crash during append) is dropped on replay
//!   and cut from the file before the journal accepts new appends
//! - `checkpoint` replaces the file by rename; if it fails before the rename
//!   the original journal is untouched
//!
//! The window between releasing the old handle and the rename completing is
//! not closed by this module. Directory sync is available through
//! [`JournalConfig::sync_parent_dir`] but off by default.
//!
//! A `Journal` is single-writer. It takes no locks; callers serialize access
//! and no other process may write the file while it is open.

use crate::config::JournalConfig;
use jj_core::codec::{self, RecordError, RecordReader};
use jj_core::Update;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Appended to the journal path to name the checkpoint temp file
pub const TEMP_SUFFIX: &str = "_tmp";

/// Errors that can occur in journal operations
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("journal has no snapshot record: {}", .0.display())]
    MissingSnapshot(PathBuf),
    #[error("invalid snapshot record: {0}")]
    Snapshot(#[source] RecordError),
    #[error("replay failed: {0}")]
    Replay(#[source] RecordError),
    #[error("journal already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
}

/// What replay found when the journal was opened
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recovery {
    /// Update sets read and applied
    pub sets_applied: u64,
    /// Updates that changed the document
    pub updates_applied: u64,
    /// Malformed updates that were skipped
    pub updates_skipped: u64,
    /// Byte offset of a dropped torn trailing record
    pub torn_tail_at: Option<u64>,
    /// Bytes cut from the end of the file along with the torn record
    pub bytes_truncated: u64,
}

/// Append-only journal backing one JSON document
pub struct Journal {
    file: File,
    path: PathBuf,
    config: JournalConfig,
    recovery: Recovery,
    bytes_written: u64,
}

impl Journal {
    /// Open a journal and decode its replayed document
    pub fn open<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<(Self, T), JournalError> {
        Self::open_with_config(path, JournalConfig::default())
    }

    pub fn open_with_config<T: DeserializeOwned>(
        path: impl AsRef<Path>,
        config: JournalConfig,
    ) -> Result<(Self, T), JournalError> {
        let (journal, doc) = Self::open_raw_with_config(path, config)?;
        let value = serde_json::from_slice(&doc)?;
        Ok((journal, value))
    }

    /// Open a journal and return its replayed document as raw JSON
    pub fn open_raw(path: impl AsRef<Path>) -> Result<(Self, Vec<u8>), JournalError> {
        Self::open_raw_with_config(path, JournalConfig::default())
    }

    /// Open a journal, creating the file if absent.
    ///
    /// The file must hold at least a snapshot record; a freshly created empty
    /// file fails with [`JournalError::MissingSnapshot`]. Use [`Journal::create`]
    /// to start a new journal.
    pub fn open_raw_with_config(
        path: impl AsRef<Path>,
        config: JournalConfig,
    ) -> Result<(Self, Vec<u8>), JournalError> {
        let path = path.as_ref();
        if config.create_parent_dirs {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;

        let (doc, recovery) = replay(path, &file)?;
        tracing::debug!(
            path = %path.display(),
            sets = recovery.sets_applied,
            skipped = recovery.updates_skipped,
            "journal replayed"
        );

        let mut journal = Self {
            file,
            path: path.to_path_buf(),
            config,
            recovery,
            bytes_written: 0,
        };
        // New records must not land after a partial one
        journal.truncate_torn_tail()?;
        Ok((journal, doc))
    }

    /// Start a new journal whose snapshot is `initial`
    pub fn create<T>(path: impl AsRef<Path>, initial: &T) -> Result<Self, JournalError>
    where
        T: Serialize + ?Sized,
    {
        Self::create_with_config(path, initial, JournalConfig::default())
    }

    pub fn create_with_config<T>(
        path: impl AsRef<Path>,
        initial: &T,
        config: JournalConfig,
    ) -> Result<Self, JournalError>
    where
        T: Serialize + ?Sized,
    {
        let path = path.as_ref();
        if path.exists() {
            return Err(JournalError::AlreadyExists(path.to_path_buf()));
        }
        if config.create_parent_dirs {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
        }

        let record = codec::encode_snapshot(initial)?;
        let temp_path = temp_path(path);
        let file = write_temp(&temp_path, &record)?;
        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        if config.sync_parent_dir {
            sync_parent_dir(path)?;
        }

        tracing::info!(path = %path.display(), bytes = record.len(), "journal created");
        Ok(Self {
            file,
            path: path.to_path_buf(),
            config,
            recovery: Recovery::default(),
            bytes_written: record.len() as u64,
        })
    }

    /// Append `updates` as one update set.
    ///
    /// The record is fsync'd before returning. After a crash the set is
    /// either fully present or dropped as a torn tail.
    pub fn append(&mut self, updates: &[Update]) -> Result<(), JournalError> {
        let record = codec::encode_set(updates)?;
        self.file.write_all(&record)?;

        // Critical: sync to ensure durability before returning
        self.file.sync_all()?;

        self.bytes_written += record.len() as u64;
        tracing::debug!(updates = updates.len(), bytes = record.len(), "update set appended");
        Ok(())
    }

    /// Replace the journal's history with a single snapshot of `snapshot`.
    ///
    /// Not safe against concurrent callers: the file handle is swapped.
    pub fn checkpoint<T>(&mut self, snapshot: &T) -> Result<(), JournalError>
    where
        T: Serialize + ?Sized,
    {
        let record = codec::encode_snapshot(snapshot)?;
        self.file.sync_all()?;
        let temp_path = temp_path(&self.path);
        let temp = write_temp(&temp_path, &record)?;

        // Release the old handle, then atomically replace (rename is atomic on POSIX)
        drop(std::mem::replace(&mut self.file, temp));
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            // The journal itself was never touched; keep appending to it
            let _ = fs::remove_file(&temp_path);
            self.file = OpenOptions::new().append(true).read(true).open(&self.path)?;
            return Err(e.into());
        }
        if self.config.sync_parent_dir {
            sync_parent_dir(&self.path)?;
        }

        self.bytes_written += record.len() as u64;
        tracing::info!(path = %self.path.display(), bytes = record.len(), "journal checkpointed");
        Ok(())
    }

    /// Sync and release the underlying file
    pub fn close(self) -> Result<(), JournalError> {
        self.file.sync_all()?;
        tracing::debug!(path = %self.path.display(), "journal closed");
        Ok(())
    }

    /// Get the path to the journal file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// What replay found when this journal was opened
    pub fn recovery(&self) -> &Recovery {
        &self.recovery
    }

    /// Get bytes written since open
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn config(&self) -> &JournalConfig {
        &self.config
    }

    /// Cut the file back to the end of the last complete record
    fn truncate_torn_tail(&mut self) -> Result<(), JournalError> {
        let Some(position) = self.recovery.torn_tail_at else {
            return Ok(());
        };
        let len = self.file.metadata()?.len();
        self.file.set_len(position)?;
        self.file.write_all(&[codec::RECORD_TERMINATOR])?;
        self.file.sync_all()?;

        let removed = len.saturating_sub(position + 1);
        self.recovery.bytes_truncated = removed;
        tracing::info!(position, removed, "journal truncated at torn record");
        Ok(())
    }
}

/// Rebuild the document from the snapshot and every complete update set
fn replay(path: &Path, source: impl Read) -> Result<(Vec<u8>, Recovery), JournalError> {
    let mut records = RecordReader::new(BufReader::new(source));
    let snapshot = records
        .next_record()
        .map_err(JournalError::Snapshot)?
        .ok_or_else(|| JournalError::MissingSnapshot(path.to_path_buf()))?;

    let mut doc = snapshot.get().as_bytes().to_vec();
    let mut recovery = Recovery::default();
    loop {
        let offset = records.byte_offset() as u64;
        let set = match records.next_set() {
            Ok(Some(set)) => set,
            Ok(None) => break,
            Err(e) if e.is_syntax() => {
                tracing::warn!(offset, error = %e, "dropping torn update set at end of journal");
                recovery.torn_tail_at = Some(offset);
                break;
            }
            Err(e) => return Err(JournalError::Replay(e)),
        };

        for update in &set {
            if update.apply_to(&mut doc) {
                recovery.updates_applied += 1;
            } else {
                recovery.updates_skipped += 1;
            }
        }
        recovery.sets_applied += 1;
    }

    Ok((doc, recovery))
}

/// `<journal path>_tmp`, alongside the journal
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

/// Write `record` to a fresh temp file and fsync it, removing it on failure.
///
/// The returned handle is positioned after the record, ready for appends
/// once the file is renamed into place.
fn write_temp(temp_path: &Path, record: &[u8]) -> io::Result<File> {
    let write = || -> io::Result<File> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .read(true)
            .open(temp_path)?;
        file.write_all(record)?;
        file.sync_all()?;
        Ok(file)
    };
    write().inspect_err(|_| {
        let _ = fs::remove_file(temp_path);
    })
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    File::open(parent)?.sync_all()
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
