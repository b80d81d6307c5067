// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Journal configuration

use serde::{Deserialize, Serialize};

/// Configuration for opening and compacting a [`Journal`](crate::Journal)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Create missing parent directories of the journal path
    pub create_parent_dirs: bool,
    /// Fsync the journal's directory after a checkpoint rename.
    ///
    /// Without this, a crash right after a checkpoint may leave the
    /// directory entry pointing at the pre-checkpoint file on some
    /// filesystems. Only has an effect on Unix.
    pub sync_parent_dir: bool,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            create_parent_dirs: true,
            sync_parent_dir: false,
        }
    }
}
