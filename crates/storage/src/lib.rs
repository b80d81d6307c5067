// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! jj-storage: crash-safe append-only journal for a JSON document
//!
//! A journal stores one snapshot followed by update sets, one per line.
//! Opening replays the sets onto the snapshot; appending writes and syncs a
//! new set; checkpointing compacts the history into a fresh snapshot.
//!
//! ```no_run
//! use jj_storage::{Journal, Update};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct Settings {
//!     volume: u8,
//!     recent: Vec<String>,
//! }
//!
//! # fn main() -> Result<(), jj_storage::JournalError> {
//! let mut journal = Journal::create("settings.journal", &Settings::default())?;
//! journal.append(&[
//!     Update::new("volume", &7)?,
//!     Update::new("recent.0", "song.ogg")?,
//! ])?;
//! journal.close()?;
//!
//! let (journal, settings): (Journal, Settings) = Journal::open("settings.journal")?;
//! assert_eq!(settings.volume, 7);
//! # journal.close()
//! # }
//! ```

pub mod config;
pub mod journal;

pub use config::JournalConfig;
pub use jj_core::{Update, UpdateSet};
pub use journal::{Journal, JournalError, Recovery};
