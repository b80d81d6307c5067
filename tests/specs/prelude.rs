//! Shared helpers for journal specs

pub use jj_storage::{Journal, JournalError, Update};
pub use serde::{Deserialize, Serialize};
pub use similar_asserts::assert_eq;
pub use std::fs;
pub use std::path::{Path, PathBuf};

/// A scratch directory holding one journal file
pub struct Scratch {
    _dir: tempfile::TempDir,
    path: PathBuf,
}

impl Scratch {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.journal");
        Self { _dir: dir, path }
    }

    /// A scratch journal whose file already holds `content`
    pub fn with_file(content: &str) -> Self {
        let scratch = Self::new();
        fs::write(&scratch.path, content).unwrap();
        scratch
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contents(&self) -> String {
        fs::read_to_string(&self.path).unwrap()
    }

    /// Reopen the journal and return its document as a JSON value
    pub fn reopen(&self) -> serde_json::Value {
        let (journal, value) = Journal::open(&self.path).unwrap();
        journal.close().unwrap();
        value
    }
}

pub fn json(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap()
}

/// Patch `doc` and return the result as text
pub fn patched(doc: &str, path: &str, value: &str) -> String {
    let result = jj_core::patch::apply(doc.as_bytes(), path, value.as_bytes());
    String::from_utf8(result.into_owned()).unwrap()
}
