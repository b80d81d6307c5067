// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Journal update records
//!
//! An [`Update`] replaces the value at a path with new raw JSON. Updates are
//! written in batches ([`UpdateSet`]); a batch is recovered whole or not at all.
//!
//! Any path and value is accepted when building an update. An update is
//! *malformed* when its value is empty or not JSON, or when its path does not
//! resolve against the document at apply time. Malformed updates are skipped
//! without error, and the rest of their batch still applies.

use crate::patch;
use serde::Serialize;
use serde_json::value::RawValue;
use std::borrow::Cow;

/// A replacement of the value at a path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Update {
    /// Dotted path such as `foo.bars.1.baz`; empty for the whole document
    pub path: String,
    /// Raw JSON of the new value
    pub value: Vec<u8>,
}

/// Updates persisted together as one journal record
pub type UpdateSet = Vec<Update>;

impl Update {
    /// Build an update by serializing `value`
    pub fn new<T>(path: impl Into<String>, value: &T) -> Result<Self, serde_json::Error>
    where
        T: Serialize + ?Sized,
    {
        Ok(Self {
            path: path.into(),
            value: serde_json::to_vec(value)?,
        })
    }

    /// Build an update from bytes the caller has already serialized.
    ///
    /// The bytes are not checked. Invalid JSON here produces a malformed
    /// update, which the journal records without its value.
    pub fn raw(path: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Build an update from already-validated raw JSON
    pub fn from_raw_value(path: impl Into<String>, value: &RawValue) -> Self {
        Self::raw(path, value.get())
    }

    /// Whether the update is malformed regardless of the document it meets
    pub fn is_malformed(&self) -> bool {
        self.value.is_empty() || serde_json::from_slice::<&RawValue>(&self.value).is_err()
    }

    /// Apply to `doc`, borrowing it back unchanged if the update is malformed
    pub fn apply<'a>(&'a self, doc: &'a [u8]) -> Cow<'a, [u8]> {
        patch::apply(doc, &self.path, &self.value)
    }

    /// Apply to `doc` in place. Returns false if the update was skipped.
    pub fn apply_to(&self, doc: &mut Vec<u8>) -> bool {
        let applied = patch::apply_in_place(doc, &self.path, &self.value);
        if !applied {
            tracing::trace!(path = %self.path, "skipping malformed update");
        }
        applied
    }
}

#[cfg(test)]
#[path = "update_tests.rs"]
mod tests;
