// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk record format
//!
//! A journal is newline-delimited JSON. The first record is the snapshot
//! document; every record after it is one update set:
//!
//! ```text
//! {"foo":3}
//! [{"p":"foo","v":4}]
//! [{"p":"bars.0","v":{"baz":1}},{"p":"qux","v":null}]
//! ```
//!
//! Values are copied into records verbatim. A malformed update (empty value,
//! or bytes that are not a single JSON value) is written without `"v"` so the
//! record stays readable, and reads back as malformed.

use crate::update::{Update, UpdateSet};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::de::IoRead;
use serde_json::error::Category;
use serde_json::value::RawValue;
use serde_json::StreamDeserializer;
use std::io::{self, Read};
use thiserror::Error;

/// Terminates every record
pub const RECORD_TERMINATOR: u8 = b'\n';

/// Errors from reading a record
#[derive(Debug, Error)]
pub enum RecordError {
    /// Not valid JSON, including a record cut off by the end of the stream
    #[error("malformed record: {0}")]
    Syntax(#[source] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Valid JSON that is not an update set
    #[error("unexpected record shape: {0}")]
    Shape(#[source] serde_json::Error),
}

impl RecordError {
    fn classify(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Io => Self::Io(err.into()),
            Category::Syntax | Category::Eof => Self::Syntax(err),
            Category::Data => Self::Shape(err),
        }
    }

    /// Whether this is a torn or garbled record rather than a hard failure
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }
}

/// Encode a snapshot document as a record
pub fn encode_snapshot<T>(value: &T) -> Result<Vec<u8>, serde_json::Error>
where
    T: Serialize + ?Sized,
{
    let mut record = serde_json::to_vec(value)?;
    record.push(RECORD_TERMINATOR);
    Ok(record)
}

/// Encode an update set as a record
pub fn encode_set(updates: &[Update]) -> Result<Vec<u8>, serde_json::Error> {
    let capacity = updates
        .iter()
        .map(|u| u.path.len() + u.value.len() + 16)
        .sum::<usize>()
        + 3;
    let mut record = Vec::with_capacity(capacity);
    record.push(b'[');
    for (i, update) in updates.iter().enumerate() {
        if i > 0 {
            record.push(b',');
        }
        record.extend_from_slice(br#"{"p":"#);
        serde_json::to_writer(&mut record, &update.path)?;
        if !update.is_malformed() {
            record.extend_from_slice(br#","v":"#);
            record.extend_from_slice(&update.value);
        }
        record.push(b'}');
    }
    record.push(b']');
    record.push(RECORD_TERMINATOR);
    Ok(record)
}

/// Decode one update set record
pub fn decode_set(record: &str) -> Result<UpdateSet, RecordError> {
    let wire: Vec<WireUpdate> = serde_json::from_str(record).map_err(RecordError::classify)?;
    Ok(wire.into_iter().map(Update::from).collect())
}

#[derive(Deserialize)]
struct WireUpdate {
    #[serde(rename = "p", default)]
    path: String,
    #[serde(rename = "v", default, deserialize_with = "present")]
    value: Option<Box<RawValue>>,
}

/// Keep `"v": null` distinct from a missing `"v"`
fn present<'de, D>(deserializer: D) -> Result<Option<Box<RawValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Box::<RawValue>::deserialize(deserializer).map(Some)
}

impl From<WireUpdate> for Update {
    fn from(wire: WireUpdate) -> Self {
        Update {
            path: wire.path,
            value: wire
                .value
                .map(|raw| raw.get().as_bytes().to_vec())
                .unwrap_or_default(),
        }
    }
}

/// Reads consecutive top-level records from a stream
pub struct RecordReader<R: Read> {
    records: StreamDeserializer<'static, IoRead<R>, Box<RawValue>>,
}

impl<R: Read> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            records: serde_json::Deserializer::from_reader(reader).into_iter(),
        }
    }

    /// Read the next record as raw JSON. `Ok(None)` at a clean end of stream.
    pub fn next_record(&mut self) -> Result<Option<Box<RawValue>>, RecordError> {
        self.records
            .next()
            .transpose()
            .map_err(RecordError::classify)
    }

    /// Read and decode the next record as an update set
    pub fn next_set(&mut self) -> Result<Option<UpdateSet>, RecordError> {
        match self.next_record()? {
            Some(record) => decode_set(record.get()).map(Some),
            None => Ok(None),
        }
    }

    /// Bytes consumed through the end of the last record read
    pub fn byte_offset(&self) -> usize {
        self.records.byte_offset()
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
