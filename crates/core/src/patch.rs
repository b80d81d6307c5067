// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path resolution and in-buffer patching
//!
//! A path is a `.`-joined list of accessors. Each accessor selects one level
//! of the document: an object key, or an array index. An index equal to the
//! array's current length addresses the slot after the last element, so
//! writing to it appends.
//!
//! ```text
//! {"foo": {"bars": [{"baz": 3}]}}
//!
//! foo.bars.0.baz   -> 3
//! foo.bars.1       -> append to bars
//! ```
//!
//! Patching never fails. A path that does not resolve, an empty value, or an
//! append index anywhere but the last accessor leaves the buffer unchanged.

use crate::scan::Cursor;
use std::borrow::Cow;

/// Joins accessors in a path
pub const SEPARATOR: char = '.';

/// Where the final accessor landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    /// Start of an existing value
    Value(usize),
    /// Closing bracket of an array, for appending
    Append { offset: usize, empty: bool },
}

/// Replace the value at `path` in `doc` with `value`.
///
/// Returns `doc` borrowed if the update does not apply, `value` borrowed for
/// the empty (whole document) path, and a freshly spliced buffer otherwise.
pub fn apply<'a>(doc: &'a [u8], path: &str, value: &'a [u8]) -> Cow<'a, [u8]> {
    if value.is_empty() {
        return Cow::Borrowed(doc);
    }
    if path.is_empty() {
        return Cow::Borrowed(value);
    }
    match resolve(doc, path).and_then(|target| splice(doc, target, value)) {
        Some(patched) => Cow::Owned(patched),
        None => Cow::Borrowed(doc),
    }
}

/// Like [`apply`], replacing `doc` in place.
///
/// Returns false if the update did not apply and `doc` is untouched.
pub fn apply_in_place(doc: &mut Vec<u8>, path: &str, value: &[u8]) -> bool {
    let next = match apply(doc.as_slice(), path, value) {
        Cow::Owned(next) => next,
        Cow::Borrowed(unchanged) if std::ptr::eq(unchanged, doc.as_slice()) => return false,
        Cow::Borrowed(replacement) => replacement.to_vec(),
    };
    *doc = next;
    true
}

/// Split a path into its accessors. The empty path has none.
pub fn accessors(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(move |_| !path.is_empty())
}

fn resolve(doc: &[u8], path: &str) -> Option<Target> {
    let mut remaining = accessors(path).peekable();
    let mut offset = 0;
    while let Some(accessor) = remaining.next() {
        match locate(doc, offset, accessor)? {
            Target::Value(at) => offset = at,
            append @ Target::Append { .. } => {
                // Only the last accessor may append
                return remaining.peek().is_none().then_some(append);
            }
        }
    }
    Some(Target::Value(offset))
}

/// Find `accessor` in the container starting at `offset`
fn locate(doc: &[u8], offset: usize, accessor: &str) -> Option<Target> {
    let mut cursor = Cursor::at(doc, offset);
    cursor.skip_whitespace();
    match cursor.peek()? {
        b'{' => locate_key(cursor, accessor),
        b'[' => locate_index(cursor, parse_index(accessor)?),
        _ => None,
    }
}

/// First matching key wins
fn locate_key(mut cursor: Cursor<'_>, accessor: &str) -> Option<Target> {
    cursor.skip_separator(b'{')?;
    while cursor.peek()? != b'}' {
        let key = cursor.read_string()?;
        cursor.skip_whitespace();
        cursor.skip_separator(b':')?;
        if key_matches(key, accessor) {
            return Some(Target::Value(cursor.pos()));
        }
        cursor.skip_value()?;
        cursor.skip_whitespace();
        if cursor.peek() == Some(b',') {
            cursor.skip_separator(b',')?;
        }
    }
    None
}

fn locate_index(mut cursor: Cursor<'_>, index: usize) -> Option<Target> {
    cursor.skip_separator(b'[')?;
    let mut len = 0;
    while len < index && cursor.peek()? != b']' {
        cursor.skip_value()?;
        len += 1;
        cursor.skip_whitespace();
        if cursor.peek() == Some(b',') {
            cursor.skip_separator(b',')?;
        }
    }
    match cursor.peek()? {
        b']' if len == index => Some(Target::Append {
            offset: cursor.pos(),
            empty: len == 0,
        }),
        b']' => None,
        _ => Some(Target::Value(cursor.pos())),
    }
}

/// Array accessors are plain base-10 digit runs
fn parse_index(accessor: &str) -> Option<usize> {
    if accessor.is_empty() || !accessor.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    accessor.parse().ok()
}

/// Compare a raw (still escaped) key against an accessor
fn key_matches(raw: &[u8], accessor: &str) -> bool {
    if !raw.contains(&b'\\') {
        return raw == accessor.as_bytes();
    }
    let mut quoted = Vec::with_capacity(raw.len() + 2);
    quoted.push(b'"');
    quoted.extend_from_slice(raw);
    quoted.push(b'"');
    serde_json::from_slice::<String>(&quoted).is_ok_and(|key| key == accessor)
}

fn splice(doc: &[u8], target: Target, value: &[u8]) -> Option<Vec<u8>> {
    let mut patched = Vec::with_capacity(doc.len() + value.len() + 1);
    match target {
        Target::Value(offset) => {
            let mut cursor = Cursor::at(doc, offset);
            cursor.skip_value()?;
            patched.extend_from_slice(doc.get(..offset)?);
            patched.extend_from_slice(value);
            patched.extend_from_slice(cursor.rest());
        }
        Target::Append { offset, empty } => {
            patched.extend_from_slice(doc.get(..offset)?);
            if !empty {
                patched.push(b',');
            }
            patched.extend_from_slice(value);
            patched.extend_from_slice(doc.get(offset..)?);
        }
    }
    Some(patched)
}

#[cfg(test)]
#[path = "patch_tests.rs"]
mod tests;
