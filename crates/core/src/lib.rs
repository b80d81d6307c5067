// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! jj-core: JSON patching primitives for the jj journal
//!
//! This crate provides:
//! - A tree-free scanner that skips JSON values inside raw bytes
//! - Dotted-path resolution and splicing of replacement values
//! - Update records and their newline-delimited on-disk encoding

pub mod codec;
pub mod patch;
pub mod scan;
pub mod update;

pub use codec::{RecordError, RecordReader};
pub use update::{Update, UpdateSet};
