//! Path patching specs
//!
//! Verify how dotted paths address and replace values in a raw document.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn empty_path_replaces_whole_document() {
    for doc in [r#"{"a":1}"#, "[1,2,3]", "null", r#""text""#] {
        assert_eq!(patched(doc, "", r#"{"new":true}"#), r#"{"new":true}"#);
    }
}

#[test]
fn empty_value_leaves_document_byte_for_byte() {
    let doc = "{ \"a\" : [1, 2] }";
    assert_eq!(patched(doc, "a.0", ""), doc);
    assert_eq!(patched(doc, "", ""), doc);
}

#[test]
fn append_grows_array_one_element_at_a_time() {
    let doc = r#"{"a":[]}"#;

    let doc = patched(doc, "a.0", r#""X""#);
    assert_eq!(json(&doc), json(r#"{"a":["X"]}"#));

    let doc = patched(&doc, "a.1", r#""Y""#);
    assert_eq!(json(&doc), json(r#"{"a":["X","Y"]}"#));
}

#[test]
fn index_beyond_length_is_ignored() {
    let doc = r#"{"a":["X"]}"#;
    assert_eq!(patched(doc, "a.5", r#""Y""#), doc);
}

#[test]
fn append_index_must_be_last_accessor() {
    let doc = r#"{"a":[{"b":1}]}"#;
    assert_eq!(patched(doc, "a.1.b", "2"), doc);
    assert_eq!(patched(doc, "a.0.b", "2"), r#"{"a":[{"b":2}]}"#);
}

#[test]
fn duplicate_keys_update_first_occurrence_only() {
    assert_eq!(patched(r#"{"x":1,"x":2}"#, "x", "9"), r#"{"x":9,"x":2}"#);
}

#[test]
fn deep_paths_mix_objects_and_arrays() {
    let doc = r#"{"foo":{"bars":[{"baz":3}]}}"#;
    assert_eq!(
        patched(doc, "foo.bars.0.baz", "4"),
        r#"{"foo":{"bars":[{"baz":4}]}}"#
    );
}
