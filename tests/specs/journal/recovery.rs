//! Journal recovery specs
//!
//! Verify that reopening a journal reproduces its document, including after
//! a crash left a partial record behind.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn append_then_reopen_matches_direct_patch() {
    let scratch = Scratch::new();
    let snapshot = r#"{"name":"a","tags":["x"],"meta":{"n":1}}"#;
    let updates = [
        Update::new("tags.1", "y").unwrap(),
        Update::new("meta.n", &2).unwrap(),
        Update::new("name", &serde_json::json!({"first": "b"})).unwrap(),
    ];

    let initial = json(snapshot);
    let mut journal = Journal::create(scratch.path(), &initial).unwrap();
    journal.append(&updates).unwrap();
    journal.close().unwrap();

    let mut expected = serde_json::to_vec(&initial).unwrap();
    for update in &updates {
        update.apply_to(&mut expected);
    }
    let (journal, replayed) = Journal::open_raw(scratch.path()).unwrap();
    journal.close().unwrap();
    assert_eq!(replayed, expected);
}

#[test]
fn partial_trailing_record_is_discarded() {
    let scratch = Scratch::with_file(
        "{\"foo\":3}\n[{\"p\":\"foo\",\"v\":4}]\n[{\"p\":\"foo\",\"v\":5}",
    );

    assert_eq!(scratch.reopen(), json(r#"{"foo":4}"#));
}

#[test]
fn journal_stays_writable_after_discarding_partial_record() {
    let scratch = Scratch::with_file("{\"foo\":3}\n[{\"p\":\"foo\",\"v\":5}");

    let (mut journal, value): (Journal, serde_json::Value) = Journal::open(scratch.path()).unwrap();
    assert_eq!(value, json(r#"{"foo":3}"#));
    assert!(journal.recovery().torn_tail_at.is_some());

    journal.append(&[Update::new("foo", &6).unwrap()]).unwrap();
    journal.close().unwrap();

    assert_eq!(scratch.reopen(), json(r#"{"foo":6}"#));
}

#[test]
fn checkpoint_also_clears_partial_record() {
    let scratch = Scratch::with_file("{\"foo\":3}\n[{\"p\":\"foo\",\"v\":5}");

    let (mut journal, value): (Journal, serde_json::Value) = Journal::open(scratch.path()).unwrap();
    journal.checkpoint(&value).unwrap();
    journal.append(&[Update::new("foo", &7).unwrap()]).unwrap();
    journal.close().unwrap();

    assert_eq!(scratch.contents(), "{\"foo\":3}\n[{\"p\":\"foo\",\"v\":7}]\n");
}

#[test]
fn partial_record_is_cut_before_new_appends() {
    let scratch = Scratch::with_file("{\"foo\":3}\n[{\"p\":\"foo\",\"v\":4}]\n[{\"p\":\"foo\",\"v\":5}");

    let (mut journal, _value): (Journal, serde_json::Value) = Journal::open(scratch.path()).unwrap();
    journal.append(&[Update::new("foo", &6).unwrap()]).unwrap();
    journal.close().unwrap();

    assert_eq!(
        scratch.contents(),
        "{\"foo\":3}\n[{\"p\":\"foo\",\"v\":4}]\n[{\"p\":\"foo\",\"v\":6}]\n"
    );
    assert_eq!(scratch.reopen(), json(r#"{"foo":6}"#));
}

#[test]
fn unparseable_raw_value_is_skipped_like_other_malformed_updates() {
    let scratch = Scratch::new();
    let mut journal = Journal::create(scratch.path(), &json(r#"{"foo":1,"bar":1}"#)).unwrap();
    journal
        .append(&[Update::raw("foo", "{"), Update::new("bar", &2).unwrap()])
        .unwrap();
    journal.append(&[Update::new("bar", &3).unwrap()]).unwrap();
    journal.close().unwrap();

    assert_eq!(scratch.reopen(), json(r#"{"foo":1,"bar":3}"#));
}

#[test]
fn malformed_updates_do_not_block_their_siblings() {
    let scratch = Scratch::new();
    let mut journal = Journal::create(scratch.path(), &json(r#"{"a":[],"b":0}"#)).unwrap();
    journal
        .append(&[
            Update::raw("b", ""),
            Update::new("a.3", &1).unwrap(),
            Update::new("nope.deeper", &1).unwrap(),
            Update::new("a.0", &1).unwrap(),
            Update::new("b", &2).unwrap(),
        ])
        .unwrap();
    journal.close().unwrap();

    assert_eq!(scratch.reopen(), json(r#"{"a":[1],"b":2}"#));
}

#[test]
fn open_without_snapshot_fails() {
    let scratch = Scratch::new();

    let err = Journal::open_raw(scratch.path()).err().unwrap();

    assert!(matches!(err, JournalError::MissingSnapshot(_)));
}

#[test]
fn root_replacement_is_journaled() {
    let scratch = Scratch::new();
    let mut journal = Journal::create(scratch.path(), &json(r#"{"v":1}"#)).unwrap();
    journal.append(&[Update::new("", &[1, 2, 3]).unwrap()]).unwrap();
    journal.append(&[Update::new("3", &4).unwrap()]).unwrap();
    journal.close().unwrap();

    assert_eq!(scratch.reopen(), json("[1,2,3,4]"));
}
