//! Integration tests for `SqliteSlot`, alone and underneath a `RecordStore`.

use intake_core::{
  record::{Gender, Record, ServiceType, Skill},
  slot::Slot,
  store::{DEFAULT_SLOT_KEY, RecordStore},
  validate::{Rules, Validated},
};

use crate::{Error, SqliteSlot};

fn slot() -> SqliteSlot { SqliteSlot::open_in_memory().expect("in-memory slot") }

fn approved(name: &str) -> Validated {
  Rules::default()
    .approve(Record {
      id:             None,
      full_name:      name.into(),
      email:          "person@gmail.com".into(),
      contact_number: "9123456780".into(),
      skills:         vec![Skill::AppDevelopment, Skill::UiUxDesign],
      date_time:      "2024-11-20T16:45".into(),
      address:        "221B Baker Street".into(),
      gender:         Some(Gender::Male),
      service_type:   Some(ServiceType::Development),
    })
    .expect("valid record")
}

// ─── Slot ────────────────────────────────────────────────────────────────────

#[test]
fn missing_key_reads_none() {
  assert_eq!(slot().get("absent").unwrap(), None);
}

#[test]
fn set_then_get() {
  let s = slot();
  s.set("k", "[1,2,3]").unwrap();
  assert_eq!(s.get("k").unwrap().as_deref(), Some("[1,2,3]"));
}

#[test]
fn set_overwrites() {
  let s = slot();
  s.set("k", "first").unwrap();
  s.set("k", "second").unwrap();
  s.set("other", "untouched").unwrap();
  assert_eq!(s.get("k").unwrap().as_deref(), Some("second"));
  assert_eq!(s.get("other").unwrap().as_deref(), Some("untouched"));
}

#[test]
fn reopening_file_keeps_values() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("intake.db");

  SqliteSlot::open(&path).unwrap().set("k", "v").unwrap();
  let reopened = SqliteSlot::open(&path).unwrap();
  assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
}

#[test]
fn foreign_schema_version_is_refused() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("other.db");
  {
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 7;").unwrap();
  }

  let err = SqliteSlot::open(&path).unwrap_err();
  assert!(matches!(err, Error::SchemaVersion { found: 7, expected: 1 }));
}

// ─── Record store on SQLite ──────────────────────────────────────────────────

#[test]
fn store_round_trips_through_file() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("intake.db");

  let expected = {
    let mut store = RecordStore::open(SqliteSlot::open(&path).unwrap(), DEFAULT_SLOT_KEY);
    let a = store.create(approved("Ada"));
    let b = store.create(approved("Grace"));
    store.create(approved("Linus"));

    let renamed = with_id(approved("Grace Hopper"), &b, &store);
    assert!(store.update(renamed));
    assert!(store.delete(&a));
    store.records().to_vec()
  };

  let reopened = RecordStore::open(SqliteSlot::open(&path).unwrap(), DEFAULT_SLOT_KEY);
  assert_eq!(reopened.records(), expected.as_slice());
  let names: Vec<_> = reopened.records().iter().map(|r| r.full_name.as_str()).collect();
  assert_eq!(names, vec!["Linus", "Grace Hopper"]);
}

/// Re-approve `v` carrying the id of the stored record `id`.
fn with_id(v: Validated, id: &str, store: &RecordStore<SqliteSlot>) -> Validated {
  let mut record = v.into_inner();
  record.id = store.get(id).and_then(|r| r.id.clone());
  Rules::default().approve(record).unwrap()
}

#[test]
fn corrupt_value_loads_empty_and_is_overwritten() {
  let s = slot();
  s.set(DEFAULT_SLOT_KEY, "not json at all").unwrap();

  let mut store = RecordStore::open(s, DEFAULT_SLOT_KEY);
  assert!(store.is_empty());

  store.create(approved("Fresh Start"));
  let raw = store.slot().get(DEFAULT_SLOT_KEY).unwrap().unwrap();
  let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
  assert_eq!(parsed.as_array().map(Vec::len), Some(1));
}
