//! [`RecordStore`]: the canonical, persisted collection of records.
//!
//! The store owns an ordered `Vec<Record>` (newest first) mirrored into a
//! single [`Slot`] key as a JSON array. Every mutation rewrites the whole
//! array. Storage failures are logged and swallowed: a broken backend degrades
//! to an in-memory store, it never becomes a user-facing error.

use std::{collections::HashSet, fmt};

use crate::{
  Error, Result,
  id::{IdGenerator, RandomIds},
  record::Record,
  slot::Slot,
  validate::Validated,
};

/// The slot key used by the application unless configured otherwise.
pub const DEFAULT_SLOT_KEY: &str = "client_submissions";

/// Draws from a custom generator before switching to [`RandomIds`].
const MAX_ID_DRAWS: usize = 8;

// ─── Subscriptions ───────────────────────────────────────────────────────────

/// Handle returned by [`RecordStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&[Record])>;

// ─── Store ───────────────────────────────────────────────────────────────────

pub struct RecordStore<S: Slot> {
  slot:        S,
  key:         String,
  records:     Vec<Record>,
  ids:         Box<dyn IdGenerator>,
  listeners:   Vec<(SubscriptionId, Listener)>,
  next_listen: u64,
}

impl<S: Slot> fmt::Debug for RecordStore<S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RecordStore")
      .field("key", &self.key)
      .field("records", &self.records.len())
      .field("listeners", &self.listeners.len())
      .finish_non_exhaustive()
  }
}

impl<S: Slot> RecordStore<S> {
  /// Open a store over `key` in `slot`, rehydrating whatever it holds.
  pub fn open(slot: S, key: impl Into<String>) -> Self {
    let key = key.into();
    let records = load_all(&slot, &key);
    tracing::info!(key = %key, count = records.len(), "record store opened");
    Self {
      slot,
      key,
      records,
      ids: Box::new(RandomIds::new()),
      listeners: Vec::new(),
      next_listen: 0,
    }
  }

  /// Replace the identifier generator.
  pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
    self.ids = Box::new(ids);
    self
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// The full ordered collection, newest first.
  pub fn records(&self) -> &[Record] { &self.records }

  pub fn get(&self, id: &str) -> Option<&Record> {
    self.records.iter().find(|r| r.id.as_deref() == Some(id))
  }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  pub fn slot(&self) -> &S { &self.slot }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Assign a fresh identifier to `record`, insert it at the front and
  /// persist. Any identifier already on the record is discarded.
  ///
  /// Returns the assigned identifier.
  pub fn create(&mut self, mut record: Validated) -> String {
    let id = self.fresh_id();
    record.set_id(Some(id.clone()));
    self.records.insert(0, record.into_inner());
    tracing::info!(id = %id, "record created");
    self.commit();
    id
  }

  /// Replace the stored record whose id matches `record`'s, keeping its
  /// position. Returns `false`, touching nothing, if there is no match.
  pub fn update(&mut self, record: Validated) -> bool {
    let Some(id) = record.record().id.clone() else {
      tracing::debug!("update ignored: record has no id");
      return false;
    };
    let Some(existing) = self
      .records
      .iter_mut()
      .find(|r| r.id.as_deref() == Some(id.as_str()))
    else {
      tracing::debug!(id = %id, "update ignored: no such record");
      return false;
    };
    *existing = record.into_inner();
    tracing::info!(id = %id, "record updated");
    self.commit();
    true
  }

  /// Remove the record with `id`. Returns `false`, touching nothing, if there
  /// is no match.
  ///
  /// Callers are expected to have obtained the user's confirmation first.
  pub fn delete(&mut self, id: &str) -> bool {
    let before = self.records.len();
    self.records.retain(|r| r.id.as_deref() != Some(id));
    if self.records.len() == before {
      tracing::debug!(id = %id, "delete ignored: no such record");
      return false;
    }
    tracing::info!(id = %id, "record deleted");
    self.commit();
    true
  }

  // ── Subscriptions ─────────────────────────────────────────────────────────

  /// Register `listener` to be called with the collection after every
  /// successful mutation.
  pub fn subscribe(
    &mut self,
    listener: impl FnMut(&[Record]) + 'static,
  ) -> SubscriptionId {
    let id = SubscriptionId(self.next_listen);
    self.next_listen += 1;
    self.listeners.push((id, Box::new(listener)));
    id
  }

  /// Remove a listener. Returns `false` if it was not registered.
  pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
    let before = self.listeners.len();
    self.listeners.retain(|(l, _)| *l != id);
    self.listeners.len() != before
  }

  // ── Internals ─────────────────────────────────────────────────────────────

  fn fresh_id(&mut self) -> String {
    let mut draws = 0;
    loop {
      let id = self.ids.next_id();
      if !id.is_empty() && self.get(&id).is_none() {
        return id;
      }
      draws += 1;
      if draws == MAX_ID_DRAWS {
        tracing::warn!(draws, "id generator keeps colliding, switching to random ids");
        self.ids = Box::new(RandomIds::new());
      } else {
        tracing::warn!(id = %id, "generated id collides, drawing again");
      }
    }
  }

  /// Persist, then notify listeners. Persistence failure does not roll back
  /// the in-memory state.
  fn commit(&mut self) {
    if let Err(err) = self.persist() {
      tracing::error!(key = %self.key, error = %err, "failed to persist records");
    }
    for (_, listener) in &mut self.listeners {
      listener(&self.records);
    }
  }

  fn persist(&self) -> Result<()> {
    let json = serde_json::to_string(&self.records)?;
    self.slot.set(&self.key, &json).map_err(Error::slot)
  }
}

// ─── Rehydration ─────────────────────────────────────────────────────────────

/// Read the collection stored under `key`.
///
/// An absent key yields an empty collection. A value that is not a JSON array,
/// or a backend read error, is logged and also yields an empty collection.
/// Individual entries that fail to parse, lack an id, or repeat an earlier id
/// are logged and dropped.
pub fn load_all<S: Slot>(slot: &S, key: &str) -> Vec<Record> {
  match try_load(slot, key) {
    Ok(records) => records,
    Err(err) => {
      tracing::error!(key = %key, error = %err, "failed to load records, starting empty");
      Vec::new()
    }
  }
}

fn try_load<S: Slot>(slot: &S, key: &str) -> Result<Vec<Record>> {
  let Some(raw) = slot.get(key).map_err(Error::slot)? else {
    return Ok(Vec::new());
  };

  let value: serde_json::Value = serde_json::from_str(&raw)?;
  let serde_json::Value::Array(entries) = value else {
    return Err(Error::MalformedSlot { key: key.to_owned() });
  };

  let mut seen = HashSet::new();
  let mut records = Vec::with_capacity(entries.len());
  for (index, entry) in entries.into_iter().enumerate() {
    let mut record: Record = match serde_json::from_value(entry) {
      Ok(r) => r,
      Err(err) => {
        tracing::warn!(index, error = %err, "dropping unreadable record");
        continue;
      }
    };
    let Some(id) = record.id.clone() else {
      tracing::warn!(index, "dropping stored record without id");
      continue;
    };
    if !seen.insert(id.clone()) {
      tracing::warn!(index, id = %id, "dropping stored record with duplicate id");
      continue;
    }
    record.dedup_skills();
    records.push(record);
  }
  Ok(records)
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;
  use crate::{
    record::{Gender, ServiceType, Skill},
    slot::MemorySlot,
    validate::Rules,
  };

  fn approved(name: &str) -> Validated {
    Rules::default()
      .approve(Record {
        id:             None,
        full_name:      name.into(),
        email:          "someone@gmail.com".into(),
        contact_number: "9876543210".into(),
        skills:         vec![Skill::DevOps],
        date_time:      "2024-03-05T09:30".into(),
        address:        "1 Main Road".into(),
        gender:         Some(Gender::Other),
        service_type:   Some(ServiceType::Training),
      })
      .unwrap()
  }

  fn approved_with_id(name: &str, id: &str) -> Validated {
    let mut v = approved(name);
    v.set_id(Some(id.into()));
    v
  }

  fn names<S: Slot>(store: &RecordStore<S>) -> Vec<&str> {
    store.records().iter().map(|r| r.full_name.as_str()).collect()
  }

  /// A slot whose reads and writes always fail.
  struct BrokenSlot;

  #[derive(Debug, thiserror::Error)]
  #[error("disk on fire")]
  struct BrokenSlotError;

  impl Slot for BrokenSlot {
    type Error = BrokenSlotError;

    fn get(&self, _key: &str) -> Result<Option<String>, Self::Error> {
      Err(BrokenSlotError)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), Self::Error> {
      Err(BrokenSlotError)
    }
  }

  /// Hands out the same id a few times before moving on.
  struct StutteringIds(Vec<&'static str>);

  impl IdGenerator for StutteringIds {
    fn next_id(&mut self) -> String { self.0.remove(0).to_owned() }
  }

  #[test]
  fn create_prepends_and_assigns_ids() {
    let mut store = RecordStore::open(MemorySlot::new(), DEFAULT_SLOT_KEY);
    let first = store.create(approved("Alice"));
    let second = store.create(approved("Bob"));

    assert_ne!(first, second);
    assert_eq!(names(&store), vec!["Bob", "Alice"]);
    assert_eq!(store.records()[1].id.as_deref(), Some(first.as_str()));
    assert_eq!(store.get(&second).unwrap().full_name, "Bob");
  }

  #[test]
  fn create_discards_caller_supplied_id() {
    let mut store = RecordStore::open(MemorySlot::new(), DEFAULT_SLOT_KEY);
    let id = store.create(approved_with_id("Alice", "chosen-by-caller"));
    assert_ne!(id, "chosen-by-caller");
    assert!(store.get("chosen-by-caller").is_none());
  }

  #[test]
  fn n_creates_yield_n_distinct_ids() {
    let mut store = RecordStore::open(MemorySlot::new(), DEFAULT_SLOT_KEY);
    let ids: HashSet<String> =
      (0..50).map(|i| store.create(approved(&format!("Person {i}")))).collect();
    assert_eq!(ids.len(), 50);
    assert_eq!(store.len(), 50);
  }

  #[test]
  fn colliding_generator_is_redrawn() {
    let mut store = RecordStore::open(MemorySlot::new(), DEFAULT_SLOT_KEY)
      .with_ids(StutteringIds(vec!["a", "a", "", "b"]));
    assert_eq!(store.create(approved("One")), "a");
    assert_eq!(store.create(approved("Two")), "b");
  }

  /// Always hands out the same id.
  struct ConstantIds(&'static str);

  impl IdGenerator for ConstantIds {
    fn next_id(&mut self) -> String { self.0.to_owned() }
  }

  #[test]
  fn stuck_generator_falls_back_to_random_ids() {
    let mut store = RecordStore::open(MemorySlot::new(), DEFAULT_SLOT_KEY)
      .with_ids(ConstantIds("same"));
    assert_eq!(store.create(approved("One")), "same");
    let second = store.create(approved("Two"));
    assert_ne!(second, "same");
    assert!(!second.is_empty());

    let mut blank = RecordStore::open(MemorySlot::new(), DEFAULT_SLOT_KEY)
      .with_ids(ConstantIds(""));
    let id = blank.create(approved("Three"));
    assert!(!id.is_empty());
    assert_eq!(blank.len(), 1);
  }

  #[test]
  fn update_preserves_position() {
    let mut store = RecordStore::open(MemorySlot::new(), DEFAULT_SLOT_KEY);
    store.create(approved("Carol"));
    let middle = store.create(approved("Bob"));
    store.create(approved("Alice"));

    assert!(store.update(approved_with_id("Robert", &middle)));
    assert_eq!(names(&store), vec!["Alice", "Robert", "Carol"]);
    assert_eq!(store.records()[1].id.as_deref(), Some(middle.as_str()));
  }

  #[test]
  fn update_unknown_or_missing_id_is_noop() {
    let slot = MemorySlot::new();
    let mut store = RecordStore::open(slot.clone(), DEFAULT_SLOT_KEY);
    store.create(approved("Alice"));
    let snapshot = slot.peek(DEFAULT_SLOT_KEY);

    assert!(!store.update(approved_with_id("Ghost", "nope")));
    assert!(!store.update(approved("No Id")));
    assert_eq!(names(&store), vec!["Alice"]);
    assert_eq!(slot.peek(DEFAULT_SLOT_KEY), snapshot);
  }

  #[test]
  fn delete_is_idempotent() {
    let mut store = RecordStore::open(MemorySlot::new(), DEFAULT_SLOT_KEY);
    let keep = store.create(approved("Keep"));
    let gone = store.create(approved("Gone"));

    assert!(store.delete(&gone));
    let after_once = store.records().to_vec();
    assert!(!store.delete(&gone));
    assert_eq!(store.records(), after_once.as_slice());
    assert_eq!(store.records()[0].id.as_deref(), Some(keep.as_str()));
  }

  #[test]
  fn rehydration_matches_last_mutation() {
    let slot = MemorySlot::new();
    let mut store = RecordStore::open(slot.clone(), DEFAULT_SLOT_KEY);
    let ann = store.create(approved("Ann"));
    let bob = store.create(approved("Bob"));
    store.create(approved("Cat"));
    assert!(store.update(approved_with_id("Bobby", &bob)));
    assert!(store.delete(&ann));

    let reopened = RecordStore::open(slot, DEFAULT_SLOT_KEY);
    assert_eq!(reopened.records(), store.records());
    assert_eq!(names(&reopened), vec!["Cat", "Bobby"]);
  }

  #[test]
  fn absent_slot_loads_empty() {
    let store = RecordStore::open(MemorySlot::new(), "nothing-here");
    assert!(store.is_empty());
  }

  #[test]
  fn corrupt_slot_loads_empty() {
    let slot = MemorySlot::new();
    slot.set(DEFAULT_SLOT_KEY, "{not json").unwrap();
    assert!(RecordStore::open(slot.clone(), DEFAULT_SLOT_KEY).is_empty());

    slot.set(DEFAULT_SLOT_KEY, r#"{"fullName":"object, not array"}"#).unwrap();
    assert!(RecordStore::open(slot, DEFAULT_SLOT_KEY).is_empty());
  }

  #[test]
  fn rehydration_drops_entries_breaking_identity() {
    let slot = MemorySlot::new();
    let raw = r#"[
      {"id":"1","fullName":"First","skills":["DevOps","DevOps"]},
      {"fullName":"No id"},
      {"id":"","fullName":"Blank id"},
      {"id":"1","fullName":"Duplicate"},
      {"id":"3","fullName":"Third","gender":"Female","serviceType":""}
    ]"#;
    slot.set(DEFAULT_SLOT_KEY, raw).unwrap();

    let store = RecordStore::open(slot, DEFAULT_SLOT_KEY);
    assert_eq!(names(&store), vec!["First", "Third"]);
    assert_eq!(store.records()[0].skills, vec![Skill::DevOps]);
    assert_eq!(store.records()[1].gender, Some(Gender::Female));
    assert_eq!(store.records()[1].service_type, None);
  }

  #[test]
  fn unknown_catalog_values_do_not_lose_records() {
    let slot = MemorySlot::new();
    let raw = r#"[{
      "id":"legacy",
      "fullName":"Old Timer",
      "skills":["Web Development","Blockchain"],
      "gender":"Robot",
      "serviceType":"Astrology"
    }]"#;
    slot.set(DEFAULT_SLOT_KEY, raw).unwrap();

    let mut store = RecordStore::open(slot.clone(), DEFAULT_SLOT_KEY);
    assert_eq!(names(&store), vec!["Old Timer"]);
    let legacy = store.get("legacy").unwrap();
    assert_eq!(legacy.skills, vec![Skill::WebDevelopment]);
    assert_eq!(legacy.gender, None);
    assert_eq!(legacy.service_type, None);

    store.create(approved("Newcomer"));
    let reopened = RecordStore::open(slot, DEFAULT_SLOT_KEY);
    assert_eq!(names(&reopened), vec!["Newcomer", "Old Timer"]);
    assert!(reopened.get("legacy").is_some());
  }

  #[test]
  fn broken_backend_degrades_to_memory() {
    let mut store = RecordStore::open(BrokenSlot, DEFAULT_SLOT_KEY);
    assert!(store.is_empty());

    let id = store.create(approved("Alice"));
    assert_eq!(store.get(&id).unwrap().full_name, "Alice");
    assert!(store.delete(&id));
  }

  #[test]
  fn listeners_see_every_mutation_until_unsubscribed() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut store = RecordStore::open(MemorySlot::new(), DEFAULT_SLOT_KEY);

    let sink = Rc::clone(&seen);
    let sub = store.subscribe(move |records| sink.borrow_mut().push(records.len()));

    let id = store.create(approved("Alice"));
    store.create(approved("Bob"));
    store.update(approved_with_id("Alicia", &id));
    store.delete("missing");
    store.delete(&id);
    assert_eq!(*seen.borrow(), vec![1, 2, 2, 1]);

    assert!(store.unsubscribe(sub));
    assert!(!store.unsubscribe(sub));
    store.create(approved("Carol"));
    assert_eq!(seen.borrow().len(), 4);
  }

  #[test]
  fn persisted_json_is_newest_first_array() {
    let slot = MemorySlot::new();
    let mut store = RecordStore::open(slot.clone(), "custom");
    store.create(approved("Old"));
    store.create(approved("New"));

    let raw = slot.peek("custom").unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["fullName"], "New");
    assert_eq!(value[1]["fullName"], "Old");
    assert_eq!(value[0]["serviceType"], "Training");
  }
}
