//! [`FormSession`]: the transient editing state behind the form view.
//!
//! A session holds one draft, the set of fields the user has left (touched),
//! and the validation verdicts currently on display. It reconciles each user
//! intent against the validation rules and, on a clean submit, commits the
//! draft to a [`RecordStore`].
//!
//! ```text
//!   Editing ──submit──▶ Submitting ──errors──▶ Editing
//!                                  └─clean──▶ Submitted ──revise──▶ Editing
//! ```

use std::collections::BTreeSet;

use crate::{
  bridge::EditBridge,
  record::{Field, Record, Skill},
  slot::Slot,
  store::RecordStore,
  validate::{Rules, ValidationErrors},
};

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  /// Drafting or correcting; field intents are accepted.
  Editing,
  /// A submit attempt is being validated.
  Submitting,
  /// The draft was committed; a confirmation is on display.
  Submitted,
}

/// What a commit did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Created,
  Updated,
  /// The record being edited no longer exists; the store was left untouched.
  UpdateMissed,
}

/// The committed record, as shown on the confirmation view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
  /// Carries the id the store assigned or kept.
  pub record:  Record,
  pub outcome: Outcome,
}

// ─── Session ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FormSession {
  rules:      Rules,
  draft:      Record,
  touched:    BTreeSet<Field>,
  errors:     ValidationErrors,
  /// Id of the stored record being edited. Decides update vs create on commit;
  /// the draft's own `id` is not consulted.
  editing:    Option<String>,
  phase:      Phase,
  submission: Option<Submission>,
}

impl FormSession {
  /// A session holding a fresh, empty draft.
  pub fn new(rules: Rules) -> Self {
    Self {
      rules,
      draft: Record::default(),
      touched: BTreeSet::new(),
      errors: ValidationErrors::default(),
      editing: None,
      phase: Phase::Editing,
      submission: None,
    }
  }

  // ── Snapshot ──────────────────────────────────────────────────────────────

  pub fn draft(&self) -> &Record { &self.draft }

  pub fn errors(&self) -> &ValidationErrors { &self.errors }

  pub fn error(&self, field: Field) -> Option<&str> { self.errors.get(field) }

  pub fn is_touched(&self, field: Field) -> bool { self.touched.contains(&field) }

  pub fn phase(&self) -> Phase { self.phase }

  pub fn submission(&self) -> Option<&Submission> { self.submission.as_ref() }

  pub fn editing_id(&self) -> Option<&str> { self.editing.as_deref() }

  pub fn is_editing(&self) -> bool { self.editing.is_some() }

  // ── Entry and exit ────────────────────────────────────────────────────────

  /// Called whenever the form view is entered. A pending edit target always
  /// wins: it is seeded into the draft and the bridge is cleared. Otherwise
  /// the session starts over with a fresh draft.
  ///
  /// Returns whether an edit target was consumed.
  pub fn enter(&mut self, bridge: &mut EditBridge) -> bool {
    match bridge.pending().cloned() {
      Some(target) => {
        self.seed(target);
        bridge.clear();
        true
      }
      None => {
        self.reset();
        false
      }
    }
  }

  /// Replace the draft with `record`, including its id. A record with an id
  /// puts the session in edit mode for that id.
  pub fn seed(&mut self, record: Record) {
    self.reset();
    self.editing = record.id.clone();
    self.draft = record;
  }

  /// Discard everything and start a fresh draft.
  pub fn reset(&mut self) {
    self.draft = Record::default();
    self.touched.clear();
    self.errors.clear();
    self.editing = None;
    self.phase = Phase::Editing;
    self.submission = None;
  }

  /// Abandon the current edit: drop any pending edit target and start a
  /// fresh draft. The store is not touched.
  pub fn clear(&mut self, bridge: &mut EditBridge) {
    bridge.clear();
    self.reset();
  }

  // ── Field intents ─────────────────────────────────────────────────────────

  /// The user changed `field` to `value`.
  ///
  /// Contact numbers are reduced to their digits and truncated before they
  /// reach the draft. If the field is touched its verdict is refreshed; no
  /// other field's verdict changes.
  pub fn change(&mut self, field: Field, value: &str) {
    if !self.accepts_input(field) {
      return;
    }
    if field == Field::ContactNumber {
      let digits = normalize_contact(value, self.rules.contact_digits);
      self.draft.set(field, &digits);
    } else {
      self.draft.set(field, value);
    }
    if self.touched.contains(&field) {
      self.recheck(field);
    }
  }

  /// The user left `field`.
  pub fn blur(&mut self, field: Field) {
    if !self.accepts_input(field) {
      return;
    }
    self.touched.insert(field);
    self.recheck(field);
  }

  /// The user clicked a skill chip. The skills verdict is refreshed whether
  /// or not the field was touched. Returns whether the skill is now selected.
  pub fn toggle_skill(&mut self, skill: Skill) -> bool {
    if !self.accepts_input(Field::Skills) {
      return self.draft.skills.contains(&skill);
    }
    let selected = self.draft.toggle_skill(skill);
    self.recheck(Field::Skills);
    selected
  }

  // ── Submit ────────────────────────────────────────────────────────────────

  /// Attempt to submit the draft.
  ///
  /// Every field becomes touched and the full verdict is recorded. If any
  /// field fails, the session stays in [`Phase::Editing`] with the draft
  /// intact and `None` is returned. Otherwise the draft is committed to
  /// `store`, the session moves to [`Phase::Submitted`], and the outcome is
  /// returned.
  pub fn submit<S: Slot>(&mut self, store: &mut RecordStore<S>) -> Option<Outcome> {
    if self.phase != Phase::Editing {
      tracing::debug!(phase = ?self.phase, "submit ignored");
      return None;
    }
    self.phase = Phase::Submitting;
    self.touched.extend(Field::all());

    let mut validated = match self.rules.approve(self.draft.clone()) {
      Ok(v) => v,
      Err(errors) => {
        tracing::debug!(errors = %errors, "submit rejected");
        self.errors = errors;
        self.phase = Phase::Editing;
        return None;
      }
    };
    self.errors.clear();

    let mut committed = self.draft.clone();
    let outcome = match self.editing.clone() {
      Some(id) => {
        validated.set_id(Some(id.clone()));
        committed.id = Some(id);
        if store.update(validated) {
          Outcome::Updated
        } else {
          tracing::warn!(id = ?committed.id, "edited record vanished before commit");
          Outcome::UpdateMissed
        }
      }
      None => {
        committed.id = Some(store.create(validated));
        Outcome::Created
      }
    };

    self.reset();
    self.phase = Phase::Submitted;
    self.submission = Some(Submission { record: committed, outcome });
    Some(outcome)
  }

  /// Leave the confirmation view and edit the record just committed.
  ///
  /// A created record comes back with its assigned id, so re-submitting it
  /// updates it in place. A record whose update missed comes back without an
  /// id and will be created anew. Returns `false` outside [`Phase::Submitted`].
  pub fn revise(&mut self) -> bool {
    let Some(Submission { mut record, outcome }) = self.submission.take() else {
      return false;
    };
    if outcome == Outcome::UpdateMissed {
      record.id = None;
    }
    self.seed(record);
    true
  }

  // ── Internals ─────────────────────────────────────────────────────────────

  fn accepts_input(&self, field: Field) -> bool {
    let ok = self.phase == Phase::Editing;
    if !ok {
      tracing::debug!(field = %field, phase = ?self.phase, "field intent ignored");
    }
    ok
  }

  fn recheck(&mut self, field: Field) {
    let verdict = self.rules.check(&self.draft, field);
    self.errors.set(field, verdict);
  }
}

/// Keep only the decimal digits of `raw`, truncated to `max_digits`.
pub fn normalize_contact(raw: &str, max_digits: usize) -> String {
  raw.chars().filter(char::is_ascii_digit).take(max_digits).collect()
}
