//! Application state machine and event dispatcher.
//!
//! Every key press becomes at most one intent on the core state holders:
//! change, blur, toggle or submit on the [`FormSession`]; edit on the
//! [`EditBridge`]; delete on the [`RecordStore`] once confirmed.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use intake_core::{
  bridge::{EditBridge, Route},
  record::{Field, Skill},
  session::{FormSession, Outcome, Phase},
  slot::Slot,
  store::RecordStore,
  validate::Rules,
};
use strum::IntoEnumIterator;

// ─── Form layout ──────────────────────────────────────────────────────────────

/// Rows of the form: every field, then the submit button.
pub const FORM_ROWS: usize = 9;

/// What the form cursor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Field(Field),
  Submit,
}

/// How a field takes keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
  /// Typed characters and backspace.
  Text,
  /// Left/right pick a chip, space toggles it.
  Skills,
  /// Left/right cycle through the catalog.
  Choice,
}

pub fn input_kind(field: Field) -> InputKind {
  match field {
    Field::Skills => InputKind::Skills,
    Field::Gender | Field::ServiceType => InputKind::Choice,
    _ => InputKind::Text,
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<S: Slot> {
  /// Which view is on screen.
  pub view: Route,

  /// The persisted record collection.
  pub store: RecordStore<S>,

  /// Draft, touched fields and errors of the form view.
  pub session: FormSession,

  /// Pending edit hand-off from the records view.
  pub bridge: EditBridge,

  /// Row under the form cursor, `0..FORM_ROWS`.
  pub form_cursor: usize,

  /// Highlighted chip within the skills row.
  pub skill_cursor: usize,

  /// Row under the cursor in the records table.
  pub table_cursor: usize,

  /// Id of a record awaiting delete confirmation.
  pub confirm_delete: Option<String>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,
}

impl<S: Slot> App<S> {
  /// Create an [`App`] showing a fresh form.
  pub fn new(store: RecordStore<S>, rules: Rules) -> Self {
    Self {
      view: Route::Form,
      store,
      session: FormSession::new(rules),
      bridge: EditBridge::new(),
      form_cursor: 0,
      skill_cursor: 0,
      table_cursor: 0,
      confirm_delete: None,
      status_msg: String::new(),
    }
  }

  /// The form row under the cursor.
  pub fn focus(&self) -> Focus {
    Field::all()
      .nth(self.form_cursor)
      .map_or(Focus::Submit, Focus::Field)
  }

  // ── Navigation ────────────────────────────────────────────────────────────

  /// Switch views. Entering the form always goes through
  /// [`FormSession::enter`], so a pending edit is picked up.
  pub fn goto(&mut self, route: Route) {
    match route {
      Route::Form => {
        if self.session.enter(&mut self.bridge) {
          self.status_msg = "Editing record.".into();
        }
        self.form_cursor = 0;
        self.skill_cursor = 0;
      }
      Route::Records => {
        self.table_cursor = self
          .table_cursor
          .min(self.store.len().saturating_sub(1));
      }
    }
    self.view = route;
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('c' | 'q')) {
      return false;
    }
    self.status_msg.clear();

    // The delete prompt is modal.
    if self.confirm_delete.is_some() {
      self.handle_confirm_key(key);
      return true;
    }

    match key.code {
      KeyCode::F(1) => {
        self.goto(Route::Form);
        return true;
      }
      KeyCode::F(2) => {
        self.goto(Route::Records);
        return true;
      }
      _ => {}
    }
    if ctrl {
      return true;
    }

    match self.view {
      Route::Form if self.session.phase() == Phase::Submitted => {
        self.handle_submitted_key(key)
      }
      Route::Form => {
        self.handle_form_key(key);
        true
      }
      Route::Records => self.handle_records_key(key),
    }
  }

  fn handle_form_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.session.clear(&mut self.bridge);
        self.form_cursor = 0;
        self.status_msg = "Form cleared.".into();
      }
      KeyCode::Up | KeyCode::BackTab => self.move_focus(false),
      KeyCode::Down | KeyCode::Tab => self.move_focus(true),
      KeyCode::Enter => match self.focus() {
        Focus::Submit => self.submit(),
        Focus::Field(_) => self.move_focus(true),
      },
      code => {
        if let Focus::Field(field) = self.focus() {
          self.edit_field(field, code);
        }
      }
    }
  }

  /// Leaving a field is a blur.
  fn move_focus(&mut self, forward: bool) {
    if let Focus::Field(field) = self.focus() {
      self.session.blur(field);
    }
    self.form_cursor = if forward {
      (self.form_cursor + 1).min(FORM_ROWS - 1)
    } else {
      self.form_cursor.saturating_sub(1)
    };
  }

  fn edit_field(&mut self, field: Field, code: KeyCode) {
    match (input_kind(field), code) {
      (InputKind::Text, KeyCode::Char(c)) => {
        let mut value = self.session.draft().value(field);
        value.push(c);
        self.session.change(field, &value);
      }
      (InputKind::Text, KeyCode::Backspace) => {
        let mut value = self.session.draft().value(field);
        value.pop();
        self.session.change(field, &value);
      }
      (InputKind::Skills, KeyCode::Left) => {
        self.skill_cursor = self.skill_cursor.saturating_sub(1);
      }
      (InputKind::Skills, KeyCode::Right) => {
        if self.skill_cursor + 1 < Skill::iter().count() {
          self.skill_cursor += 1;
        }
      }
      (InputKind::Skills, KeyCode::Char(' ')) => {
        if let Some(skill) = Skill::iter().nth(self.skill_cursor) {
          self.session.toggle_skill(skill);
        }
      }
      (InputKind::Choice, KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')) => {
        let forward = code != KeyCode::Left;
        let draft = self.session.draft();
        let next = match field {
          Field::Gender => cycle(draft.gender, forward).map(|g| g.to_string()),
          Field::ServiceType => {
            cycle(draft.service_type, forward).map(|s| s.to_string())
          }
          _ => None,
        };
        self.session.change(field, next.as_deref().unwrap_or_default());
      }
      _ => {}
    }
  }

  fn submit(&mut self) {
    match self.session.submit(&mut self.store) {
      Some(Outcome::Created) => self.status_msg = "Application received.".into(),
      Some(Outcome::Updated) => self.status_msg = "Changes saved.".into(),
      Some(Outcome::UpdateMissed) => {
        self.status_msg = "That record was deleted; nothing was updated.".into();
      }
      None => {
        let errors = self.session.errors();
        self.status_msg = format!("Please fix {} field(s).", errors.len());
        if let Some(first) = errors.fields().next() {
          self.form_cursor = Field::all().position(|f| f == first).unwrap_or(0);
        }
      }
    }
  }

  fn handle_submitted_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Char('e') => {
        self.session.revise();
        self.form_cursor = 0;
      }
      KeyCode::Char('n') | KeyCode::Esc => {
        self.session.clear(&mut self.bridge);
        self.form_cursor = 0;
      }
      _ => {}
    }
    true
  }

  fn handle_records_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Down | KeyCode::Char('j') => {
        if self.table_cursor + 1 < self.store.len() {
          self.table_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.table_cursor = self.table_cursor.saturating_sub(1);
      }

      KeyCode::Enter | KeyCode::Char('e') => {
        if let Some(record) = self.store.records().get(self.table_cursor).cloned() {
          let route = self.bridge.request_edit(record);
          self.goto(route);
        }
      }

      KeyCode::Delete | KeyCode::Char('d') => {
        self.confirm_delete = self
          .store
          .records()
          .get(self.table_cursor)
          .and_then(|r| r.id.clone());
      }

      KeyCode::Char('n') => self.goto(Route::Form),

      _ => {}
    }
    true
  }

  fn handle_confirm_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('y' | 'Y') => {
        let Some(id) = self.confirm_delete.take() else {
          return;
        };
        if self.store.delete(&id) {
          self.status_msg = "Record deleted.".into();
          self.table_cursor = self
            .table_cursor
            .min(self.store.len().saturating_sub(1));
        }
      }
      KeyCode::Char('n' | 'N') | KeyCode::Esc => {
        self.confirm_delete = None;
        self.status_msg = "Delete cancelled.".into();
      }
      _ => {}
    }
  }
}

/// Step through a catalog; unset starts at the first (or last) entry.
fn cycle<T>(current: Option<T>, forward: bool) -> Option<T>
where
  T: IntoEnumIterator + PartialEq + Copy,
{
  let options: Vec<T> = T::iter().collect();
  let len = options.len();
  if len == 0 {
    return None;
  }
  let next = match current.and_then(|c| options.iter().position(|o| *o == c)) {
    Some(i) if forward => (i + 1) % len,
    Some(i) => (i + len - 1) % len,
    None if forward => 0,
    None => len - 1,
  };
  options.get(next).copied()
}
