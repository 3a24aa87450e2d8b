//! The validation engine.
//!
//! [`Rules::validate`] is a pure function of a [`Record`] snapshot. Every rule
//! is independent: all failing fields are reported together, and a field's
//! verdict never depends on another field's value.

use std::{collections::BTreeMap, fmt};

use serde::Deserialize;

use crate::record::{Field, Record};

// ─── Rules ───────────────────────────────────────────────────────────────────

/// Tunable parameters of the validation rules.
///
/// Deserialisable so it can be read from the `[rules]` table of the
/// application's configuration file; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Rules {
  /// Required email suffix, compared case-insensitively.
  pub email_suffix:   String,
  /// Minimum length of the trimmed full name, in characters.
  pub min_name_len:   usize,
  /// Exact number of decimal digits in a contact number.
  pub contact_digits: usize,
}

impl Default for Rules {
  fn default() -> Self {
    Self {
      email_suffix:   "@gmail.com".to_owned(),
      min_name_len:   3,
      contact_digits: 10,
    }
  }
}

impl Rules {
  /// Check every field of `record`.
  pub fn validate(&self, record: &Record) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    for field in Field::all() {
      errors.set(field, self.check(record, field));
    }
    errors
  }

  /// Check a single field of `record`, returning its message if it fails.
  pub fn check(&self, record: &Record, field: Field) -> Option<String> {
    match field {
      Field::FullName => {
        let name = record.full_name.trim();
        if name.is_empty() {
          Some("Full Name is required".into())
        } else if name.chars().count() < self.min_name_len {
          Some(format!(
            "Name must be at least {} characters",
            self.min_name_len
          ))
        } else {
          None
        }
      }
      Field::Email => {
        if record.email.trim().is_empty() {
          Some("Email is required".into())
        } else if !record
          .email
          .to_lowercase()
          .ends_with(&self.email_suffix.to_lowercase())
        {
          Some(format!("Email must be a valid {} address", self.email_suffix))
        } else {
          None
        }
      }
      Field::ContactNumber => {
        let number = &record.contact_number;
        if number.is_empty() {
          Some("Contact Number is required".into())
        } else if number.len() != self.contact_digits
          || !number.bytes().all(|b| b.is_ascii_digit())
        {
          Some(format!("Must be exactly {} digits", self.contact_digits))
        } else {
          None
        }
      }
      Field::Skills => record
        .skills
        .is_empty()
        .then(|| "Please select at least one skill".into()),
      Field::DateTime => record
        .date_time
        .is_empty()
        .then(|| "Date & Time is required".into()),
      Field::Address => record
        .address
        .trim()
        .is_empty()
        .then(|| "Address is required".into()),
      Field::Gender => record
        .gender
        .is_none()
        .then(|| "Gender is required".into()),
      Field::ServiceType => record
        .service_type
        .is_none()
        .then(|| "Service Type is required".into()),
    }
  }

  /// Validate `record` and, if it passes, wrap it as proof of validity.
  pub fn approve(&self, record: Record) -> Result<Validated, ValidationErrors> {
    let errors = self.validate(&record);
    if errors.is_empty() {
      Ok(Validated(record))
    } else {
      Err(errors)
    }
  }
}

/// Validate `record` against the default rules.
pub fn validate(record: &Record) -> ValidationErrors {
  Rules::default().validate(record)
}

// ─── ValidationErrors ────────────────────────────────────────────────────────

/// Field → message. A field absent from the map is valid.
///
/// Iteration follows form order. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn get(&self, field: Field) -> Option<&str> {
    self.0.get(&field).map(String::as_str)
  }

  pub fn contains(&self, field: Field) -> bool { self.0.contains_key(&field) }

  pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
    self.0.keys().copied()
  }

  pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
    self.0.iter().map(|(f, m)| (*f, m.as_str()))
  }

  /// Replace the verdict for one field: `Some` records the message, `None`
  /// marks the field valid.
  pub fn set(&mut self, field: Field, message: Option<String>) {
    match message {
      Some(m) => {
        self.0.insert(field, m);
      }
      None => {
        self.0.remove(&field);
      }
    }
  }

  pub fn clear(&mut self) { self.0.clear(); }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, message) in self.iter() {
      if !first {
        f.write_str("; ")?;
      }
      first = false;
      write!(f, "{field}: {message}")?;
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

// ─── Validated ───────────────────────────────────────────────────────────────

/// A record that passed [`Rules::approve`]. The record store only accepts this
/// type, so an invalid record cannot enter it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated(Record);

impl Validated {
  pub fn record(&self) -> &Record { &self.0 }

  pub fn into_inner(self) -> Record { self.0 }

  /// Overwrite the identifier. Identity is not a validated field.
  pub(crate) fn set_id(&mut self, id: Option<String>) { self.0.id = id; }
}
