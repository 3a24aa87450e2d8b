//! Record types: the unit of persistence.
//!
//! A [`Record`] is one client/applicant submission. The same type doubles as
//! the form draft: a draft simply has no `id` yet.
//!
//! The JSON shape (camelCase keys, catalog values as display strings, unset
//! choices as `""`) is the on-disk format of the durable slot.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

// ─── Catalogs ────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
  Serialize,
  Deserialize,
)]
pub enum Gender {
  Male,
  Female,
  Other,
}

/// The service categories a client can apply for.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
  Serialize,
  Deserialize,
)]
pub enum ServiceType {
  Consulting,
  Development,
  Maintenance,
  Audit,
  Training,
}

/// The fixed skill catalog offered by the form.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
  Serialize,
  Deserialize,
)]
pub enum Skill {
  #[strum(serialize = "Web Development")]
  #[serde(rename = "Web Development")]
  WebDevelopment,
  #[strum(serialize = "App Development")]
  #[serde(rename = "App Development")]
  AppDevelopment,
  #[strum(serialize = "UI/UX Design")]
  #[serde(rename = "UI/UX Design")]
  UiUxDesign,
  #[strum(serialize = "Cloud Computing")]
  #[serde(rename = "Cloud Computing")]
  CloudComputing,
  #[strum(serialize = "Database Management")]
  #[serde(rename = "Database Management")]
  DatabaseManagement,
  DevOps,
  #[strum(serialize = "AI/ML")]
  #[serde(rename = "AI/ML")]
  AiMl,
}

// ─── Field ───────────────────────────────────────────────────────────────────

/// A named form field. The declaration order is the form's display order, and
/// the derived `Ord` follows it.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum Field {
  FullName,
  Email,
  ContactNumber,
  Skills,
  DateTime,
  Address,
  Gender,
  ServiceType,
}

impl Field {
  /// Human-readable label, as shown next to the input.
  pub fn label(self) -> &'static str {
    match self {
      Self::FullName => "Full Name",
      Self::Email => "Email",
      Self::ContactNumber => "Contact Number",
      Self::Skills => "Skills",
      Self::DateTime => "Date & Time",
      Self::Address => "Address",
      Self::Gender => "Gender",
      Self::ServiceType => "Service Type",
    }
  }

  pub fn all() -> impl Iterator<Item = Field> { Self::iter() }
}

// ─── Record ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
  /// Assigned by the store on create. `None` on a draft not yet saved.
  #[serde(
    default,
    deserialize_with = "blank::deserialize",
    skip_serializing_if = "Option::is_none"
  )]
  pub id:             Option<String>,
  #[serde(default)]
  pub full_name:      String,
  #[serde(default)]
  pub email:          String,
  #[serde(default)]
  pub contact_number: String,
  /// Selection order is kept for display; entries are unique.
  #[serde(default, deserialize_with = "known_skills")]
  pub skills:         Vec<Skill>,
  /// `YYYY-MM-DDTHH:MM`, as produced by a datetime-local input.
  #[serde(default)]
  pub date_time:      String,
  #[serde(default)]
  pub address:        String,
  #[serde(default, with = "blank")]
  pub gender:         Option<Gender>,
  #[serde(default, with = "blank")]
  pub service_type:   Option<ServiceType>,
}

impl Record {
  /// The display text of `field`. Skills are joined with `", "`; unset choices
  /// render as the empty string.
  pub fn value(&self, field: Field) -> String {
    match field {
      Field::FullName => self.full_name.clone(),
      Field::Email => self.email.clone(),
      Field::ContactNumber => self.contact_number.clone(),
      Field::Skills => self
        .skills
        .iter()
        .map(|s| <&'static str>::from(*s))
        .collect::<Vec<_>>()
        .join(", "),
      Field::DateTime => self.date_time.clone(),
      Field::Address => self.address.clone(),
      Field::Gender => self.gender.map(|g| g.to_string()).unwrap_or_default(),
      Field::ServiceType => {
        self.service_type.map(|s| s.to_string()).unwrap_or_default()
      }
    }
  }

  /// Assign `value` to `field` verbatim.
  ///
  /// Choice fields parse their display name; anything outside the catalog
  /// leaves the field unset. Skills take a comma-separated list, dropping
  /// unknown names and repeats.
  pub fn set(&mut self, field: Field, value: &str) {
    match field {
      Field::FullName => self.full_name = value.to_owned(),
      Field::Email => self.email = value.to_owned(),
      Field::ContactNumber => self.contact_number = value.to_owned(),
      Field::Skills => {
        self.skills.clear();
        for skill in value.split(',').filter_map(|s| s.trim().parse().ok()) {
          if !self.skills.contains(&skill) {
            self.skills.push(skill);
          }
        }
      }
      Field::DateTime => self.date_time = value.to_owned(),
      Field::Address => self.address = value.to_owned(),
      Field::Gender => self.gender = value.trim().parse().ok(),
      Field::ServiceType => self.service_type = value.trim().parse().ok(),
    }
  }

  /// Add `skill` if absent, remove it if present. Returns whether the skill
  /// is selected afterwards.
  pub fn toggle_skill(&mut self, skill: Skill) -> bool {
    if let Some(pos) = self.skills.iter().position(|s| *s == skill) {
      self.skills.remove(pos);
      false
    } else {
      self.skills.push(skill);
      true
    }
  }

  /// Drop repeated skills, keeping the first occurrence of each.
  pub fn dedup_skills(&mut self) {
    let mut seen = Vec::with_capacity(self.skills.len());
    self.skills.retain(|s| {
      if seen.contains(s) {
        false
      } else {
        seen.push(*s);
        true
      }
    });
  }
}

/// Read a skill list, skipping names outside the catalog.
fn known_skills<'de, D>(deserializer: D) -> Result<Vec<Skill>, D::Error>
where
  D: serde::Deserializer<'de>,
{
  let names = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
  Ok(
    names
      .iter()
      .filter_map(|name| match name.trim().parse() {
        Ok(skill) => Some(skill),
        Err(_) => {
          tracing::warn!(skill = %name, "ignoring unknown stored skill");
          None
        }
      })
      .collect(),
  )
}

/// Serde adapter treating `""` and `null` as unset, matching how the form
/// writes an untouched choice. Values outside the catalog also read as unset.
mod blank {
  use std::{fmt::Display, str::FromStr};

  use serde::{Deserialize, Deserializer, Serialize, Serializer};

  pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
  where
    T: Serialize,
    S: Serializer,
  {
    match value {
      Some(v) => v.serialize(serializer),
      None => serializer.serialize_str(""),
    }
  }

  pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
  where
    T: FromStr,
    T::Err: Display,
    D: Deserializer<'de>,
  {
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
      None | Some("") => Ok(None),
      Some(s) => match s.parse() {
        Ok(v) => Ok(Some(v)),
        Err(err) => {
          tracing::warn!(value = %s, error = %err, "ignoring unknown stored value");
          Ok(None)
        }
      },
    }
  }
}
