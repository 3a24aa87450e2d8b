//! Identifier generation for stored records.
//!
//! Identifiers are random UUIDs drawn from OS randomness. If the OS source
//! fails, a base-36 timestamp followed by a hashed random suffix is used
//! instead; a per-generator counter keeps fallback ids distinct even within
//! the same millisecond.

use std::hash::{BuildHasher as _, Hasher as _, RandomState};

use chrono::Utc;
use rand_core::{OsRng, RngCore as _};

/// Source of fresh record identifiers.
pub trait IdGenerator {
  /// Produce an identifier not returned before by this generator, and unique
  /// with overwhelming probability across generators.
  fn next_id(&mut self) -> String;
}

/// The default generator: UUID v4 with a timestamp-plus-random fallback.
#[derive(Debug, Default)]
pub struct RandomIds {
  fallback_seq: u64,
}

impl RandomIds {
  pub fn new() -> Self { Self::default() }

  fn fallback_id(&mut self) -> String {
    self.fallback_seq = self.fallback_seq.wrapping_add(1);
    let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();

    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u64(millis);
    hasher.write_u64(self.fallback_seq);

    format!(
      "{}{}{}",
      base36(millis),
      base36(self.fallback_seq),
      base36(hasher.finish())
    )
  }
}

impl IdGenerator for RandomIds {
  fn next_id(&mut self) -> String {
    let mut bytes = [0u8; 16];
    match OsRng.try_fill_bytes(&mut bytes) {
      Ok(()) => uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string(),
      Err(err) => {
        tracing::warn!(error = %err, "OS randomness unavailable, using fallback id");
        self.fallback_id()
      }
    }
  }
}

fn base36(mut n: u64) -> String {
  const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
  if n == 0 {
    return "0".into();
  }
  let mut out = Vec::new();
  while n > 0 {
    out.push(DIGITS[(n % 36) as usize]);
    n /= 36;
  }
  out.reverse();
  String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use uuid::Uuid;

  use super::*;

  fn is_uuid(id: &str) -> bool { Uuid::parse_str(id).is_ok() }

  #[test]
  fn random_ids_are_uuids_and_distinct() {
    let mut ids = RandomIds::new();
    let seen: HashSet<String> = (0..500).map(|_| ids.next_id()).collect();
    assert_eq!(seen.len(), 500);
    assert!(seen.iter().all(|id| is_uuid(id)));
  }

  #[test]
  fn fallback_ids_are_distinct_within_a_millisecond() {
    let mut ids = RandomIds::new();
    let seen: HashSet<String> = (0..500).map(|_| ids.fallback_id()).collect();
    assert_eq!(seen.len(), 500);
    assert!(seen.iter().all(|id| !id.is_empty() && !is_uuid(id)));
  }

  #[test]
  fn base36_digits() {
    assert_eq!(base36(0), "0");
    assert_eq!(base36(35), "z");
    assert_eq!(base36(36), "10");
  }
}
