//! Error types for `intake-core`.
//!
//! None of these reach the user. They are produced at the storage boundary of
//! [`crate::store::RecordStore`], logged, and then swallowed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("slot error: {0}")]
  Slot(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("slot {key:?} does not hold a JSON array")]
  MalformedSlot { key: String },
}

impl Error {
  /// Wrap a backend-specific slot error.
  pub fn slot<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Slot(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
