//! Error type for `intake-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  /// The file was created by something else, or by a newer schema.
  #[error("unsupported schema version {found} (expected {expected})")]
  SchemaVersion { found: i64, expected: i64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
