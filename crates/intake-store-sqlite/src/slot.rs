//! [`SqliteSlot`]: the SQLite implementation of [`Slot`].

use std::path::Path;

use intake_core::slot::Slot;
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  schema::{SCHEMA, SCHEMA_VERSION},
};

/// A durable slot backed by a single SQLite file.
///
/// Every write is its own implicit transaction, so a crash leaves either the
/// previous value or the new one.
#[derive(Debug)]
pub struct SqliteSlot {
  conn: rusqlite::Connection,
}

impl SqliteSlot {
  /// Open (or create) a slot file at `path` and run schema initialisation.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = rusqlite::Connection::open(path)?;
    let slot = Self { conn };
    slot.init_schema()?;
    tracing::debug!(path = %path.display(), "sqlite slot opened");
    Ok(slot)
  }

  /// Open an in-memory slot: useful for testing.
  pub fn open_in_memory() -> Result<Self> {
    let conn = rusqlite::Connection::open_in_memory()?;
    let slot = Self { conn };
    slot.init_schema()?;
    Ok(slot)
  }

  fn init_schema(&self) -> Result<()> {
    let found: i64 =
      self.conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if found != 0 && found != SCHEMA_VERSION {
      return Err(Error::SchemaVersion { found, expected: SCHEMA_VERSION });
    }
    self.conn.execute_batch(SCHEMA)?;
    Ok(())
  }
}

impl Slot for SqliteSlot {
  type Error = Error;

  fn get(&self, key: &str) -> Result<Option<String>> {
    Ok(
      self
        .conn
        .query_row(
          "SELECT value FROM slots WHERE key = ?1",
          rusqlite::params![key],
          |row| row.get(0),
        )
        .optional()?,
    )
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    self.conn.execute(
      "INSERT INTO slots (key, value) VALUES (?1, ?2)
       ON CONFLICT (key) DO UPDATE SET
         value      = excluded.value,
         updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
      rusqlite::params![key, value],
    )?;
    Ok(())
  }
}
