//! SQL schema for the intake SQLite slot.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision; files carrying a different non-zero revision are refused.

/// Revision written to `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per named slot. The value is opaque to the database; the record
-- store keeps a JSON array of records in it.
CREATE TABLE IF NOT EXISTS slots (
    key         TEXT PRIMARY KEY,
    value       TEXT NOT NULL,
    updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

PRAGMA user_version = 1;
";
