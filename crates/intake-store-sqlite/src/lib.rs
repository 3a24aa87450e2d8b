//! SQLite backend for the intake record store.
//!
//! Provides [`SqliteSlot`], a durable [`intake_core::slot::Slot`] that keeps
//! every key in one small table of a single SQLite file.

mod schema;
mod slot;

pub mod error;

pub use error::{Error, Result};
pub use slot::SqliteSlot;

#[cfg(test)]
mod tests;
