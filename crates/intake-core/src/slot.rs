//! The durable storage port.
//!
//! A [`Slot`] is a named key-value location holding one serialised string per
//! key. The record store reads its key once at startup and rewrites it
//! wholesale after every mutation; nothing else about the backend matters.

use std::{cell::RefCell, collections::HashMap, convert::Infallible, rc::Rc};

/// Abstraction over a durable key-value backend.
///
/// Implemented by storage backends (e.g. `intake-store-sqlite`). Methods take
/// `&self`; backends that need mutation use interior mutability.
pub trait Slot {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the value stored under `key`. Returns `None` if nothing is stored.
  fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

  /// Store `value` under `key`, replacing any previous value.
  fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// An in-memory [`Slot`].
///
/// Clones share the same map, so a second store opened on a clone observes
/// everything the first one wrote, the way a fresh process would observe a
/// durable backend.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
  entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemorySlot {
  pub fn new() -> Self { Self::default() }

  /// Raw contents of `key`, bypassing the trait.
  pub fn peek(&self, key: &str) -> Option<String> {
    self.entries.borrow().get(key).cloned()
  }
}

impl Slot for MemorySlot {
  type Error = Infallible;

  fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
    Ok(self.peek(key))
  }

  fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
    self
      .entries
      .borrow_mut()
      .insert(key.to_owned(), value.to_owned());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clones_share_contents() {
    let a = MemorySlot::new();
    let b = a.clone();
    a.set("k", "v1").unwrap();
    assert_eq!(b.get("k").unwrap().as_deref(), Some("v1"));
    b.set("k", "v2").unwrap();
    assert_eq!(a.peek("k").as_deref(), Some("v2"));
    assert_eq!(a.get("other").unwrap(), None);
  }
}
