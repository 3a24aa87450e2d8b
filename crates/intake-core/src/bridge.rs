//! The edit hand-off between the list view and the form.

use crate::record::Record;

/// Where the presentation layer should go next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
  Form,
  Records,
}

/// Carries one record selected in the list view to the form session.
///
/// The target stays pending until a [`crate::session::FormSession`] consumes
/// it on entry, or until it is cleared.
#[derive(Debug, Clone, Default)]
pub struct EditBridge {
  pending: Option<Record>,
}

impl EditBridge {
  pub fn new() -> Self { Self::default() }

  /// Make `record` the pending edit target, replacing any earlier one, and
  /// ask for the form view.
  #[must_use = "the caller should navigate to the returned route"]
  pub fn request_edit(&mut self, record: Record) -> Route {
    tracing::debug!(id = ?record.id, "edit requested");
    self.pending = Some(record);
    Route::Form
  }

  pub fn pending(&self) -> Option<&Record> { self.pending.as_ref() }

  pub fn is_pending(&self) -> bool { self.pending.is_some() }

  pub fn clear(&mut self) { self.pending = None; }
}
