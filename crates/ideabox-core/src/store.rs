//! The `SuggestionStore` trait.
//!
//! Implemented by storage backends (e.g. `ideabox-store-sqlite`). The
//! [`SuggestionService`](crate::SuggestionService) and everything above it
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::suggestion::{
  NewSuggestion, Suggestion, SuggestionPatch, SuggestionStatus,
};

/// The outcome of a [`SuggestionStore::patch`]. `before` is read in the same
/// atomic step as the write, so no other write falls between the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
  pub before: Suggestion,
  pub after:  Suggestion,
}

/// Durable keyed storage of suggestions with a secondary index on status.
///
/// Scans return records newest first. Records created within the same clock
/// tick keep their insertion order, so ordering is stable.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait SuggestionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new record. The store assigns `id` and `created_at` and sets
  /// the status to [`SuggestionStatus::Pending`].
  fn insert(
    &self,
    input: NewSuggestion,
  ) -> impl Future<Output = Result<Suggestion, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Suggestion>, Self::Error>> + Send + '_;

  /// Merge `patch` into the record atomically and return the record as it
  /// was immediately before and after the write. Returns `None` if `id` does
  /// not exist; nothing is written in that case.
  fn patch(
    &self,
    id: Uuid,
    patch: SuggestionPatch,
  ) -> impl Future<Output = Result<Option<Patched>, Self::Error>> + Send + '_;

  /// Every record, newest first.
  fn scan_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Suggestion>, Self::Error>> + Send + '_;

  /// Records with the given status, newest first. Served by the status index.
  fn scan_by_status(
    &self,
    status: SuggestionStatus,
  ) -> impl Future<Output = Result<Vec<Suggestion>, Self::Error>> + Send + '_;
}
