//! Business rules over a [`SuggestionStore`].
//!
//! The service keeps no state of its own between calls. It holds a store
//! handle and the sending half of the change feed that [`Watch`] handles
//! listen on.

use std::sync::Arc;

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
  Error, Result,
  identity::Identity,
  live::{Change, LiveQuery, Watch},
  stats::Stats,
  store::{Patched, SuggestionStore},
  suggestion::{Suggestion, SuggestionDraft, SuggestionPatch, SuggestionStatus},
};

/// Buffered changes per subscriber before it is reported as lagging.
pub(crate) const CHANGE_FEED_CAPACITY: usize = 64;

/// Query and mutation contract over a suggestion store.
///
/// Cloning is cheap; clones share the store and the change feed.
pub struct SuggestionService<S> {
  store:   Arc<S>,
  changes: broadcast::Sender<Change>,
}

impl<S> Clone for SuggestionService<S> {
  fn clone(&self) -> Self {
    Self {
      store:   Arc::clone(&self.store),
      changes: self.changes.clone(),
    }
  }
}

impl<S: SuggestionStore> SuggestionService<S> {
  pub fn new(store: Arc<S>) -> Self {
    let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
    Self { store, changes }
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// All suggestions, newest first.
  pub async fn list(&self) -> Result<Vec<Suggestion>> {
    list_by_status(self.store.as_ref(), None).await
  }

  /// Suggestions with the given status, newest first. `None` or an empty
  /// string lists everything; an unknown status matches nothing.
  pub async fn list_by_status(
    &self,
    status: Option<&str>,
  ) -> Result<Vec<Suggestion>> {
    list_by_status(self.store.as_ref(), status).await
  }

  /// A single suggestion.
  pub async fn get(&self, id: Uuid) -> Result<Suggestion> {
    self
      .store
      .get(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound(id))
  }

  /// Counts per status over a single scan.
  pub async fn get_stats(&self) -> Result<Stats> {
    stats(self.store.as_ref()).await
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Validate and persist a submission. Anonymous submissions are allowed;
  /// when `identity` is present it fills in missing author fields.
  ///
  /// The new record always starts as [`SuggestionStatus::Pending`].
  pub async fn create(
    &self,
    draft: SuggestionDraft,
    identity: Option<&Identity>,
  ) -> Result<Uuid> {
    let input = draft.validate(identity)?;
    let suggestion = self.store.insert(input).await.map_err(Error::store)?;

    tracing::info!(
      id = %suggestion.id,
      anonymous = identity.is_none(),
      "suggestion created"
    );
    self.publish(Change::Created {
      id:     suggestion.id,
      status: suggestion.status,
    });

    Ok(suggestion.id)
  }

  /// Overwrite a suggestion's status and return the updated record.
  ///
  /// Fails with [`Error::Unauthorized`] without a moderating identity,
  /// [`Error::InvalidArgument`] for a status outside the enumeration, and
  /// [`Error::NotFound`] for an unknown id. Any status may follow any other.
  pub async fn update_status(
    &self,
    id: Uuid,
    status: &str,
    identity: Option<&Identity>,
  ) -> Result<Suggestion> {
    let Some(actor) = identity.filter(|i| i.can_moderate()) else {
      tracing::warn!(%id, "status update rejected: not signed in");
      return Err(Error::Unauthorized);
    };
    let status = SuggestionStatus::parse(status)?;

    let Patched { before, after } = self
      .store
      .patch(id, SuggestionPatch::status(status))
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound(id))?;

    tracing::info!(
      %id,
      from = %before.status,
      to = %after.status,
      by = %actor.username,
      "suggestion status updated"
    );
    if before.status != after.status {
      self.publish(Change::StatusChanged {
        id,
        from: before.status,
        to: after.status,
      });
    }

    Ok(after)
  }

  // ── Live queries ──────────────────────────────────────────────────────────

  /// Subscribe to `query`. The returned [`Watch`] yields a fresh result each
  /// time a committed change affects it.
  pub fn watch(&self, query: LiveQuery) -> Watch<S> {
    Watch::new(Arc::clone(&self.store), query, self.changes.subscribe())
  }

  fn publish(&self, change: Change) {
    // An error only means nobody is subscribed.
    let _ = self.changes.send(change);
  }
}

// ─── Shared reads ────────────────────────────────────────────────────────────

pub(crate) async fn list_by_status<S: SuggestionStore>(
  store: &S,
  status: Option<&str>,
) -> Result<Vec<Suggestion>> {
  let status = match status.filter(|s| !s.is_empty()) {
    None => return store.scan_all().await.map_err(Error::store),
    Some(s) => s,
  };

  // A read path: unknown statuses simply match nothing.
  match SuggestionStatus::parse(status) {
    Ok(status) => store.scan_by_status(status).await.map_err(Error::store),
    Err(_) => Ok(Vec::new()),
  }
}

pub(crate) async fn stats<S: SuggestionStore>(store: &S) -> Result<Stats> {
  let all = store.scan_all().await.map_err(Error::store)?;
  Ok(Stats::tally(&all))
}

#[cfg(test)]
pub(crate) mod tests {
  use std::{convert::Infallible, sync::Mutex};

  use chrono::Utc;

  use super::*;
  use crate::{identity::Role, suggestion::NewSuggestion};

  /// A vector-backed store; newest records live at the end.
  #[derive(Default)]
  pub(crate) struct MemoryStore {
    rows: Mutex<Vec<Suggestion>>,
  }

  impl SuggestionStore for MemoryStore {
    type Error = Infallible;

    async fn insert(&self, input: NewSuggestion) -> Result<Suggestion, Infallible> {
      let suggestion = Suggestion {
        id:           Uuid::new_v4(),
        created_at:   Utc::now(),
        title:        input.title,
        description:  input.description,
        status:       SuggestionStatus::Pending,
        author_name:  input.author_name,
        author_email: input.author_email,
      };
      self.rows.lock().unwrap().push(suggestion.clone());
      Ok(suggestion)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Suggestion>, Infallible> {
      Ok(self.rows.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn patch(
      &self,
      id: Uuid,
      patch: SuggestionPatch,
    ) -> Result<Option<Patched>, Infallible> {
      let mut rows = self.rows.lock().unwrap();
      Ok(rows.iter_mut().find(|s| s.id == id).map(|s| {
        let before = s.clone();
        if let Some(status) = patch.status {
          s.status = status;
        }
        Patched { before, after: s.clone() }
      }))
    }

    async fn scan_all(&self) -> Result<Vec<Suggestion>, Infallible> {
      Ok(self.rows.lock().unwrap().iter().rev().cloned().collect())
    }

    async fn scan_by_status(
      &self,
      status: SuggestionStatus,
    ) -> Result<Vec<Suggestion>, Infallible> {
      Ok(
        self
          .rows
          .lock()
          .unwrap()
          .iter()
          .rev()
          .filter(|s| s.status == status)
          .cloned()
          .collect(),
      )
    }
  }

  pub(crate) fn service() -> SuggestionService<MemoryStore> {
    SuggestionService::new(Arc::new(MemoryStore::default()))
  }

  pub(crate) fn admin() -> Identity {
    Identity {
      username: "ava".into(),
      name:     Some("Ava".into()),
      email:    Some("ava@example.com".into()),
      role:     Role::Admin,
    }
  }

  #[tokio::test]
  async fn create_starts_pending() {
    let svc = service();
    let id = svc
      .create(
        SuggestionDraft::new("Add dark mode", "Please add a dark theme")
          .with_author_name("Bo"),
        Some(&admin()),
      )
      .await
      .unwrap();

    let s = svc.get(id).await.unwrap();
    assert_eq!(s.status, SuggestionStatus::Pending);
    assert_eq!(s.author_name.as_deref(), Some("Bo"));
    assert_eq!(s.author_email.as_deref(), Some("ava@example.com"));
  }

  #[tokio::test]
  async fn create_rejects_blank_text_without_writing() {
    let svc = service();
    let err = svc
      .create(SuggestionDraft::new(" ", "d"), None)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(svc.get_stats().await.unwrap().all, 0);
  }

  #[tokio::test]
  async fn list_is_newest_first() {
    let svc = service();
    let mut ids = Vec::new();
    for i in 0..5 {
      ids.push(
        svc
          .create(SuggestionDraft::new(format!("idea {i}"), "d"), None)
          .await
          .unwrap(),
      );
    }
    ids.reverse();

    let listed: Vec<Uuid> =
      svc.list().await.unwrap().into_iter().map(|s| s.id).collect();
    assert_eq!(listed, ids);
  }

  #[tokio::test]
  async fn list_by_status_empty_or_absent_lists_all() {
    let svc = service();
    svc.create(SuggestionDraft::new("a", "d"), None).await.unwrap();
    svc.create(SuggestionDraft::new("b", "d"), None).await.unwrap();

    assert_eq!(svc.list_by_status(None).await.unwrap().len(), 2);
    assert_eq!(svc.list_by_status(Some("")).await.unwrap().len(), 2);
  }

  #[tokio::test]
  async fn list_by_unknown_status_is_empty_not_an_error() {
    let svc = service();
    svc.create(SuggestionDraft::new("a", "d"), None).await.unwrap();
    assert!(svc.list_by_status(Some("shipped")).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn list_by_status_is_filtered_subset_in_order() {
    let svc = service();
    let mut ids = Vec::new();
    for i in 0..6 {
      ids.push(
        svc
          .create(SuggestionDraft::new(format!("idea {i}"), "d"), None)
          .await
          .unwrap(),
      );
    }
    for id in [ids[0], ids[2], ids[5]] {
      svc.update_status(id, "reviewed", Some(&admin())).await.unwrap();
    }

    let expected: Vec<Uuid> = svc
      .list()
      .await
      .unwrap()
      .into_iter()
      .filter(|s| s.status == SuggestionStatus::Reviewed)
      .map(|s| s.id)
      .collect();
    let reviewed: Vec<Uuid> = svc
      .list_by_status(Some("reviewed"))
      .await
      .unwrap()
      .into_iter()
      .map(|s| s.id)
      .collect();

    assert_eq!(reviewed, expected);
    assert_eq!(reviewed, vec![ids[5], ids[2], ids[0]]);
  }

  #[tokio::test]
  async fn update_status_requires_identity() {
    let svc = service();
    let id = svc.create(SuggestionDraft::new("a", "d"), None).await.unwrap();

    let err = svc.update_status(id, "implemented", None).await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized));
    assert_eq!(svc.get(id).await.unwrap().status, SuggestionStatus::Pending);
  }

  #[tokio::test]
  async fn update_status_unknown_id_is_not_found() {
    let svc = service();
    let missing = Uuid::new_v4();
    let err = svc
      .update_status(missing, "reviewed", Some(&admin()))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::NotFound(id) if id == missing));
  }

  #[tokio::test]
  async fn update_status_rejects_values_outside_enumeration() {
    let svc = service();
    let id = svc.create(SuggestionDraft::new("a", "d"), None).await.unwrap();

    let err = svc
      .update_status(id, "archived", Some(&admin()))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(svc.get(id).await.unwrap().status, SuggestionStatus::Pending);
  }

  #[tokio::test]
  async fn update_status_changes_only_status() {
    let svc = service();
    let id = svc
      .create(
        SuggestionDraft::new("t", "d")
          .with_author_name("Bo")
          .with_author_email("bo@example.com"),
        None,
      )
      .await
      .unwrap();
    let before = svc.get(id).await.unwrap();

    let after = svc
      .update_status(id, "implemented", Some(&admin()))
      .await
      .unwrap();

    assert_eq!(after.status, SuggestionStatus::Implemented);
    assert_eq!(
      Suggestion { status: before.status, ..after.clone() },
      before
    );
  }

  #[tokio::test]
  async fn any_status_may_follow_any_other() {
    let svc = service();
    let id = svc.create(SuggestionDraft::new("a", "d"), None).await.unwrap();
    for to in ["rejected", "implemented", "pending", "reviewed", "reviewed"] {
      let s = svc.update_status(id, to, Some(&admin())).await.unwrap();
      assert_eq!(s.status.as_str(), to);
    }
  }

  #[tokio::test]
  async fn stats_sum_to_all() {
    let svc = service();
    let mut ids = Vec::new();
    for i in 0..7 {
      ids.push(
        svc
          .create(SuggestionDraft::new(format!("idea {i}"), "d"), None)
          .await
          .unwrap(),
      );
    }
    svc.update_status(ids[0], "reviewed", Some(&admin())).await.unwrap();
    svc.update_status(ids[1], "rejected", Some(&admin())).await.unwrap();
    svc.update_status(ids[2], "implemented", Some(&admin())).await.unwrap();
    svc.update_status(ids[3], "implemented", Some(&admin())).await.unwrap();

    let stats = svc.get_stats().await.unwrap();
    assert_eq!(stats.all, 7);
    assert_eq!(stats.pending, 3);
    assert_eq!(stats.reviewed, 1);
    assert_eq!(stats.implemented, 2);
    assert_eq!(stats.rejected, 1);
    assert_eq!(
      stats.all,
      stats.pending + stats.reviewed + stats.implemented + stats.rejected
    );
  }
}
