//! Live queries: re-evaluate a read whenever a committed change affects it.
//!
//! Every successful write on a [`SuggestionService`](crate::SuggestionService)
//! publishes a [`Change`] on a broadcast channel. A [`Watch`] subscribes to that
//! channel, filters changes through [`LiveQuery::is_affected_by`], and runs the
//! query again against the store when one matters.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use crate::{
  Result,
  service,
  stats::Stats,
  store::SuggestionStore,
  suggestion::{Suggestion, SuggestionStatus},
};

// ─── Change events ───────────────────────────────────────────────────────────

/// A committed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
  Created {
    id:     Uuid,
    status: SuggestionStatus,
  },
  StatusChanged {
    id:   Uuid,
    from: SuggestionStatus,
    to:   SuggestionStatus,
  },
}

impl Change {
  /// Whether a record with `status` entered or left that status.
  pub fn touches(&self, status: SuggestionStatus) -> bool {
    match *self {
      Self::Created { status: s, .. } => s == status,
      Self::StatusChanged { from, to, .. } => from == status || to == status,
    }
  }
}

// ─── Queries ─────────────────────────────────────────────────────────────────

/// A read operation together with its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiveQuery {
  List,
  ListByStatus(Option<String>),
  Stats,
}

impl LiveQuery {
  /// Whether `change` can alter the result of this query.
  pub fn is_affected_by(&self, change: &Change) -> bool {
    match self {
      Self::List | Self::Stats => true,
      Self::ListByStatus(status) => match status.as_deref() {
        None | Some("") => true,
        // Unknown statuses always match nothing.
        Some(s) => SuggestionStatus::parse(s)
          .map(|status| change.touches(status))
          .unwrap_or(false),
      },
    }
  }
}

/// The value of a [`LiveQuery`] at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LiveResult {
  Suggestions(Vec<Suggestion>),
  Stats(Stats),
}

// ─── Watch ───────────────────────────────────────────────────────────────────

/// A subscription to one [`LiveQuery`].
///
/// Changes committed before the watch was created are not replayed; call
/// [`Watch::current`] for the starting value.
pub struct Watch<S> {
  store:   Arc<S>,
  query:   LiveQuery,
  changes: broadcast::Receiver<Change>,
}

impl<S: SuggestionStore> Watch<S> {
  pub(crate) fn new(
    store: Arc<S>,
    query: LiveQuery,
    changes: broadcast::Receiver<Change>,
  ) -> Self {
    Self { store, query, changes }
  }

  /// Evaluate the query now.
  pub async fn current(&self) -> Result<LiveResult> {
    let store = self.store.as_ref();
    Ok(match &self.query {
      LiveQuery::List => {
        LiveResult::Suggestions(service::list_by_status(store, None).await?)
      }
      LiveQuery::ListByStatus(status) => LiveResult::Suggestions(
        service::list_by_status(store, status.as_deref()).await?,
      ),
      LiveQuery::Stats => LiveResult::Stats(service::stats(store).await?),
    })
  }

  /// Wait for the next change affecting the query and return the fresh
  /// result. Returns `Ok(None)` once every service handle has been dropped.
  pub async fn next(&mut self) -> Result<Option<LiveResult>> {
    loop {
      match self.changes.recv().await {
        Ok(change) if self.query.is_affected_by(&change) => break,
        Ok(_) => continue,
        Err(RecvError::Lagged(skipped)) => {
          tracing::debug!(skipped, "live query lagged; re-evaluating");
          break;
        }
        Err(RecvError::Closed) => return Ok(None),
      }
    }
    self.current().await.map(Some)
  }
}
