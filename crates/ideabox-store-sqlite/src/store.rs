//! The SQLite implementation of [`SuggestionStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use ideabox_core::{
  store::{Patched, SuggestionStore},
  suggestion::{NewSuggestion, Suggestion, SuggestionPatch, SuggestionStatus},
};

use crate::{
  Result,
  encode::{COLUMNS, RawSuggestion, encode_dt, encode_status, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A suggestion store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    tracing::debug!(path = %path.display(), "opening suggestion store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a full-row `SELECT` with an optional status filter, newest first.
  async fn scan(&self, status: Option<SuggestionStatus>) -> Result<Vec<Suggestion>> {
    let status_str = status.map(encode_status);

    let raws: Vec<RawSuggestion> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(s) = status_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM suggestions WHERE status = ?1 ORDER BY seq DESC"
          ))?;
          stmt
            .query_map(rusqlite::params![s], RawSuggestion::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM suggestions ORDER BY seq DESC"
          ))?;
          stmt
            .query_map([], RawSuggestion::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSuggestion::into_suggestion).collect()
  }
}

// ─── SuggestionStore impl ────────────────────────────────────────────────────

impl SuggestionStore for SqliteStore {
  type Error = crate::Error;

  async fn insert(&self, input: NewSuggestion) -> Result<Suggestion> {
    let suggestion = Suggestion {
      id:           Uuid::new_v4(),
      created_at:   Utc::now(),
      title:        input.title,
      description:  input.description,
      status:       SuggestionStatus::Pending,
      author_name:  input.author_name,
      author_email: input.author_email,
    };

    let id_str       = encode_uuid(suggestion.id);
    let at_str       = encode_dt(suggestion.created_at);
    let status_str   = encode_status(suggestion.status);
    let title        = suggestion.title.clone();
    let description  = suggestion.description.clone();
    let author_name  = suggestion.author_name.clone();
    let author_email = suggestion.author_email.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO suggestions (
             id, created_at, title, description, status, author_name, author_email
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            at_str,
            title,
            description,
            status_str,
            author_name,
            author_email,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(suggestion)
  }

  async fn get(&self, id: Uuid) -> Result<Option<Suggestion>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSuggestion> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {COLUMNS} FROM suggestions WHERE id = ?1"),
              rusqlite::params![id_str],
              RawSuggestion::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSuggestion::into_suggestion).transpose()
  }

  async fn patch(
    &self,
    id:    Uuid,
    patch: SuggestionPatch,
  ) -> Result<Option<Patched>> {
    // Status is the only mutable column; an empty patch is a plain read.
    let Some(status) = patch.status else {
      let current = self.get(id).await?;
      return Ok(current.map(|s| Patched { before: s.clone(), after: s }));
    };

    let id_str     = encode_uuid(id);
    let status_str = encode_status(status);

    // The prior row and the write share one transaction.
    let raws: Option<(RawSuggestion, RawSuggestion)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let before = tx
          .query_row(
            &format!("SELECT {COLUMNS} FROM suggestions WHERE id = ?1"),
            rusqlite::params![id_str],
            RawSuggestion::from_row,
          )
          .optional()?;
        let Some(before) = before else {
          return Ok(None);
        };
        let after = tx.query_row(
          &format!(
            "UPDATE suggestions SET status = ?2 WHERE id = ?1 RETURNING {COLUMNS}"
          ),
          rusqlite::params![id_str, status_str],
          RawSuggestion::from_row,
        )?;
        tx.commit()?;
        Ok(Some((before, after)))
      })
      .await?;

    raws
      .map(|(before, after)| -> Result<Patched> {
        Ok(Patched {
          before: before.into_suggestion()?,
          after:  after.into_suggestion()?,
        })
      })
      .transpose()
  }

  async fn scan_all(&self) -> Result<Vec<Suggestion>> { self.scan(None).await }

  async fn scan_by_status(
    &self,
    status: SuggestionStatus,
  ) -> Result<Vec<Suggestion>> {
    self.scan(Some(status)).await
  }
}
