//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings, and statuses by their lowercase name.

use chrono::{DateTime, Utc};
use ideabox_core::suggestion::{Suggestion, SuggestionStatus};
use uuid::Uuid;

use crate::{Error, Result};

/// Column list shared by every query that reads a full suggestion row, in the
/// order [`RawSuggestion::from_row`] expects.
pub const COLUMNS: &str =
  "id, created_at, title, description, status, author_name, author_email";

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── SuggestionStatus ─────────────────────────────────────────────────────────

pub fn encode_status(s: SuggestionStatus) -> &'static str { s.as_str() }

pub fn decode_status(s: &str) -> Result<SuggestionStatus> {
  s.parse().map_err(|_| Error::UnknownStatus(s.to_owned()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `suggestions` row.
pub struct RawSuggestion {
  pub id:           String,
  pub created_at:   String,
  pub title:        String,
  pub description:  String,
  pub status:       String,
  pub author_name:  Option<String>,
  pub author_email: Option<String>,
}

impl RawSuggestion {
  /// Read a row selected with [`COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      created_at:   row.get(1)?,
      title:        row.get(2)?,
      description:  row.get(3)?,
      status:       row.get(4)?,
      author_name:  row.get(5)?,
      author_email: row.get(6)?,
    })
  }

  pub fn into_suggestion(self) -> Result<Suggestion> {
    Ok(Suggestion {
      id:           decode_uuid(&self.id)?,
      created_at:   decode_dt(&self.created_at)?,
      title:        self.title,
      description:  self.description,
      status:       decode_status(&self.status)?,
      author_name:  self.author_name,
      author_email: self.author_email,
    })
  }
}
