//! Suggestion types for the single entity of the Ideabox store.
//!
//! A suggestion is written once by the submission path. After that only its
//! [`SuggestionStatus`] ever changes.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, identity::Identity};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Review state of a suggestion. Any state may move to any other.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SuggestionStatus {
  #[default]
  Pending,
  Reviewed,
  Implemented,
  Rejected,
}

impl SuggestionStatus {
  /// Every status, in display order.
  pub const ALL: [Self; 4] =
    [Self::Pending, Self::Reviewed, Self::Implemented, Self::Rejected];

  /// The lowercase name stored in the `status` column.
  pub fn as_str(self) -> &'static str { self.into() }

  /// Parse a caller-supplied status, rejecting anything outside the
  /// enumeration with [`Error::InvalidArgument`].
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| {
      Error::InvalidArgument(format!(
        "unknown status {s:?}; expected one of pending, reviewed, implemented, rejected"
      ))
    })
  }
}

// ─── Suggestion ──────────────────────────────────────────────────────────────

/// A persisted suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
  pub id:           Uuid,
  /// Store-assigned; never changes after creation.
  pub created_at:   DateTime<Utc>,
  pub title:        String,
  pub description:  String,
  pub status:       SuggestionStatus,
  pub author_name:  Option<String>,
  pub author_email: Option<String>,
}

// ─── Store input ─────────────────────────────────────────────────────────────

/// Input to [`crate::store::SuggestionStore::insert`].
///
/// There is no `status` field: the store always starts a record at
/// [`SuggestionStatus::Pending`]. `id` and `created_at` are likewise assigned
/// by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSuggestion {
  pub title:        String,
  pub description:  String,
  pub author_name:  Option<String>,
  pub author_email: Option<String>,
}

/// Fields that may be merged into an existing record by
/// [`crate::store::SuggestionStore::patch`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuggestionPatch {
  pub status: Option<SuggestionStatus>,
}

impl SuggestionPatch {
  pub fn status(status: SuggestionStatus) -> Self {
    Self { status: Some(status) }
  }
}

// ─── Submission ──────────────────────────────────────────────────────────────

/// A submission as it arrives from a visitor, before validation and author
/// attribution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionDraft {
  pub title:        String,
  pub description:  String,
  #[serde(default)]
  pub author_name:  Option<String>,
  #[serde(default)]
  pub author_email: Option<String>,
}

impl SuggestionDraft {
  pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      description: description.into(),
      author_name: None,
      author_email: None,
    }
  }

  pub fn with_author_name(mut self, name: impl Into<String>) -> Self {
    self.author_name = Some(name.into());
    self
  }

  pub fn with_author_email(mut self, email: impl Into<String>) -> Self {
    self.author_email = Some(email.into());
    self
  }

  /// Trim the draft, reject blank title or description, and resolve author
  /// attribution against the submitting identity.
  ///
  /// Name: explicit, then the identity's name, then its email.
  /// Email: explicit, then the identity's email.
  pub fn validate(self, identity: Option<&Identity>) -> Result<NewSuggestion> {
    let title = self.title.trim();
    if title.is_empty() {
      return Err(Error::InvalidArgument("title must not be empty".into()));
    }
    let description = self.description.trim();
    if description.is_empty() {
      return Err(Error::InvalidArgument(
        "description must not be empty".into(),
      ));
    }

    let identity_name = identity.and_then(|i| non_blank(i.name.as_deref()));
    let identity_email = identity.and_then(|i| non_blank(i.email.as_deref()));

    let author_name = non_blank(self.author_name.as_deref())
      .or(identity_name)
      .or(identity_email)
      .map(str::to_owned);
    let author_email = non_blank(self.author_email.as_deref())
      .or(identity_email)
      .map(str::to_owned);

    Ok(NewSuggestion {
      title: title.to_owned(),
      description: description.to_owned(),
      author_name,
      author_email,
    })
  }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
  s.map(str::trim).filter(|s| !s.is_empty())
}
