//! Handlers for `GET /stats` and `GET /whoami`.

use axum::{Json, extract::State};
use ideabox_core::{identity::Identity, stats::Stats, store::SuggestionStore};

use crate::{AppState, auth::MaybeIdentity, error::ApiError};

/// `GET /stats`: `{all, pending, reviewed, implemented, rejected}`
pub async fn handler<S: SuggestionStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Stats>, ApiError> {
  Ok(Json(state.service.get_stats().await?))
}

/// `GET /whoami`: the authenticated identity, or 401 when anonymous.
pub async fn whoami(
  MaybeIdentity(identity): MaybeIdentity,
) -> Result<Json<Identity>, ApiError> {
  identity
    .map(Json)
    .ok_or_else(|| ApiError::Unauthorized("not signed in".into()))
}
