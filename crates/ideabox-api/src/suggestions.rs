//! Handlers for `/suggestions` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/suggestions` | Optional `?status=pending\|reviewed\|implemented\|rejected` |
//! | `POST`  | `/suggestions` | Body: [`SuggestionDraft`]; returns 201 + `{"id": ...}` |
//! | `GET`   | `/suggestions/:id` | 404 if not found |
//! | `PATCH` | `/suggestions/:id/status` | Body: `{"status":"reviewed"}`; requires auth |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use ideabox_core::{
  store::SuggestionStore,
  suggestion::{Suggestion, SuggestionDraft},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, auth::MaybeIdentity, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Unknown values match nothing rather than failing.
  pub status: Option<String>,
}

/// `GET /suggestions[?status=<status>]`
pub async fn list<S: SuggestionStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Suggestion>>, ApiError> {
  let suggestions = state
    .service
    .list_by_status(params.status.as_deref())
    .await?;
  Ok(Json(suggestions))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /suggestions/:id`
pub async fn get_one<S: SuggestionStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Suggestion>, ApiError> {
  Ok(Json(state.service.get(id).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
  pub id: Uuid,
}

/// `POST /suggestions`, anonymous or authenticated.
pub async fn create<S: SuggestionStore>(
  State(state): State<AppState<S>>,
  MaybeIdentity(identity): MaybeIdentity,
  Json(draft): Json<SuggestionDraft>,
) -> Result<impl IntoResponse, ApiError> {
  let id = state.service.create(draft, identity.as_ref()).await?;
  Ok((StatusCode::CREATED, Json(Created { id })))
}

// ─── Update status ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: String,
}

/// `PATCH /suggestions/:id/status`, body: `{"status":"implemented"}`
pub async fn update_status<S: SuggestionStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  MaybeIdentity(identity): MaybeIdentity,
  Json(body): Json<StatusBody>,
) -> Result<Json<Suggestion>, ApiError> {
  let updated = state
    .service
    .update_status(id, &body.status, identity.as_ref())
    .await?;
  Ok(Json(updated))
}
