//! JSON REST API for Ideabox.
//!
//! Exposes an axum [`Router`] over a [`SuggestionService`] backed by any
//! [`SuggestionStore`]. Identity comes from HTTP Basic auth checked against
//! the configured admin accounts; TLS and transport are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", ideabox_api::api_router(state))
//! ```

pub mod auth;
pub mod error;
pub mod stats;
pub mod suggestions;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch},
};
use ideabox_core::{SuggestionService, store::SuggestionStore};

pub use auth::{AdminAccount, AuthConfig};
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub service: SuggestionService<S>,
  pub auth:    Arc<AuthConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      service: self.service.clone(),
      auth:    Arc::clone(&self.auth),
    }
  }
}

impl<S: SuggestionStore> AppState<S> {
  pub fn new(store: Arc<S>, auth: AuthConfig) -> Self {
    Self {
      service: SuggestionService::new(store),
      auth:    Arc::new(auth),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: SuggestionStore + 'static,
{
  Router::new()
    .route(
      "/suggestions",
      get(suggestions::list::<S>).post(suggestions::create::<S>),
    )
    .route("/suggestions/{id}", get(suggestions::get_one::<S>))
    .route(
      "/suggestions/{id}/status",
      patch(suggestions::update_status::<S>),
    )
    .route("/stats", get(stats::handler::<S>))
    .route("/whoami", get(stats::whoami))
    .with_state(state)
}
