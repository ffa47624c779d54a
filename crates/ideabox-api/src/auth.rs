//! HTTP Basic-auth identity provider.
//!
//! Credentials are checked against the configured [`AdminAccount`]s. A request
//! without an `Authorization` header is anonymous; a request with a header
//! that does not verify is rejected outright.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use ideabox_core::{identity::Identity, store::SuggestionStore};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

/// An account allowed to sign in. Every account moderates.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminAccount {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  /// Display name; used as the default author of this account's submissions.
  #[serde(default)]
  pub name:          Option<String>,
  #[serde(default)]
  pub email:         Option<String>,
}

impl AdminAccount {
  fn identity(&self) -> Identity {
    let mut identity = Identity::new(&self.username);
    identity.name = self.name.clone();
    identity.email = self.email.clone();
    identity
  }
}

/// Accounts accepted by this server instance.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
  pub accounts: Vec<AdminAccount>,
}

/// The caller's identity, or `None` for an anonymous request.
pub struct MaybeIdentity(pub Option<Identity>);

fn unauthorized() -> ApiError { ApiError::Unauthorized("invalid credentials".into()) }

/// Resolve the caller from request headers.
pub fn identify(
  headers: &HeaderMap,
  config: &AuthConfig,
) -> Result<Option<Identity>, ApiError> {
  let Some(header_val) = headers.get(axum::http::header::AUTHORIZATION) else {
    return Ok(None);
  };

  let encoded = header_val
    .to_str()
    .ok()
    .and_then(|v| v.strip_prefix("Basic "))
    .ok_or_else(unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| unauthorized())?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| unauthorized())?;

  let (username, password) = creds.split_once(':').ok_or_else(unauthorized)?;

  let account = config
    .accounts
    .iter()
    .find(|a| a.username == username)
    .ok_or_else(unauthorized)?;

  let parsed_hash =
    PasswordHash::new(&account.password_hash).map_err(|_| unauthorized())?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| {
      tracing::info!(%username, "rejected sign-in");
      unauthorized()
    })?;

  Ok(Some(account.identity()))
}

impl<S> FromRequestParts<AppState<S>> for MaybeIdentity
where
  S: SuggestionStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    identify(&parts.headers, &state.auth).map(MaybeIdentity)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use argon2::{PasswordHasher, password_hash::SaltString};
  use axum::http::{HeaderValue, header};
  use rand_core::OsRng;

  fn config(password: &str) -> AuthConfig {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    AuthConfig {
      accounts: vec![AdminAccount {
        username:      "ava".to_string(),
        password_hash: hash,
        name:          Some("Ava".to_string()),
        email:         None,
      }],
    }
  }

  fn headers(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
  }

  fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  #[test]
  fn correct_credentials() {
    let cfg = config("secret");
    let identity = identify(&headers(&basic("ava", "secret")), &cfg)
      .unwrap()
      .unwrap();
    assert_eq!(identity.username, "ava");
    assert_eq!(identity.name.as_deref(), Some("Ava"));
    assert!(identity.can_moderate());
  }

  #[test]
  fn missing_header_is_anonymous() {
    let cfg = config("secret");
    assert!(identify(&HeaderMap::new(), &cfg).unwrap().is_none());
  }

  #[test]
  fn wrong_password() {
    let cfg = config("secret");
    let result = identify(&headers(&basic("ava", "wrong")), &cfg);
    assert!(matches!(result, Err(ApiError::Unauthorized(_))));
  }

  #[test]
  fn unknown_user() {
    let cfg = config("secret");
    let result = identify(&headers(&basic("mallory", "secret")), &cfg);
    assert!(matches!(result, Err(ApiError::Unauthorized(_))));
  }

  #[test]
  fn invalid_base64() {
    let cfg = config("secret");
    let result = identify(&headers("Basic !!!not-base64!!!"), &cfg);
    assert!(matches!(result, Err(ApiError::Unauthorized(_))));
  }

  #[test]
  fn non_basic_scheme() {
    let cfg = config("secret");
    let result = identify(&headers("Bearer abc"), &cfg);
    assert!(matches!(result, Err(ApiError::Unauthorized(_))));
  }
}
