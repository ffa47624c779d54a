//! Async HTTP client wrapping the ideabox JSON API.

use anyhow::{Context, Result, anyhow};
use ideabox_core::{
  identity::Identity,
  stats::Stats,
  suggestion::{Suggestion, SuggestionDraft},
};
use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

/// Connection settings for the ideabox API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Async HTTP client for the ideabox JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

#[derive(Deserialize)]
struct Created {
  id: Uuid,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// Turn a non-2xx response into an error carrying the server's message.
  async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
      let message = resp
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
        .unwrap_or_else(|| status.to_string());
      return Err(anyhow!("{what} → {status}: {message}"));
    }
    resp.json().await.with_context(|| format!("deserialising {what}"))
  }

  // ── Suggestions ───────────────────────────────────────────────────────────

  /// `GET /api/suggestions[?status=<s>]`
  pub async fn list(&self, status: Option<&str>) -> Result<Vec<Suggestion>> {
    let mut req = self.client.get(self.url("/suggestions"));
    if let Some(status) = status {
      req = req.query(&[("status", status)]);
    }
    let resp = self
      .auth(req)
      .send()
      .await
      .context("GET /suggestions failed")?;
    Self::decode(resp, "suggestions").await
  }

  /// `GET /api/suggestions/<id>`
  pub async fn get(&self, id: Uuid) -> Result<Suggestion> {
    let resp = self
      .auth(self.client.get(self.url(&format!("/suggestions/{id}"))))
      .send()
      .await
      .with_context(|| format!("GET /suggestions/{id} failed"))?;
    Self::decode(resp, "suggestion").await
  }

  /// `POST /api/suggestions`
  pub async fn submit(&self, draft: &SuggestionDraft) -> Result<Uuid> {
    let resp = self
      .auth(self.client.post(self.url("/suggestions")))
      .json(draft)
      .send()
      .await
      .context("POST /suggestions failed")?;
    Ok(Self::decode::<Created>(resp, "created suggestion").await?.id)
  }

  /// `PATCH /api/suggestions/<id>/status`
  pub async fn set_status(&self, id: Uuid, status: &str) -> Result<Suggestion> {
    let resp = self
      .auth(self.client.patch(self.url(&format!("/suggestions/{id}/status"))))
      .json(&json!({ "status": status }))
      .send()
      .await
      .with_context(|| format!("PATCH /suggestions/{id}/status failed"))?;
    Self::decode(resp, "updated suggestion").await
  }

  // ── Stats & identity ──────────────────────────────────────────────────────

  /// `GET /api/stats`
  pub async fn stats(&self) -> Result<Stats> {
    let resp = self
      .auth(self.client.get(self.url("/stats")))
      .send()
      .await
      .context("GET /stats failed")?;
    Self::decode(resp, "stats").await
  }

  /// `GET /api/whoami`
  pub async fn whoami(&self) -> Result<Identity> {
    let resp = self
      .auth(self.client.get(self.url("/whoami")))
      .send()
      .await
      .context("GET /whoami failed")?;
    Self::decode(resp, "identity").await
  }
}
