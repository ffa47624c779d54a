//! Error types for `ideabox-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// The caller broke the input contract (blank text, unknown status).
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("must be signed in as an administrator")]
  Unauthorized,

  #[error("suggestion not found: {0}")]
  NotFound(Uuid),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
