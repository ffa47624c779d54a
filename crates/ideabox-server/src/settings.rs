//! Runtime configuration, read from a TOML file layered with `IDEABOX_*`
//! environment variables.
//!
//! ```toml
//! host       = "0.0.0.0"
//! port       = 8080
//! store_path = "~/.local/share/ideabox/ideabox.db"
//!
//! [[admins]]
//! username      = "ava"
//! name          = "Ava"
//! email         = "ava@example.com"
//! password_hash = "$argon2id$v=19$..."
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use ideabox_api::AdminAccount;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  #[serde(default)]
  pub admins:     Vec<AdminAccount>,
}

impl ServerConfig {
  /// Load from `path` (optional on disk) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080)?
      .set_default("store_path", "ideabox.db")?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("IDEABOX"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
