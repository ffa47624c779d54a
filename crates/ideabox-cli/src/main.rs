//! `ideabox`: command-line client for the Ideabox suggestion box.
//!
//! # Usage
//!
//! ```text
//! ideabox submit --title "Add dark mode" --description "Please add a dark theme"
//! ideabox list --status pending
//! ideabox --user ava --password secret set-status <id> implemented
//! ideabox --config ~/.config/ideabox/config.toml stats
//! ```

mod client;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use ideabox_core::suggestion::SuggestionDraft;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "ideabox", about = "Command-line client for Ideabox")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the ideabox server (default: http://localhost:8080).
  #[arg(long, env = "IDEABOX_URL")]
  url: Option<String>,

  /// Admin username.
  #[arg(long, env = "IDEABOX_USER")]
  user: Option<String>,

  /// Admin password (plaintext).
  #[arg(long, env = "IDEABOX_PASSWORD")]
  password: Option<String>,

  /// Print raw JSON instead of formatted text.
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Submit a new idea.
  Submit {
    #[arg(long)]
    title:       String,
    #[arg(long)]
    description: String,
    /// Author name; defaults to the signed-in account's name.
    #[arg(long)]
    name:        Option<String>,
    /// Author email; defaults to the signed-in account's email.
    #[arg(long)]
    email:       Option<String>,
  },
  /// List ideas, newest first.
  List {
    /// Only show ideas with this status.
    #[arg(long)]
    status: Option<String>,
  },
  /// Show one idea.
  Show { id: Uuid },
  /// Show counts per status.
  Stats,
  /// Change an idea's status (requires --user/--password).
  SetStatus { id: Uuid, status: String },
  /// Show the signed-in account.
  Whoami,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

/// CLI flags override the config file, which overrides defaults.
fn resolve_config(args: &Args, file_cfg: ConfigFile) -> ApiConfig {
  let non_empty = |s: String| (!s.is_empty()).then_some(s);
  ApiConfig {
    base_url: args
      .url
      .clone()
      .or_else(|| non_empty(file_cfg.url))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    username: args
      .user
      .clone()
      .or_else(|| non_empty(file_cfg.username))
      .unwrap_or_default(),
    password: args
      .password
      .clone()
      .or_else(|| non_empty(file_cfg.password))
      .unwrap_or_default(),
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_max_level(LevelFilter::WARN)
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let api_config = resolve_config(&args, file_cfg);
  tracing::debug!(url = %api_config.base_url, "using server");
  let client = ApiClient::new(api_config)?;

  match args.command {
    Command::Submit { title, description, name, email } => {
      let draft = SuggestionDraft {
        title,
        description,
        author_name: name,
        author_email: email,
      };
      let id = client.submit(&draft).await?;
      if args.json {
        print_json(&serde_json::json!({ "id": id }))?;
      } else {
        println!("submitted {id}");
      }
    }
    Command::List { status } => {
      let suggestions = client.list(status.as_deref()).await?;
      if args.json {
        print_json(&suggestions)?;
      } else if suggestions.is_empty() {
        println!("no ideas yet");
      } else {
        for s in &suggestions {
          println!("{}", render::summary_line(s));
        }
      }
    }
    Command::Show { id } => {
      let s = client.get(id).await?;
      if args.json {
        print_json(&s)?;
      } else {
        print!("{}", render::detail(&s));
      }
    }
    Command::Stats => {
      let stats = client.stats().await?;
      if args.json {
        print_json(&stats)?;
      } else {
        print!("{}", render::stats(&stats));
      }
    }
    Command::SetStatus { id, status } => {
      let s = client.set_status(id, &status).await?;
      if args.json {
        print_json(&s)?;
      } else {
        println!("{}", render::summary_line(&s));
      }
    }
    Command::Whoami => {
      let identity = client.whoami().await?;
      if args.json {
        print_json(&identity)?;
      } else {
        println!("{}", render::identity(&identity));
      }
    }
  }

  Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
