//! Core types, the store trait, and the suggestion service for Ideabox.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! SQLite backend, the JSON API and the binaries all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod identity;
pub mod live;
pub mod service;
pub mod stats;
pub mod store;
pub mod suggestion;

pub use error::{Error, Result};
pub use service::SuggestionService;
