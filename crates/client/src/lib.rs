//! Typed HTTP client for the QuestForge API.
//!
//! [`Client`] wraps one endpoint per method and keeps the bearer token in a
//! pluggable [`TokenStore`]: signup and login store it, logout clears it, and
//! authenticated calls attach it.

pub mod client;
pub mod error;
pub mod models;
pub mod token_store;

pub use client::Client;
pub use error::{ClientError, TokenStoreError};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
