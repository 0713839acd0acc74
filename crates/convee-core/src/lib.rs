//! Core library for the Convee admin console.
//!
//! This crate owns everything below the user interface:
//!
//! - `auth`: the `SessionStore` and its persisted session record
//! - `api`: the Directus REST client behind the `Backend` trait
//! - `fetch`: collection reads routed through the session guard
//! - `models`: identity and record types plus table helpers
//! - `config`: on-disk configuration with environment overrides

pub mod api;
pub mod auth;
pub mod config;
pub mod fetch;
pub mod models;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiClient, ApiError, Backend, QueryOptions};
pub use auth::{
    Credentials, FileStorage, KeychainStorage, MemoryStorage, SessionError, SessionRecord,
    SessionState, SessionStorage, SessionStore, Startup, StorageError, SESSION_LIMIT_HOURS,
};
pub use config::{Config, StorageKind};
pub use fetch::{fetch_collection, fetch_inquiries};
pub use models::{Identity, Record};
