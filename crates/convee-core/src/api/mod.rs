//! REST API client module for the Directus backend.
//!
//! This module provides the `ApiClient` for logging in, probing the current
//! user, logging out, and reading items from a collection.
//!
//! Calls go through the `Backend` trait so the session logic can run against
//! any implementation, including scripted ones in tests.

pub mod backend;
pub mod client;
pub mod error;
pub mod query;

pub use backend::{Backend, LoginGrant};
pub use client::ApiClient;
pub use error::ApiError;
pub use query::QueryOptions;
