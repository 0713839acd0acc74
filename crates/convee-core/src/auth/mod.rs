//! Authentication module for managing the admin session.
//!
//! This module provides:
//! - `SessionStore`: login, logout, startup probe and the unauthorized guard
//! - `SessionStorage`: persistence of the session record (file, keychain, memory)
//! - `is_expired`: the pure absolute-lifetime rule
//!
//! Sessions are persisted as a single record and expire 6 hours after login,
//! regardless of how long the backend would keep accepting the token.

pub mod credentials;
pub mod error;
pub mod expiry;
pub mod keychain;
pub mod session;
pub mod storage;

pub use credentials::Credentials;
pub use error::SessionError;
pub use expiry::{is_expired, remaining, session_limit, SESSION_LIMIT_HOURS};
pub use keychain::KeychainStorage;
pub use session::{SessionState, SessionStore, Startup};
pub use storage::{FileStorage, MemoryStorage, SessionRecord, SessionStorage, StorageError};
