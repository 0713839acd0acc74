use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Canonical key the session record is stored under.
pub const SESSION_KEY: &str = "convee_session";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Persisted session is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keychain(#[from] keyring::Error),
}

/// The persisted session: token and issue time always travel together.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub token: String,
    /// Milliseconds since the Unix epoch on disk.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub issued_at: DateTime<Utc>,
    /// Only used to end the session remotely on logout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl SessionRecord {
    pub fn new(token: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            issued_at,
            refresh_token: None,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: Option<String>) -> Self {
        self.refresh_token = refresh_token;
        self
    }
}

impl fmt::Debug for SessionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRecord")
            .field("token", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish()
    }
}

/// Durable key-value slot holding at most one `SessionRecord`.
///
/// Implementations must write the record as a whole so a crash can never
/// leave a token without its issue time.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<SessionRecord>, StorageError>;
    fn save(&self, record: &SessionRecord) -> Result<(), StorageError>;
    /// Removing an absent record is not an error.
    fn clear(&self) -> Result<(), StorageError>;
}

impl<T: SessionStorage + ?Sized> SessionStorage for Box<T> {
    fn load(&self) -> Result<Option<SessionRecord>, StorageError> {
        (**self).load()
    }

    fn save(&self, record: &SessionRecord) -> Result<(), StorageError> {
        (**self).save(record)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }
}

impl<T: SessionStorage + ?Sized> SessionStorage for Arc<T> {
    fn load(&self) -> Result<Option<SessionRecord>, StorageError> {
        (**self).load()
    }

    fn save(&self, record: &SessionRecord) -> Result<(), StorageError> {
        (**self).save(record)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }
}

/// JSON file in the cache directory.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            path: cache_dir.as_ref().join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<SessionRecord>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, record: &SessionRecord) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(record)?;

        // Write beside the target then rename, so readers see old or new, never half
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&tmp)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&tmp, perms)?;
        }

        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local storage, used for ephemeral sessions and in tests.
#[derive(Default)]
pub struct MemoryStorage {
    record: Mutex<Option<SessionRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: SessionRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slot().is_none()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<SessionRecord>> {
        self.record.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<SessionRecord>, StorageError> {
        Ok(self.slot().clone())
    }

    fn save(&self, record: &SessionRecord) -> Result<(), StorageError> {
        *self.slot() = Some(record.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot() = None;
        Ok(())
    }
}
