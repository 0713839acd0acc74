use keyring::Entry;
use tracing::debug;

use super::storage::{SessionRecord, SessionStorage, StorageError, SESSION_KEY};

const SERVICE_NAME: &str = "convee-admin";

/// Keeps the session record in the OS keychain as one JSON secret.
pub struct KeychainStorage {
    service: String,
}

impl KeychainStorage {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    /// Use a different keychain service, e.g. one per backend instance
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self) -> Result<Entry, StorageError> {
        Ok(Entry::new(&self.service, SESSION_KEY)?)
    }
}

impl Default for KeychainStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStorage for KeychainStorage {
    fn load(&self) -> Result<Option<SessionRecord>, StorageError> {
        match self.entry()?.get_password() {
            Ok(secret) => Ok(Some(serde_json::from_str(&secret)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let secret = serde_json::to_string(record)?;
        self.entry()?.set_password(&secret)?;
        debug!(service = %self.service, "Session stored in keychain");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
