use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use super::expiry::{self, is_expired};
use super::{Credentials, SessionError, SessionRecord, SessionStorage};
use crate::api::{ApiError, Backend};
use crate::models::Identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// `initialize` has not resolved yet
    Undecided,
    Authenticated,
    Unauthenticated,
}

/// How `initialize` resolved.
#[derive(Debug, Clone)]
pub enum Startup {
    /// The stored token passed the probe. The identity is handed out once and not kept.
    Authenticated(Identity),
    NoSession,
    /// Past the absolute lifetime; nothing was sent to the backend.
    Expired,
    /// The backend refused the probe, or could not be reached.
    Rejected,
}

/// Single owner of the client's authentication state.
///
/// Combines the absolute lifetime enforced locally with the backend's own
/// token validity. Every state change takes `&mut self`, so callers cannot
/// overlap `initialize`, `login` and `logout`.
pub struct SessionStore<B, S> {
    backend: B,
    storage: S,
    limit: Duration,
    state: SessionState,
    active: Option<SessionRecord>,
}

impl<B: Backend, S: SessionStorage> SessionStore<B, S> {
    pub fn new(backend: B, storage: S) -> Self {
        Self {
            backend,
            storage,
            limit: expiry::session_limit(),
            state: SessionState::Undecided,
            active: None,
        }
    }

    /// Override the absolute lifetime (defaults to `SESSION_LIMIT_HOURS`)
    pub fn with_limit(mut self, limit: Duration) -> Self {
        self.limit = limit;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.active.as_ref().map(|r| r.issued_at)
    }

    /// Time left before the absolute cutoff, if a session is active
    pub fn remaining(&self) -> Option<Duration> {
        self.issued_at()
            .map(|issued_at| expiry::remaining(issued_at, Utc::now(), self.limit))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Decide the session from persisted state.
    ///
    /// The lifetime check runs before the stored token is trusted; an expired
    /// record is discarded without any remote call.
    pub async fn initialize(&mut self) -> Startup {
        let record = match self.storage.load() {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!("No persisted session");
                self.active = None;
                self.state = SessionState::Unauthenticated;
                return Startup::NoSession;
            }
            Err(e) => {
                warn!(error = %e, "Persisted session unreadable, discarding");
                self.reset_local();
                return Startup::NoSession;
            }
        };

        if is_expired(record.issued_at, Utc::now(), self.limit) {
            info!(issued_at = %record.issued_at, "Session exceeded absolute lifetime");
            self.reset_local();
            return Startup::Expired;
        }

        let token = record.token.clone();
        self.active = Some(record);

        match self.backend.who_am_i(&token).await {
            Ok(identity) => {
                debug!(user_id = %identity.id, "Liveness probe succeeded");
                self.state = SessionState::Authenticated;
                Startup::Authenticated(identity)
            }
            Err(e) => {
                warn!(error = %e, "Liveness probe failed, discarding session");
                self.reset_local();
                Startup::Rejected
            }
        }
    }

    /// Log in, confirm the new token with a probe, and persist the session.
    ///
    /// On failure the in-memory session is left as it was. A failed write
    /// also clears storage, so no older record outlives the new login.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<(), SessionError> {
        if !credentials.is_complete() {
            return Err(SessionError::InvalidCredentials);
        }

        let grant = match self.backend.login(credentials).await {
            Ok(grant) => grant,
            Err(e) => {
                warn!(error = %e, "Login failed");
                return Err(SessionError::from_login_failure(e));
            }
        };

        let record = SessionRecord::new(grant.access_token, Utc::now())
            .with_refresh_token(grant.refresh_token);

        if let Err(e) = self.backend.who_am_i(&record.token).await {
            warn!(error = %e, "New token failed the liveness probe");
            self.end_remote(&record).await;
            return Err(SessionError::Connection(e.to_string()));
        }

        if let Err(e) = self.storage.save(&record) {
            warn!(error = %e, "Failed to persist session, discarding login");
            if let Err(clear_err) = self.storage.clear() {
                warn!(error = %clear_err, "Failed to clear persisted session");
            }
            self.end_remote(&record).await;
            return Err(SessionError::Connection(e.to_string()));
        }

        self.active = Some(record);
        self.state = SessionState::Authenticated;
        info!(
            email = %credentials.email,
            backend_expires_ms = ?grant.expires_ms,
            local_limit_minutes = self.limit.num_minutes(),
            "Login successful"
        );
        Ok(())
    }

    /// End the session. Always succeeds locally and is idempotent.
    pub async fn logout(&mut self) {
        if let Some(record) = self.active.take() {
            // An expired token is never sent, not even to end it
            if !is_expired(record.issued_at, Utc::now(), self.limit) {
                self.end_remote(&record).await;
            }
            info!("Logged out");
        }
        self.reset_local();
    }

    /// Best-effort remote logout; transport failures are only logged.
    async fn end_remote(&self, record: &SessionRecord) {
        if let Err(e) = self
            .backend
            .logout(&record.token, record.refresh_token.as_deref())
            .await
        {
            debug!(error = %e, "Ignoring remote logout failure");
        }
    }

    /// Reset the session if `error` says the backend rejected the token.
    ///
    /// Returns true when the session was reset.
    pub async fn guard(&mut self, error: &ApiError) -> bool {
        if !error.is_unauthorized() {
            return false;
        }
        warn!("Backend rejected session token, logging out");
        self.logout().await;
        true
    }

    /// The token to present on an authenticated call.
    ///
    /// Re-checks the absolute lifetime first, so a long-running process never
    /// sends a token past the cutoff.
    pub fn authorized_token(&mut self) -> Result<String, SessionError> {
        let record = match (self.state, self.active.as_ref()) {
            (SessionState::Authenticated, Some(record)) => record,
            _ => return Err(SessionError::Unauthorized),
        };

        if is_expired(record.issued_at, Utc::now(), self.limit) {
            info!("Session exceeded absolute lifetime, logging out");
            self.reset_local();
            return Err(SessionError::SessionExpired);
        }

        Ok(record.token.clone())
    }

    /// Drop the in-memory credential on shutdown. Persisted state is kept so
    /// the next `initialize` can pick the session up again.
    pub fn teardown(&mut self) {
        self.active = None;
        self.state = SessionState::Undecided;
    }

    fn reset_local(&mut self) {
        self.active = None;
        if let Err(e) = self.storage.clear() {
            warn!(error = %e, "Failed to clear persisted session");
        }
        self.state = SessionState::Unauthenticated;
    }
}

// ============================================================================
// Tests
// ============================================================================
