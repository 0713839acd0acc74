use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::{ApiError, QueryOptions};
use crate::auth::Credentials;
use crate::models::{Identity, Record};

/// Tokens handed out by a successful login.
#[derive(Clone)]
pub struct LoginGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Backend-side lifetime of the access token in milliseconds, if reported.
    pub expires_ms: Option<i64>,
}

impl fmt::Debug for LoginGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginGrant")
            .field("access_token", &"<redacted>")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expires_ms", &self.expires_ms)
            .finish()
    }
}

/// The remote calls the session and fetch logic depend on.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, ApiError>;

    /// Liveness probe: succeeds only while the backend accepts `token`.
    async fn who_am_i(&self, token: &str) -> Result<Identity, ApiError>;

    async fn logout(&self, token: &str, refresh_token: Option<&str>) -> Result<(), ApiError>;

    async fn read_items(
        &self,
        token: &str,
        collection: &str,
        options: &QueryOptions,
    ) -> Result<Vec<Record>, ApiError>;
}

#[async_trait]
impl<T: Backend + ?Sized> Backend for Arc<T> {
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, ApiError> {
        (**self).login(credentials).await
    }

    async fn who_am_i(&self, token: &str) -> Result<Identity, ApiError> {
        (**self).who_am_i(token).await
    }

    async fn logout(&self, token: &str, refresh_token: Option<&str>) -> Result<(), ApiError> {
        (**self).logout(token, refresh_token).await
    }

    async fn read_items(
        &self,
        token: &str,
        collection: &str,
        options: &QueryOptions,
    ) -> Result<Vec<Record>, ApiError> {
        (**self).read_items(token, collection, options).await
    }
}
