//! API client for communicating with the Directus REST API.
//!
//! This module provides the `ApiClient` struct, the production `Backend`.
//! Every response is unwrapped from the Directus `{"data": ...}` envelope and
//! every failure is classified into an `ApiError`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use tracing::{debug, warn};

use super::{ApiError, Backend, LoginGrant, QueryOptions};
use crate::auth::Credentials;
use crate::models::{Identity, Record};

// ============================================================================
// Constants
// ============================================================================

/// Backend used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://db.convee.de/";

/// HTTP request timeout in seconds.
/// A hung call surfaces as `ApiError::Timeout` instead of blocking forever.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct AuthData {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires: Option<i64>,
}

/// API client for a Directus instance.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client with the default timeout
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(response: Response) -> Result<Option<Response>, ApiError> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_data<T: DeserializeOwned>(
        response: Response,
        what: &str,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        let envelope: DataEnvelope<T> = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", what, e)))?;
        Ok(envelope.data)
    }

    /// GET with bearer auth, retrying on 429 with exponential backoff
    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .get(url)
                .bearer_auth(token)
                .query(params)
                .send()
                .await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => return Self::parse_data(response, url).await,
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited);
                    }
                    warn!(
                        url = url,
                        retry = retries,
                        backoff_ms = backoff_ms,
                        "Rate limited, backing off"
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, ApiError> {
        let url = self.url("auth/login");
        debug!(email = %credentials.email, "Sending login request");

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password(),
                "mode": "json",
            }))
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let auth: AuthData = Self::parse_data(response, "login response").await?;

        Ok(LoginGrant {
            access_token: auth.access_token,
            refresh_token: auth.refresh_token,
            expires_ms: auth.expires,
        })
    }

    async fn who_am_i(&self, token: &str) -> Result<Identity, ApiError> {
        let url = self.url("users/me");
        let params = [("fields", "id,email,first_name,last_name".to_string())];
        self.get(&url, token, &params).await
    }

    async fn logout(&self, token: &str, refresh_token: Option<&str>) -> Result<(), ApiError> {
        let url = self.url("auth/logout");
        let body = match refresh_token {
            Some(refresh) => json!({ "refresh_token": refresh, "mode": "json" }),
            None => json!({ "mode": "json" }),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        Self::check_response(response).await?;
        Ok(())
    }

    async fn read_items(
        &self,
        token: &str,
        collection: &str,
        options: &QueryOptions,
    ) -> Result<Vec<Record>, ApiError> {
        let url = self.url(&format!("items/{}", collection));
        let records: Vec<Record> = self.get(&url, token, &options.to_params()).await?;
        debug!(collection = collection, count = records.len(), "Items received");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new("https://db.convee.de/").expect("client");
        assert_eq!(client.base_url(), "https://db.convee.de");
        assert_eq!(client.url("auth/login"), "https://db.convee.de/auth/login");
        assert_eq!(client.url("/users/me"), "https://db.convee.de/users/me");
    }

    #[test]
    fn test_parse_auth_envelope() {
        let json = r#"{"data":{"access_token":"tok","expires":900000,"refresh_token":"ref"}}"#;
        let envelope: DataEnvelope<AuthData> = serde_json::from_str(json).expect("parse");
        assert_eq!(envelope.data.access_token, "tok");
        assert_eq!(envelope.data.refresh_token.as_deref(), Some("ref"));
        assert_eq!(envelope.data.expires, Some(900000));
    }

    #[test]
    fn test_parse_items_envelope() {
        let json = r#"{"data":[{"id":1,"name":"Alice"},{"id":2,"name":"Bob"}]}"#;
        let envelope: DataEnvelope<Vec<Record>> = serde_json::from_str(json).expect("parse");
        assert_eq!(envelope.data.len(), 2);
        assert_eq!(envelope.data[1]["name"], "Bob");
    }
}
