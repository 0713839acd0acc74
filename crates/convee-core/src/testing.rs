//! Scripted `Backend` for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::api::{ApiError, Backend, LoginGrant, QueryOptions};
use crate::auth::Credentials;
use crate::models::{Identity, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reply {
    Ok,
    InvalidCredentials,
    Unauthorized,
    Unreachable,
    ServerError,
}

impl Reply {
    fn into_result(self) -> Result<(), ApiError> {
        match self {
            Reply::Ok => Ok(()),
            Reply::InvalidCredentials => Err(ApiError::InvalidCredentials(
                "Invalid user credentials.".to_string(),
            )),
            Reply::Unauthorized => Err(ApiError::Unauthorized),
            Reply::Unreachable => Err(ApiError::Timeout),
            Reply::ServerError => Err(ApiError::ServerError("boom".to_string())),
        }
    }
}

pub(crate) struct MockBackend {
    login: Reply,
    probe: Reply,
    logout: Reply,
    read: Reply,
    records: Vec<Record>,
    login_calls: AtomicUsize,
    probe_calls: AtomicUsize,
    logout_calls: AtomicUsize,
    read_calls: AtomicUsize,
    tokens_seen: Mutex<Vec<String>>,
}

impl MockBackend {
    pub const ISSUED_TOKEN: &'static str = "fresh-token";

    pub fn new() -> Self {
        Self {
            login: Reply::Ok,
            probe: Reply::Ok,
            logout: Reply::Ok,
            read: Reply::Ok,
            records: Vec::new(),
            login_calls: AtomicUsize::new(0),
            probe_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
            read_calls: AtomicUsize::new(0),
            tokens_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn login(mut self, reply: Reply) -> Self {
        self.login = reply;
        self
    }

    pub fn probe(mut self, reply: Reply) -> Self {
        self.probe = reply;
        self
    }

    pub fn logout(mut self, reply: Reply) -> Self {
        self.logout = reply;
        self
    }

    pub fn read(mut self, reply: Reply) -> Self {
        self.read = reply;
        self
    }

    pub fn records(mut self, records: Vec<serde_json::Value>) -> Self {
        self.records = records
            .into_iter()
            .filter_map(|v| v.as_object().cloned())
            .collect();
        self
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.login_calls() + self.probe_calls() + self.logout_calls() + self.read_calls()
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens_seen
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    fn saw(&self, token: &str) {
        self.tokens_seen
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(token.to_string());
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn login(&self, _credentials: &Credentials) -> Result<LoginGrant, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login.into_result()?;
        Ok(LoginGrant {
            access_token: Self::ISSUED_TOKEN.to_string(),
            refresh_token: Some("fresh-refresh".to_string()),
            expires_ms: Some(900_000),
        })
    }

    async fn who_am_i(&self, token: &str) -> Result<Identity, ApiError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.saw(token);
        self.probe.into_result()?;
        Ok(serde_json::from_value(json!({ "id": "user-1", "email": "a@b.com" }))
            .expect("static identity"))
    }

    async fn logout(&self, token: &str, _refresh_token: Option<&str>) -> Result<(), ApiError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.saw(token);
        self.logout.into_result()
    }

    async fn read_items(
        &self,
        token: &str,
        _collection: &str,
        _options: &QueryOptions,
    ) -> Result<Vec<Record>, ApiError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        self.saw(token);
        self.read.into_result()?;
        Ok(self.records.clone())
    }
}
