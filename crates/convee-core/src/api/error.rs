use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    NetworkError(#[source] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ApiError::Timeout
        } else if error.is_decode() {
            ApiError::InvalidResponse(error.to_string())
        } else {
            ApiError::NetworkError(error)
        }
    }
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Directus error envelope: `{"errors":[{"message":..,"extensions":{"code":..}}]}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    extensions: Option<ErrorExtensions>,
}

#[derive(Debug, Deserialize)]
struct ErrorExtensions {
    #[serde(default)]
    code: Option<String>,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let cut: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
            format!("{}... (truncated, {} total bytes)", cut, body.len())
        }
    }

    fn first_error(body: &str) -> Option<(Option<String>, Option<String>)> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        let entry = parsed.errors.into_iter().next()?;
        let code = entry.extensions.and_then(|e| e.code);
        Some((code, entry.message))
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let (code, message) = Self::first_error(body).unwrap_or((None, None));
        let detail = message.unwrap_or_else(|| Self::truncate_body(body));

        // Directus error codes are more precise than the status alone
        match code.as_deref() {
            Some("INVALID_CREDENTIALS") => return ApiError::InvalidCredentials(detail),
            Some("TOKEN_EXPIRED") | Some("INVALID_TOKEN") => return ApiError::Unauthorized,
            _ => {}
        }

        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(detail),
            404 => ApiError::NotFound(detail),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(detail),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, detail)),
        }
    }

    /// The backend no longer accepts the presented token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_invalid_credentials_code() {
        let body = concat!(
            r#"{"errors":[{"message":"Invalid user credentials.","#,
            r#""extensions":{"code":"INVALID_CREDENTIALS"}}]}"#
        );
        match ApiError::from_status(StatusCode::UNAUTHORIZED, body) {
            ApiError::InvalidCredentials(message) => {
                assert_eq!(message, "Invalid user credentials.")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_token_codes_map_to_unauthorized() {
        let expired =
            r#"{"errors":[{"message":"Token expired.","extensions":{"code":"TOKEN_EXPIRED"}}]}"#;
        assert!(ApiError::from_status(StatusCode::UNAUTHORIZED, expired).is_unauthorized());

        // Some Directus versions answer an invalid token with 403
        let invalid =
            r#"{"errors":[{"message":"Invalid token.","extensions":{"code":"INVALID_TOKEN"}}]}"#;
        assert!(ApiError::from_status(StatusCode::FORBIDDEN, invalid).is_unauthorized());
    }

    #[test]
    fn test_status_fallbacks() {
        assert!(ApiError::from_status(StatusCode::UNAUTHORIZED, "").is_unauthorized());
        assert!(matches!(
            ApiError::from_status(
                StatusCode::FORBIDDEN,
                r#"{"errors":[{"message":"You don't have permission"}]}"#
            ),
            ApiError::AccessDenied(m) if m == "You don't have permission"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, "nope"),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream"),
            ApiError::ServerError(m) if m == "upstream"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, ""),
            ApiError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_forbidden_is_not_unauthorized() {
        let err = ApiError::from_status(StatusCode::FORBIDDEN, "");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_long_body_truncated() {
        let body = "x".repeat(2000);
        match ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body) {
            ApiError::ServerError(message) => {
                assert!(message.len() < 600);
                assert!(message.contains("2000 total bytes"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
