use thiserror::Error;

use crate::api::ApiError;

/// Message shown when the backend rejects the email/password pair.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password.";

/// Message shown for every other login failure.
pub const CONNECTION_MESSAGE: &str = "Login failed. Please try again later.";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Session exceeded its absolute lifetime")]
    SessionExpired,

    #[error("Unauthorized - the backend rejected the session token")]
    Unauthorized,

    #[error(transparent)]
    Remote(ApiError),
}

impl SessionError {
    /// Classify a failed login call.
    pub fn from_login_failure(error: ApiError) -> Self {
        match error {
            ApiError::InvalidCredentials(_) | ApiError::Unauthorized => {
                SessionError::InvalidCredentials
            }
            other => SessionError::Connection(other.to_string()),
        }
    }

    /// Text safe to put in front of the user, if this error is user-visible at all
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            SessionError::InvalidCredentials => Some(INVALID_CREDENTIALS_MESSAGE),
            SessionError::Connection(_) => Some(CONNECTION_MESSAGE),
            _ => None,
        }
    }

    /// True when the session was reset and the user has to log in again
    pub fn requires_login(&self) -> bool {
        matches!(self, SessionError::SessionExpired | SessionError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_failure_classification() {
        let err = SessionError::from_login_failure(ApiError::InvalidCredentials(
            "Invalid user credentials.".to_string(),
        ));
        assert!(matches!(err, SessionError::InvalidCredentials));
        assert_eq!(err.user_message(), Some(INVALID_CREDENTIALS_MESSAGE));

        let err = SessionError::from_login_failure(ApiError::Timeout);
        assert!(matches!(err, SessionError::Connection(_)));
        assert_eq!(err.user_message(), Some(CONNECTION_MESSAGE));

        let err = SessionError::from_login_failure(ApiError::ServerError("down".to_string()));
        assert_eq!(err.user_message(), Some(CONNECTION_MESSAGE));
    }

    #[test]
    fn test_silent_errors_have_no_user_message() {
        assert!(SessionError::SessionExpired.user_message().is_none());
        assert!(SessionError::Unauthorized.user_message().is_none());
        assert!(SessionError::Remote(ApiError::RateLimited)
            .user_message()
            .is_none());
    }

    #[test]
    fn test_requires_login() {
        assert!(SessionError::SessionExpired.requires_login());
        assert!(SessionError::Unauthorized.requires_login());
        assert!(!SessionError::InvalidCredentials.requires_login());
        assert!(!SessionError::Remote(ApiError::RateLimited).requires_login());
    }
}
