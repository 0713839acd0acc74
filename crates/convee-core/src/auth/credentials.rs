use std::fmt;

/// Email/password pair sent to the backend login endpoint.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Both fields are required before anything goes over the wire
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

// Never print the password, even in debug logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_trimmed() {
        let creds = Credentials::new("  a@b.com \n", "secret");
        assert_eq!(creds.email, "a@b.com");
        assert_eq!(creds.password(), "secret");
    }

    #[test]
    fn test_is_complete() {
        assert!(Credentials::new("a@b.com", "x").is_complete());
        assert!(!Credentials::new("", "x").is_complete());
        assert!(!Credentials::new("a@b.com", "").is_complete());
        assert!(!Credentials::new("   ", "x").is_complete());
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("a@b.com", "hunter2");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("a@b.com"));
        assert!(!printed.contains("hunter2"));
    }
}
