use serde::{Deserialize, Serialize};

/// The user behind a token, as reported by `GET /users/me`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl Identity {
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !name.is_empty() {
            name
        } else if let Some(ref email) = self.email {
            email.clone()
        } else {
            self.id.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_users_me() {
        let json = concat!(
            r#"{"id":"5f1c","first_name":"Ada","last_name":"Lovelace","#,
            r#""email":"ada@convee.de","role":"admin"}"#
        );
        let identity: Identity = serde_json::from_str(json).expect("parse");
        assert_eq!(identity.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_display_name_fallbacks() {
        let identity = Identity {
            id: "5f1c".to_string(),
            email: Some("ada@convee.de".to_string()),
            first_name: Some(" ".to_string()),
            last_name: None,
        };
        assert_eq!(identity.display_name(), "ada@convee.de");

        let bare = Identity {
            id: "5f1c".to_string(),
            ..Default::default()
        };
        assert_eq!(bare.display_name(), "5f1c");
    }
}
