use serde::{Deserialize, Serialize};

/// Access/refresh token pair held by a [`TokenStore`](super::TokenStore).
///
/// Both halves are always present; a store either holds a full pair or
/// nothing.
///
/// # Example
/// ```
/// use stride::auth::Credentials;
///
/// let credentials = Credentials::new("access", "refresh");
/// assert_eq!(credentials.bearer(), "Bearer access");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .finish()
    }
}

fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(4).collect();
    format!("{prefix}…")
}

/// Wire shape of the token-issuing endpoints (`/auth/refresh`, login, register).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenResponse> for Credentials {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_tokens() {
        let credentials = Credentials::new("secret-access", "secret-refresh");
        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("secret-access"));
        assert!(!rendered.contains("secret-refresh"));
        assert!(rendered.contains("secr…"));
    }

    #[test]
    fn token_response_uses_camel_case_fields() {
        let body = r#"{"accessToken":"a1","refreshToken":"r1"}"#;
        let parsed: TokenResponse = serde_json::from_str(body).unwrap();
        let credentials = Credentials::from(parsed);
        assert_eq!(credentials, Credentials::new("a1", "r1"));
    }

    #[test]
    fn token_response_rejects_legacy_token_field() {
        let body = r#"{"token":"a1","refreshToken":"r1"}"#;
        assert!(serde_json::from_str::<TokenResponse>(body).is_err());
    }
}
