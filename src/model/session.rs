use serde::{Deserialize, Serialize};

/// An authenticated session: the bearer credential plus who it belongs to.
///
/// Deserializes directly from the `/auth/login` response and is persisted in
/// the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub email: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Session {
    /// Value for the `Authorization` header
    pub fn authorization(&self) -> String {
        let scheme = if self.token_type.trim().is_empty() {
            "Bearer"
        } else {
            self.token_type.trim()
        };
        format!("{} {}", scheme, self.access_token)
    }
}

/// Login / register body
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
