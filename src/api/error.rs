use std::collections::BTreeMap;

/// Keys in a Spring error body that describe the response, not a field
const ENVELOPE_KEYS: &[&str] = &["message", "error", "timestamp", "status", "path", "trace"];

/// Longest plain-text body kept as a message
const MAX_TEXT_MESSAGE: usize = 200;

/// Error type for backend requests
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: u16,
        message: Option<String>,
        field_errors: BTreeMap<String, String>,
    },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl RequestError {
    /// Build a status error from a non-2xx response body.
    ///
    /// JSON objects contribute `message` (or `error`) plus one field error
    /// per remaining string value. Anything else is kept as plain text.
    pub fn from_body(status: u16, body: &str) -> Self {
        let mut message = None;
        let mut field_errors = BTreeMap::new();

        match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(body) {
            Ok(map) => {
                message = ["message", "error"]
                    .iter()
                    .filter_map(|k| map.get(*k).and_then(|v| v.as_str()))
                    .map(str::trim)
                    .find(|m| !m.is_empty())
                    .map(str::to_string);
                for (key, value) in &map {
                    if ENVELOPE_KEYS.contains(&key.as_str()) {
                        continue;
                    }
                    if let Some(text) = value.as_str() {
                        field_errors.insert(key.clone(), text.to_string());
                    }
                }
            }
            Err(_) => {
                let text = body.trim();
                if !text.is_empty() {
                    message = Some(text.chars().take(MAX_TEXT_MESSAGE).collect());
                }
            }
        }

        RequestError::Status {
            status,
            message,
            field_errors,
        }
    }

    /// HTTP status, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            RequestError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// The most specific message to show a user: the server message, then
    /// the due date field error, then any other field error, then `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        if let RequestError::Status {
            message,
            field_errors,
            ..
        } = self
        {
            if let Some(m) = message {
                return m.clone();
            }
            if let Some(m) = field_errors.get("dueDate") {
                return m.clone();
            }
            if let Some(m) = field_errors.values().next() {
                return m.clone();
            }
        }
        fallback.to_string()
    }
}
