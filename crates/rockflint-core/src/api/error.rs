use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status. `data` is the decoded
    /// error body, or an empty object when the body was not JSON.
    #[error("Request failed with status {status}")]
    Status { status: u16, data: Value },

    /// Network-level failure before any response arrived.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Maximum length for error messages pulled out of response bodies
const MAX_ERROR_MESSAGE_LENGTH: usize = 500;

/// Keys DRF-style backends use for a human-readable error
const MESSAGE_KEYS: [&str; 4] = ["detail", "message", "error", "non_field_errors"];

impl ApiError {
    /// Build a status error from a raw response body, decoding it best-effort.
    pub fn from_status(status: reqwest::StatusCode, body: &[u8]) -> Self {
        let data = serde_json::from_slice(body).unwrap_or_else(|_| empty_object());
        ApiError::Status {
            status: status.as_u16(),
            data,
        }
    }

    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Decoded error payload, if the server answered.
    pub fn data(&self) -> Option<&Value> {
        match self {
            ApiError::Status { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Best-effort human-readable message for display.
    ///
    /// Looks for the usual `detail`/`message`/`error` keys, then falls back
    /// to the first field error (`{"email": ["already taken"]}`).
    pub fn message(&self) -> String {
        let Some(data) = self.data() else {
            return self.to_string();
        };

        let found = MESSAGE_KEYS
            .iter()
            .find_map(|key| data.get(*key).and_then(first_text))
            .or_else(|| {
                data.as_object().and_then(|map| {
                    map.iter()
                        .find_map(|(field, value)| first_text(value).map(|m| format!("{field}: {m}")))
                })
            });

        match found {
            Some(message) => truncate_message(&message),
            None => self.to_string(),
        }
    }
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_text),
        _ => None,
    }
}

fn truncate_message(message: &str) -> String {
    if message.chars().count() <= MAX_ERROR_MESSAGE_LENGTH {
        message.to_string()
    } else {
        let head: String = message.chars().take(MAX_ERROR_MESSAGE_LENGTH).collect();
        format!("{}... (truncated)", head)
    }
}
