// Client Error Types
use reqwest::StatusCode;
use serde_json::Value;

/// Error surfaced by every client operation.
///
/// Transport failures and API rejections are kept apart here so callers can
/// branch on them, even though the page controllers collapse all of them into
/// a single message per action.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    // Transport
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    // Non-2xx response from the API
    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    // Detected locally, never reaches the network
    #[error("missing or invalid field: {0}")]
    Validation(String),

    // 2xx response whose body did not match the expected shape
    #[error("invalid response body: {0}")]
    Decode(String),

    // Session storage could not be written
    #[error("session storage error: {0}")]
    Storage(String),

    // Local media could not be read or transformed
    #[error("media processing failed: {0}")]
    Media(String),
}

impl ClientError {
    /// HTTP status code when the API answered with one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Stable code for JSON output and logs
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Network(_) => "NETWORK_ERROR",
            ClientError::Timeout => "TIMEOUT",
            ClientError::HttpStatus { status, .. } => match *status {
                400 => "BAD_REQUEST",
                401 => "UNAUTHORIZED",
                403 => "FORBIDDEN",
                404 => "NOT_FOUND",
                409 => "CONFLICT",
                422 => "UNPROCESSABLE_ENTITY",
                429 => "TOO_MANY_REQUESTS",
                500..=599 => "SERVER_ERROR",
                _ => "HTTP_ERROR",
            },
            ClientError::Validation(_) => "VALIDATION_ERROR",
            ClientError::Decode(_) => "INVALID_RESPONSE",
            ClientError::Storage(_) => "STORAGE_ERROR",
            ClientError::Media(_) => "MEDIA_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }
}

impl ClientError {
    pub fn network(message: impl Into<String>) -> Self {
        ClientError::Network(message.into())
    }

    pub fn validation(field: impl Into<String>) -> Self {
        ClientError::Validation(field.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        ClientError::Storage(message.into())
    }

    pub fn media(message: impl Into<String>) -> Self {
        ClientError::Media(message.into())
    }

    /// Build an `HttpStatus` error from a failed response body.
    ///
    /// The API reports failures as `{"message": ...}` or `{"error": ...}`;
    /// anything else falls back to the raw body, then the canonical reason.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str).map(str::to_string))
        });

        let message = from_json
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

        ClientError::HttpStatus {
            status: status.as_u16(),
            message,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::from_response(status, "")
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}
