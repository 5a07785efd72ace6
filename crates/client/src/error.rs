use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the SDKWA client.
#[derive(Debug, Error)]
pub enum Error {
    /// The client or its credentials are misconfigured.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A request parameter failed validation before anything was sent.
    #[error("invalid parameter: {0}")]
    Validation(String),

    /// The request could not be sent or the response could not be read.
    #[error("connection error: {0}")]
    Connection(String),

    /// The response body did not have the expected shape.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// The provider rejected the credentials (HTTP 401).
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// The provider rejected the request parameters (HTTP 400).
    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// The provider is throttling this instance (HTTP 429).
    #[error("rate limited: {message}")]
    RateLimited { message: String },

    /// Any other non-success response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl Error {
    /// Map a non-success response to an error.
    ///
    /// The message is taken from a JSON `message` field when the body has
    /// one, otherwise from the raw body, otherwise from the status text.
    pub(crate) fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let message = error_message(status, body);
        match status {
            StatusCode::UNAUTHORIZED => Self::Authentication { message },
            StatusCode::BAD_REQUEST => Self::BadRequest { message },
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited { message },
            _ => Self::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// HTTP status of the response that caused this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::BadRequest { .. } => Some(400),
            Self::RateLimited { .. } => Some(429),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) | Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_slice(body)
        && let Some(message) = map.get("message").and_then(serde_json::Value::as_str)
    {
        return message.to_owned();
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        status.to_string()
    } else {
        text.to_owned()
    }
}
