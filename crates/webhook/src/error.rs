use thiserror::Error;

use crate::handler::HandlerError;

/// Reasons a raw JSON value cannot be treated as a notification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotificationError {
    /// The value is not a JSON object.
    #[error("notification must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// Neither the object nor its `body` carries a `typeWebhook` field.
    #[error("notification has no 'typeWebhook' field")]
    MissingType,

    /// The `typeWebhook` field is present but not a string.
    #[error("'typeWebhook' must be a string, got {0}")]
    InvalidType(&'static str),
}

/// How a single handler invocation failed.
#[derive(Debug, Error)]
pub enum HandlerFailure {
    /// The handler returned an error.
    #[error("handler returned an error: {0}")]
    Error(HandlerError),

    /// The handler panicked.
    #[error("handler panicked: {0}")]
    Panic(String),
}

impl HandlerFailure {
    /// Build a failure from a panic payload captured by `catch_unwind`.
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_owned()
        };
        Self::Panic(message)
    }
}
