use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::NotificationError;
use crate::event::WebhookEvent;
use crate::types::WebhookType;

/// Name of the discriminator field.
pub const TYPE_FIELD: &str = "typeWebhook";

/// One inbound notification, kept as the open JSON mapping the provider sent.
///
/// The only structural guarantee is that `typeWebhook` is present and is a
/// string; every other field is preserved untouched so that fields added by
/// the provider later remain reachable through [`Notification::get`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Notification {
    fields: Map<String, Value>,
}

impl Notification {
    /// Interpret a decoded JSON value as a notification.
    ///
    /// Accepts both the flat webhook body (`{"typeWebhook": ..}`) and the
    /// queue envelope (`{"receiptId": .., "body": {"typeWebhook": ..}}`). For
    /// the envelope, the `body` object becomes the notification.
    pub fn from_json(value: Value) -> Result<Self, NotificationError> {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => return Err(NotificationError::NotAnObject(json_kind(&other))),
        };

        if !fields.contains_key(TYPE_FIELD) {
            if let Some(Value::Object(body)) = fields.remove("body")
                && body.contains_key(TYPE_FIELD)
            {
                return Self::try_from(body);
            }
            return Err(NotificationError::MissingType);
        }

        Self::try_from(fields)
    }

    /// The notification category.
    pub fn webhook_type(&self) -> WebhookType {
        WebhookType::from(self.type_str())
    }

    /// The raw discriminator string.
    pub fn type_str(&self) -> &str {
        self.fields
            .get(TYPE_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Message identifier, present on message and status notifications.
    pub fn id_message(&self) -> Option<&str> {
        self.fields.get("idMessage").and_then(Value::as_str)
    }

    /// Provider timestamp in Unix seconds.
    pub fn timestamp(&self) -> Option<i64> {
        self.fields.get("timestamp").and_then(Value::as_i64)
    }

    /// Data about the instance that produced the notification.
    pub fn instance_data(&self) -> Option<&Map<String, Value>> {
        self.fields.get("instanceData").and_then(Value::as_object)
    }

    /// Look up an arbitrary top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Borrow the full payload.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consume the notification and return the full payload.
    pub fn into_inner(self) -> Map<String, Value> {
        self.fields
    }

    /// Parse the payload into the typed [`WebhookEvent`] view.
    ///
    /// Unknown discriminators yield [`WebhookEvent::Unknown`]; a known
    /// discriminator whose fields have the wrong shape yields an error.
    pub fn event(&self) -> Result<WebhookEvent, serde_json::Error> {
        serde_json::from_value(Value::Object(self.fields.clone()))
    }
}

impl TryFrom<Map<String, Value>> for Notification {
    type Error = NotificationError;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        match fields.get(TYPE_FIELD) {
            Some(Value::String(_)) => Ok(Self { fields }),
            Some(other) => Err(NotificationError::InvalidType(json_kind(other))),
            None => Err(NotificationError::MissingType),
        }
    }
}

impl From<Notification> for Map<String, Value> {
    fn from(notification: Notification) -> Self {
        notification.fields
    }
}

impl From<Notification> for Value {
    fn from(notification: Notification) -> Self {
        Value::Object(notification.fields)
    }
}

/// A notification taken from the provider's queue.
///
/// The receipt id must be passed to `deleteNotification` once the
/// notification has been processed, otherwise the provider redelivers it.
/// The body is kept as raw JSON so that a malformed body still yields a
/// receipt id that can be deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedNotification {
    /// Queue receipt identifier.
    pub receipt_id: u64,
    /// The notification as received.
    #[serde(default)]
    pub body: Value,
}

impl ReceivedNotification {
    /// Parse the body as a notification.
    pub fn notification(&self) -> Result<Notification, NotificationError> {
        Notification::from_json(self.body.clone())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
