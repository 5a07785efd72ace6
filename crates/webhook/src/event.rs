//! Typed view over webhook notifications.
//!
//! The provider documents more fields than most handlers need and adds new
//! ones over time, so every struct here is lenient: all fields are optional
//! and anything not modelled lands in `extra`.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A notification parsed into its category-specific shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "typeWebhook")]
pub enum WebhookEvent {
    #[serde(rename = "incomingMessageReceived")]
    IncomingMessageReceived(MessageEvent),

    #[serde(rename = "outgoingMessageReceived")]
    OutgoingMessageReceived(MessageEvent),

    #[serde(rename = "outgoingAPIMessageReceived")]
    OutgoingApiMessageReceived(MessageEvent),

    #[serde(rename = "outgoingMessageStatus")]
    OutgoingMessageStatus(MessageStatusEvent),

    #[serde(rename = "stateInstanceChanged")]
    StateInstanceChanged(StateInstanceEvent),

    #[serde(rename = "deviceInfo")]
    DeviceInfo(DeviceInfoEvent),

    #[serde(rename = "statusInstanceChanged")]
    StatusInstanceChanged(StatusInstanceEvent),

    /// A category this crate does not model.
    #[serde(other)]
    Unknown,
}

impl WebhookEvent {
    /// The message payload for the three message categories.
    pub fn message(&self) -> Option<&MessageEvent> {
        match self {
            Self::IncomingMessageReceived(m)
            | Self::OutgoingMessageReceived(m)
            | Self::OutgoingApiMessageReceived(m) => Some(m),
            _ => None,
        }
    }
}

/// Identity of the instance that emitted a notification.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceData {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id_instance: Option<String>,
    #[serde(default)]
    pub wid: Option<String>,
    #[serde(default)]
    pub type_instance: Option<String>,
}

/// Who sent a message and in which chat.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderData {
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub chat_name: Option<String>,
    #[serde(default)]
    pub sender_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMessageData {
    #[serde(default)]
    pub text_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedTextMessageData {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub stanza_id: Option<String>,
    #[serde(default)]
    pub participant: Option<String>,
}

/// Message content. `type_message` selects which of the `*_data` fields
/// is populated (`textMessage`, `extendedTextMessage`, `imageMessage`, ...).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageData {
    #[serde(default)]
    pub type_message: Option<String>,
    #[serde(default)]
    pub text_message_data: Option<TextMessageData>,
    #[serde(default)]
    pub extended_text_message_data: Option<ExtendedTextMessageData>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MessageData {
    /// Message text for plain and extended text messages.
    pub fn text(&self) -> Option<&str> {
        match self.type_message.as_deref() {
            Some("textMessage") => self
                .text_message_data
                .as_ref()
                .and_then(|d| d.text_message.as_deref()),
            Some("extendedTextMessage" | "quotedMessage") => self
                .extended_text_message_data
                .as_ref()
                .and_then(|d| d.text.as_deref()),
            _ => None,
        }
    }
}

/// Incoming or outgoing message notification.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    #[serde(default)]
    pub instance_data: Option<InstanceData>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub id_message: Option<String>,
    #[serde(default)]
    pub sender_data: Option<SenderData>,
    #[serde(default)]
    pub message_data: Option<MessageData>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MessageEvent {
    /// Chat the message belongs to.
    pub fn chat_id(&self) -> Option<&str> {
        self.sender_data.as_ref()?.chat_id.as_deref()
    }

    /// Message text, when the message is a text message.
    pub fn text(&self) -> Option<&str> {
        self.message_data.as_ref()?.text()
    }
}

/// Delivery status of an outgoing message (`sent`, `delivered`, `read`, ...).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageStatusEvent {
    #[serde(default)]
    pub instance_data: Option<InstanceData>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub id_message: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub send_by_api: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Authorization state change (`authorized`, `notAuthorized`, `blocked`, ...).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateInstanceEvent {
    #[serde(default)]
    pub instance_data: Option<InstanceData>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub state_instance: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfoEvent {
    #[serde(default)]
    pub instance_data: Option<InstanceData>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub device_data: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Socket status change (`online`, `offline`, `starting`, ...).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusInstanceEvent {
    #[serde(default)]
    pub instance_data: Option<InstanceData>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub status_instance: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Instance ids arrive as numbers from some endpoints and strings from others.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}
