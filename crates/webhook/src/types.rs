use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Notification category, carried in the `typeWebhook` field.
///
/// The known variants cover every category the provider documents. Any other
/// discriminator parses into [`WebhookType::Other`] so that new provider
/// event types never cause a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WebhookType {
    /// A message was received by the instance.
    IncomingMessageReceived,
    /// A message was sent from the phone (or another linked device).
    OutgoingMessageReceived,
    /// A message was sent through the API.
    OutgoingApiMessageReceived,
    /// Delivery status of a previously sent message changed.
    OutgoingMessageStatus,
    /// Authorization state of the instance changed.
    StateInstanceChanged,
    /// Device information (battery, platform) was reported.
    DeviceInfo,
    /// Socket status of the instance changed.
    StatusInstanceChanged,
    /// A discriminator outside the known set.
    Other(String),
}

impl WebhookType {
    /// All known discriminators, in documentation order.
    pub fn known() -> [WebhookType; 7] {
        [
            Self::IncomingMessageReceived,
            Self::OutgoingMessageReceived,
            Self::OutgoingApiMessageReceived,
            Self::OutgoingMessageStatus,
            Self::StateInstanceChanged,
            Self::DeviceInfo,
            Self::StatusInstanceChanged,
        ]
    }

    /// The wire value of this discriminator.
    pub fn as_str(&self) -> &str {
        match self {
            Self::IncomingMessageReceived => "incomingMessageReceived",
            Self::OutgoingMessageReceived => "outgoingMessageReceived",
            Self::OutgoingApiMessageReceived => "outgoingAPIMessageReceived",
            Self::OutgoingMessageStatus => "outgoingMessageStatus",
            Self::StateInstanceChanged => "stateInstanceChanged",
            Self::DeviceInfo => "deviceInfo",
            Self::StatusInstanceChanged => "statusInstanceChanged",
            Self::Other(value) => value,
        }
    }

    /// Returns `true` for every variant except [`WebhookType::Other`].
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for WebhookType {
    fn from(value: &str) -> Self {
        match value {
            "incomingMessageReceived" => Self::IncomingMessageReceived,
            "outgoingMessageReceived" => Self::OutgoingMessageReceived,
            "outgoingAPIMessageReceived" => Self::OutgoingApiMessageReceived,
            "outgoingMessageStatus" => Self::OutgoingMessageStatus,
            "stateInstanceChanged" => Self::StateInstanceChanged,
            "deviceInfo" => Self::DeviceInfo,
            "statusInstanceChanged" => Self::StatusInstanceChanged,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for WebhookType {
    fn from(value: String) -> Self {
        match Self::from(value.as_str()) {
            Self::Other(_) => Self::Other(value),
            known => known,
        }
    }
}

impl FromStr for WebhookType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for WebhookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for WebhookType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WebhookType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from(value))
    }
}
