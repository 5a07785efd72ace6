//! Outgoing message queue.

use serde::Deserialize;
use serde_json::Value;

use crate::{Error, SdkwaClient};

/// Acknowledgement of a queue clear.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearQueueResponse {
    pub is_cleared: bool,
}

impl SdkwaClient {
    /// Drop every message still waiting to be sent.
    pub async fn clear_messages_queue(&self) -> Result<ClearQueueResponse, Error> {
        self.get("clearMessagesQueue").await
    }

    /// List messages waiting to be sent.
    pub async fn show_messages_queue(&self) -> Result<Vec<Value>, Error> {
        self.get("showMessagesQueue").await
    }
}
