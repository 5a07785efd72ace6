//! Pull-based notification queue.
//!
//! Notifications are received one at a time and must be deleted by receipt
//! id once handled, otherwise the same notification is returned again.

use sdkwa_webhook::TYPE_FIELD;
use serde::Deserialize;
use tracing::debug;

use crate::{Error, ReceivedNotification, SdkwaClient};

/// Generic `{"result": bool}` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResultResponse {
    pub result: bool,
}

impl SdkwaClient {
    /// Receive the next queued notification, or `None` when the queue is
    /// empty.
    ///
    /// The body is not validated here, so a malformed body still comes back
    /// with its receipt id and can be deleted.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example(client: sdkwa_client::SdkwaClient) -> Result<(), sdkwa_client::Error> {
    /// if let Some(received) = client.receive_notification().await? {
    ///     if let Ok(notification) = received.notification() {
    ///         println!("{}", notification.webhook_type());
    ///     }
    ///     client.delete_notification(received.receipt_id).await?;
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn receive_notification(&self) -> Result<Option<ReceivedNotification>, Error> {
        let received: Option<ReceivedNotification> = self.get("receiveNotification").await?;
        if let Some(r) = &received {
            debug!(
                receipt_id = r.receipt_id,
                webhook_type = r.body.get(TYPE_FIELD).and_then(serde_json::Value::as_str),
                "received notification"
            );
        }
        Ok(received)
    }

    /// Remove a handled notification from the queue.
    pub async fn delete_notification(&self, receipt_id: u64) -> Result<ResultResponse, Error> {
        self.delete(&format!("deleteNotification/{receipt_id}"))
            .await
    }
}
