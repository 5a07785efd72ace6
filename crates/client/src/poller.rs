//! Polling loop that feeds queued notifications into a dispatcher.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use sdkwa_client::{NotificationPoller, SdkwaClient, WebhookDispatcher, WebhookType};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(client: SdkwaClient) {
//! let mut dispatcher = WebhookDispatcher::new();
//! dispatcher.register(WebhookType::IncomingMessageReceived, |n| {
//!     println!("incoming {:?}", n.id_message());
//!     Ok(())
//! });
//!
//! let shutdown = CancellationToken::new();
//! let poller = NotificationPoller::new(client, Arc::new(dispatcher));
//! poller.run(shutdown.clone()).await;
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use sdkwa_webhook::WebhookDispatcher;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{Error, SdkwaClient};

/// Delay before polling again after an empty queue.
pub const DEFAULT_IDLE_DELAY: Duration = Duration::from_secs(1);

/// Delay before polling again after a failed request.
pub const DEFAULT_ERROR_DELAY: Duration = Duration::from_secs(5);

/// Receives notifications from the instance queue, dispatches them, and
/// deletes them once handled.
#[derive(Debug, Clone)]
pub struct NotificationPoller {
    client: SdkwaClient,
    dispatcher: Arc<WebhookDispatcher>,
    idle_delay: Duration,
    error_delay: Duration,
}

impl NotificationPoller {
    /// Create a poller with the default delays.
    pub fn new(client: SdkwaClient, dispatcher: Arc<WebhookDispatcher>) -> Self {
        Self {
            client,
            dispatcher,
            idle_delay: DEFAULT_IDLE_DELAY,
            error_delay: DEFAULT_ERROR_DELAY,
        }
    }

    /// Set the delay after an empty poll.
    #[must_use]
    pub fn with_idle_delay(mut self, delay: Duration) -> Self {
        self.idle_delay = delay;
        self
    }

    /// Set the delay after a failed poll.
    #[must_use]
    pub fn with_error_delay(mut self, delay: Duration) -> Self {
        self.error_delay = delay;
        self
    }

    /// Process at most one notification.
    ///
    /// Returns `Ok(false)` when the queue was empty. A notification is
    /// deleted even when some of its handlers failed or its body is
    /// malformed; handler failures are logged by the dispatcher.
    pub async fn poll_once(&self) -> Result<bool, Error> {
        let Some(received) = self.client.receive_notification().await? else {
            return Ok(false);
        };

        match received.notification() {
            Ok(notification) => {
                let summary = self.dispatcher.dispatch_notification(&notification);
                debug!(
                    receipt_id = received.receipt_id,
                    invoked = summary.invoked,
                    failed = summary.failed,
                    "notification dispatched"
                );
            }
            Err(e) => debug!(
                receipt_id = received.receipt_id,
                error = %e,
                "dropping malformed queued notification"
            ),
        }

        self.client.delete_notification(received.receipt_id).await?;
        Ok(true)
    }

    /// Poll until `shutdown` is cancelled.
    ///
    /// Cancellation is observed between polls, so a notification that was
    /// received is always dispatched and deleted before the loop exits.
    pub async fn run(&self, shutdown: CancellationToken) {
        info!(id_instance = self.client.id_instance(), "notification poller started");

        while !shutdown.is_cancelled() {
            let delay = match self.poll_once().await {
                Ok(true) => continue,
                Ok(false) => self.idle_delay,
                Err(e) => {
                    warn!(error = %e, retryable = e.is_retryable(), "notification poll failed");
                    self.error_delay
                }
            };

            tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                () = tokio::time::sleep(delay) => {}
            }
        }

        info!(id_instance = self.client.id_instance(), "notification poller stopped");
    }
}
