//! Webhook notifications for the SDKWA messaging API.
//!
//! The provider pushes events (incoming messages, delivery statuses,
//! account state changes) either to a configured webhook URL or into a
//! queue that is drained with `receiveNotification`. Both paths deliver the
//! same JSON shape, discriminated by its `typeWebhook` field.
//!
//! This crate provides:
//!
//! - [`Notification`]: the open, forward-compatible JSON mapping as received.
//! - [`WebhookType`]: the closed set of discriminators, plus an `Other`
//!   fallback for types this crate does not know yet.
//! - [`WebhookEvent`]: a typed view over a notification for handlers that
//!   want structured access.
//! - [`WebhookDispatcher`]: routes a notification to every handler
//!   registered for its type, isolating handler failures.
//!
//! # Quick start
//!
//! ```rust
//! use sdkwa_webhook::{Notification, WebhookDispatcher, WebhookType};
//!
//! let mut dispatcher = WebhookDispatcher::new();
//! dispatcher.register(
//!     WebhookType::IncomingMessageReceived,
//!     |notification: &Notification| {
//!         println!("new message {:?}", notification.id_message());
//!         Ok(())
//!     },
//! );
//!
//! dispatcher.dispatch(serde_json::json!({
//!     "typeWebhook": "incomingMessageReceived",
//!     "idMessage": "abc",
//! }));
//! ```

pub mod dispatcher;
pub mod error;
pub mod event;
pub mod handler;
pub mod notification;
pub mod types;

pub use dispatcher::{DispatchSummary, WebhookDispatcher};
pub use error::{HandlerFailure, NotificationError};
pub use event::{
    DeviceInfoEvent, ExtendedTextMessageData, InstanceData, MessageData, MessageEvent,
    MessageStatusEvent, SenderData, StateInstanceEvent, StatusInstanceEvent, TextMessageData,
    WebhookEvent,
};
pub use handler::{HandlerError, WebhookHandler};
pub use notification::{Notification, ReceivedNotification, TYPE_FIELD};
pub use types::WebhookType;
