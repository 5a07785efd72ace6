use std::collections::HashMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::HandlerFailure;
use crate::handler::{HandlerError, WebhookHandler};
use crate::notification::Notification;
use crate::types::WebhookType;

/// A handler together with the identity used in logs.
struct Registration {
    name: String,
    handler: Arc<dyn WebhookHandler>,
}

/// Routes notifications to the handlers registered for their category.
///
/// Handlers are registered during setup (`&mut self`) and invoked during
/// dispatch (`&self`). Once setup is done the dispatcher can be wrapped in an
/// [`Arc`] and shared with every task that receives notifications; the
/// handler table is read-only from then on.
///
/// Dispatch is synchronous: handlers for one notification run one after
/// another, in registration order, on the calling thread. A handler that
/// returns an error or panics is logged and skipped over; the remaining
/// handlers still run.
#[derive(Default)]
pub struct WebhookDispatcher {
    handlers: HashMap<WebhookType, Vec<Registration>>,
}

/// What happened during one dispatch call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Number of handlers invoked.
    pub invoked: usize,
    /// Number of invoked handlers that failed.
    pub failed: usize,
}

impl DispatchSummary {
    /// Number of handlers that completed successfully.
    pub fn succeeded(&self) -> usize {
        self.invoked - self.failed
    }
}

impl fmt::Debug for WebhookDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .handlers
            .iter()
            .map(|(kind, regs)| (kind.as_str(), regs.len()))
            .collect();
        f.debug_struct("WebhookDispatcher")
            .field("handlers", &counts)
            .finish()
    }
}

impl WebhookDispatcher {
    /// Create a dispatcher with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a closure handler for `event_type`.
    ///
    /// The handler is logged as `<event_type>#<position>` when it fails.
    pub fn register<F>(&mut self, event_type: impl Into<WebhookType>, handler: F) -> &mut Self
    where
        F: Fn(&Notification) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        let event_type = event_type.into();
        let name = format!("{event_type}#{}", self.handler_count(&event_type));
        self.push(event_type, name, Arc::new(handler))
    }

    /// Append a closure handler for `event_type` under an explicit name.
    pub fn register_named<F>(
        &mut self,
        event_type: impl Into<WebhookType>,
        name: impl Into<String>,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&Notification) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.push(event_type.into(), name.into(), Arc::new(handler))
    }

    /// Append a shared handler object for `event_type`.
    ///
    /// The same handler may be registered for several types.
    pub fn register_handler(
        &mut self,
        event_type: impl Into<WebhookType>,
        handler: Arc<dyn WebhookHandler>,
    ) -> &mut Self {
        let name = handler.name().to_owned();
        self.push(event_type.into(), name, handler)
    }

    fn push(
        &mut self,
        event_type: WebhookType,
        name: String,
        handler: Arc<dyn WebhookHandler>,
    ) -> &mut Self {
        if !event_type.is_known() {
            debug!(webhook_type = %event_type, "registering handler for unrecognized webhook type");
        }
        self.handlers
            .entry(event_type)
            .or_default()
            .push(Registration { name, handler });
        self
    }

    /// Number of handlers registered for `event_type`.
    pub fn handler_count(&self, event_type: &WebhookType) -> usize {
        self.handlers.get(event_type).map_or(0, Vec::len)
    }

    /// Returns `true` if no handler has been registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.values().all(Vec::is_empty)
    }

    /// Deliver a decoded JSON notification to every matching handler.
    ///
    /// Values that are not objects or carry no string `typeWebhook` (directly
    /// or inside a `body` envelope) are dropped. Unknown types and types with
    /// no handlers are ignored.
    pub fn dispatch(&self, raw: Value) {
        match Notification::from_json(raw) {
            Ok(notification) => {
                self.dispatch_notification(&notification);
            }
            Err(e) => debug!(error = %e, "dropping malformed webhook notification"),
        }
    }

    /// Deliver an already parsed notification and report what happened.
    pub fn dispatch_notification(&self, notification: &Notification) -> DispatchSummary {
        let event_type = notification.webhook_type();
        let Some(registrations) = self.handlers.get(&event_type) else {
            trace!(webhook_type = %event_type, "no handlers registered");
            return DispatchSummary::default();
        };

        let mut summary = DispatchSummary::default();
        for registration in registrations {
            summary.invoked += 1;
            if let Err(failure) = invoke(registration.handler.as_ref(), notification) {
                summary.failed += 1;
                warn!(
                    webhook_type = %event_type,
                    handler = %registration.name,
                    id_message = notification.id_message().unwrap_or_default(),
                    error = %failure,
                    "webhook handler failed"
                );
            }
        }

        debug!(
            webhook_type = %event_type,
            invoked = summary.invoked,
            failed = summary.failed,
            "webhook notification dispatched"
        );
        summary
    }
}

/// Run one handler, converting both error returns and panics into a failure.
fn invoke(handler: &dyn WebhookHandler, notification: &Notification) -> Result<(), HandlerFailure> {
    match catch_unwind(AssertUnwindSafe(|| handler.handle(notification))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(HandlerFailure::Error(e)),
        Err(payload) => Err(HandlerFailure::from_panic(payload.as_ref())),
    }
}
