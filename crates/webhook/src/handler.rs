use crate::notification::Notification;

/// Error type returned by handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A callback invoked for notifications of the category it is registered for.
///
/// Closures of the shape `Fn(&Notification) -> Result<(), HandlerError>`
/// implement this trait, so most callers never implement it by hand.
/// Implement it directly when a handler carries state or wants a stable
/// identity in logs.
pub trait WebhookHandler: Send + Sync {
    /// Process one notification.
    fn handle(&self, notification: &Notification) -> Result<(), HandlerError>;

    /// Identity used when logging failures of this handler.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> WebhookHandler for F
where
    F: Fn(&Notification) -> Result<(), HandlerError> + Send + Sync,
{
    fn handle(&self, notification: &Notification) -> Result<(), HandlerError> {
        self(notification)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;

    struct Counting {
        calls: AtomicUsize,
    }

    impl WebhookHandler for Counting {
        fn handle(&self, _notification: &Notification) -> Result<(), HandlerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn notification() -> Notification {
        Notification::from_json(json!({"typeWebhook": "deviceInfo"})).unwrap()
    }

    #[test]
    fn closures_are_handlers() {
        let handler = |n: &Notification| -> Result<(), HandlerError> {
            if n.type_str() == "deviceInfo" {
                Ok(())
            } else {
                Err("wrong type".into())
            }
        };
        assert!(handler.handle(&notification()).is_ok());
        assert!(handler.name().contains("closure"));
    }

    #[test]
    fn struct_handler_with_custom_name() {
        let handler = Counting {
            calls: AtomicUsize::new(0),
        };
        handler.handle(&notification()).unwrap();
        handler.handle(&notification()).unwrap();
        assert_eq!(handler.calls.load(Ordering::SeqCst), 2);
        assert_eq!(handler.name(), "counting");
    }
}
