use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use sdkwa_webhook::{
    HandlerError, Notification, WebhookDispatcher, WebhookEvent, WebhookHandler, WebhookType,
};

// -- Helpers --------------------------------------------------------------

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Records every payload it receives, in order, tagged with a label.
#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<(String, Value)>>,
}

impl Recorder {
    fn handler(
        self: &Arc<Self>,
        label: &str,
    ) -> impl Fn(&Notification) -> Result<(), HandlerError> + Send + Sync + 'static {
        let recorder = Arc::clone(self);
        let label = label.to_owned();
        move |n: &Notification| -> Result<(), HandlerError> {
            recorder
                .calls
                .lock()
                .unwrap()
                .push((label.clone(), Value::Object(n.as_map().clone())));
            Ok(())
        }
    }

    fn labels(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(l, _)| l.clone())
            .collect()
    }

    fn payloads(&self) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, p)| p.clone())
            .collect()
    }
}

// -- Delivery -------------------------------------------------------------

#[test]
fn registered_handler_receives_exact_payload_once() {
    init_tracing();
    let recorder = Arc::new(Recorder::default());
    let mut dispatcher = WebhookDispatcher::new();
    dispatcher.register("incomingMessageReceived", recorder.handler("h1"));

    let payload = json!({"typeWebhook": "incomingMessageReceived", "idMessage": "abc"});
    dispatcher.dispatch(payload.clone());

    assert_eq!(recorder.labels(), ["h1"]);
    assert_eq!(recorder.payloads(), [payload]);
}

#[test]
fn every_registered_type_routes_to_its_own_handler() {
    let recorder = Arc::new(Recorder::default());
    let mut dispatcher = WebhookDispatcher::new();
    for kind in WebhookType::known() {
        let label = kind.to_string();
        dispatcher.register(kind, recorder.handler(&label));
    }

    for kind in WebhookType::known() {
        dispatcher.dispatch(json!({"typeWebhook": kind.as_str()}));
    }

    let expected: Vec<String> = WebhookType::known().iter().map(ToString::to_string).collect();
    assert_eq!(recorder.labels(), expected);
}

#[test]
fn handlers_run_in_registration_order_on_every_dispatch() {
    let recorder = Arc::new(Recorder::default());
    let mut dispatcher = WebhookDispatcher::new();
    dispatcher
        .register(WebhookType::OutgoingMessageStatus, recorder.handler("first"))
        .register(WebhookType::OutgoingMessageStatus, recorder.handler("second"))
        .register(WebhookType::OutgoingMessageStatus, recorder.handler("third"));

    for _ in 0..2 {
        dispatcher.dispatch(json!({"typeWebhook": "outgoingMessageStatus", "status": "sent"}));
    }

    assert_eq!(
        recorder.labels(),
        ["first", "second", "third", "first", "second", "third"]
    );
}

#[test]
fn queue_envelope_delivers_body() {
    let recorder = Arc::new(Recorder::default());
    let mut dispatcher = WebhookDispatcher::new();
    dispatcher.register(WebhookType::StateInstanceChanged, recorder.handler("state"));

    dispatcher.dispatch(json!({
        "receiptId": 12,
        "body": {"typeWebhook": "stateInstanceChanged", "stateInstance": "authorized"}
    }));

    assert_eq!(
        recorder.payloads(),
        [json!({"typeWebhook": "stateInstanceChanged", "stateInstance": "authorized"})]
    );
}

// -- Tolerant reader ------------------------------------------------------

#[test]
fn unknown_type_invokes_nothing() {
    init_tracing();
    let recorder = Arc::new(Recorder::default());
    let mut dispatcher = WebhookDispatcher::new();
    dispatcher.register(WebhookType::IncomingMessageReceived, recorder.handler("h"));

    dispatcher.dispatch(json!({"typeWebhook": "unknownFutureType"}));

    assert!(recorder.labels().is_empty());
}

#[test]
fn handler_for_unrecognized_type_fires_when_provider_emits_it() {
    let recorder = Arc::new(Recorder::default());
    let mut dispatcher = WebhookDispatcher::new();
    dispatcher.register("incomingCall", recorder.handler("call"));

    dispatcher.dispatch(json!({"typeWebhook": "incomingCall", "from": "7901@c.us"}));

    assert_eq!(recorder.labels(), ["call"]);
}

#[test]
fn malformed_notifications_are_dropped() {
    init_tracing();
    let recorder = Arc::new(Recorder::default());
    let mut dispatcher = WebhookDispatcher::new();
    dispatcher.register(WebhookType::IncomingMessageReceived, recorder.handler("h"));

    dispatcher.dispatch(json!({"idMessage": "abc"}));
    dispatcher.dispatch(json!({"typeWebhook": 42}));
    dispatcher.dispatch(json!({"typeWebhook": null}));
    dispatcher.dispatch(json!("incomingMessageReceived"));
    dispatcher.dispatch(json!({"body": "incomingMessageReceived"}));

    assert!(recorder.labels().is_empty());
}

// -- Failure isolation ----------------------------------------------------

#[test]
fn failing_handler_does_not_block_later_handlers() {
    init_tracing();
    let recorder = Arc::new(Recorder::default());
    let mut dispatcher = WebhookDispatcher::new();
    dispatcher
        .register_named(
            WebhookType::IncomingMessageReceived,
            "rejecting",
            |_n: &Notification| Err("database unavailable".into()),
        )
        .register(WebhookType::IncomingMessageReceived, recorder.handler("b"));

    dispatcher.dispatch(json!({"typeWebhook": "incomingMessageReceived", "idMessage": "x"}));

    assert_eq!(recorder.labels(), ["b"]);
}

#[test]
fn panicking_handler_does_not_block_later_handlers() {
    let recorder = Arc::new(Recorder::default());
    let mut dispatcher = WebhookDispatcher::new();
    dispatcher
        .register(WebhookType::DeviceInfo, recorder.handler("before"))
        .register(WebhookType::DeviceInfo, |_n: &Notification| -> Result<(), HandlerError> {
            panic!("unexpected device payload")
        })
        .register(WebhookType::DeviceInfo, recorder.handler("after"));

    dispatcher.dispatch(json!({"typeWebhook": "deviceInfo"}));
    dispatcher.dispatch(json!({"typeWebhook": "deviceInfo"}));

    assert_eq!(recorder.labels(), ["before", "after", "before", "after"]);
}

// -- Handler objects and typed events -------------------------------------

struct TextCollector {
    texts: Mutex<Vec<String>>,
}

impl WebhookHandler for TextCollector {
    fn handle(&self, notification: &Notification) -> Result<(), HandlerError> {
        let event = notification.event()?;
        if let Some(text) = event.message().and_then(|m| m.text()) {
            self.texts.lock().unwrap().push(text.to_owned());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "text-collector"
    }
}

#[test]
fn shared_handler_object_sees_typed_events() {
    let collector = Arc::new(TextCollector {
        texts: Mutex::new(Vec::new()),
    });
    let mut dispatcher = WebhookDispatcher::new();
    dispatcher
        .register_handler(WebhookType::IncomingMessageReceived, collector.clone())
        .register_handler(WebhookType::OutgoingMessageReceived, collector.clone());

    dispatcher.dispatch(json!({
        "typeWebhook": "incomingMessageReceived",
        "messageData": {"typeMessage": "textMessage", "textMessageData": {"textMessage": "ping"}}
    }));
    dispatcher.dispatch(json!({
        "typeWebhook": "outgoingMessageReceived",
        "messageData": {"typeMessage": "extendedTextMessage", "extendedTextMessageData": {"text": "pong"}}
    }));

    assert_eq!(*collector.texts.lock().unwrap(), ["ping", "pong"]);
    assert_eq!(
        dispatcher.handler_count(&WebhookType::IncomingMessageReceived),
        1
    );
}

#[test]
fn typed_event_parse_error_counts_as_handler_failure() {
    let collector = Arc::new(TextCollector {
        texts: Mutex::new(Vec::new()),
    });
    let mut dispatcher = WebhookDispatcher::new();
    dispatcher.register_handler(WebhookType::IncomingMessageReceived, collector.clone());

    let notification = Notification::from_json(json!({
        "typeWebhook": "incomingMessageReceived",
        "timestamp": "not a number"
    }))
    .unwrap();
    let summary = dispatcher.dispatch_notification(&notification);

    assert_eq!(summary.failed, 1);
    assert!(collector.texts.lock().unwrap().is_empty());
    assert!(notification.event().is_err());
    assert!(matches!(
        Notification::from_json(json!({"typeWebhook": "deviceInfo"}))
            .unwrap()
            .event(),
        Ok(WebhookEvent::DeviceInfo(_))
    ));
}

// -- Sharing --------------------------------------------------------------

#[test]
fn dispatcher_is_shareable_after_setup() {
    let count = Arc::new(AtomicUsize::new(0));
    let mut dispatcher = WebhookDispatcher::new();
    let counter = Arc::clone(&count);
    dispatcher.register(WebhookType::IncomingMessageReceived, move |_n: &Notification| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    let dispatcher = Arc::new(dispatcher);

    std::thread::scope(|scope| {
        for i in 0..4 {
            let dispatcher = Arc::clone(&dispatcher);
            scope.spawn(move || {
                for j in 0..25 {
                    dispatcher.dispatch(json!({
                        "typeWebhook": "incomingMessageReceived",
                        "idMessage": format!("{i}-{j}"),
                    }));
                }
            });
        }
    });

    assert_eq!(count.load(Ordering::SeqCst), 100);
}
