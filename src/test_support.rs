//! Captures `ERROR` events emitted while a closure runs.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Fields of one captured event, rendered as strings. The message is under `message`.
pub type EventFields = BTreeMap<String, String>;

#[derive(Clone, Default)]
struct ErrorEvents(Arc<Mutex<Vec<EventFields>>>);

#[derive(Default)]
struct FieldMap(EventFields);

impl Visit for FieldMap {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

impl<S: Subscriber> Layer<S> for ErrorEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::ERROR {
            return;
        }
        let mut fields = FieldMap::default();
        event.record(&mut fields);
        self.0.lock().unwrap().push(fields.0);
    }
}

/// Run `f` with a thread-local subscriber and return its result together
/// with every `ERROR` event it emitted.
pub fn capture_errors<T>(f: impl FnOnce() -> T) -> (T, Vec<EventFields>) {
    let events = ErrorEvents::default();
    let subscriber = tracing_subscriber::registry().with(events.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    let captured = events.0.lock().unwrap().clone();
    (result, captured)
}
