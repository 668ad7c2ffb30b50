//! Event dispatch for fake DOM objects.
//!
//! [`Emitter`] is a small synchronous publish/subscribe map from event name to
//! an ordered list of listeners. [`EventTarget`] puts the DOM method names on
//! top of it and is embedded in tracks and streams.
//!
//! Listeners are compared by reference: registering the same [`Listener`]
//! twice makes it fire twice, and removing it once leaves one registration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Event name that receives every emitted event
pub const WILDCARD: &str = "*";

/// A dispatched event: a type plus an arbitrary JSON payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(flatten)]
    payload: Map<String, Value>,
}

impl Event {
    /// Create an event with an empty payload
    #[must_use]
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            payload: Map::new(),
        }
    }

    /// Add a payload field
    ///
    /// The `type` key is reserved: it replaces the event type instead of
    /// landing in the payload (non-string values use their JSON text).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        if key == "type" {
            self.event_type = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
        } else {
            self.payload.insert(key, value);
        }
        self
    }

    /// Event type
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Look up a payload field
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Full payload
    #[must_use]
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }
}

/// A reference-counted event callback with reference identity
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&Event)>);

impl Listener {
    /// Wrap a callback
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Event) + 'static,
    {
        Self(Rc::new(callback))
    }

    /// Invoke the callback
    pub fn call(&self, event: &Event) {
        (self.0)(event);
    }

    fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0).cast::<()>()
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for Listener {}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Listener").field(&self.addr()).finish()
    }
}

/// Anything a listener can be attached to by event name
pub trait Subscribe {
    /// Attach a listener
    fn subscribe(&self, event: &str, listener: &Listener);

    /// Detach a listener; a no-op for sources without removal
    fn unsubscribe(&self, _event: &str, _listener: &Listener) {}
}

/// Synchronous event emitter
///
/// Cloning an emitter shares its listener table.
#[derive(Clone, Default)]
pub struct Emitter {
    handlers: Rc<RefCell<HashMap<String, Vec<Listener>>>>,
}

impl Emitter {
    /// Create an emitter with no listeners
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `event` ([`WILDCARD`] receives every event)
    pub fn on(&self, event: &str, listener: &Listener) {
        self.handlers
            .borrow_mut()
            .entry(event.to_string())
            .or_default()
            .push(listener.clone());
    }

    /// Remove the first registration of `listener` for `event`
    pub fn off(&self, event: &str, listener: &Listener) {
        let mut handlers = self.handlers.borrow_mut();
        if let Some(list) = handlers.get_mut(event) {
            if let Some(pos) = list.iter().position(|l| l == listener) {
                list.remove(pos);
            }
        }
    }

    /// Remove every listener for `event`
    pub fn off_all(&self, event: &str) {
        self.handlers.borrow_mut().remove(event);
    }

    /// Invoke every listener for `event` in registration order, then the
    /// wildcard listeners
    ///
    /// The listener list is snapshotted first, so listeners may add or remove
    /// listeners; those changes apply from the next `emit`.
    pub fn emit(&self, event: &str, payload: &Event) {
        let (direct, wildcard) = {
            let handlers = self.handlers.borrow();
            (
                handlers.get(event).cloned().unwrap_or_default(),
                handlers.get(WILDCARD).cloned().unwrap_or_default(),
            )
        };
        tracing::trace!(
            event,
            listeners = direct.len(),
            wildcard = wildcard.len(),
            "emit"
        );
        for listener in direct.iter().chain(wildcard.iter()) {
            listener.call(payload);
        }
    }

    /// Number of listeners registered for `event`
    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.handlers.borrow().get(event).map_or(0, Vec::len)
    }
}

impl Subscribe for Emitter {
    fn subscribe(&self, event: &str, listener: &Listener) {
        self.on(event, listener);
    }

    fn unsubscribe(&self, event: &str, listener: &Listener) {
        self.off(event, listener);
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.borrow();
        let mut events: Vec<&String> = handlers.keys().collect();
        events.sort();
        f.debug_struct("Emitter").field("events", &events).finish()
    }
}

/// DOM-style event target (`addEventListener`, `removeEventListener`,
/// `dispatchEvent`)
#[derive(Debug, Clone, Default)]
pub struct EventTarget {
    emitter: Emitter,
}

impl EventTarget {
    /// Create a target with no listeners
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for events of type `event`
    pub fn add_event_listener(&self, event: &str, listener: &Listener) {
        self.emitter.on(event, listener);
    }

    /// Remove a previously registered listener
    pub fn remove_event_listener(&self, event: &str, listener: &Listener) {
        self.emitter.off(event, listener);
    }

    /// Deliver `event` to the listeners registered for its type
    pub fn dispatch_event(&self, event: &Event) {
        self.emitter.emit(event.event_type(), event);
    }

    /// Number of listeners registered for `event`
    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.emitter.listener_count(event)
    }
}

impl Subscribe for EventTarget {
    fn subscribe(&self, event: &str, listener: &Listener) {
        self.add_event_listener(event, listener);
    }

    fn unsubscribe(&self, event: &str, listener: &Listener) {
        self.remove_event_listener(event, listener);
    }
}
