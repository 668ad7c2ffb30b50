//! Paired mock sockets for message-passing tests.
//!
//! Two [`MockSocket`]s are linked as peers: `emit` on one synchronously runs
//! the listeners the other registered with `on`. There is no transport, no
//! acknowledgement and no queueing.

use crate::event::{Event, Listener, Subscribe};
use crate::result::FakesResult;
use crate::spy::Spy;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

type SocketCallback = Rc<dyn Fn(&[Value])>;

struct SocketInner {
    events: RefCell<HashMap<String, Vec<SocketCallback>>>,
    peer: RefCell<Weak<SocketInner>>,
    emitted: Spy<(String, Vec<Value>)>,
    remove_all_listeners: Spy<Option<String>>,
}

/// One end of a mock socket pair
///
/// Cloning the handle shares the socket. Peers are held weakly, so emitting
/// after the peer was dropped is a no-op.
#[derive(Clone)]
pub struct MockSocket {
    inner: Rc<SocketInner>,
}

impl MockSocket {
    /// Create an unpaired socket
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(SocketInner {
                events: RefCell::new(HashMap::new()),
                peer: RefCell::new(Weak::new()),
                emitted: Spy::new("emit"),
                remove_all_listeners: Spy::new("removeAllListeners"),
            }),
        }
    }

    /// Link this socket's `emit` to `peer`'s listeners
    pub fn set_peer(&self, peer: &Self) {
        *self.inner.peer.borrow_mut() = Rc::downgrade(&peer.inner);
    }

    /// Register a listener for `event`
    pub fn on<F>(&self, event: &str, callback: F)
    where
        F: Fn(&[Value]) + 'static,
    {
        self.inner
            .events
            .borrow_mut()
            .entry(event.to_string())
            .or_default()
            .push(Rc::new(callback));
    }

    /// Send `event` with `args` to the peer
    pub fn emit(&self, event: &str, args: Vec<Value>) {
        self.inner.emitted.record((event.to_string(), args.clone()));
        let peer = self.inner.peer.borrow().upgrade();
        match peer {
            Some(peer) => Self { inner: peer }.trigger(event, &args),
            None => tracing::trace!(event, "emit without peer"),
        }
    }

    /// Serialize `payload` to JSON and send it as the single argument
    pub fn emit_serialized<T: Serialize>(&self, event: &str, payload: &T) -> FakesResult<()> {
        let value = serde_json::to_value(payload)?;
        self.emit(event, vec![value]);
        Ok(())
    }

    /// Run this socket's own listeners for `event`
    pub fn trigger(&self, event: &str, args: &[Value]) {
        let callbacks = self
            .inner
            .events
            .borrow()
            .get(event)
            .cloned()
            .unwrap_or_default();
        tracing::trace!(event, listeners = callbacks.len(), "socket trigger");
        for callback in callbacks {
            callback(args);
        }
    }

    /// Drop listeners for one event, or all of them
    pub fn remove_all_listeners(&self, event: Option<&str>) {
        self.inner
            .remove_all_listeners
            .record(event.map(str::to_string));
        let mut events = self.inner.events.borrow_mut();
        match event {
            Some(event) => {
                events.remove(event);
            }
            None => events.clear(),
        }
    }

    /// Number of listeners for `event`
    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner.events.borrow().get(event).map_or(0, Vec::len)
    }

    /// Recorded `emit` calls
    #[must_use]
    pub fn emit_spy(&self) -> &Spy<(String, Vec<Value>)> {
        &self.inner.emitted
    }

    /// Recorded `removeAllListeners` calls
    #[must_use]
    pub fn remove_all_listeners_spy(&self) -> &Spy<Option<String>> {
        &self.inner.remove_all_listeners
    }
}

impl Default for MockSocket {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MockSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSocket")
            .field("events", &self.inner.events.borrow().len())
            .field("has_peer", &(self.inner.peer.borrow().strong_count() > 0))
            .finish()
    }
}

impl Subscribe for MockSocket {
    /// Listeners receive an event whose `args` field holds the emitted
    /// arguments; sockets have no `off`, so unsubscribing is a no-op
    fn subscribe(&self, event: &str, listener: &Listener) {
        let listener = listener.clone();
        let name = event.to_string();
        self.on(event, move |args| {
            listener.call(&Event::new(name.clone()).with("args", Value::Array(args.to_vec())));
        });
    }
}

/// Server and client ends of a linked socket pair
#[derive(Debug, Clone)]
pub struct MockSocketPair {
    /// Server end
    pub server_socket: MockSocket,
    /// Client end
    pub client_socket: MockSocket,
}

/// Create two sockets linked to each other
#[must_use]
pub fn create_mock_socket_pair() -> MockSocketPair {
    let server_socket = MockSocket::new();
    let client_socket = MockSocket::new();
    server_socket.set_peer(&client_socket);
    client_socket.set_peer(&server_socket);
    MockSocketPair {
        server_socket,
        client_socket,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expect::{expect_event, expect_no_event};
    use serde_json::json;

    #[test]
    fn test_pair_delivers_to_peer() {
        let pair = create_mock_socket_pair();
        let received = Rc::new(RefCell::new(Vec::new()));
        let received_clone = Rc::clone(&received);
        pair.client_socket
            .on("greet", move |args| received_clone.borrow_mut().push(args.to_vec()));

        pair.server_socket.emit("greet", vec![json!("hello"), json!(1)]);

        assert_eq!(*received.borrow(), vec![vec![json!("hello"), json!(1)]]);
        assert!(pair.server_socket.emit_spy().was_called());
    }

    #[test]
    fn test_emit_does_not_reach_self() {
        let pair = create_mock_socket_pair();
        let expectation = expect_no_event(&pair.server_socket, "greet");
        pair.server_socket.emit("greet", vec![]);
        assert!(expectation.verify().is_ok());
    }

    #[test]
    fn test_emit_without_peer() {
        let socket = MockSocket::new();
        socket.emit("lonely", vec![json!(null)]);
        assert_eq!(socket.emit_spy().call_count(), 1);
    }

    #[test]
    fn test_emit_after_peer_dropped() {
        let socket = MockSocket::new();
        {
            let peer = MockSocket::new();
            socket.set_peer(&peer);
        }
        socket.emit("gone", vec![]);
    }

    #[test]
    fn test_remove_all_listeners() {
        let pair = create_mock_socket_pair();
        pair.client_socket.on("a", |_| {});
        pair.client_socket.on("b", |_| {});

        pair.client_socket.remove_all_listeners(Some("a"));
        assert_eq!(pair.client_socket.listener_count("a"), 0);
        assert_eq!(pair.client_socket.listener_count("b"), 1);

        pair.client_socket.remove_all_listeners(None);
        assert_eq!(pair.client_socket.listener_count("b"), 0);
        assert_eq!(
            pair.client_socket.remove_all_listeners_spy().calls(),
            vec![Some("a".to_string()), None]
        );
    }

    #[test]
    fn test_emit_serialized() {
        #[derive(Serialize)]
        struct Join {
            room: String,
        }

        let pair = create_mock_socket_pair();
        let expectation = expect_event(&pair.server_socket, "join");
        pair.client_socket
            .emit_serialized(
                "join",
                &Join {
                    room: "lobby".to_string(),
                },
            )
            .unwrap();

        let evt = expectation.verify().unwrap();
        assert_eq!(evt.get("args"), Some(&json!([{"room": "lobby"}])));
    }
}
