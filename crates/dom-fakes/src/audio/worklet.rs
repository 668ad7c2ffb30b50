//! Fake `AudioWorkletNode` and its message port.
//!
//! There is no worklet thread: `post_message` is only recorded, and inbound
//! messages are delivered by the test through [`MessagePort::deliver`].

use super::context::AudioContext;
use super::node::{AsDestination, AudioNode, Destination};
use crate::media::MediaStream;
use crate::spy::Spy;
use serde_json::Value;
use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;

type MessageHandler = Rc<dyn Fn(&Value)>;

/// Message port of a worklet node
///
/// Clones share handler and call history.
#[derive(Clone)]
pub struct MessagePort {
    onmessage: Rc<RefCell<Option<MessageHandler>>>,
    received: Spy<Value>,
    post_message: Spy<Value>,
}

impl MessagePort {
    /// Create a port with no handler
    #[must_use]
    pub fn new() -> Self {
        Self {
            onmessage: Rc::new(RefCell::new(None)),
            received: Spy::new("onmessage"),
            post_message: Spy::new("postMessage"),
        }
    }

    /// Set the inbound message handler, replacing any previous one
    pub fn set_onmessage<F>(&self, handler: F)
    where
        F: Fn(&Value) + 'static,
    {
        *self.onmessage.borrow_mut() = Some(Rc::new(handler));
    }

    /// Clear the inbound message handler
    pub fn clear_onmessage(&self) {
        *self.onmessage.borrow_mut() = None;
    }

    /// Deliver an inbound message as if sent by the processor
    ///
    /// Always recorded; the handler runs if one is set.
    pub fn deliver(&self, message: Value) {
        self.received.record(message.clone());
        let handler = self.onmessage.borrow().clone();
        if let Some(handler) = handler {
            handler(&message);
        }
    }

    /// Send a message to the processor; only recorded
    pub fn post_message(&self, message: Value) {
        self.post_message.record(message);
    }

    /// Recorded inbound messages
    #[must_use]
    pub fn onmessage_spy(&self) -> &Spy<Value> {
        &self.received
    }

    /// Recorded outbound messages
    #[must_use]
    pub fn post_message_spy(&self) -> &Spy<Value> {
        &self.post_message
    }
}

impl Default for MessagePort {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MessagePort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagePort")
            .field("has_onmessage", &self.onmessage.borrow().is_some())
            .field("received", &self.received.call_count())
            .field("posted", &self.post_message.call_count())
            .finish()
    }
}

/// Fake worklet processor node
#[derive(Debug, Clone)]
pub struct AudioWorkletNode {
    node: AudioNode,
    context: AudioContext,
    name: String,
    port: MessagePort,
}

impl AudioWorkletNode {
    /// Create a worklet node for processor `name` owned by `context`
    #[must_use]
    pub fn new(context: &AudioContext, name: impl Into<String>) -> Self {
        let name = name.into();
        tracing::debug!(%name, "worklet node created");
        Self {
            node: AudioNode::from_stream(&MediaStream::new()),
            context: context.clone(),
            name,
            port: MessagePort::new(),
        }
    }

    /// Owning context
    #[must_use]
    pub fn context(&self) -> &AudioContext {
        &self.context
    }

    /// Processor name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Message port
    #[must_use]
    pub fn port(&self) -> &MessagePort {
        &self.port
    }

    /// Underlying audio node
    #[must_use]
    pub fn node(&self) -> &AudioNode {
        &self.node
    }
}

impl Deref for AudioWorkletNode {
    type Target = AudioNode;

    fn deref(&self) -> &AudioNode {
        &self.node
    }
}

impl AsDestination for AudioWorkletNode {
    fn as_destination(&self) -> Destination {
        self.node.as_destination()
    }
}
