//! Event expectations for synchronous fakes.
//!
//! Everything in this crate dispatches inline, so waiting for an event is a
//! matter of attaching a recorder before the action and checking it after:
//!
//! ```rust,ignore
//! let stream = MediaStream::new();
//! let added = expect_event(&stream, "addtrack").with_count(2);
//! stream.events().dispatch_event(&Event::new("addtrack"));
//! stream.events().dispatch_event(&Event::new("addtrack"));
//! let second = added.verify()?;
//! ```

use crate::event::{Event, Listener, Subscribe};
use crate::result::{FakesError, FakesResult};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Default)]
struct Recorded {
    received: usize,
    captured: Option<Event>,
}

/// Expectation that `event` fires a given number of times
///
/// A count of 0 behaves like 1. Once the count is reached the matching event
/// is captured and later events are ignored. The listener is detached when
/// the expectation is dropped.
pub struct EventExpectation<'a, S: Subscribe + ?Sized> {
    source: &'a S,
    event: String,
    expected: Rc<Cell<usize>>,
    recorded: Rc<RefCell<Recorded>>,
    listener: Listener,
}

impl<'a, S: Subscribe + ?Sized> EventExpectation<'a, S> {
    /// Start recording `event` on `source`
    pub fn new(source: &'a S, event: &str) -> Self {
        let expected = Rc::new(Cell::new(1));
        let recorded = Rc::new(RefCell::new(Recorded::default()));

        let expected_clone = Rc::clone(&expected);
        let recorded_clone = Rc::clone(&recorded);
        let listener = Listener::new(move |evt| {
            let mut recorded = recorded_clone.borrow_mut();
            if recorded.captured.is_some() {
                return;
            }
            recorded.received += 1;
            if recorded.received >= expected_clone.get().max(1) {
                recorded.captured = Some(evt.clone());
            }
        });
        source.subscribe(event, &listener);

        Self {
            source,
            event: event.to_string(),
            expected,
            recorded,
            listener,
        }
    }

    /// Require `count` occurrences instead of one
    #[must_use]
    pub fn with_count(self, count: usize) -> Self {
        self.expected.set(count);
        self
    }

    /// Number of matching events seen so far (stops at the required count)
    #[must_use]
    pub fn received(&self) -> usize {
        self.recorded.borrow().received
    }

    /// The event that completed the expectation
    ///
    /// # Errors
    ///
    /// Returns [`FakesError::EventNotReceived`] if too few events arrived.
    pub fn verify(&self) -> FakesResult<Event> {
        let recorded = self.recorded.borrow();
        recorded
            .captured
            .clone()
            .ok_or_else(|| FakesError::EventNotReceived {
                event: self.event.clone(),
                expected: self.expected.get().max(1),
                received: recorded.received,
            })
    }
}

impl<S: Subscribe + ?Sized> Drop for EventExpectation<'_, S> {
    fn drop(&mut self) {
        self.source.unsubscribe(&self.event, &self.listener);
    }
}

impl<S: Subscribe + ?Sized> std::fmt::Debug for EventExpectation<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventExpectation")
            .field("event", &self.event)
            .field("expected", &self.expected.get())
            .field("received", &self.received())
            .finish()
    }
}

/// Expectation that `event` does not fire
pub struct NoEventExpectation<'a, S: Subscribe + ?Sized> {
    source: &'a S,
    event: String,
    received: Rc<Cell<usize>>,
    listener: Listener,
}

impl<'a, S: Subscribe + ?Sized> NoEventExpectation<'a, S> {
    /// Start watching `event` on `source`
    pub fn new(source: &'a S, event: &str) -> Self {
        let received = Rc::new(Cell::new(0));
        let received_clone = Rc::clone(&received);
        let listener = Listener::new(move |_| received_clone.set(received_clone.get() + 1));
        source.subscribe(event, &listener);
        Self {
            source,
            event: event.to_string(),
            received,
            listener,
        }
    }

    /// Number of events seen
    #[must_use]
    pub fn received(&self) -> usize {
        self.received.get()
    }

    /// Succeed if nothing arrived
    ///
    /// # Errors
    ///
    /// Returns [`FakesError::UnexpectedEvent`] if the event fired.
    pub fn verify(&self) -> FakesResult<()> {
        match self.received.get() {
            0 => Ok(()),
            received => Err(FakesError::UnexpectedEvent {
                event: self.event.clone(),
                received,
            }),
        }
    }
}

impl<S: Subscribe + ?Sized> Drop for NoEventExpectation<'_, S> {
    fn drop(&mut self) {
        self.source.unsubscribe(&self.event, &self.listener);
    }
}

impl<S: Subscribe + ?Sized> std::fmt::Debug for NoEventExpectation<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoEventExpectation")
            .field("event", &self.event)
            .field("received", &self.received.get())
            .finish()
    }
}

/// Expect `event` on `source`
pub fn expect_event<'a, S: Subscribe + ?Sized>(source: &'a S, event: &str) -> EventExpectation<'a, S> {
    EventExpectation::new(source, event)
}

/// Expect `event` never to fire on `source`
pub fn expect_no_event<'a, S: Subscribe + ?Sized>(
    source: &'a S,
    event: &str,
) -> NoEventExpectation<'a, S> {
    NoEventExpectation::new(source, event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Emitter, EventTarget};

    #[test]
    fn test_event_received() {
        let target = EventTarget::new();
        let expectation = expect_event(&target, "test");
        let evt = Event::new("test").with("n", 1);
        target.dispatch_event(&evt);
        assert_eq!(expectation.verify().unwrap(), evt);
    }

    #[test]
    fn test_event_missing() {
        let target = EventTarget::new();
        let expectation = expect_event(&target, "test");
        target.dispatch_event(&Event::new("other"));
        assert!(matches!(
            expectation.verify(),
            Err(FakesError::EventNotReceived {
                expected: 1,
                received: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_event_count() {
        let emitter = Emitter::new();
        let expectation = expect_event(&emitter, "tick").with_count(2);

        emitter.emit("tick", &Event::new("tick").with("n", 1));
        assert!(expectation.verify().is_err());

        emitter.emit("tick", &Event::new("tick").with("n", 2));
        emitter.emit("tick", &Event::new("tick").with("n", 3));
        let evt = expectation.verify().unwrap();
        assert_eq!(evt.get("n"), Some(&serde_json::json!(2)));
        assert_eq!(expectation.received(), 2);
    }

    #[test]
    fn test_zero_count_means_first() {
        let emitter = Emitter::new();
        let expectation = expect_event(&emitter, "e").with_count(0);
        emitter.emit("e", &Event::new("e"));
        assert!(expectation.verify().is_ok());
    }

    #[test]
    fn test_drop_detaches_listener() {
        let emitter = Emitter::new();
        {
            let _expectation = expect_event(&emitter, "e");
            assert_eq!(emitter.listener_count("e"), 1);
        }
        assert_eq!(emitter.listener_count("e"), 0);
    }

    #[test]
    fn test_no_event_passes() {
        let target = EventTarget::new();
        let expectation = expect_no_event(&target, "test");
        target.dispatch_event(&Event::new("other"));
        assert!(expectation.verify().is_ok());
    }

    #[test]
    fn test_no_event_fails_when_received() {
        let target = EventTarget::new();
        let expectation = expect_no_event(&target, "test");
        target.dispatch_event(&Event::new("test"));
        let err = expectation.verify().unwrap_err();
        assert!(err.to_string().contains("'test'"));
        assert_eq!(expectation.received(), 1);
    }
}
