//! Call-recording spies for mocked platform methods.
//!
//! Every fake method that a test may want to assert on (`connect`, `stop`,
//! `close`, `postMessage`, ...) records its arguments in a [`Spy`]. Cloning a
//! spy shares the call history, so a handle can be kept by the test while the
//! fake keeps recording.

use std::cell::RefCell;
use std::rc::Rc;

/// Recorded call history for one mocked method
pub struct Spy<A> {
    name: &'static str,
    calls: Rc<RefCell<Vec<A>>>,
}

impl<A> Spy<A> {
    /// Create an empty spy
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Name of the method this spy records
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Record a call
    pub fn record(&self, args: A) {
        self.calls.borrow_mut().push(args);
    }

    /// Number of recorded calls
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Whether the method was called at least once
    #[must_use]
    pub fn was_called(&self) -> bool {
        self.call_count() > 0
    }

    /// Forget all recorded calls
    pub fn reset(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl<A: Clone> Spy<A> {
    /// All recorded call arguments, oldest first
    #[must_use]
    pub fn calls(&self) -> Vec<A> {
        self.calls.borrow().clone()
    }

    /// Arguments of the most recent call
    #[must_use]
    pub fn last_call(&self) -> Option<A> {
        self.calls.borrow().last().cloned()
    }

    /// Arguments of the n-th call (zero based)
    #[must_use]
    pub fn nth_call(&self, n: usize) -> Option<A> {
        self.calls.borrow().get(n).cloned()
    }
}

impl<A: PartialEq> Spy<A> {
    /// Whether any recorded call used exactly these arguments
    #[must_use]
    pub fn was_called_with(&self, args: &A) -> bool {
        self.calls.borrow().iter().any(|c| c == args)
    }
}

impl<A> Clone for Spy<A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            calls: Rc::clone(&self.calls),
        }
    }
}

impl<A> std::fmt::Debug for Spy<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spy")
            .field("name", &self.name)
            .field("call_count", &self.call_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spy_records_calls() {
        let spy = Spy::new("postMessage");
        assert!(!spy.was_called());

        spy.record("hello".to_string());
        spy.record("world".to_string());

        assert_eq!(spy.call_count(), 2);
        assert_eq!(spy.name(), "postMessage");
        assert_eq!(spy.nth_call(0).as_deref(), Some("hello"));
        assert_eq!(spy.last_call().as_deref(), Some("world"));
        assert!(spy.was_called_with(&"hello".to_string()));
        assert!(!spy.was_called_with(&"other".to_string()));
    }

    #[test]
    fn test_spy_clone_shares_history() {
        let spy: Spy<()> = Spy::new("stop");
        let handle = spy.clone();
        spy.record(());
        assert_eq!(handle.call_count(), 1);
    }

    #[test]
    fn test_spy_reset() {
        let spy = Spy::new("close");
        spy.record(());
        spy.reset();
        assert!(!spy.was_called());
        assert!(spy.calls().is_empty());
    }

    #[test]
    fn test_independent_spies() {
        let a: Spy<()> = Spy::new("stop");
        let b: Spy<()> = Spy::new("stop");
        a.record(());
        assert!(a.was_called());
        assert!(!b.was_called());
    }
}
