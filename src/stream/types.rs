//! Stream, signal and subscription types.

use crate::error::StoreError;
use crate::types::SubscriptionId;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// A single notification delivered to an observer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Signal<T> {
    /// A value.
    Next(T),
    /// Terminal failure. Nothing follows it.
    Error(StoreError),
    /// Terminal success. Nothing follows it.
    Complete,
}

impl<T> Signal<T> {
    /// Transform the carried value, passing terminal signals through.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Signal<U> {
        match self {
            Signal::Next(value) => Signal::Next(f(value)),
            Signal::Error(e) => Signal::Error(e),
            Signal::Complete => Signal::Complete,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Signal::Next(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Signal::Next(value) => Some(value),
            _ => None,
        }
    }
}

/// Callback receiving every signal of one subscription.
pub type Observer<T> = Box<dyn FnMut(Signal<T>) + Send>;

/// A source of signals that observers can attach to.
pub trait Stream {
    type Item: Send + 'static;

    /// Attach an observer. Delivery may start before this returns.
    fn subscribe_signals(&self, observer: Observer<Self::Item>) -> Subscription;
}

/// Registration of an observer against a stream.
///
/// Dropping a `Subscription` leaves the observer attached; call
/// [`Subscription::unsubscribe`] to detach it.
pub struct Subscription {
    id: SubscriptionId,
    teardown: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(id: SubscriptionId, teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            id,
            teardown: Some(Box::new(teardown)),
        }
    }

    /// A subscription with nothing to detach (the source already finished).
    pub fn finished() -> Self {
        Self {
            id: SubscriptionId(0),
            teardown: None,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Detach the observer. No signal is delivered to it afterwards.
    pub fn unsubscribe(mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &self.teardown.is_some())
            .finish()
    }
}

/// Observer that records every signal it sees.
///
/// Handy when a test or a caller wants to inspect what a stream emitted.
pub struct Recorder<T> {
    signals: Arc<Mutex<Vec<Signal<T>>>>,
}

impl<T: Clone + Send + 'static> Recorder<T> {
    pub fn new() -> Self {
        Self {
            signals: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// An observer feeding this recorder.
    pub fn observer(&self) -> Observer<T> {
        let signals = Arc::clone(&self.signals);
        Box::new(move |signal| signals.lock().push(signal))
    }

    /// Subscribe to `stream`, recording into this recorder.
    pub fn attach<S: Stream<Item = T>>(&self, stream: &S) -> Subscription {
        stream.subscribe_signals(self.observer())
    }

    pub fn signals(&self) -> Vec<Signal<T>> {
        self.signals.lock().clone()
    }

    /// Only the `Next` values, in order.
    pub fn values(&self) -> Vec<T> {
        self.signals
            .lock()
            .iter()
            .filter_map(|s| s.value().cloned())
            .collect()
    }

    pub fn last(&self) -> Option<T> {
        self.signals
            .lock()
            .iter()
            .rev()
            .find_map(|s| s.value().cloned())
    }

    pub fn clear(&self) {
        self.signals.lock().clear();
    }
}

impl<T: Clone + Send + 'static> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            signals: Arc::clone(&self.signals),
        }
    }
}
