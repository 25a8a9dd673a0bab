//! Latest-value broadcaster.

use crate::stream::{Observer, Signal, Stream, Subscription};
use crate::types::{SubscriptionId, Version};
use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::trace;

use super::types::{BroadcastEvent, DropReason, SubscriptionConfig, SubscriptionHandle};

enum ListenerKind<T> {
    Observer(Mutex<Observer<T>>),
    Channel(Sender<BroadcastEvent<T>>),
}

/// Internal listener state.
struct Listener<T> {
    kind: ListenerKind<T>,
    /// Set once the listener is removed; suppresses in-flight deliveries.
    detached: AtomicBool,
}

impl<T> Listener<T> {
    fn new(kind: ListenerKind<T>) -> Self {
        Self {
            kind,
            detached: AtomicBool::new(false),
        }
    }

    /// Deliver a value. Returns the drop reason if the listener can no longer
    /// receive.
    fn deliver(&self, version: Version, value: T) -> Result<(), DropReason> {
        if self.detached.load(Ordering::Acquire) {
            return Ok(());
        }
        match &self.kind {
            ListenerKind::Observer(observer) => {
                let mut observer = observer.lock();
                (*observer)(Signal::Next(value));
                Ok(())
            }
            ListenerKind::Channel(sender) => {
                match sender.try_send(BroadcastEvent::Value { version, value }) {
                    Ok(()) => Ok(()),
                    Err(TrySendError::Full(_)) => Err(DropReason::BufferOverflow),
                    Err(TrySendError::Disconnected(_)) => Err(DropReason::Disconnected),
                }
            }
        }
    }

    fn detach(&self, reason: DropReason) {
        self.detached.store(true, Ordering::Release);
        if let ListenerKind::Channel(sender) = &self.kind {
            // Best effort: a full buffer just misses the notice.
            let _ = sender.try_send(BroadcastEvent::Dropped { reason });
        }
    }
}

/// Fan-out bookkeeping, owned by whoever holds the delivery lock.
struct Delivery<T> {
    /// True while a fan-out loop is running on the lock-holding thread.
    active: Cell<bool>,
    /// Values published (and already current) but not yet fanned out.
    queue: RefCell<VecDeque<(Version, T)>>,
}

struct ActiveGuard<'a>(&'a Cell<bool>);

impl<'a> ActiveGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

struct Inner<T> {
    current: RwLock<(Version, T)>,
    /// Listeners in subscription order.
    listeners: RwLock<Vec<(SubscriptionId, Arc<Listener<T>>)>>,
    /// Serializes publishes and subscribes. Re-entrant so listeners may
    /// publish or subscribe from inside a callback.
    delivery: ReentrantMutex<Delivery<T>>,
    next_id: AtomicU64,
}

impl<T: Clone + Send + Sync + 'static> Inner<T> {
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn snapshot(&self) -> (Version, T) {
        let current = self.current.read();
        (current.0, current.1.clone())
    }

    /// Make `value` current, then fan it out, or queue it behind the
    /// running fan-out.
    fn enqueue(&self, delivery: &Delivery<T>, value: T) {
        let version = {
            let mut current = self.current.write();
            current.0 = current.0.next();
            current.1 = value.clone();
            current.0
        };
        delivery.queue.borrow_mut().push_back((version, value));
        if !delivery.active.get() {
            self.drain(delivery);
        }
    }

    fn drain(&self, delivery: &Delivery<T>) {
        let _active = ActiveGuard::enter(&delivery.active);
        loop {
            let next = delivery.queue.borrow_mut().pop_front();
            match next {
                Some((version, value)) => self.fan_out(version, value),
                None => break,
            }
        }
    }

    fn fan_out(&self, version: Version, value: T) {
        let listeners: Vec<_> = self
            .listeners
            .read()
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect();

        let mut dropped = Vec::new();
        for (id, listener) in listeners {
            if let Err(reason) = listener.deliver(version, value.clone()) {
                dropped.push((id, reason));
            }
        }

        for (id, reason) in dropped {
            trace!(subscription = id.0, ?reason, "dropping subscriber");
            self.remove(id, reason);
        }
    }

    fn register(
        &self,
        delivery: &Delivery<T>,
        listener: Listener<T>,
        replay: bool,
    ) -> SubscriptionId {
        let id = self.next_id();
        let listener = Arc::new(listener);

        if delivery.active.get() {
            // Inside a fan-out. Queued values, the latest among them, reach
            // the new listener through the running loop; replaying now
            // would hand it the latest before the older queued ones.
            let queued = !delivery.queue.borrow().is_empty();
            if replay && !queued {
                self.replay(id, &listener);
            }
            self.listeners.write().push((id, listener));
        } else {
            {
                let _active = ActiveGuard::enter(&delivery.active);
                if replay {
                    self.replay(id, &listener);
                }
                self.listeners.write().push((id, listener));
            }
            self.drain(delivery);
        }

        trace!(subscription = id.0, "subscribed");
        id
    }

    fn replay(&self, id: SubscriptionId, listener: &Listener<T>) {
        let (version, value) = self.snapshot();
        if let Err(reason) = listener.deliver(version, value) {
            trace!(subscription = id.0, ?reason, "replay failed");
        }
    }

    fn remove(&self, id: SubscriptionId, reason: DropReason) -> bool {
        let removed = {
            let mut listeners = self.listeners.write();
            listeners
                .iter()
                .position(|(existing, _)| *existing == id)
                .map(|pos| listeners.remove(pos).1)
        };
        match removed {
            Some(listener) => {
                listener.detach(reason);
                trace!(subscription = id.0, "unsubscribed");
                true
            }
            None => false,
        }
    }
}

/// Holds one current value and fans every new value out to its listeners.
///
/// New subscribers synchronously receive the current value, then every later
/// one. Publishing is synchronous: all listeners have seen the value by the
/// time [`Broadcaster::publish`] returns, unless the publish was issued from
/// inside a listener, in which case it is queued and delivered as soon as the
/// running fan-out finishes. Either way every listener observes the same
/// order of values.
///
/// The stream never completes and never errors. Cloning yields another handle
/// to the same broadcaster.
pub struct Broadcaster<T> {
    inner: Arc<Inner<T>>,
}

impl<T: Clone + Send + Sync + 'static> Broadcaster<T> {
    /// Create a broadcaster holding `initial` at version 0.
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                current: RwLock::new((Version::default(), initial)),
                listeners: RwLock::new(Vec::new()),
                delivery: ReentrantMutex::new(Delivery {
                    active: Cell::new(false),
                    queue: RefCell::new(VecDeque::new()),
                }),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// The current value.
    pub fn get(&self) -> T {
        self.inner.current.read().1.clone()
    }

    /// Version of the current value.
    pub fn version(&self) -> Version {
        self.inner.current.read().0
    }

    /// Current value with its version, read atomically.
    pub fn snapshot(&self) -> (Version, T) {
        self.inner.snapshot()
    }

    /// Replace the current value and notify every listener.
    pub fn publish(&self, value: T) {
        let delivery = self.inner.delivery.lock();
        self.inner.enqueue(&delivery, value);
    }

    /// Read-modify-publish as one critical section.
    ///
    /// `f` sees the latest value, even one still queued for delivery.
    /// Nothing is published when `f` fails.
    pub fn try_update<E>(&self, f: impl FnOnce(&T) -> Result<T, E>) -> Result<T, E> {
        let delivery = self.inner.delivery.lock();
        let base = self.get();
        let next = f(&base)?;
        self.inner.enqueue(&delivery, next.clone());
        Ok(next)
    }

    /// Infallible form of [`Broadcaster::try_update`].
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> T {
        match self.try_update(|current| Ok::<T, Infallible>(f(current))) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Subscribe through a bounded channel.
    ///
    /// A subscriber whose buffer fills up is dropped.
    pub fn subscribe_channel(&self, config: SubscriptionConfig) -> SubscriptionHandle<T> {
        let (sender, receiver) = bounded(config.buffer_size.max(1));
        let delivery = self.inner.delivery.lock();
        let id = self.inner.register(
            &delivery,
            Listener::new(ListenerKind::Channel(sender)),
            config.replay_latest,
        );
        SubscriptionHandle { id, receiver }
    }

    /// Remove a subscription. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.remove(id, DropReason::Unsubscribed)
    }

    /// Number of registered subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.read().len()
    }

    fn downgrade(&self) -> Weak<Inner<T>> {
        Arc::downgrade(&self.inner)
    }
}

impl<T: Clone + Send + Sync + 'static> Stream for Broadcaster<T> {
    type Item = T;

    fn subscribe_signals(&self, observer: Observer<T>) -> Subscription {
        let id = {
            let delivery = self.inner.delivery.lock();
            self.inner.register(
                &delivery,
                Listener::new(ListenerKind::Observer(Mutex::new(observer))),
                true,
            )
        };
        let weak = self.downgrade();
        Subscription::new(id, move || {
            if let Some(inner) = weak.upgrade() {
                inner.remove(id, DropReason::Unsubscribed);
            }
        })
    }
}

impl<T> Clone for Broadcaster<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Broadcaster<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self.inner.current.read();
        f.debug_struct("Broadcaster")
            .field("version", &current.0)
            .field("value", &current.1)
            .field("subscribers", &self.inner.listeners.read().len())
            .finish()
    }
}

impl<T: Clone + Send + Sync + Default + 'static> Default for Broadcaster<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
