//! The reactive store: one mutable source of truth with derived read views.

use crate::broadcast::{Broadcaster, SubscriptionConfig, SubscriptionHandle};
use crate::error::{Result, StoreError};
use crate::retry::RetryPolicy;
use crate::source::RefreshSource;
use crate::stream::{Observer, Stream, StreamExt, Subscription};
use crate::types::{State, StoreStats, Version};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// State held before the first mutation.
    pub initial_state: State,

    /// Position rewritten by [`Store::edit_at`].
    pub edit_offset: usize,

    /// Value written by [`Store::edit_at`].
    pub edit_value: i64,

    /// Attempts and backoff for [`Store::refresh`].
    pub retry: RetryPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_state: State::default(),
            edit_offset: 1,
            edit_value: 7,
            retry: RetryPolicy::default(),
        }
    }
}

/// Read-only view of the store's state stream.
///
/// Subscribers receive the current state immediately, then every later one.
/// The stream never completes and never errors.
#[derive(Clone, Debug)]
pub struct StateStream {
    subject: Broadcaster<State>,
}

impl StateStream {
    /// The latest state.
    pub fn current(&self) -> State {
        self.subject.get()
    }
}

impl Stream for StateStream {
    type Item = State;

    fn subscribe_signals(&self, observer: Observer<State>) -> Subscription {
        self.subject.subscribe_signals(observer)
    }
}

/// The reactive store.
///
/// Holds exactly one current [`State`] from construction on. All mutations
/// replace the whole state and notify every subscriber before returning.
/// Refresh failures are reported to the caller and never reach the state
/// stream.
pub struct Store {
    /// Store configuration.
    config: StoreConfig,

    /// Current state and its subscribers.
    subject: Broadcaster<State>,

    refreshes: AtomicU64,
    refresh_failures: AtomicU64,
    edits: AtomicU64,
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        let subject = Broadcaster::new(config.initial_state.clone());
        Self {
            config,
            subject,
            refreshes: AtomicU64::new(0),
            refresh_failures: AtomicU64::new(0),
            edits: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // --- Reads ---

    /// The main state stream.
    pub fn numbers(&self) -> StateStream {
        StateStream {
            subject: self.subject.clone(),
        }
    }

    /// The latest state.
    pub fn current(&self) -> State {
        self.subject.get()
    }

    pub fn version(&self) -> Version {
        self.subject.version()
    }

    /// A view multiplying every element of every state by `factor`.
    ///
    /// The multiplication runs once per state per subscriber; results are
    /// not shared or cached.
    pub fn derive_scaled(&self, factor: i64) -> impl Stream<Item = State> {
        self.numbers().map(move |state: State| state.scaled(factor))
    }

    // --- Writes ---

    /// Swap in `state` and notify every subscriber, in subscription order.
    pub fn replace_state(&self, state: State) {
        debug!(len = state.len(), "replacing state");
        self.subject.publish(state);
    }

    /// Apply `f` to the latest state and publish the result atomically.
    pub fn update(&self, f: impl FnOnce(&State) -> State) -> State {
        self.subject.update(f)
    }

    /// Replace the element at `index` with `value`.
    ///
    /// Fails with [`StoreError::IndexOutOfBounds`] and leaves the store
    /// unchanged when the current state is too short.
    pub fn set_item(&self, index: usize, value: i64) -> Result<State> {
        self.subject
            .try_update(|current| current.with_item(index, value))
    }

    /// Rewrite the configured edit position with the configured value
    /// (by default, index 1 becomes 7).
    ///
    /// `to_edit` identifies the requested item for the trace only. Saving the
    /// result anywhere is the caller's job.
    pub fn edit_at(&self, to_edit: i64) -> Result<State> {
        let offset = self.config.edit_offset;
        let value = self.config.edit_value;

        match self.set_item(offset, value) {
            Ok(state) => {
                self.edits.fetch_add(1, Ordering::Relaxed);
                debug!(to_edit, offset, value, "edited state");
                Ok(state)
            }
            Err(e) => {
                debug!(to_edit, offset, error = %e, "edit rejected");
                Err(e)
            }
        }
    }

    /// Fetch a new state from `source` and publish it.
    ///
    /// Failed attempts are retried per [`StoreConfig::retry`], sleeping the
    /// backoff delay in between. When every attempt fails the last error is
    /// returned and the current state is left as it was.
    pub fn refresh<S: RefreshSource + ?Sized>(&self, source: &S) -> Result<State> {
        let policy = self.config.retry;
        let attempts = policy.attempts();
        let mut last_error = StoreError::RefreshFailed("no attempt made".to_string());

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = policy.backoff.delay(attempt - 1);
                debug!(source = source.name(), attempt, ?delay, "retrying refresh");
                thread::sleep(delay);
            }

            match source.fetch() {
                Ok(state) => {
                    self.refreshes.fetch_add(1, Ordering::Relaxed);
                    debug!(source = source.name(), attempt, "refresh succeeded");
                    self.replace_state(state.clone());
                    return Ok(state);
                }
                Err(e) => {
                    warn!(source = source.name(), attempt, error = %e, "refresh attempt failed");
                    last_error = e;
                }
            }
        }

        self.refresh_failures.fetch_add(1, Ordering::Relaxed);
        Err(last_error)
    }

    /// Run [`Store::refresh`] on a background thread.
    ///
    /// The state is published from that thread once the fetch resolves; join
    /// the handle to learn the outcome.
    pub fn spawn_refresh(
        self: &Arc<Self>,
        source: Arc<dyn RefreshSource>,
    ) -> JoinHandle<Result<State>> {
        let store = Arc::clone(self);
        thread::spawn(move || store.refresh(source.as_ref()))
    }

    // --- Subscriptions ---

    /// Subscribe to the main stream through a bounded channel.
    pub fn subscribe_channel(&self, config: SubscriptionConfig) -> SubscriptionHandle<State> {
        self.subject.subscribe_channel(config)
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            version: self.subject.version(),
            subscriber_count: self.subject.subscriber_count(),
            refreshes: self.refreshes.load(Ordering::Relaxed),
            refresh_failures: self.refresh_failures.load(Ordering::Relaxed),
            edits: self.edits.load(Ordering::Relaxed),
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}
