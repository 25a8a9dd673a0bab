//! Channel subscription types for the broadcaster.

use crate::types::{SubscriptionId, Version};
use serde::{Deserialize, Serialize};

/// Configuration for a channel subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before dropping the subscriber.
    /// Default: 1000
    pub buffer_size: usize,

    /// Deliver the current value immediately on subscribe.
    /// Default: true
    pub replay_latest: bool,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1000,
            replay_latest: true,
        }
    }
}

/// Events delivered to channel subscribers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BroadcastEvent<T> {
    /// A published value.
    Value { version: Version, value: T },

    /// Subscription was dropped. Nothing follows it.
    Dropped { reason: DropReason },
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Receiver was dropped.
    Disconnected,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Handle to a channel subscription.
pub struct SubscriptionHandle<T> {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<BroadcastEvent<T>>,
}

impl<T> SubscriptionHandle<T> {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<BroadcastEvent<T>, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<BroadcastEvent<T>, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<BroadcastEvent<T>, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain every value currently buffered, stopping at a drop notice.
    pub fn drain_values(&self) -> Vec<T> {
        let mut values = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            match event {
                BroadcastEvent::Value { value, .. } => values.push(value),
                BroadcastEvent::Dropped { .. } => break,
            }
        }
        values
    }
}
