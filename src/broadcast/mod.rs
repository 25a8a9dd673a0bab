//! Latest-value broadcasting.
//!
//! A [`Broadcaster`] holds exactly one current value. Subscribers get:
//! - the current value immediately on subscribe
//! - every later value, synchronously, in subscription order
//!
//! Two ways to listen:
//! - callback observers through the [`Stream`](crate::stream::Stream) impl
//! - bounded channels through [`Broadcaster::subscribe_channel`], with
//!   slow-subscriber dropping
//!
//! # Example
//!
//! ```ignore
//! let broadcaster = Broadcaster::new(vec![0]);
//! let handle = broadcaster.subscribe_channel(SubscriptionConfig::default());
//!
//! broadcaster.publish(vec![1, 2, 3]);
//!
//! loop {
//!     match handle.recv() {
//!         Ok(BroadcastEvent::Value { version, value }) => println!("{version}: {value:?}"),
//!         Ok(BroadcastEvent::Dropped { reason }) => break,
//!         Err(_) => break,
//!     }
//! }
//! ```

mod broadcaster;
mod types;

pub use broadcaster::Broadcaster;
pub use types::{BroadcastEvent, DropReason, SubscriptionConfig, SubscriptionHandle};
