//! # Reactive Store
//!
//! A single mutable source of truth for a list of integers, exposed as a
//! latest-value stream with derived read-only views, plus a level-gated
//! logging tap that can be attached to any stream.
//!
//! ## Core Concepts
//!
//! - **State**: Immutable integer sequence; every mutation replaces it whole
//! - **Broadcaster**: Holds the current value, replays it to new subscribers,
//!   fans out later values synchronously
//! - **Store**: Replace, edit, refresh and derive views over one broadcaster
//! - **Tap**: Pass-through stage writing `"<label>: <value>"` while its level
//!   clears a shared, runtime-adjustable threshold
//!
//! ## Example
//!
//! ```ignore
//! use rxstore::{Diagnostics, LogLevel, StaticSource, Store, StreamExt};
//!
//! let store = Store::default();
//! let diagnostics = Diagnostics::new(LogLevel::Info);
//!
//! let _sub = store
//!     .derive_scaled(4)
//!     .pipe(diagnostics.tap(LogLevel::Info, "scaled"))
//!     .subscribe(|_| {});
//!
//! store.refresh(&StaticSource::new([1, 2, 3]))?;   // "scaled: [4, 8, 12]"
//! store.edit_at(1)?;                               // "scaled: [4, 28, 12]"
//! ```

pub mod broadcast;
pub mod error;
pub mod retry;
pub mod source;
pub mod store;
pub mod stream;
pub mod tap;
pub mod types;

// Re-exports
pub use broadcast::{BroadcastEvent, Broadcaster, DropReason, SubscriptionConfig, SubscriptionHandle};
pub use error::{Result, StoreError};
pub use retry::{BackoffPolicy, RetryPolicy};
pub use source::{ChannelSource, FnSource, JsonSource, RefreshSource, StaticSource};
pub use store::{StateStream, Store, StoreConfig};
pub use stream::{
    from_iter, from_signals, IterStream, Map, Observer, Operator, Recorder, Signal, Stream,
    StreamExt, Subscription,
};
pub use tap::{
    DiagnosticSink, Diagnostics, LevelCell, LogTap, MemorySink, StdoutSink, Tapped, TracingSink,
};
pub use types::*;
