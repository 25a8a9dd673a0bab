//! Push-based streams.
//!
//! A [`Stream`] delivers [`Signal`]s to observers: any number of `Next`
//! values, optionally terminated by a single `Error` or `Complete`. Streams
//! compose through [`StreamExt::map`] and [`StreamExt::pipe`], which accepts
//! any [`Operator`] (the logging tap is one).
//!
//! # Example
//!
//! ```ignore
//! let doubled = from_iter(vec![1, 2, 3]).map(|x| x * 2);
//! let _sub = doubled.subscribe(|x| println!("{x}"));
//! ```

mod iter;
mod ops;
mod types;

pub use iter::{from_iter, from_signals, IterStream};
pub use ops::{Map, Operator, StreamExt};
pub use types::{Observer, Recorder, Signal, Stream, Subscription};
