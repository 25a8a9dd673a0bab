//! Refresh sources: producers of a fresh state.
//!
//! A source yields exactly one [`State`] per fetch or fails. The store only
//! ever calls [`RefreshSource::fetch`]; where the data comes from (an HTTP
//! response, a worker thread, a constant) is the source's business.

use crate::error::{Result, StoreError};
use crate::types::State;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// A producer of fresh state.
pub trait RefreshSource: Send + Sync {
    fn fetch(&self) -> Result<State>;

    /// Name used in log output.
    fn name(&self) -> &str {
        "source"
    }
}

/// Always yields the same state.
#[derive(Clone, Debug)]
pub struct StaticSource {
    state: State,
}

impl StaticSource {
    pub fn new(state: impl Into<State>) -> Self {
        Self {
            state: state.into(),
        }
    }
}

impl RefreshSource for StaticSource {
    fn fetch(&self) -> Result<State> {
        Ok(self.state.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Wraps a closure.
pub struct FnSource<F> {
    name: String,
    f: F,
}

impl<F> FnSource<F>
where
    F: Fn() -> Result<State> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> RefreshSource for FnSource<F>
where
    F: Fn() -> Result<State> + Send + Sync,
{
    fn fetch(&self) -> Result<State> {
        (self.f)()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Wraps a closure returning a JSON body, e.g. an HTTP GET.
///
/// Transport errors become [`StoreError::RefreshFailed`]; a body that is not
/// an integer array becomes [`StoreError::Deserialization`].
pub struct JsonSource<F> {
    name: String,
    fetch_body: F,
}

impl<F, E> JsonSource<F>
where
    F: Fn() -> std::result::Result<Vec<u8>, E> + Send + Sync,
    E: std::fmt::Display,
{
    pub fn new(name: impl Into<String>, fetch_body: F) -> Self {
        Self {
            name: name.into(),
            fetch_body,
        }
    }
}

impl<F, E> RefreshSource for JsonSource<F>
where
    F: Fn() -> std::result::Result<Vec<u8>, E> + Send + Sync,
    E: std::fmt::Display,
{
    fn fetch(&self) -> Result<State> {
        let body = (self.fetch_body)().map_err(|e| StoreError::RefreshFailed(e.to_string()))?;
        State::from_json(&body)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Waits for a result pushed by another thread.
///
/// Each fetch consumes one result. Nothing arriving within the timeout is a
/// [`StoreError::RefreshTimeout`].
pub struct ChannelSource {
    name: String,
    receiver: Receiver<Result<State>>,
    timeout: Duration,
}

impl ChannelSource {
    /// Create a source and the sender its producer writes to.
    pub fn new(name: impl Into<String>, timeout: Duration) -> (Sender<Result<State>>, Self) {
        let (sender, receiver) = bounded(16);
        let source = Self {
            name: name.into(),
            receiver,
            timeout,
        };
        (sender, source)
    }
}

impl RefreshSource for ChannelSource {
    fn fetch(&self) -> Result<State> {
        match self.receiver.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(StoreError::RefreshTimeout(self.timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(StoreError::RefreshFailed(
                "producer disconnected".to_string(),
            )),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
