//! Core types for the reactive store.

use crate::error::{Result, StoreError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use std::sync::Arc;

/// An immutable, ordered sequence of integers held by the store.
///
/// Cloning is cheap (the elements live behind an `Arc`). Every mutation of
/// the store produces a new `State`; existing holders never observe a change.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct State(Arc<[i64]>);

impl State {
    /// Create a state from owned elements.
    pub fn new(items: Vec<i64>) -> Self {
        State(items.into())
    }

    /// The empty state.
    pub fn empty() -> Self {
        State(Arc::from(Vec::new()))
    }

    /// Parse a JSON array body such as `[1, 2, 3]`.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let items: Vec<i64> = serde_json::from_slice(body)?;
        Ok(State::new(items))
    }

    /// Encode as a JSON array.
    pub fn to_json(&self) -> Vec<u8> {
        // A slice of integers always serializes.
        serde_json::to_vec(&*self.0).unwrap_or_default()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<i64> {
        self.0.to_vec()
    }

    /// Return a copy with the element at `index` replaced by `value`.
    ///
    /// `self` is left untouched.
    pub fn with_item(&self, index: usize, value: i64) -> Result<Self> {
        if index >= self.0.len() {
            return Err(StoreError::IndexOutOfBounds {
                index,
                len: self.0.len(),
            });
        }
        let mut items = self.0.to_vec();
        items[index] = value;
        Ok(State::new(items))
    }

    /// Multiply every element by `factor`. Overflow wraps.
    pub fn scaled(&self, factor: i64) -> Self {
        self.0.iter().map(|x| x.wrapping_mul(factor)).collect()
    }

    /// Whether two states share the same allocation.
    pub fn ptr_eq(&self, other: &State) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for State {
    /// The eager initial state, `[0]`.
    fn default() -> Self {
        State::new(vec![0])
    }
}

impl Deref for State {
    type Target = [i64];

    fn deref(&self) -> &[i64] {
        &self.0
    }
}

impl From<Vec<i64>> for State {
    fn from(items: Vec<i64>) -> Self {
        State::new(items)
    }
}

impl<const N: usize> From<[i64; N]> for State {
    fn from(items: [i64; N]) -> Self {
        State(Arc::from(items.as_slice()))
    }
}

impl From<&[i64]> for State {
    fn from(items: &[i64]) -> Self {
        State(Arc::from(items))
    }
}

impl FromIterator<i64> for State {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        State(iter.into_iter().collect())
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State({:?})", &*self.0)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl Serialize for State {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de> Deserialize<'de> for State {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Vec::<i64>::deserialize(deserializer).map(State::new)
    }
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Number of states published by a store, starting at 0 for the initial state.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Version(pub u64);

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Version {
    pub fn next(self) -> Self {
        Version(self.0 + 1)
    }
}

/// Ordered severity levels, most verbose first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[serde(alias = "warning")]
    Warn,
    Error,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    pub(crate) fn as_u8(self) -> u8 {
        self as u8
    }

    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown level name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Unknown log level: {0}")]
pub struct ParseLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Store statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Version of the current state.
    pub version: Version,
    /// Number of live subscriptions on the main stream.
    pub subscriber_count: usize,
    /// Successful refreshes.
    pub refreshes: u64,
    /// Refreshes that exhausted their attempts.
    pub refresh_failures: u64,
    /// Successful edits.
    pub edits: u64,
}
