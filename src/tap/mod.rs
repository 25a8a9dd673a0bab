//! Level-gated logging tap.
//!
//! [`Diagnostics`] bundles the shared threshold with a sink and hands out
//! [`LogTap`] operators. Each tap carries its own level and writes only while
//! `tap level >= threshold`, reading the threshold per value. There is no
//! process-wide state: every tap built from the same `Diagnostics` (or from
//! clones of its [`LevelCell`]) sees the same threshold.
//!
//! # Example
//!
//! ```ignore
//! let diagnostics = Diagnostics::new(LogLevel::Info);
//! let logged = store.numbers().pipe(diagnostics.tap(LogLevel::Debug, "numbers"));
//! logged.subscribe(|_| {});        // silent: Debug < Info
//! diagnostics.set_level(LogLevel::Debug);
//! store.replace_state(State::from([1, 2]));   // "numbers: [1, 2]"
//! ```

mod level;
mod operator;
mod sink;

pub use level::LevelCell;
pub use operator::{LogTap, Tapped};
pub use sink::{DiagnosticSink, MemorySink, StdoutSink, TracingSink};

use crate::types::LogLevel;
use std::fmt;
use std::sync::Arc;

/// Threshold plus sink, shared by every tap it creates.
#[derive(Clone)]
pub struct Diagnostics {
    threshold: LevelCell,
    sink: Arc<dyn DiagnosticSink>,
}

impl Diagnostics {
    /// Threshold `level`, writing through [`TracingSink`].
    pub fn new(level: LogLevel) -> Self {
        Self {
            threshold: LevelCell::new(level),
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the sink for taps created from now on.
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Share an existing threshold.
    pub fn with_threshold(mut self, threshold: LevelCell) -> Self {
        self.threshold = threshold;
        self
    }

    /// Change the threshold for every tap, including running ones.
    pub fn set_level(&self, level: LogLevel) {
        self.threshold.set(level);
    }

    pub fn level(&self) -> LogLevel {
        self.threshold.get()
    }

    pub fn threshold(&self) -> &LevelCell {
        &self.threshold
    }

    /// A tap writing `"<label>: <value>"` at `level`.
    pub fn tap(&self, level: LogLevel, label: impl Into<String>) -> LogTap {
        LogTap::new(
            level,
            label,
            self.threshold.clone(),
            Arc::clone(&self.sink),
        )
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(LogLevel::default())
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("threshold", &self.threshold)
            .finish()
    }
}
