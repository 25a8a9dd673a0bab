//! The logging tap operator.

use super::level::LevelCell;
use super::sink::DiagnosticSink;
use crate::stream::{Observer, Operator, Signal, Stream, Subscription};
use crate::types::LogLevel;
use std::fmt::{self, Display};
use std::sync::Arc;

/// Pass-through stage writing `"<label>: <value>"` for every value while
/// its level clears the shared threshold.
///
/// Values, their order, completion and errors are forwarded untouched.
/// Attaches to any stream whose items implement [`Display`], which
/// formats the value part of the line.
#[derive(Clone)]
pub struct LogTap {
    level: LogLevel,
    label: Arc<str>,
    threshold: LevelCell,
    sink: Arc<dyn DiagnosticSink>,
}

impl LogTap {
    pub fn new(
        level: LogLevel,
        label: impl Into<String>,
        threshold: LevelCell,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let label: String = label.into();
        Self {
            level,
            label: Arc::from(label),
            threshold,
            sink,
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Write the line for `value` if the threshold currently allows it.
    pub fn observe<T: Display + ?Sized>(&self, value: &T) {
        if self.threshold.allows(self.level) {
            self.sink
                .write_line(self.level, &format!("{}: {}", self.label, value));
        }
    }
}

impl fmt::Debug for LogTap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogTap")
            .field("level", &self.level)
            .field("label", &self.label)
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl<S> Operator<S> for LogTap
where
    S: Stream,
    S::Item: Display,
{
    type Output = Tapped<S>;

    fn apply(self, source: S) -> Tapped<S> {
        Tapped {
            source,
            tap: Arc::new(self),
        }
    }
}

/// A stream with a [`LogTap`] attached.
pub struct Tapped<S> {
    source: S,
    tap: Arc<LogTap>,
}

impl<S> Stream for Tapped<S>
where
    S: Stream,
    S::Item: Display,
{
    type Item = S::Item;

    fn subscribe_signals(&self, mut observer: Observer<S::Item>) -> Subscription {
        let tap = Arc::clone(&self.tap);
        self.source.subscribe_signals(Box::new(move |signal| {
            if let Signal::Next(value) = &signal {
                tap.observe(value);
            }
            observer(signal);
        }))
    }
}
