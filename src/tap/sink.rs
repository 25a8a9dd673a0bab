//! Diagnostic sinks receiving formatted tap lines.

use crate::types::LogLevel;
use parking_lot::Mutex;
use std::sync::Arc;

/// Line-oriented output for the logging tap.
pub trait DiagnosticSink: Send + Sync {
    /// Write one line. `level` is the tap's own level.
    fn write_line(&self, level: LogLevel, line: &str);
}

/// Emits each line as a `tracing` event under the `rxstore::tap` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn write_line(&self, level: LogLevel, line: &str) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "rxstore::tap", "{}", line),
            LogLevel::Debug => tracing::debug!(target: "rxstore::tap", "{}", line),
            LogLevel::Info => tracing::info!(target: "rxstore::tap", "{}", line),
            LogLevel::Warn => tracing::warn!(target: "rxstore::tap", "{}", line),
            LogLevel::Error => tracing::error!(target: "rxstore::tap", "{}", line),
        }
    }
}

/// Prints each line to stdout.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutSink;

impl DiagnosticSink for StdoutSink {
    fn write_line(&self, _level: LogLevel, line: &str) {
        println!("{}", line);
    }
}

/// Keeps every line in memory. Clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().iter().map(|(_, line)| line.clone()).collect()
    }

    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().clone()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl DiagnosticSink for MemorySink {
    fn write_line(&self, level: LogLevel, line: &str) {
        self.lines.lock().push((level, line.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_shared_between_clones() {
        let sink = MemorySink::new();
        let writer = sink.clone();

        writer.write_line(LogLevel::Warn, "a: 1");
        writer.write_line(LogLevel::Debug, "b: 2");

        assert_eq!(sink.lines(), vec!["a: 1", "b: 2"]);
        assert_eq!(sink.entries()[0], (LogLevel::Warn, "a: 1".to_string()));

        sink.clear();
        assert!(writer.lines().is_empty());
    }

    #[test]
    fn test_stdout_sink_writes() {
        for level in LogLevel::ALL {
            StdoutSink.write_line(level, "numbers: [0]");
        }
    }

    #[test]
    fn test_tracing_sink_every_level() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();

        for level in LogLevel::ALL {
            TracingSink.write_line(level, "numbers: [1, 2, 3]");
        }
    }
}
