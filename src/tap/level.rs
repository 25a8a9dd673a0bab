//! Shared logging threshold.

use crate::types::LogLevel;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// A runtime-adjustable threshold shared by every tap cloned from it.
///
/// Taps read the cell on every value, so [`LevelCell::set`] takes effect for
/// streams that are already running.
#[derive(Clone)]
pub struct LevelCell {
    level: Arc<AtomicU8>,
}

impl LevelCell {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level: Arc::new(AtomicU8::new(level.as_u8())),
        }
    }

    pub fn get(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Acquire))
    }

    pub fn set(&self, level: LogLevel) {
        self.level.store(level.as_u8(), Ordering::Release);
    }

    /// Whether a tap at `level` writes under the current threshold.
    pub fn allows(&self, level: LogLevel) -> bool {
        level >= self.get()
    }
}

impl Default for LevelCell {
    fn default() -> Self {
        Self::new(LogLevel::default())
    }
}

impl fmt::Debug for LevelCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LevelCell({})", self.get())
    }
}
