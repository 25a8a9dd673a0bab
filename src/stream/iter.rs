//! Finite streams built from fixed signal lists.

use super::types::{Observer, Signal, Stream, Subscription};
use std::sync::Arc;

/// A stream that replays the same signals to every subscriber, synchronously.
#[derive(Clone, Debug)]
pub struct IterStream<T> {
    signals: Arc<[Signal<T>]>,
}

/// Emit every value, then complete.
pub fn from_iter<T, I>(values: I) -> IterStream<T>
where
    I: IntoIterator<Item = T>,
{
    let signals: Vec<Signal<T>> = values
        .into_iter()
        .map(Signal::Next)
        .chain(std::iter::once(Signal::Complete))
        .collect();
    IterStream {
        signals: signals.into(),
    }
}

/// Emit exactly `signals`, stopping after the first terminal one.
pub fn from_signals<T>(signals: Vec<Signal<T>>) -> IterStream<T> {
    IterStream {
        signals: signals.into(),
    }
}

impl<T: Clone + Send + 'static> Stream for IterStream<T> {
    type Item = T;

    fn subscribe_signals(&self, mut observer: Observer<T>) -> Subscription {
        for signal in self.signals.iter() {
            let terminal = signal.is_terminal();
            observer(signal.clone());
            if terminal {
                break;
            }
        }
        Subscription::finished()
    }
}
