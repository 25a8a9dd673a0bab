//! Stream composition.

use super::types::{Signal, Stream, Subscription};
use std::sync::Arc;

/// A pipeline stage turning one stream into another.
pub trait Operator<S: Stream> {
    type Output: Stream;

    fn apply(self, source: S) -> Self::Output;
}

/// Stream produced by [`StreamExt::map`].
///
/// The function runs once per value per subscriber; nothing is shared or
/// cached between subscribers.
pub struct Map<S, F> {
    source: S,
    f: Arc<F>,
}

impl<S, F> Map<S, F> {
    pub fn new(source: S, f: F) -> Self {
        Self {
            source,
            f: Arc::new(f),
        }
    }
}

impl<S, F, U> Stream for Map<S, F>
where
    S: Stream,
    F: Fn(S::Item) -> U + Send + Sync + 'static,
    U: Send + 'static,
{
    type Item = U;

    fn subscribe_signals(&self, mut observer: super::Observer<U>) -> Subscription {
        let f = Arc::clone(&self.f);
        self.source
            .subscribe_signals(Box::new(move |signal| observer(signal.map(|v| (*f)(v)))))
    }
}

/// Convenience methods for every [`Stream`].
pub trait StreamExt: Stream + Sized {
    /// Transform every value with `f`.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        F: Fn(Self::Item) -> U + Send + Sync + 'static,
        U: Send + 'static,
    {
        Map::new(self, f)
    }

    /// Apply an operator.
    fn pipe<O: Operator<Self>>(self, operator: O) -> O::Output {
        operator.apply(self)
    }

    /// Subscribe to values only, ignoring terminal signals.
    fn subscribe<F>(&self, mut on_next: F) -> Subscription
    where
        F: FnMut(Self::Item) + Send + 'static,
    {
        self.subscribe_signals(Box::new(move |signal| {
            if let Signal::Next(value) = signal {
                on_next(value);
            }
        }))
    }
}

impl<S: Stream> StreamExt for S {}

impl<S: Stream> Stream for Arc<S> {
    type Item = S::Item;

    fn subscribe_signals(&self, observer: super::Observer<S::Item>) -> Subscription {
        (**self).subscribe_signals(observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::stream::{from_iter, from_signals, Recorder};

    #[test]
    fn test_map_values() {
        let recorder = Recorder::new();
        recorder.attach(&from_iter(vec![1, 2, 3]).map(|x: i32| x * 10));

        assert_eq!(
            recorder.signals(),
            vec![
                Signal::Next(10),
                Signal::Next(20),
                Signal::Next(30),
                Signal::Complete
            ]
        );
    }

    #[test]
    fn test_map_forwards_error() {
        let source = from_signals(vec![
            Signal::Next(1),
            Signal::Error(StoreError::Stream("boom".into())),
        ]);
        let recorder = Recorder::new();
        recorder.attach(&source.map(|x: i32| x.to_string()));

        assert_eq!(
            recorder.signals(),
            vec![
                Signal::Next("1".to_string()),
                Signal::Error(StoreError::Stream("boom".into()))
            ]
        );
    }

    #[test]
    fn test_map_chain() {
        let recorder = Recorder::new();
        let stream = from_iter(vec![1, 2]).map(|x: i64| x + 1).map(|x| x * x);
        recorder.attach(&stream);

        assert_eq!(recorder.values(), vec![4, 9]);
    }

    #[test]
    fn test_subscribe_values_only() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        from_iter(vec!["a", "b"]).subscribe(move |v| sink.lock().push(v));

        assert_eq!(*seen.lock(), vec!["a", "b"]);
    }
}
