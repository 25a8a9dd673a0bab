//! Property tests for store and tap behavior.

use proptest::prelude::*;
use rxstore::{
    from_iter, from_signals, Diagnostics, LogLevel, MemorySink, Recorder, Signal, State, Store,
    StoreError, StreamExt,
};

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop::sample::select(LogLevel::ALL.to_vec())
}

fn any_items() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-1_000_000i64..1_000_000, 0..32)
}

proptest! {
    #[test]
    fn replace_then_read_is_identity(items in any_items()) {
        let store = Store::default();
        store.replace_state(State::new(items.clone()));
        prop_assert_eq!(store.current().to_vec(), items);
    }

    #[test]
    fn late_subscriber_sees_latest(states in prop::collection::vec(any_items(), 1..10)) {
        let store = Store::default();
        for items in &states {
            store.replace_state(State::new(items.clone()));
        }

        let recorder = Recorder::new();
        recorder.attach(&store.numbers());

        let expected = State::new(states[states.len() - 1].clone());
        prop_assert_eq!(recorder.values(), vec![expected]);
    }

    #[test]
    fn scaled_view_multiplies_each_element(items in any_items(), factor in -1000i64..1000) {
        let store = Store::default();
        let recorder = Recorder::new();
        recorder.attach(&store.derive_scaled(factor));

        store.replace_state(State::new(items.clone()));

        let scaled = recorder.last().unwrap();
        prop_assert_eq!(scaled.len(), items.len());
        for (out, input) in scaled.iter().zip(&items) {
            prop_assert_eq!(*out, input * factor);
        }
    }

    #[test]
    fn edit_rewrites_only_index_one(items in prop::collection::vec(any::<i64>(), 2..32)) {
        let store = Store::default();
        let original = State::new(items.clone());
        store.replace_state(original.clone());

        let edited = store.edit_at(0).unwrap();

        prop_assert_eq!(original.to_vec(), items.clone());
        prop_assert_eq!(edited.len(), items.len());
        for (i, (out, input)) in edited.iter().zip(&items).enumerate() {
            if i == 1 {
                prop_assert_eq!(*out, 7);
            } else {
                prop_assert_eq!(out, input);
            }
        }
    }

    #[test]
    fn tap_writes_iff_level_clears_threshold(
        tap_level in any_level(),
        first in any_level(),
        second in any_level(),
    ) {
        let sink = MemorySink::new();
        let diagnostics = Diagnostics::new(first).with_sink(sink.clone());
        let store = Store::default();
        store
            .numbers()
            .pipe(diagnostics.tap(tap_level, "n"))
            .subscribe(|_| {});

        diagnostics.set_level(second);
        store.replace_state(State::from([1]));

        let mut expected = Vec::new();
        if tap_level >= first {
            expected.push("n: [0]".to_string());
        }
        if tap_level >= second {
            expected.push("n: [1]".to_string());
        }
        prop_assert_eq!(sink.lines(), expected);
    }

    #[test]
    fn tap_is_transparent(
        values in prop::collection::vec(any::<i32>(), 0..16),
        fail in any::<bool>(),
        tap_level in any_level(),
        threshold in any_level(),
    ) {
        let mut signals: Vec<Signal<i32>> = values.into_iter().map(Signal::Next).collect();
        signals.push(if fail {
            Signal::Error(StoreError::Stream("upstream".into()))
        } else {
            Signal::Complete
        });

        let diagnostics = Diagnostics::new(threshold).with_sink(MemorySink::new());
        let plain = Recorder::new();
        let tapped = Recorder::new();
        plain.attach(&from_signals(signals.clone()));
        tapped.attach(&from_signals(signals).pipe(diagnostics.tap(tap_level, "v")));

        prop_assert_eq!(plain.signals(), tapped.signals());
    }

    #[test]
    fn tap_line_count_matches_values(values in prop::collection::vec(any::<i64>(), 0..16)) {
        let sink = MemorySink::new();
        let diagnostics = Diagnostics::new(LogLevel::Trace).with_sink(sink.clone());
        from_iter(values.clone())
            .pipe(diagnostics.tap(LogLevel::Trace, "x"))
            .subscribe(|_| {});

        let expected: Vec<String> = values.iter().map(|v| format!("x: {}", v)).collect();
        prop_assert_eq!(sink.lines(), expected);
    }
}
