//! Integration tests for the reactive store.

use rxstore::{
    BroadcastEvent, ChannelSource, Diagnostics, JsonSource, LogLevel, MemorySink, Recorder,
    RefreshSource, State, StaticSource, Store, StoreConfig, StreamExt, SubscriptionConfig,
    Version,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn test_store() -> Store {
    Store::new(StoreConfig::default())
}

// --- Realistic Workflow Tests ---

#[test]
fn test_refresh_edit_scale_workflow() {
    let store = test_store();
    assert_eq!(store.current(), State::from([0]));

    store.refresh(&StaticSource::new([1, 2, 3])).unwrap();
    assert_eq!(store.current(), State::from([1, 2, 3]));

    store.edit_at(1).unwrap();
    assert_eq!(store.current(), State::from([1, 7, 3]));

    let scaled = Recorder::new();
    scaled.attach(&store.derive_scaled(4));
    assert_eq!(scaled.values(), vec![State::from([4, 28, 12])]);
}

#[test]
fn test_late_subscriber_sees_latest_only() {
    let store = test_store();
    for i in 1..=5 {
        store.replace_state(State::from([i, i * 10]));
    }

    let late = Recorder::new();
    late.attach(&store.numbers());

    assert_eq!(late.values(), vec![State::from([5, 50])]);
    assert_eq!(store.version(), Version(5));
}

#[test]
fn test_subscribers_are_independent() {
    let store = test_store();
    let first = Recorder::new();
    let first_sub = first.attach(&store.numbers());

    store.replace_state(State::from([1]));

    let second = Recorder::new();
    second.attach(&store.numbers());

    first_sub.unsubscribe();
    store.replace_state(State::from([2]));

    assert_eq!(first.values(), vec![State::from([0]), State::from([1])]);
    assert_eq!(second.values(), vec![State::from([1]), State::from([2])]);
}

#[test]
fn test_derived_view_one_emission_per_store_emission() {
    let store = test_store();
    let doubled = store.derive_scaled(2);

    let a = Recorder::new();
    let b = Recorder::new();
    a.attach(&doubled);
    b.attach(&doubled);

    store.replace_state(State::from([1, 2]));
    store.replace_state(State::from([3]));

    let expected = vec![State::from([0]), State::from([2, 4]), State::from([6])];
    assert_eq!(a.values(), expected);
    assert_eq!(b.values(), expected);
}

#[test]
fn test_tapped_store_stream() {
    let store = test_store();
    let sink = MemorySink::new();
    let diagnostics = Diagnostics::new(LogLevel::Info).with_sink(sink.clone());

    let recorder = Recorder::new();
    recorder.attach(
        &store
            .numbers()
            .pipe(diagnostics.tap(LogLevel::Debug, "numbers")),
    );

    store.replace_state(State::from([1, 2]));
    assert!(sink.lines().is_empty());

    diagnostics.set_level(LogLevel::Debug);
    store.replace_state(State::from([3]));

    diagnostics.set_level(LogLevel::Error);
    store.replace_state(State::from([4]));

    assert_eq!(sink.lines(), vec!["numbers: [3]"]);
    assert_eq!(recorder.values().len(), 4);
}

#[test]
fn test_json_refresh() {
    let store = test_store();
    let source = JsonSource::new("http", || Ok::<_, String>(b"[10, 20, 30]".to_vec()));

    store.refresh(&source).unwrap();
    assert_eq!(store.current(), State::from([10, 20, 30]));
}

#[test]
fn test_channel_subscription_sees_every_state() {
    let store = test_store();
    let handle = store.subscribe_channel(SubscriptionConfig::default());

    store.replace_state(State::from([1]));
    store.edit_at(0).unwrap_err();
    store.replace_state(State::from([1, 2]));
    store.edit_at(0).unwrap();

    let mut versions = Vec::new();
    while let Ok(event) = handle.try_recv() {
        if let BroadcastEvent::Value { version, value } = event {
            versions.push((version.0, value.to_vec()));
        }
    }

    assert_eq!(
        versions,
        vec![
            (0, vec![0]),
            (1, vec![1]),
            (2, vec![1, 2]),
            (3, vec![1, 7]),
        ]
    );
}

// --- Threads ---

#[test]
fn test_spawn_refresh_from_channel_source() {
    let store = Arc::new(test_store());
    let recorder = Recorder::new();
    recorder.attach(&store.numbers());

    let (sender, source) = ChannelSource::new("worker", Duration::from_secs(5));
    let source: Arc<dyn RefreshSource> = Arc::new(source);
    let pending = store.spawn_refresh(source);

    sender.send(Ok(State::from([1, 2, 3]))).unwrap();
    let refreshed = pending.join().unwrap().unwrap();

    assert_eq!(refreshed, State::from([1, 2, 3]));
    assert_eq!(store.current(), State::from([1, 2, 3]));
    assert_eq!(recorder.last(), Some(State::from([1, 2, 3])));
}

#[test]
fn test_concurrent_publishers_keep_order_consistent() {
    let store = Arc::new(test_store());
    let a = Recorder::new();
    let b = Recorder::new();
    a.attach(&store.numbers());
    b.attach(&store.numbers());

    let workers: Vec<_> = (0..4)
        .map(|w| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..50 {
                    store.replace_state(State::from([w, i]));
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    // Every subscriber saw the same sequence, ending at the current state.
    assert_eq!(a.values(), b.values());
    assert_eq!(a.values().len(), 201);
    assert_eq!(a.last(), Some(store.current()));
    assert_eq!(store.version(), Version(200));
}

#[test]
fn test_concurrent_edits_are_atomic() {
    let store = Arc::new(Store::new(StoreConfig {
        initial_state: State::from([0, 0]),
        ..Default::default()
    }));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..100 {
                    store.update(|s| State::from([s[0] + 1, s[1]]));
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(store.current()[0], 400);
}
