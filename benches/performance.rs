//! Performance benchmarks for the reactive store.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rxstore::{Diagnostics, LogLevel, MemorySink, State, Store, StreamExt};

/// Benchmark publish fan-out with varying subscriber counts
fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out");

    for subscribers in [1, 10, 100, 1000] {
        group.bench_with_input(
            BenchmarkId::new("subscribers", subscribers),
            &subscribers,
            |b, &count| {
                let store = Store::default();
                let _subs: Vec<_> = (0..count)
                    .map(|_| {
                        store.numbers().subscribe(|state| {
                            black_box(state);
                        })
                    })
                    .collect();
                let state = State::from([1, 2, 3]);

                b.iter(|| store.replace_state(state.clone()));
            },
        );
    }

    group.finish();
}

/// Benchmark derived views against state size
fn bench_derive_scaled(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_scaled");

    for len in [10, 1000, 100_000] {
        group.bench_with_input(BenchmarkId::new("len", len), &len, |b, &len| {
            let store = Store::default();
            let _sub = store.derive_scaled(3).subscribe(|state| {
                black_box(state);
            });
            let state: State = (0..len as i64).collect();

            b.iter(|| store.replace_state(state.clone()));
        });
    }

    group.finish();
}

/// Benchmark edits (copy-on-write of the whole state)
fn bench_edit(c: &mut Criterion) {
    c.bench_function("edit_at_1000", |b| {
        let store = Store::default();
        store.replace_state((0..1000).collect());

        b.iter(|| black_box(store.edit_at(1).unwrap()));
    });
}

/// Benchmark a tap that is gated off versus one that writes
fn bench_tap(c: &mut Criterion) {
    let mut group = c.benchmark_group("tap");

    for (name, threshold) in [("silent", LogLevel::Error), ("writing", LogLevel::Trace)] {
        group.bench_function(name, |b| {
            let store = Store::default();
            let sink = MemorySink::new();
            let diagnostics = Diagnostics::new(threshold).with_sink(sink.clone());
            let _sub = store
                .numbers()
                .pipe(diagnostics.tap(LogLevel::Debug, "numbers"))
                .subscribe(|_| {});
            let state = State::from([1, 2, 3]);

            b.iter(|| {
                store.replace_state(state.clone());
                sink.clear();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fan_out, bench_derive_scaled, bench_edit, bench_tap);
criterion_main!(benches);
