use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use viva_recall::selection::{score_candidates, BatchSelector};
use viva_recall::{RecallEngine, ReviewState};

fn bench_predict(c: &mut Criterion) {
    let engine = RecallEngine::new();
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let state = ReviewState::new(4, Some(now - Duration::days(3)));

    c.bench_function("predict_state", |b| {
        b.iter(|| black_box(engine.predict_state(black_box(&state), now)))
    });
}

fn bench_train(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let state = ReviewState::new(4, Some(now - Duration::days(3)));

    c.bench_function("train_state", |b| {
        let mut engine = RecallEngine::new();
        b.iter(|| black_box(engine.train_state(black_box(&state), 1.0, now)))
    });
}

fn bench_select_batch(c: &mut Criterion) {
    let sizes = [100usize, 1_000, 10_000];
    let engine = RecallEngine::with_weights([0.4, 0.05, -0.01]);
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let mut group = c.benchmark_group("select_batch");

    for size in sizes {
        let states: Vec<ReviewState> = (0..size)
            .map(|i| {
                let last = (i % 3 != 0).then(|| now - Duration::hours((i % 2000) as i64));
                ReviewState::new((i % 25) as u32, last)
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            let mut selector = BatchSelector::with_seed(10, 7);
            b.iter(|| {
                let scored = score_candidates(&engine, &states, |s| Ok(*s), now).unwrap();
                black_box(selector.select(scored))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_predict, bench_train, bench_select_batch);
criterion_main!(benches);
