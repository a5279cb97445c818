//! Benchmarks for L3 book reconstruction

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use l3_orderbook::parser::{DepthSnapshot, DepthUpdate, RawLevel};
use l3_orderbook::L3Book;

fn create_snapshot(levels: usize) -> DepthSnapshot {
    let bids: Vec<RawLevel> = (0..levels)
        .map(|i| RawLevel::new(format!("{}", 50_000 - i as i64), "1.5"))
        .collect();

    let asks: Vec<RawLevel> = (0..levels)
        .map(|i| RawLevel::new(format!("{}", 50_001 + i as i64), "1.5"))
        .collect();

    DepthSnapshot {
        last_update_id: 1000,
        bids,
        asks,
    }
}

fn create_update(base_id: u64) -> DepthUpdate {
    // vary the aggregate so every delta exercises the queue arithmetic
    let qty = format!("{}.5", 2 + base_id % 50);
    DepthUpdate {
        first_update_id: base_id,
        final_update_id: base_id + 1,
        bids: vec![RawLevel::new("49999", qty.clone())],
        asks: vec![RawLevel::new("50001", qty)],
    }
}

fn benchmark_load_snapshot(c: &mut Criterion) {
    let snapshot = create_snapshot(1000);

    c.bench_function("load_snapshot_1000_levels", |b| {
        b.iter(|| {
            let mut book = L3Book::new("BTCUSDT");
            book.load_snapshot(black_box(&snapshot));
        })
    });
}

fn benchmark_apply_delta(c: &mut Criterion) {
    let snapshot = create_snapshot(1000);
    let mut book = L3Book::new("BTCUSDT");
    book.load_snapshot(&snapshot);

    let mut id = 1000;
    c.bench_function("apply_delta", |b| {
        b.iter(|| {
            id += 2;
            book.apply_delta(black_box(&create_update(id)));
        })
    });
}

fn benchmark_snapshot(c: &mut Criterion) {
    let mut book = L3Book::new("BTCUSDT");
    book.load_snapshot(&create_snapshot(1000));
    // churn the top levels so queues hold more than one order
    for i in 0..200 {
        book.apply_delta(&create_update(2000 + i));
    }

    c.bench_function("snapshot_top_100", |b| {
        b.iter(|| {
            let snapshot = book.snapshot(black_box(100));
            black_box(snapshot);
        })
    });
}

criterion_group!(
    benches,
    benchmark_load_snapshot,
    benchmark_apply_delta,
    benchmark_snapshot
);
criterion_main!(benches);
