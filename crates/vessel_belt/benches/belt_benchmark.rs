//! Benchmark for belt exchanges and the mover.
//!
//! Run with: cargo bench --package vessel_belt --bench belt_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vessel_belt::{move_one_item, Belt, Drum, Queue};

const CAPACITY: usize = 64;

fn benchmark_drum_cycle(c: &mut Criterion) {
    let rounds: Vec<u32> = (0..CAPACITY as u32).collect();

    c.bench_function("drum_load_and_empty", |b| {
        let mut drum: Drum<'_, u32> = Drum::new(CAPACITY);
        b.iter(|| {
            for round in &rounds {
                drum.exchange_receiver_slot(Some(round));
            }
            let mut pulled = 0u32;
            while let Some(round) = drum.exchange_feeder_slot(None) {
                pulled = pulled.wrapping_add(*round);
            }
            black_box(pulled)
        });
    });
}

fn benchmark_queue_to_drum(c: &mut Criterion) {
    let rounds: Vec<u32> = (0..CAPACITY as u32).collect();

    c.bench_function("queue_to_drum_transfer", |b| {
        b.iter(|| {
            let mut magazine: Queue<'_, u32> = Queue::new(CAPACITY);
            let mut drum: Drum<'_, u32> = Drum::new(CAPACITY);
            for round in &rounds {
                magazine.exchange_receiver_slot(Some(round));
            }
            while !drum.is_full() {
                black_box(move_one_item(&mut drum, &mut magazine));
            }
        });
    });
}

fn benchmark_sparse_drum_search(c: &mut Criterion) {
    let round = 7u32;

    c.bench_function("sparse_drum_pull", |b| {
        let mut drum: Drum<'_, u32> = Drum::new(CAPACITY);
        let mut sink: Queue<'_, u32> = Queue::new(1);
        b.iter(|| {
            drum.advance(CAPACITY / 2);
            drum.exchange_feeder_slot(Some(&round));
            drum.advance(CAPACITY / 2 + 1);
            sink.exchange_feeder_slot(None);
            black_box(move_one_item(&mut sink, &mut drum))
        });
    });
}

criterion_group!(
    benches,
    benchmark_drum_cycle,
    benchmark_queue_to_drum,
    benchmark_sparse_drum_search,
);
criterion_main!(benches);
