use std::thread;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use spqueue::SpQueue;

fn single_thread_round_trip(c: &mut Criterion) {
    c.bench_function("single_thread_enqueue_dequeue", |b| {
        let queue: SpQueue<u64> = SpQueue::new();
        b.iter(|| {
            queue.enqueue(1);
            queue.dequeue()
        });
    });
}

fn multi_producer_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_producer_enqueue");
    for producers in [1usize, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::from_parameter(producers),
            &producers,
            |b, &producers| {
                b.iter(|| {
                    let queue: SpQueue<u64> = SpQueue::new();
                    thread::scope(|scope| {
                        for p in 0..producers {
                            let queue = &queue;
                            scope.spawn(move || {
                                for i in 0..1000u64 {
                                    queue.enqueue(p as u64 * 1000 + i);
                                }
                            });
                        }
                    });
                    while queue.dequeue().is_some() {}
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, single_thread_round_trip, multi_producer_throughput);
criterion_main!(benches);
