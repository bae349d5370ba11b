use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use ferrotask::{IdPool, Scalar, Task, TaskServer};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

// Number of tasks submitted per benchmark iteration (split across clients for
// multi-threaded runs).
const TOTAL_TASKS: usize = 4096;

/// Benchmarks a single client that submits a batch, then collects it.
fn bench_batch<T: Scalar>(
    c: &mut Criterion,
    group_name: &str,
    make_task: impl Fn(usize) -> Task<T>,
) {
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_TASKS as u64));

    for workers in [1, 2, 4, 8] {
        let mut server = TaskServer::<T>::create(workers).expect("server should start");
        group.bench_function(format!("elems/{TOTAL_TASKS}/workers/{workers}"), |b| {
            b.iter_custom(|iters| {
                let start = Instant::now();

                for _ in 0..iters {
                    let ids: Vec<_> = (0..TOTAL_TASKS)
                        .map(|i| server.submit(make_task(i)).expect("server is running"))
                        .collect();
                    for id in ids {
                        black_box(server.wait(id).expect("task should succeed"));
                    }
                }

                start.elapsed()
            });
        });
        server.shutdown().expect("shutdown should succeed");
    }

    group.finish();
}

/// Benchmarks several clients sharing one server, each submitting and
/// collecting its own share of the batch.
fn bench_contended(c: &mut Criterion) {
    const WORKERS: usize = 8;
    let mut group = c.benchmark_group("contended/sin/f64");
    group.throughput(Throughput::Elements(TOTAL_TASKS as u64));

    let mut server = TaskServer::<f64>::create(WORKERS).expect("server should start");
    for clients in [1, 2, 4, 8, 16] {
        let tasks_per_client = TOTAL_TASKS / clients;
        group.bench_function(
            format!("elems/{TOTAL_TASKS}/clients/{clients}/workers/{WORKERS}"),
            |b| {
                b.iter_custom(|iters| {
                    let start = Instant::now();

                    for _ in 0..iters {
                        let barrier = Arc::new(Barrier::new(clients + 1));
                        scope(|s| {
                            for _ in 0..clients {
                                let server = &server;
                                let barrier = Arc::clone(&barrier);
                                s.spawn(move || {
                                    barrier.wait();
                                    let ids: Vec<_> = (0..tasks_per_client)
                                        .map(|i| server.submit(Task::Sin(i as f64)).unwrap())
                                        .collect();
                                    for id in ids {
                                        black_box(server.wait(id).unwrap());
                                    }
                                });
                            }
                            barrier.wait();
                        });
                    }

                    start.elapsed()
                });
            },
        );
    }
    server.shutdown().expect("shutdown should succeed");

    group.finish();
}

/// Benchmarks raw identifier churn on the pool alone.
fn bench_id_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("id_pool");
    group.throughput(Throughput::Elements(TOTAL_TASKS as u64));

    group.bench_function(format!("allocate_free/{TOTAL_TASKS}"), |b| {
        let pool = IdPool::new();
        b.iter(|| {
            for _ in 0..TOTAL_TASKS {
                let id = pool.allocate();
                pool.free(black_box(id)).unwrap();
            }
        });
    });

    group.finish();
}

fn benchmark_sin_f64(c: &mut Criterion) {
    bench_batch::<f64>(c, "batch/sin/f64", |i| Task::Sin(i as f64));
}

fn benchmark_pow_f32(c: &mut Criterion) {
    bench_batch::<f32>(c, "batch/pow/f32", |i| Task::Pow((i % 16) as f32, 2.0));
}

criterion_group!(
    benches,
    benchmark_sin_f64,
    benchmark_pow_f32,
    bench_contended,
    bench_id_pool,
);
criterion_main!(benches);
