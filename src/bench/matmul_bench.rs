use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use parmatrix::{Matrix, SyncDeferred, multiply, sequential_multiply};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn bench_multiply(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiply");
    group.sample_size(10);

    let mut rng = StdRng::seed_from_u64(42);
    let max_workers = num_cpus::get();

    for size in [64, 128, 256] {
        let a = Matrix::random(size, size, &mut rng);
        let b = Matrix::random(size, size, &mut rng);

        group.bench_with_input(BenchmarkId::new("sequential", size), &size, |bench, _| {
            bench.iter(|| sequential_multiply(black_box(&a), black_box(&b)))
        });

        for workers in [2, max_workers] {
            let id = BenchmarkId::new(format!("parallel_{}w", workers), size);
            group.bench_with_input(id, &size, |bench, _| {
                bench.iter(|| multiply(black_box(&a), black_box(&b), workers))
            });
        }
    }

    group.finish();
}

fn bench_deferred_fast_path(c: &mut Criterion) {
    let cell = SyncDeferred::new(|| Ok::<_, ()>(vec![0u8; 1024]));
    let _ = cell.get();

    c.bench_function("sync_deferred_get_after_init", |bench| {
        bench.iter(|| black_box(cell.get()).is_ok())
    });
}

criterion_group!(benches, bench_multiply, bench_deferred_fast_path);
criterion_main!(benches);
