// Run with: cargo bench --bench workload_memory

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lcdbench::modes::memory::{RAND_READ, RAND_WRITE, SEQ_READ, SEQ_WRITE};
use lcdbench::modes::Memory;
use std::hint::black_box;
use std::time::Duration;

fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(100)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(2))
}

// Word counts: L1-sized, cache-sized, and the full buffer
const COUNTS: &[i32] = &[0x400, 0x2000, 0x20_0000];

const KNOBS: &[(&str, usize)] = &[
    ("seq_write", SEQ_WRITE),
    ("seq_read", SEQ_READ),
    ("rand_write", RAND_WRITE),
    ("rand_read", RAND_READ),
];

fn memory_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("workload_memory");
    // The backing buffer is 8 MiB; allocate it once.
    let mut memory = Memory::new();

    for &count in COUNTS {
        group.throughput(Throughput::Bytes(count as u64 * 4));

        for &(name, knob) in KNOBS {
            for &(_, index) in KNOBS {
                memory.params_mut().set(index, 0);
            }
            memory.params_mut().set(knob, count);

            group.bench_with_input(BenchmarkId::new(name, count), &count, |b, _| {
                b.iter(|| {
                    memory.run_workload();
                    black_box(memory.seed())
                });
            });
        }
    }

    group.finish();
}

criterion_group!(name = benches; config = configure_criterion(); targets = memory_benchmark);
criterion_main!(benches);
