//! Kernel benchmarks: blocked vs. direct transpose, pairwise vs. sequential
//! cumulative sum.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use numkern_core::{KernelConfig, Tensor};

#[allow(clippy::cast_precision_loss)]
fn benchmark_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpose");
    let direct = KernelConfig {
        transpose_base: usize::MAX,
        ..KernelConfig::default()
    };
    let blocked = KernelConfig::default();

    for n in [64_usize, 256, 1024, 2048] {
        let a = Tensor::from_fn(vec![n, n], |i| i as f64);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_with_input(BenchmarkId::new("direct", n), &a, |b, a| {
            b.iter(|| black_box(a.transpose_with(&direct).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("blocked", n), &a, |b, a| {
            b.iter(|| black_box(a.transpose_with(&blocked).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_cumsum(c: &mut Criterion) {
    let mut group = c.benchmark_group("cumsum");

    for n in [1_000_usize, 100_000, 1_000_000] {
        let v = Tensor::full(vec![n], 1e-8_f64);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("pairwise", n), &v, |b, v| {
            b.iter(|| black_box(v.cumsum()));
        });
        group.bench_with_input(BenchmarkId::new("sequential", n), &v, |b, v| {
            b.iter(|| {
                let mut acc = 0.0_f64;
                let out: Vec<f64> = v
                    .iter()
                    .map(|&x| {
                        acc += x;
                        acc
                    })
                    .collect();
                black_box(out)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_transpose, benchmark_cumsum);
criterion_main!(benches);
