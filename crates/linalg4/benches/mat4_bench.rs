//! Criterion benchmarks for the 4x4 kernels.
//!
//! Times matrix-matrix, matrix-vector, determinant and inverse on seeded
//! random inputs in both precisions.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use linalg4::rand4::{Sampler4, UniformCfg};
use linalg4::{Matrix4, Scalar, Vector4};

fn inputs<T: Scalar>(seed: u64) -> (Matrix4<T>, Matrix4<T>, Vector4<T>) {
    let mut sampler = Sampler4::new(UniformCfg::default(), seed).unwrap();
    let (a, _) = sampler.next_matrix();
    let (b, _) = sampler.next_matrix();
    let (v, _) = sampler.next_vector();
    (a, b, v)
}

fn bench_products<T: Scalar>(c: &mut Criterion, label: &str) {
    let mut group = c.benchmark_group(format!("mat4_{label}"));
    let (a, b, v) = inputs::<T>(42);
    group.bench_function("matmul", |bn| bn.iter(|| black_box(black_box(a) * black_box(b))));
    group.bench_function("matvec", |bn| bn.iter(|| black_box(black_box(a) * black_box(v))));
    group.bench_function("determinant", |bn| {
        bn.iter(|| black_box(black_box(&a).determinant()))
    });
    group.bench_function("inverse", |bn| {
        bn.iter_batched(
            || inputs::<T>(7).0,
            |m| black_box(m.inverse()),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_mat4(c: &mut Criterion) {
    bench_products::<f32>(c, "f32");
    bench_products::<f64>(c, "f64");
}

criterion_group!(benches, bench_mat4);
criterion_main!(benches);
