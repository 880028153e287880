//! Criterion micro-benchmarks for arena allocation and array growth.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use kiln_arena::{AllocParams, Allocator, AllocatorExt, ArenaAllocator};
use kiln_containers::Array;
use kiln_core::mb;
use kiln_test_utils::Transform;

/// Benchmark: 1K small allocations followed by a reset.
fn bench_arena_alloc_1k(c: &mut Criterion) {
    let arena = ArenaAllocator::new(mb(1));
    c.bench_function("arena_alloc_1k", |b| {
        b.iter(|| {
            for _ in 0..1_000 {
                black_box(arena.allocate(64, AllocParams::default()));
            }
            arena.free_all();
        });
    });
}

/// Benchmark: construct 1K transforms with an aligned stride.
fn bench_arena_create_array_with_1k(c: &mut Criterion) {
    let arena = ArenaAllocator::new(mb(1));
    c.bench_function("arena_create_array_with_1k", |b| {
        b.iter(|| {
            let h = arena
                .create_array_with(1_000, 16, |i| Transform::at(i as f32, 0.0, 0.0))
                .unwrap();
            black_box(h);
            arena.free_all();
        });
    });
}

/// Benchmark: push 10K u32 values into an array that starts at capacity 1.
fn bench_array_push_10k(c: &mut Criterion) {
    let arena = ArenaAllocator::new(mb(1));
    c.bench_function("array_push_10k", |b| {
        b.iter(|| {
            {
                let mut array = Array::<u32>::new(&arena, 1).unwrap();
                for i in 0..10_000u32 {
                    array.push(i).unwrap();
                }
                black_box(array.len());
            }
            arena.free_all();
        });
    });
}

criterion_group!(
    benches,
    bench_arena_alloc_1k,
    bench_arena_create_array_with_1k,
    bench_array_push_10k
);
criterion_main!(benches);
