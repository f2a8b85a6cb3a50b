use criterion::{black_box, criterion_group, criterion_main, Criterion};
use perrin_hunter::perrin::PERRIN_SEEDS;
use perrin_hunter::sieve::PrimeTable;
use perrin_hunter::verify;

fn bench_build_sequential_1m(c: &mut Criterion) {
    c.bench_function("PrimeTable::build(1_000_000)", |b| {
        b.iter(|| PrimeTable::build(black_box(1_000_000)));
    });
}

fn bench_build_parallel_1m(c: &mut Criterion) {
    c.bench_function("PrimeTable::build_parallel(1_000_000)", |b| {
        b.iter(|| PrimeTable::build_parallel(black_box(1_000_000)));
    });
}

fn bench_is_prime_lookup(c: &mut Criterion) {
    let table = PrimeTable::build_parallel(1_000_000);
    c.bench_function("is_prime lookups over 10k indices", |b| {
        b.iter(|| {
            (2..10_002u64)
                .filter(|&x| table.is_prime(black_box(x)).unwrap_or(false))
                .count()
        });
    });
}

fn bench_perrin_residue(c: &mut Criterion) {
    c.bench_function("perrin_residue(271441)", |b| {
        b.iter(|| {
            verify::perrin_residue(
                black_box(PERRIN_SEEDS),
                black_box(271_441),
                black_box(271_441),
            )
        });
    });
}

criterion_group!(
    benches,
    bench_build_sequential_1m,
    bench_build_parallel_1m,
    bench_is_prime_lookup,
    bench_perrin_residue,
);
criterion_main!(benches);
