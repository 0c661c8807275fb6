//! Benchmarks for compilation and matching throughput.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vinerex::Pattern;

fn bench_compile(c: &mut Criterion) {
    c.bench_function("compile simple", |b| {
        b.iter(|| Pattern::compile(black_box(r"\w+@\w+\.\w+")).unwrap());
    });

    c.bench_function("compile with subroutine", |b| {
        b.iter(|| Pattern::compile(black_box(r"(?<word>\w+)(?:, \g<word>)*")).unwrap());
    });
}

fn bench_search(c: &mut Criterion) {
    let email = Pattern::compile(r"\w+@\w+\.\w+").unwrap();
    let haystack = "contact alice@example.com or bob@example.org for details".repeat(16);

    c.bench_function("search short", |b| {
        b.iter(|| email.search(black_box("alice@example.com")));
    });

    c.bench_function("find_iter long haystack", |b| {
        b.iter(|| email.find_iter(black_box(&haystack)).count());
    });
}

fn bench_backtracking(c: &mut Criterion) {
    let atomic = Pattern::compile(r"(?>(a+)+)b").unwrap();
    let plain = Pattern::compile(r"(a+)+b").unwrap();
    let near_miss = "a".repeat(20);

    c.bench_function("atomic group avoids blowup", |b| {
        b.iter(|| atomic.search(black_box(&near_miss)));
    });

    c.bench_function("plain nested quantifier on short miss", |b| {
        b.iter(|| plain.search(black_box(&near_miss[..12])));
    });
}

fn bench_captures_batch(c: &mut Criterion) {
    let pattern = Pattern::compile(r"(?<year>\d{4})-(?<month>\d{2})-(?<day>\d{2})").unwrap();
    let inputs: Vec<&str> = vec!["2024-01-01", "2024-06-15", "2024-12-31"].repeat(64).into_iter().collect();

    c.bench_function("captures_batch", |b| {
        b.iter(|| pattern.captures_batch(black_box(&inputs)));
    });
}

criterion_group!(benches, bench_compile, bench_search, bench_backtracking, bench_captures_batch);
criterion_main!(benches);
