use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rowdiff_diff::{key_diff, venn_diff};
use rowdiff_types::Record;
use serde_json::json;

fn dataset(len: usize, offset: usize) -> Vec<Record> {
    (0..len)
        .map(|i| {
            let id = i + offset;
            Record::from(json!({
                "id": id,
                "name": format!("row-{id}"),
                "score": (id * 7) % 100,
                "tags": ["a", "b"],
            }))
        })
        .collect()
}

fn bench_key_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_diff");
    for len in [1_000usize, 10_000] {
        let old = dataset(len, 0);
        let new = dataset(len, len / 10);
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| key_diff(black_box(old.clone()), black_box(new.clone()), &["id"]))
        });
    }
    group.finish();
}

fn bench_venn_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("venn_diff");
    for len in [1_000usize, 10_000] {
        let old = dataset(len, 0);
        let new = dataset(len, len / 10);
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| venn_diff(black_box(old.clone()), black_box(new.clone())))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_key_diff, bench_venn_diff);
criterion_main!(benches);
