//! Criterion benchmarks for model diffing.
//!
//! Each size builds a model of N selectors with a handful of properties and
//! measures the diff against an identical copy and against a copy where 1%
//! of the selectors changed one property.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use css_diff::diff;
use css_model::{StyleModel, properties};
use std::hint::black_box;

fn build_model(selectors: usize) -> StyleModel {
    (0..selectors)
        .map(|index| {
            (
                format!(".item-{index}"),
                properties([
                    ("width", "10px".into()),
                    ("color", "red".into()),
                    ("marginTop", "4px".into()),
                    ("zIndex", 1.into()),
                ]),
            )
        })
        .collect()
}

fn bench_diff(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("diff_models");
    for &size in &[100usize, 1_000usize, 10_000usize] {
        let old = build_model(size);
        let unchanged = old.clone();
        let mut edited = old.clone();
        for index in (0..size).step_by(100) {
            edited.modify_property(&format!(".item-{index}"), "color", "blue");
        }

        group.bench_with_input(BenchmarkId::new("unchanged", size), &size, |bencher, _| {
            bencher.iter(|| black_box(diff(&old, &unchanged)));
        });
        group.bench_with_input(BenchmarkId::new("one_percent_changed", size), &size, |bencher, _| {
            bencher.iter(|| black_box(diff(&old, &edited)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_diff);
criterion_main!(benches);
