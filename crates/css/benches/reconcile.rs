//! Criterion benchmarks for replaying change sets onto a live rule list.
//!
//! Compares an incremental update of a sheet against rewriting the whole
//! sheet text, for a small edit on sheets of growing size.

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use css::host::memory::MemoryRuleList;
use css::{RuleList as _, StyleModel, diff, properties, reconcile};
use std::hint::black_box;

fn build_model(selectors: usize) -> StyleModel {
    (0..selectors)
        .map(|index| {
            (
                format!(".row-{index}"),
                properties([("height", "24px".into()), ("color", "black".into())]),
            )
        })
        .collect()
}

fn bench_reconcile(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("reconcile");
    for &size in &[100usize, 1_000usize] {
        let old = build_model(size);
        let mut new = old.clone();
        new.modify_property(".row-0", "color", "white");
        new.remove_selector(&format!(".row-{}", size / 2));
        new.add_selector(".footer", properties([("height", "48px".into())]), false);
        let changes = diff(&old, &new);
        let css = old.to_css(None);

        group.bench_with_input(BenchmarkId::new("incremental", size), &size, |bencher, _| {
            bencher.iter_batched(
                || MemoryRuleList::from_css(&css),
                |rules| {
                    if let Ok(mut live) = rules {
                        black_box(reconcile(&mut live, &new, &changes).is_ok());
                    }
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("full_rewrite", size), &size, |bencher, _| {
            bencher.iter_batched(
                || MemoryRuleList::from_css(&css),
                |rules| {
                    if let Ok(mut live) = rules {
                        black_box(live.replace_text(&new.to_css(None)).is_ok());
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reconcile);
criterion_main!(benches);
