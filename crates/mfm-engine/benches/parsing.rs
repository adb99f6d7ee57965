use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use mfm_engine::{Dialect, TextChange};
mod common;

fn bench_full_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let dialect = Dialect::default();
    for size in [10, 100] {
        let content = common::generate_markdown_content(size);
        group.bench_function(format!("full_{size}"), |b| {
            b.iter(|| {
                let doc = dialect
                    .parse_complete_text(std::hint::black_box(&content))
                    .unwrap();
                std::hint::black_box(doc);
            });
        });
    }

    group.finish();
}

fn bench_update_vs_reparse(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");
    group.sample_size(10);

    let dialect = Dialect::default();
    let content = common::generate_markdown_content(100);
    let doc = dialect.parse_complete_text(&content).unwrap();
    let change = TextChange::insert(common::last_word_offset(&content), "x");
    let edited = change.splice(&content, 0).unwrap();

    group.bench_function("incremental", |b| {
        b.iter(|| {
            let updated = dialect.parse_update(&doc, std::hint::black_box(&change));
            std::hint::black_box(updated.unwrap());
        });
    });

    group.bench_function("full_reparse", |b| {
        b.iter_batched(
            || edited.clone(),
            |text| std::hint::black_box(dialect.parse_complete_text(&text).unwrap()),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_full_parse, bench_update_vs_reparse);
criterion_main!(benches);
