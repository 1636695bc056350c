use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use readeck_export_core::tokenizer::Tokenizer;
use readeck_export_core::{ExportConfig, extract_annotations, notes_from_html};

/// Repeats the fixture's section body to build larger documents.
fn scaled_fixture(copies: usize) -> String {
    let html = std::fs::read_to_string("../../tests/fixtures/annotated_article.html").unwrap();
    let mut out = String::with_capacity(html.len() * copies);
    for i in 0..copies {
        out.push_str(&html.replace("data-annotation-id-value=\"a", &format!("data-annotation-id-value=\"c{i}-a")));
    }
    out
}

fn bench_tokenize(c: &mut Criterion) {
    let html = scaled_fixture(100);

    c.bench_function("tokenize", |b| b.iter(|| Tokenizer::new(black_box(&html)).count()));
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    for copies in [1, 10, 100] {
        let html = scaled_fixture(copies);
        group.bench_with_input(BenchmarkId::from_parameter(copies), &html, |b, html| {
            b.iter(|| extract_annotations(black_box(html)))
        });
    }

    group.finish();
}

fn bench_notes(c: &mut Criterion) {
    let html = scaled_fixture(10);
    let config = ExportConfig::default();

    c.bench_function("notes_from_html", |b| b.iter(|| notes_from_html(black_box(&html), &config)));
}

criterion_group!(benches, bench_tokenize, bench_extract, bench_notes);
criterion_main!(benches);
