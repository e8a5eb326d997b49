//! Benchmarks for display-name templating
//!
//! Tests performance of placeholder substitution and full record normalization.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use javscraper::config::MetadataConfig;
use javscraper::metadata::{normalize, TitleTemplate};
use javscraper_common::VideoRecord;

/// Default-style template
const TEMPLATE_SIMPLE: &str = "%num% %title%";

/// Template using most placeholders
const TEMPLATE_COMPLEX: &str =
    "[%year%-%month%] %num% %title% (%actor_first%) {%studio% / %maker%} %set% %director%";

/// Template repeating placeholders with mixed case
const TEMPLATE_REPEATED: &str = "%NUM% %num% %Num% %title% %TITLE% %actor% %actor% %date%";

/// Template with unknown placeholders and stray percent signs
const TEMPLATE_LITERALS: &str = "100% %unknown% %num% 50%% %title%";

fn create_record() -> VideoRecord {
    VideoRecord {
        title: "A Long Summer Afternoon By The Sea, Jane Doe, John Roe".to_string(),
        date: Some("2021-03-09".to_string()),
        genres: vec!["Drama".into(), "HD".into(), "Jane Doe".into()],
        actors: vec!["Jane Doe".into(), "John Roe".into()],
        director: Some("Director".into()),
        studio: Some("Studio".into()),
        maker: Some("Maker".into()),
        set: Some("Series".into()),
        ..VideoRecord::new("ABC-123", "bench")
    }
}

fn bench_render(c: &mut Criterion) {
    let ctx = TitleTemplate::from_record(&create_record());
    let mut group = c.benchmark_group("template_render");

    for (name, template) in [
        ("simple", TEMPLATE_SIMPLE),
        ("complex", TEMPLATE_COMPLEX),
        ("repeated", TEMPLATE_REPEATED),
        ("literals", TEMPLATE_LITERALS),
    ] {
        group.throughput(Throughput::Bytes(template.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), template, |b, t| {
            b.iter(|| ctx.render(black_box(t), black_box("")))
        });
    }

    group.finish();
}

fn bench_context(c: &mut Criterion) {
    let record = create_record();
    c.bench_function("template_from_record", |b| {
        b.iter(|| TitleTemplate::from_record(black_box(&record)))
    });
}

fn bench_normalize(c: &mut Criterion) {
    let config = MetadataConfig {
        ignore_genres: vec!["HD".into()],
        genre_ignore_actor: true,
        add_subtitle_genre: true,
        title_format: TEMPLATE_COMPLEX.to_string(),
        ..Default::default()
    };
    let record = create_record();

    c.bench_function("normalize_record", |b| {
        b.iter(|| normalize(black_box(record.clone()), black_box("ABC-123-C"), &config))
    });
}

criterion_group!(benches, bench_render, bench_context, bench_normalize);
criterion_main!(benches);
