//! Benchmarks for chatdoc classification and rendering.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench rendering -- pdf`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chatdoc::Record;
use chatdoc::config::RenderConfig;
use chatdoc::core::output::{to_docx, to_markdown, to_pdf, to_xlsx};
use chatdoc::core::{TableSyntax, classify, parse_markdown_table};

const SIZES: [usize; 3] = [100, 1_000, 5_000];

// =============================================================================
// Test Data Generators
// =============================================================================

fn generate_messages(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| match i % 4 {
            0 => Record::message(format!("SECTION {i}")),
            1 => Record::message(format!("Owner: Sid. Item {i} is due on Friday.")),
            2 => Record::message(format!("Details at https://example.com/items/{i}")),
            _ => Record::message(format!(
                "Message number {i} with enough words to wrap across the page width at least once"
            )),
        })
        .collect()
}

fn generate_rows(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            Record::new()
                .with("Id", i.to_string())
                .with("Name", format!("Person {i}"))
                .with("City", if i % 2 == 0 { "Oslo" } else { "Lima" })
                .with("Note", "Some longer free-form note text")
        })
        .collect()
}

fn generate_markdown_table(rows: usize) -> String {
    let mut text = String::from("| Id | Name | City |\n|---|---|---|\n");
    for i in 0..rows {
        text.push_str(&format!("| {i} | Person {i} | Oslo |\n"));
    }
    text
}

// =============================================================================
// Classification Benchmarks
// =============================================================================

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for size in SIZES {
        let rows = generate_rows(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| black_box(classify(black_box(rows))));
        });
    }
    group.finish();
}

fn bench_parse_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_markdown_table");

    for size in SIZES {
        let text = generate_markdown_table(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| black_box(parse_markdown_table(black_box(text), TableSyntax::Lenient)));
        });
    }
    group.finish();
}

// =============================================================================
// Output Benchmarks
// =============================================================================

fn bench_output_markdown(c: &mut Criterion) {
    let mut group = c.benchmark_group("output_markdown");
    let config = RenderConfig::new();

    for size in SIZES {
        let rows = generate_rows(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| black_box(to_markdown(black_box(rows), &config)));
        });
    }
    group.finish();
}

fn bench_output_pdf(c: &mut Criterion) {
    let mut group = c.benchmark_group("output_pdf");
    group.sample_size(20);

    for (name, config) in [("plain", RenderConfig::new()), ("styled", RenderConfig::styled())] {
        for size in SIZES {
            let messages = generate_messages(size);
            group.throughput(Throughput::Elements(size as u64));
            group.bench_with_input(BenchmarkId::new(name, size), &messages, |b, messages| {
                b.iter(|| black_box(to_pdf(black_box(messages), &config).unwrap()));
            });
        }
    }

    let config = RenderConfig::new();
    for size in SIZES {
        let rows = generate_rows(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("table", size), &rows, |b, rows| {
            b.iter(|| black_box(to_pdf(black_box(rows), &config).unwrap()));
        });
    }
    group.finish();
}

fn bench_output_docx(c: &mut Criterion) {
    let mut group = c.benchmark_group("output_docx");
    group.sample_size(20);
    let config = RenderConfig::styled();

    for size in SIZES {
        let messages = generate_messages(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &messages, |b, messages| {
            b.iter(|| black_box(to_docx(black_box(messages), &config).unwrap()));
        });
    }
    group.finish();
}

fn bench_output_xlsx(c: &mut Criterion) {
    let mut group = c.benchmark_group("output_xlsx");
    group.sample_size(20);
    let config = RenderConfig::new();

    for size in SIZES {
        let rows = generate_rows(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| black_box(to_xlsx(black_box(rows), &config).unwrap()));
        });
    }
    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_classify,
    bench_parse_table,
    bench_output_markdown,
    bench_output_pdf,
    bench_output_docx,
    bench_output_xlsx,
);

criterion_main!(benches);
