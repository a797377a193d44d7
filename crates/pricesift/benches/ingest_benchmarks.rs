//! Ingestion performance benchmarks.
//!
//! Measures file loading plus ingestion, and the normalizer on its own.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pricesift::normalize::parse_amount;
use pricesift::{IngestionPipeline, Loader};
use std::io::Write;
use tempfile::NamedTempFile;

/// Generate a semicolon price list with banner rows above the header.
fn generate_price_list(rows: usize) -> String {
    let mut data = String::from("Прайс-лист ООО \"Ромашка\"\nДействителен с 01.05.2024\n");
    data.push_str("№;Наименование товара;Ед. изм.;Цена за ед., руб.;Кол-во\n");

    for row in 0..rows {
        let price = 100.0 + (row % 5_000) as f64 * 1.37;
        let whole = price.trunc() as u64;
        let cents = ((price.fract() * 100.0).round() as u64).min(99);
        data.push_str(&format!(
            "{};Товар {};{};{} {:03},{:02};{}\n",
            row + 1,
            row,
            if row % 3 == 0 { "кг" } else { "шт" },
            whole / 1000,
            whole % 1000,
            cents,
            row % 12 + 1
        ));
    }

    data
}

/// Benchmark loading and ingesting price lists of various sizes.
fn bench_ingest_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest_file");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_price_list(*rows);
        let bytes = data.len();

        group.throughput(Throughput::Bytes(bytes as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter_with_setup(
                || {
                    let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
                    temp.write_all(data.as_bytes()).unwrap();
                    temp
                },
                |temp| {
                    let pipeline = IngestionPipeline::new();
                    black_box(pipeline.ingest_file(temp.path()).unwrap())
                },
            )
        });
    }

    group.finish();
}

/// Benchmark ingestion of an already loaded table.
fn bench_ingest_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest_table");

    for rows in [1_000, 10_000].iter() {
        let table = Loader::new().load_text(&generate_price_list(*rows)).unwrap();
        let pipeline = IngestionPipeline::new();

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| black_box(pipeline.ingest(table).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark the normalizer across common cell formats.
fn bench_parse_amount(c: &mut Criterion) {
    let samples = [
        "150",
        "1 234,56",
        "1.234.567,89",
        "1,234,567.89",
        "189,90 руб.",
        "nan",
        "по запросу",
    ];

    c.bench_function("parse_amount", |b| {
        b.iter(|| {
            for s in &samples {
                black_box(parse_amount(black_box(s), 0.0));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_ingest_file,
    bench_ingest_table,
    bench_parse_amount,
);
criterion_main!(benches);
