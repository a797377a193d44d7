//! Integration tests for Pricesift.

use std::io::Write;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_xlsxwriter::Workbook;
use tempfile::NamedTempFile;

use pricesift::{
    CancelFlag, Cell, ClassificationError, IngestConfig, IngestionPipeline, InputError, Loader,
    MockProvider, PipelineError, RawTable,
};

/// Helper to create a temporary file with the given extension and bytes.
fn create_test_file(suffix: &str, content: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content).expect("Failed to write to temp file");
    file
}

/// A value written into a test workbook.
enum Xl {
    Text(&'static str),
    Num(f64),
    Skip,
}

/// Helper to write an .xlsx workbook with the given named sheets.
fn create_workbook(sheets: &[(&str, Vec<Vec<Xl>>)]) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".xlsx")
        .tempfile()
        .expect("Failed to create temp file");

    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).expect("Invalid sheet name");
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match value {
                    Xl::Text(s) => {
                        sheet.write_string(r, c, *s).expect("Failed to write cell");
                    }
                    Xl::Num(n) => {
                        sheet.write_number(r, c, *n).expect("Failed to write cell");
                    }
                    Xl::Skip => {}
                }
            }
        }
    }
    workbook.save(file.path()).expect("Failed to save workbook");
    file
}

/// Route library logs to the test harness; later calls are no-ops.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

fn fixed_pipeline() -> IngestionPipeline {
    IngestionPipeline::with_config(IngestConfig {
        ingestion_date: NaiveDate::from_ymd_opt(2024, 5, 20),
        ..IngestConfig::default()
    })
}

// =============================================================================
// File Ingestion
// =============================================================================

#[test]
fn test_ingest_csv_with_banner_rows() {
    init_logging();
    let content = "Прайс-лист ООО \"Ромашка\"\n\
                   Действителен с 01.05.2024\n\
                   \n\
                   №;Наименование товара;Ед. изм.;Цена за ед., руб.;Кол-во\n\
                   1;Молоток слесарный;шт;1 250,00;2\n\
                   2;Гвозди 100 мм;кг;189,90 руб.;3,5\n\
                   3;nan;шт;10;1\n\
                   4;Клещи;;850;\n";
    let file = create_test_file(".csv", content.as_bytes());

    let report = fixed_pipeline()
        .ingest_file(file.path())
        .expect("Ingestion failed");

    assert_eq!(report.source.format, "csv-semicolon");
    assert_eq!(report.source.encoding, "utf-8");
    assert!(report.source.hash.starts_with("sha256:"));
    assert_eq!(report.classification.header_row, 2);
    assert_eq!(report.classification.classifier, "heuristic");
    assert_eq!(report.classification.mapping.name_idx, 1);
    assert_eq!(report.classification.mapping.unit_idx, Some(2));
    assert_eq!(report.classification.mapping.price_idx, Some(3));
    assert_eq!(report.classification.mapping.quantity_idx, Some(4));
    assert_eq!(report.skipped_rows, 1);

    let entries = &report.entries;
    assert_eq!(entries.len(), 3);

    assert_eq!(entries[0].product, "Молоток слесарный");
    assert_eq!(entries[0].price, 1250.0);
    assert_eq!(entries[0].quantity, 2.0);
    assert_eq!(entries[0].total, 2500.0);
    assert_eq!(entries[0].date, "20.05.2024");

    assert_eq!(entries[1].unit, "кг");
    assert_eq!(entries[1].price, 189.9);
    assert_eq!(entries[1].quantity, 3.5);
    assert_eq!(entries[1].total, 664.65);

    assert_eq!(entries[2].product, "Клещи");
    assert_eq!(entries[2].unit, "шт");
    assert_eq!(entries[2].quantity, 1.0);
    assert_eq!(entries[2].total, 850.0);
}

#[test]
fn test_ingest_windows_1251_tsv() {
    let text = "Товар\tЦена\tКоличество\nДрель\t4999,99\t1\n";
    let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode(text);
    let file = create_test_file(".tsv", &bytes);

    let report = fixed_pipeline().ingest_file(file.path()).unwrap();

    assert_eq!(report.source.encoding, "windows-1251");
    assert_eq!(report.source.format, "tsv");
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].product, "Дрель");
    assert_eq!(report.entries[0].price, 4999.99);
}

#[test]
fn test_comma_banner_above_semicolon_table() {
    let content = "Прайс-лист ООО Ромашка, г. Москва, ул. Ленина 1\n\
                   Наименование;Цена\n\
                   Молоток;150\n\
                   Клещи;200\n";
    let file = create_test_file(".csv", content.as_bytes());

    let report = fixed_pipeline().ingest_file(file.path()).unwrap();

    assert_eq!(report.source.format, "csv-semicolon");
    assert_eq!(report.classification.header_row, 1);
    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.entries[0].product, "Молоток");
    assert_eq!(report.entries[0].price, 150.0);
    assert_eq!(report.entries[1].product, "Клещи");
    assert_eq!(report.entries[1].price, 200.0);
}

#[test]
fn test_blank_file_is_input_error() {
    let file = create_test_file(".csv", b"\n , , \n\n");
    let err = fixed_pipeline().ingest_file(file.path()).unwrap_err();
    assert!(matches!(err, PipelineError::Input(_)));
}

#[test]
fn test_unsupported_extension() {
    let file = create_test_file(".pdf", b"%PDF-1.4");
    let err = fixed_pipeline().ingest_file(file.path()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Input(InputError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_missing_file() {
    let err = fixed_pipeline()
        .ingest_file("/nonexistent/price_list.csv")
        .unwrap_err();
    assert!(matches!(err, PipelineError::Input(InputError::Io { .. })));
}

// =============================================================================
// Workbooks
// =============================================================================

#[test]
fn test_ingest_two_sheet_workbook() {
    init_logging();
    let file = create_workbook(&[
        (
            "Инструмент",
            vec![
                vec![Xl::Text("Прайс-лист ООО Ромашка")],
                vec![Xl::Text("Наименование"), Xl::Text("Цена"), Xl::Text("Кол-во")],
                vec![Xl::Text("Молоток"), Xl::Num(150.5), Xl::Num(2.0)],
                vec![],
                vec![Xl::Text("Гвозди"), Xl::Text("99,90"), Xl::Skip],
            ],
        ),
        (
            "Акции",
            vec![vec![
                Xl::Text("Клещи"),
                Xl::Num(850.0),
                Xl::Num(1.0),
                Xl::Text("скидка"),
            ]],
        ),
    ]);

    let pipeline = fixed_pipeline();
    let (table, source) = pipeline.load_file(file.path()).unwrap();

    assert_eq!(source.format, "xlsx");
    assert_eq!(source.encoding, "binary");
    assert_eq!(source.sheet_count, 2);
    assert_eq!(table.len(), 5);
    assert_eq!(table.column_count(), 4);
    assert_eq!(table.padded_row(0).unwrap().len(), 4);
    assert_eq!(table.cell(2, 1), Some(&Cell::Number(150.5)));
    assert_eq!(table.cell(4, 0), Some(&Cell::Text("Клещи".to_string())));

    let report = pipeline.ingest_file(file.path()).unwrap();
    assert_eq!(report.classification.header_row, 1);

    let entries = &report.entries;
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].product, "Молоток");
    assert_eq!(entries[0].total, 301.0);
    assert_eq!(entries[1].product, "Гвозди");
    assert_eq!(entries[1].price, 99.9);
    assert_eq!(entries[1].quantity, 1.0);
    assert_eq!(entries[2].product, "Клещи");
    assert_eq!(entries[2].price, 850.0);
}

fn layout_per_sheet_workbook() -> NamedTempFile {
    create_workbook(&[
        (
            "Инструмент",
            vec![
                vec![Xl::Text("Наименование"), Xl::Text("Цена")],
                vec![Xl::Text("Молоток"), Xl::Num(150.0)],
            ],
        ),
        (
            "Расходники",
            vec![
                vec![Xl::Text("Раздел: расходники")],
                vec![Xl::Text("Цена"), Xl::Text("Наименование")],
                vec![Xl::Num(99.9), Xl::Text("Гвозди")],
            ],
        ),
        ("Пусто", vec![]),
    ])
}

#[test]
fn test_load_sheets_keeps_names_and_skips_empty() {
    let file = layout_per_sheet_workbook();

    let sheets = Loader::new().load_sheets(file.path()).unwrap();

    let names: Vec<&str> = sheets.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["Инструмент", "Расходники"]);
    assert_eq!(sheets[0].1.len(), 2);
    assert_eq!(sheets[1].1.len(), 3);
}

#[test]
fn test_file_records_use_each_sheet_header() {
    let file = layout_per_sheet_workbook();

    let records = fixed_pipeline().file_records(file.path()).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["Наименование"], Cell::Text("Молоток".to_string()));
    assert_eq!(records[0]["Цена"], Cell::Number(150.0));

    let keys: Vec<&String> = records[1].keys().collect();
    assert_eq!(keys, ["Цена", "Наименование"]);
    assert_eq!(records[1]["Наименование"], Cell::Text("Гвозди".to_string()));
    assert_eq!(records[1]["Цена"], Cell::Number(99.9));
}

// =============================================================================
// Classification and Fallback
// =============================================================================

#[test]
fn test_fallback_after_delegated_timeout() {
    init_logging();
    let table = RawTable::from_strings(vec![
        vec!["Наименование", "Цена", "Кол-во"],
        vec!["Молоток", "150", "2"],
    ]);
    let provider = Arc::new(MockProvider::timing_out());
    let pipeline = fixed_pipeline().with_llm(provider.clone());

    let entries = pipeline.ingest(&table).expect("fallback should succeed");

    assert_eq!(provider.calls(), 1);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].product, "Молоток");
    assert_eq!(entries[0].price, 150.0);
    assert_eq!(entries[0].quantity, 2.0);
    assert_eq!(entries[0].total, 300.0);
    assert_eq!(entries[0].unit, "шт");
}

#[test]
fn test_fallback_after_unreachable_service() {
    let table = RawTable::from_strings(vec![vec!["Товар", "Цена"], vec!["Ключ", "75,5"]]);
    let pipeline = fixed_pipeline().with_llm(Arc::new(MockProvider::unreachable()));

    let classification = pipeline.inspect(&table).unwrap();
    assert_eq!(classification.classifier, "heuristic");
    assert!(classification
        .delegated_error
        .as_deref()
        .is_some_and(|e| e.contains("unreachable")));
}

#[test]
fn test_delegated_index_beyond_width_falls_back() {
    let table = RawTable::from_strings(vec![vec!["Товар", "Цена"], vec!["Ключ", "75"]]);
    let provider = Arc::new(MockProvider::responding(
        r#"{"name_idx": 0, "price_idx": 7, "unit_idx": -1, "qty_idx": -1}"#,
    ));
    let pipeline = fixed_pipeline().with_llm(provider);

    let entries = pipeline.ingest(&table).unwrap();
    assert_eq!(entries[0].price, 75.0);
}

#[test]
fn test_unresolvable_name_column() {
    let table = RawTable::from_strings(vec![
        vec!["Артикул", "Цена", "Кол-во"],
        vec!["A-100", "150", "2"],
    ]);
    let err = fixed_pipeline().ingest(&table).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Classification(ClassificationError::NoNameColumn(_))
    ));
}

#[test]
fn test_header_only_table_yields_no_entries() {
    let table = RawTable::from_strings(vec![vec!["Наименование", "Цена"]]);
    let entries = fixed_pipeline().ingest(&table).unwrap();
    assert!(entries.is_empty());
}

// =============================================================================
// Determinism and Cancellation
// =============================================================================

#[test]
fn test_idempotent_apart_from_ids() {
    let table = RawTable::from_strings(vec![
        vec!["Наименование", "Цена", "Кол-во", "Ед."],
        vec!["Молоток", "150", "2", "шт"],
        vec!["Гвозди", "1.234,50", "0,5", "кг"],
    ]);
    let pipeline = fixed_pipeline();

    let first = pipeline.ingest(&table).unwrap();
    let second = pipeline.ingest(&table).unwrap();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_ne!(a.id, b.id);
        assert_eq!(
            (&a.date, &a.supplier, &a.product, a.quantity, a.price, a.total, &a.unit),
            (&b.date, &b.supplier, &b.product, b.quantity, b.price, b.total, &b.unit)
        );
    }
}

#[test]
fn test_cancelled_file_ingestion() {
    let file = create_test_file(".csv", "Товар,Цена\nКлюч,10\n".as_bytes());
    let cancel = CancelFlag::new();
    cancel.cancel();

    let err = fixed_pipeline()
        .ingest_file_with_cancel(file.path(), &cancel)
        .unwrap_err();
    assert!(matches!(err, PipelineError::Cancelled));
}

#[test]
fn test_concurrent_ingestions_share_pipeline() {
    let table = RawTable::from_strings(vec![vec!["Товар", "Цена"], vec!["Ключ", "10"]]);
    let pipeline = Arc::new(fixed_pipeline());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            let table = table.clone();
            std::thread::spawn(move || pipeline.ingest(&table).unwrap())
        })
        .collect();

    for handle in handles {
        let entries = handle.join().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].price, 10.0);
    }
}

// =============================================================================
// Output Shape
// =============================================================================

#[test]
fn test_entry_serialization_fields() {
    let table = RawTable::from_strings(vec![vec!["Товар", "Цена"], vec!["Ключ", "10"]]);
    let entries = fixed_pipeline().ingest(&table).unwrap();

    let value = serde_json::to_value(&entries[0]).unwrap();
    let keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    for key in ["id", "date", "supplier", "product", "quantity", "price", "total", "unit"] {
        assert!(keys.contains(&key), "missing {}", key);
    }
    assert_eq!(value["supplier"], "Импортированные данные");
}

#[test]
fn test_raw_records_keyed_by_header() {
    let file = create_test_file(
        ".csv",
        "Каталог\nНаименование,,Цена\nМолоток,A-1,150\n".as_bytes(),
    );
    let pipeline = fixed_pipeline();
    let (table, _) = pipeline.load_file(file.path()).unwrap();
    let classification = pipeline.inspect(&table).unwrap();

    let records = table.records(classification.header_row);
    assert_eq!(records.len(), 1);
    let keys: Vec<&String> = records[0].keys().collect();
    assert_eq!(keys, ["Наименование", "column_2", "Цена"]);
}
