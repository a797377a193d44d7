//! Ingest command - turn a price list into canonical entries.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use colored::Colorize;
use pricesift::{CanonicalEntry, IngestConfig, IngestionPipeline};
use serde::Serialize;

use super::{build_provider, cancel_on_ctrlc};
use crate::cli::LlmArgs;

#[derive(Serialize)]
struct Output<'a> {
    entries: &'a [CanonicalEntry],
}

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    llm: LlmArgs,
    supplier: Option<String>,
    unit: Option<String>,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let mut config = IngestConfig::default();
    if let Some(supplier) = supplier {
        config.supplier = supplier;
    }
    if let Some(unit) = unit {
        config.default_unit = unit;
    }

    let mut pipeline = IngestionPipeline::with_config(config);
    if let Some(provider) = build_provider(&llm)? {
        pipeline = pipeline.with_llm(provider);
    }

    let cancel = cancel_on_ctrlc()?;
    let report = pipeline.ingest_file_with_cancel(&file, &cancel)?;

    let payload = Output {
        entries: &report.entries,
    };
    match &output {
        Some(path) => write_json(BufWriter::new(File::create(path)?), &payload, pretty)?,
        None => write_json(io::stdout().lock(), &payload, pretty)?,
    }

    eprintln!(
        "{} {} entries from {} (header row {}, {} classifier, {} rows skipped)",
        "Ingested".green().bold(),
        report.entries.len().to_string().white().bold(),
        report.source.file,
        report.classification.header_row,
        report.classification.classifier.cyan(),
        report.skipped_rows
    );
    if let Some(reason) = &report.classification.delegated_error {
        eprintln!("{} {}", "LLM fallback:".yellow().bold(), reason);
    }
    if let Some(path) = output {
        eprintln!(
            "{} {}",
            "Saved to".green().bold(),
            path.display().to_string().white()
        );
    }

    Ok(())
}

fn write_json<W: Write, T: Serialize>(
    mut writer: W,
    value: &T,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
