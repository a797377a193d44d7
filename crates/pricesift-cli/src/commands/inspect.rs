//! Inspect command - show how a price list would be read.

use std::path::PathBuf;

use colored::Colorize;
use pricesift::IngestionPipeline;

use super::build_provider;
use crate::cli::LlmArgs;

pub fn run(file: PathBuf, llm: LlmArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let mut pipeline = IngestionPipeline::new();
    if let Some(provider) = build_provider(&llm)? {
        pipeline = pipeline.with_llm(provider);
    }

    let (table, source) = pipeline.load_file(&file)?;
    let classification = pipeline.inspect(&table)?;

    println!(
        "{} {}",
        "Inspecting".cyan().bold(),
        file.display().to_string().white()
    );
    println!(
        "  {} {} ({} sheet(s), {} rows x {} columns, encoding {})",
        "Format:".bold(),
        source.format,
        source.sheet_count,
        source.row_count,
        source.column_count,
        source.encoding
    );
    if verbose {
        println!("  {} {}", "SHA-256:".bold(), source.hash);
    }

    let header = table.padded_row(classification.header_row).unwrap_or_default();
    let label = |idx: Option<usize>| match idx {
        Some(i) => format!("{} ({:?})", i, header.get(i).map(|c| c.to_string()).unwrap_or_default()),
        None => "-".dimmed().to_string(),
    };

    println!();
    println!("  {:10} {}", "Header:".bold(), classification.header_row);
    println!("  {:10} {}", "Name:".bold(), label(Some(classification.mapping.name_idx)));
    println!("  {:10} {}", "Price:".bold(), label(classification.mapping.price_idx));
    println!("  {:10} {}", "Quantity:".bold(), label(classification.mapping.quantity_idx));
    println!("  {:10} {}", "Unit:".bold(), label(classification.mapping.unit_idx));
    println!();
    println!(
        "Columns classified by {}",
        classification.classifier.green().bold()
    );
    if let Some(reason) = classification.delegated_error {
        println!("{} {}", "LLM fallback:".yellow().bold(), reason);
    }

    Ok(())
}
