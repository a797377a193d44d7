//! Rows command - dump data rows keyed by each sheet's header.

use std::path::PathBuf;

use pricesift::IngestionPipeline;
use serde_json::json;

pub fn run(file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let rows = IngestionPipeline::new().file_records(&file)?;
    let output = json!({ "rows": serde_json::to_value(rows)? });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
