//! Pricesift CLI - price-list ingestion.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Ingest {
            file,
            output,
            llm,
            supplier,
            unit,
            pretty,
        } => commands::ingest::run(file, output, llm, supplier, unit, pretty),

        Commands::Inspect { file, llm } => commands::inspect::run(file, llm, cli.verbose),

        Commands::Rows { file } => commands::rows::run(file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
