//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pricesift: ingest supplier price lists into canonical line items
#[derive(Parser)]
#[command(name = "pricesift")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest a price list and emit canonical entries as JSON
    Ingest {
        /// Path to the price list (CSV/TSV/XLSX/XLS/ODS)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        llm: LlmArgs,

        /// Supplier label stamped on every entry
        #[arg(long)]
        supplier: Option<String>,

        /// Unit used when a row has none
        #[arg(long)]
        unit: Option<String>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show the detected header row and column roles
    Inspect {
        /// Path to the price list
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        llm: LlmArgs,
    },

    /// Print the data rows as `{"rows": [...]}`, keyed by each sheet's header
    Rows {
        /// Path to the price list
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Options selecting the delegated classifier.
#[derive(clap::Args, Clone, Debug)]
pub struct LlmArgs {
    /// LLM provider used to classify columns (heuristic fallback always applies)
    #[arg(long, default_value = "none")]
    pub llm: LlmProviderChoice,

    /// Model to use (provider-specific, e.g., "gpt-4o-mini", "llama3.2")
    #[arg(long)]
    pub model: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

/// LLM provider choice for column classification
#[derive(Clone, Debug, Default)]
pub enum LlmProviderChoice {
    /// No LLM - keyword heuristic only
    #[default]
    None,
    /// Anthropic Claude API (requires ANTHROPIC_API_KEY)
    Anthropic,
    /// OpenAI GPT API (requires OPENAI_API_KEY)
    OpenAI,
    /// Ollama local models (requires Ollama running)
    Ollama,
    /// Mock provider that always times out, exercising the fallback
    Mock,
}

impl std::str::FromStr for LlmProviderChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(LlmProviderChoice::None),
            "anthropic" | "claude" => Ok(LlmProviderChoice::Anthropic),
            "openai" | "gpt" => Ok(LlmProviderChoice::OpenAI),
            "ollama" | "local" => Ok(LlmProviderChoice::Ollama),
            "mock" | "test" => Ok(LlmProviderChoice::Mock),
            _ => Err(format!(
                "Unknown provider: {}. Use: none, anthropic, openai, ollama, or mock.",
                s
            )),
        }
    }
}

impl std::fmt::Display for LlmProviderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProviderChoice::None => write!(f, "none"),
            LlmProviderChoice::Anthropic => write!(f, "anthropic"),
            LlmProviderChoice::OpenAI => write!(f, "openai"),
            LlmProviderChoice::Ollama => write!(f, "ollama"),
            LlmProviderChoice::Mock => write!(f, "mock"),
        }
    }
}
