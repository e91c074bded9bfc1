use crate::config::ScorerKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "trustloop")]
#[command(
    author,
    version,
    about = "Score text for trustworthiness and rewrite it until it passes",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log output format (pretty or json)
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: String,

    /// Export spans to an OTLP collector at this endpoint
    #[arg(long, global = true)]
    pub otlp_endpoint: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the reflect-critique-correct loop on a piece of text
    Run(RunArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Text to evaluate
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub text: Option<String>,

    /// Read the text to evaluate from a file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Question the text answers, forwarded to the scorer and corrector
    #[arg(short, long)]
    pub question: Option<String>,

    /// Minimum trust score for a PASS verdict (0, 1]
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Maximum number of scoring rounds
    #[arg(short = 'n', long)]
    pub max_iterations: Option<u32>,

    /// Require the score to exceed the threshold instead of reaching it
    #[arg(long)]
    pub strict: bool,

    /// Trust scorer backend
    #[arg(long, value_enum)]
    pub scorer: Option<ScorerKind>,

    /// Chat model used for corrections and the llm scorer
    #[arg(short, long)]
    pub model: Option<String>,

    /// Quality preset for the hosted scorer (base, low, medium, high, best)
    #[arg(long)]
    pub quality_preset: Option<String>,

    /// Retry transient scorer and corrector failures this many times
    #[arg(long)]
    pub retries: Option<u32>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the full outcome as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit with status 2 when no candidate passed
    #[arg(long)]
    pub require_pass: bool,
}
