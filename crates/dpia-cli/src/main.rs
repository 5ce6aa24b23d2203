mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::assessment::AssessArgs;
use commands::cross_border::CrossBorderArgs;
use commands::severity::SeverityArgs;

/// Data protection impact assessments under the Swiss DSG
#[derive(Parser)]
#[command(
    name = "dpia",
    version,
    about = "Data protection impact assessments under the Swiss DSG",
    long_about = "A CLI for classifying the risk of a personal-data processing activity, \
                  deciding Art. 22 DSG compliance and printing the decision trace. \
                  Optionally reconciles a classification produced by an external service."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level for diagnostics on stderr (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess a processing profile: findings, overall risk, compliance verdict
    Assess(AssessArgs),
    /// Look up a severity in the likelihood x impact matrix
    Severity(SeverityArgs),
    /// Check transfer notes against the high-risk jurisdiction heuristic
    CrossBorder(CrossBorderArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Assess(args) => commands::assessment::run_assess(args),
        Commands::Severity(args) => commands::severity::run_severity(args),
        Commands::CrossBorder(args) => commands::cross_border::run_cross_border(args),
        Commands::Version => {
            println!("dpia {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
