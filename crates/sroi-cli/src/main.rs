mod commands;
mod display;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::io;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::scenarios::SensitivityArgs;
use commands::sroi::{CalculateArgs, ValidateArgs};

/// Social Return on Investment calculations
#[derive(Parser)]
#[command(
    name = "sroi",
    version,
    about = "Social Return on Investment calculations",
    long_about = "A CLI for computing Social Return on Investment with discounted \
                  cash-flow analysis. Reports SROI, net benefit, benefit-cost ratio, \
                  payback period and a year-by-year projection, and sweeps any two \
                  inputs for sensitivity."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log computation details to stderr (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the full SROI report
    Calculate(CalculateArgs),
    /// Check inputs and report every failing field
    Validate(ValidateArgs),
    /// Two-way sensitivity of an SROI metric
    Sensitivity(SensitivityArgs),
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

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let mut exit_code = 0;

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::sroi::run_calculate(args),
        Commands::Validate(args) => commands::sroi::run_validate(args).map(|(value, code)| {
            exit_code = code;
            value
        }),
        Commands::Sensitivity(args) => commands::scenarios::run_sensitivity(args),
        Commands::Version => {
            println!("sroi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(exit_code);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
