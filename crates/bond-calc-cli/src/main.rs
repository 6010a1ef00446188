mod commands;
mod input;
mod logging;
mod menu;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

/// Bond price, duration and convexity calculations
#[derive(Parser)]
#[command(
    name = "bondcalc",
    version,
    about = "Bond price, duration and convexity calculations",
    long_about = "A calculator for fixed-rate bullet bonds with decimal precision. \
                  Run without a subcommand for the interactive menu, or pipe a single \
                  JSON input to one of the subcommands for scripted use."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive numbered menu (the default)
    Menu,
    /// Price a bond and break the value into coupon and principal PV
    Price,
    /// Macaulay and modified duration from bond parameters
    Duration,
    /// Modified duration from a known Macaulay duration
    ModifiedDuration,
    /// Duration-only price change estimate
    PriceChange,
    /// Analytical convexity
    Convexity,
    /// Convexity from repricing at shifted yields
    ApproxConvexity,
    /// Duration plus convexity price change estimate
    DurationConvexity,
    /// Price, durations, convexity and DV01 in one pass
    Risk,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
    Yaml,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        None | Some(Commands::Menu) => process::exit(menu::run_stdio()),
        Some(Commands::Price) => commands::pricing::run_price(),
        Some(Commands::Duration) => commands::risk::run_duration(),
        Some(Commands::ModifiedDuration) => commands::risk::run_modified_duration(),
        Some(Commands::PriceChange) => commands::price_change::run_price_change(),
        Some(Commands::Convexity) => commands::risk::run_convexity(),
        Some(Commands::ApproxConvexity) => commands::risk::run_approx_convexity(),
        Some(Commands::DurationConvexity) => commands::price_change::run_duration_convexity(),
        Some(Commands::Risk) => commands::risk::run_risk(),
        Some(Commands::Version) => {
            println!("bondcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
