//! snaptab CLI
//!
//! Command-line interface over snapshot scanning, catalog builds, and
//! enumeration table output

use clap::{Parser, Subcommand, ValueEnum};
use snaptab_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "snaptab")]
#[command(about = "snaptab - Snapshot to relational tables", long_about = None)]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, global = true, default_value = "human")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Human,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Stream and count one entity's documents
    Scan(commands::scan::ScanArgs),
    /// Reference catalog operations
    Catalog(commands::catalog::CatalogArgs),
    /// Write enumeration tables from a snapshot
    Enumerate(commands::enumerate::EnumerateArgs),
}

fn main() {
    let cli = Cli::parse();

    init(match cli.log_format {
        LogFormat::Human => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let result = match cli.command {
        Commands::Scan(args) => commands::scan::execute(args),
        Commands::Catalog(args) => commands::catalog::execute(args),
        Commands::Enumerate(args) => commands::enumerate::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
